//! Print pressure and left-button events for debugging.
//! Run: deep-click dump  (force click in any app to see the stage sequence).

use crate::gesture::{EventKind, TapEvent};

pub fn describe(event: &TapEvent) -> String {
    let what = match event.kind {
        EventKind::Pressure => format!("PRESSURE stage={} pressure={:.3}", event.stage, event.pressure),
        EventKind::LeftDown => "LEFT_DOWN".to_string(),
        EventKind::LeftUp => "LEFT_UP".to_string(),
    };
    let pid = event
        .target_pid
        .map(|pid| pid.to_string())
        .unwrap_or_else(|| "-".into());
    format!(
        "{:<34} at ({:.1}, {:.1}) pid={}",
        what, event.location.x, event.location.y, pid
    )
}

#[cfg(target_os = "macos")]
pub fn run_dump() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let tap = crate::tap::EventTap::install_listener()?;
    eprintln!("Dumping pressure and left-button events (Ctrl+C to stop):\n");
    tap.run();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Point;

    const AT: Point = Point { x: 10.0, y: 20.5 };

    #[test]
    fn test_describe_pressure() {
        let line = describe(&TapEvent::pressure(2, 0.5, AT).with_target_pid(Some(812)));
        assert!(line.starts_with("PRESSURE stage=2 pressure=0.500"));
        assert!(line.ends_with("at (10.0, 20.5) pid=812"));
    }

    #[test]
    fn test_describe_buttons_without_pid() {
        assert!(describe(&TapEvent::left_down(AT)).starts_with("LEFT_DOWN "));
        assert!(describe(&TapEvent::left_up(AT)).ends_with("pid=-"));
    }
}
