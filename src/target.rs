//! Which application decides whether a force click gets translated.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::gesture::{AppResolver, TapEvent};

/// Policy for picking the application a pressure event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetPolicy {
    /// The application holding keyboard focus (frontmost).
    #[default]
    Frontmost,
    /// The application owning the process id the OS recorded on the event.
    /// Differs from `Frontmost` for overlays, tooltips and inactive windows.
    EventOwner,
}

impl TargetPolicy {
    /// Resolve the relevant application name for `event`.
    /// Returns None when the OS has no answer; callers pass the event through.
    pub fn resolve(&self, event: &TapEvent, resolver: &dyn AppResolver) -> Option<String> {
        match self {
            TargetPolicy::Frontmost => resolver.frontmost_app(),
            TargetPolicy::EventOwner => event.target_pid.and_then(|pid| resolver.app_for_pid(pid)),
        }
    }
}

impl fmt::Display for TargetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetPolicy::Frontmost => write!(f, "frontmost"),
            TargetPolicy::EventOwner => write!(f, "event-owner"),
        }
    }
}

impl FromStr for TargetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "frontmost" | "focused" => Ok(TargetPolicy::Frontmost),
            "event-owner" | "eventowner" | "event_owner" => Ok(TargetPolicy::EventOwner),
            _ => Err(format!(
                "Invalid target policy '{}'. Valid values: frontmost, event-owner",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Point;

    struct Fixed;

    impl AppResolver for Fixed {
        fn frontmost_app(&self) -> Option<String> {
            Some("Finder".into())
        }

        fn app_for_pid(&self, pid: i32) -> Option<String> {
            (pid == 42).then(|| "Google Chrome".into())
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("frontmost".parse::<TargetPolicy>().unwrap(), TargetPolicy::Frontmost);
        assert_eq!("Event-Owner".parse::<TargetPolicy>().unwrap(), TargetPolicy::EventOwner);
        assert_eq!("event_owner".parse::<TargetPolicy>().unwrap(), TargetPolicy::EventOwner);
        assert!("window".parse::<TargetPolicy>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for policy in [TargetPolicy::Frontmost, TargetPolicy::EventOwner] {
            assert_eq!(policy.to_string().parse::<TargetPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_resolve_follows_policy() {
        let at = Point { x: 1.0, y: 2.0 };
        let ev = TapEvent::pressure(2, 0.0, at).with_target_pid(Some(42));

        assert_eq!(TargetPolicy::Frontmost.resolve(&ev, &Fixed).as_deref(), Some("Finder"));
        assert_eq!(TargetPolicy::EventOwner.resolve(&ev, &Fixed).as_deref(), Some("Google Chrome"));

        let no_pid = TapEvent::pressure(2, 0.0, at);
        assert_eq!(TargetPolicy::EventOwner.resolve(&no_pid, &Fixed), None);
    }
}
