//! Convert between Quartz events and the translator's event types.

use std::ffi::c_void;
use std::ptr;

use core_foundation::base::CFRelease;
use objc::runtime::{Class, Object, Sel};
use objc::{msg_send, sel, sel_impl, Message};

use crate::gesture::{ClickPhase, EventKind, Point, SyntheticClick, TapEvent};

use super::ffi::{
    self, CGEventRef, CGPoint, EVENT_FLAG_MASK_COMMAND, EVENT_GESTURE, EVENT_LEFT_MOUSE_DOWN,
    EVENT_LEFT_MOUSE_UP, EVENT_TARGET_UNIX_PROCESS_ID, HID_EVENT_TAP, MOUSE_BUTTON_LEFT,
    NS_EVENT_TYPE_PRESSURE, SOURCE_STATE_HID_SYSTEM,
};

/// Read one delivered event. Returns None for unknown types, for gesture
/// events that are not pressure (magnify, swipe, rotate) and when the
/// pressure fields are unavailable.
pub fn read(event_type: u32, event: CGEventRef) -> Option<TapEvent> {
    if event.is_null() {
        return None;
    }

    let ns_event = match event_type {
        EVENT_GESTURE => Some(ns_event(event)?),
        _ => None,
    };
    let kind = classify(event_type, ns_event.and_then(ns_event_type))?;

    let location = unsafe { ffi::CGEventGetLocation(event) };
    let location = Point {
        x: location.x,
        y: location.y,
    };

    let tap_event = match (kind, ns_event) {
        (EventKind::LeftDown, _) => TapEvent::left_down(location),
        (EventKind::LeftUp, _) => TapEvent::left_up(location),
        (EventKind::Pressure, Some(ns_event)) => {
            let (stage, pressure) = read_pressure(ns_event);
            TapEvent::pressure(stage, pressure, location)
        }
        (EventKind::Pressure, None) => return None,
    };

    let pid = unsafe { ffi::CGEventGetIntegerValueField(event, EVENT_TARGET_UNIX_PROCESS_ID) };
    Some(tap_event.with_target_pid(valid_pid(pid)))
}

/// Map a Quartz event type, plus the AppKit type for gesture events, to the
/// kind the translator handles.
fn classify(event_type: u32, ns_type: Option<usize>) -> Option<EventKind> {
    match event_type {
        EVENT_LEFT_MOUSE_DOWN => Some(EventKind::LeftDown),
        EVENT_LEFT_MOUSE_UP => Some(EventKind::LeftUp),
        EVENT_GESTURE if ns_type == Some(NS_EVENT_TYPE_PRESSURE) => Some(EventKind::Pressure),
        _ => None,
    }
}

fn valid_pid(raw: i64) -> Option<i32> {
    i32::try_from(raw).ok().filter(|&pid| pid > 0)
}

/// Autoreleased NSEvent view of `event`; stage and pressure have no public
/// Quartz field.
fn ns_event(event: CGEventRef) -> Option<*mut Object> {
    let class = Class::get("NSEvent")?;
    let ns_event: *mut Object = unsafe { msg_send![class, eventWithCGEvent: event] };
    (!ns_event.is_null()).then_some(ns_event)
}

fn ns_event_type(ns_event: *mut Object) -> Option<usize> {
    // `type` is a keyword, so the selector is registered by hand.
    unsafe { (*ns_event).send_message::<(), usize>(Sel::register("type"), ()) }.ok()
}

fn read_pressure(ns_event: *mut Object) -> (i64, f32) {
    unsafe {
        let stage: isize = msg_send![ns_event, stage];
        let pressure: f32 = msg_send![ns_event, pressure];
        (stage as i64, pressure)
    }
}

/// Create a left-button mouse event for `click`. The caller owns the result.
fn create(click: &SyntheticClick) -> Option<CGEventRef> {
    let mouse_type = match click.phase {
        ClickPhase::Down => EVENT_LEFT_MOUSE_DOWN,
        ClickPhase::Up => EVENT_LEFT_MOUSE_UP,
    };
    let position = CGPoint {
        x: click.location.x,
        y: click.location.y,
    };

    unsafe {
        let source = ffi::CGEventSourceCreate(SOURCE_STATE_HID_SYSTEM);
        let event = ffi::CGEventCreateMouseEvent(source, mouse_type, position, MOUSE_BUTTON_LEFT);
        if !source.is_null() {
            CFRelease(source as *const c_void);
        }
        if event.is_null() {
            return None;
        }
        if click.command {
            ffi::CGEventSetFlags(event, EVENT_FLAG_MASK_COMMAND);
        }
        Some(event)
    }
}

/// Post `down` into the HID stream and return `up` for the tap callback to
/// hand back in place of the original event.
///
/// Returns None when either event could not be created; nothing is posted
/// in that case.
pub fn post_click(down: &SyntheticClick, up: &SyntheticClick) -> Option<CGEventRef> {
    let up_event = create(up)?;
    let Some(down_event) = create(down) else {
        unsafe { CFRelease(up_event as *const c_void) };
        return None;
    };

    unsafe {
        ffi::CGEventPost(HID_EVENT_TAP, down_event);
        CFRelease(down_event as *const c_void);
    }

    Some(up_event)
}

/// Value a tap callback returns to drop the event.
pub fn dropped() -> CGEventRef {
    ptr::null_mut()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_button_events() {
        assert_eq!(classify(1, None), Some(EventKind::LeftDown));
        assert_eq!(classify(2, None), Some(EventKind::LeftUp));
        assert_eq!(
            classify(EVENT_LEFT_MOUSE_UP, Some(NS_EVENT_TYPE_PRESSURE)),
            Some(EventKind::LeftUp)
        );
    }

    #[test]
    fn test_classify_gesture_events() {
        assert_eq!(EVENT_GESTURE, 29);
        assert_eq!(NS_EVENT_TYPE_PRESSURE, 34);
        assert_eq!(classify(29, Some(34)), Some(EventKind::Pressure));
        // magnify, swipe, rotate
        for ns_type in [30, 31, 18] {
            assert_eq!(classify(29, Some(ns_type)), None);
        }
        assert_eq!(classify(29, None), None);
    }

    #[test]
    fn test_classify_other_types() {
        assert_eq!(classify(34, Some(34)), None);
        assert_eq!(classify(5, None), None);
        assert_eq!(classify(ffi::EVENT_TAP_DISABLED_BY_TIMEOUT, None), None);
    }

    #[test]
    fn test_valid_pid() {
        assert_eq!(valid_pid(4242), Some(4242));
        assert_eq!(valid_pid(0), None);
        assert_eq!(valid_pid(-1), None);
        assert_eq!(valid_pid(i64::from(i32::MAX) + 1), None);
    }
}
