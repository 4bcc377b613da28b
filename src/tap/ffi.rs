//! Quartz Event Services and Accessibility declarations.

use core_foundation::base::CFTypeRef;
use std::ffi::c_void;

pub type CGEventRef = *mut c_void;
pub type CGEventSourceRef = *mut c_void;
pub type CGEventTapProxy = *const c_void;
pub type CGEventMask = u64;
pub type CFMachPortRef = CFTypeRef;
pub type CFRunLoopSourceRef = CFTypeRef;

pub type CGEventTapCallBack =
    extern "C" fn(CGEventTapProxy, u32, CGEventRef, *mut c_void) -> CGEventRef;

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct CGPoint {
    pub x: f64,
    pub y: f64,
}

// CGEventTapLocation
pub const HID_EVENT_TAP: u32 = 0;

// CGEventTapPlacement
pub const HEAD_INSERT_EVENT_TAP: u32 = 0;

// CGEventTapOptions
pub const TAP_OPTION_DEFAULT: u32 = 0;
pub const TAP_OPTION_LISTEN_ONLY: u32 = 1;

// CGEventType
pub const EVENT_LEFT_MOUSE_DOWN: u32 = 1;
pub const EVENT_LEFT_MOUSE_UP: u32 = 2;
/// Gesture events; trackpad pressure arrives with this Quartz type.
pub const EVENT_GESTURE: u32 = 29;
pub const EVENT_TAP_DISABLED_BY_TIMEOUT: u32 = 0xFFFF_FFFE;
pub const EVENT_TAP_DISABLED_BY_USER_INPUT: u32 = 0xFFFF_FFFF;

// NSEventType
pub const NS_EVENT_TYPE_PRESSURE: usize = 34;

// CGEventField
pub const EVENT_TARGET_UNIX_PROCESS_ID: u32 = 41;

// CGMouseButton
pub const MOUSE_BUTTON_LEFT: u32 = 0;

// CGEventSourceStateID
pub const SOURCE_STATE_HID_SYSTEM: i32 = 1;

// CGEventFlags
pub const EVENT_FLAG_MASK_COMMAND: u64 = 0x0010_0000;

pub fn event_mask(types: &[u32]) -> CGEventMask {
    types.iter().fold(0, |mask, &ty| mask | (1 << ty))
}

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    pub fn CGEventTapCreate(
        tap: u32,
        place: u32,
        options: u32,
        events_of_interest: CGEventMask,
        callback: CGEventTapCallBack,
        user_info: *mut c_void,
    ) -> CFMachPortRef;

    pub fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);

    pub fn CGEventGetLocation(event: CGEventRef) -> CGPoint;
    pub fn CGEventGetIntegerValueField(event: CGEventRef, field: u32) -> i64;

    pub fn CGEventSourceCreate(state_id: i32) -> CGEventSourceRef;
    pub fn CGEventCreateMouseEvent(
        source: CGEventSourceRef,
        mouse_type: u32,
        cursor_position: CGPoint,
        mouse_button: u32,
    ) -> CGEventRef;
    pub fn CGEventSetFlags(event: CGEventRef, flags: u64);
    pub fn CGEventPost(tap: u32, event: CGEventRef);

    pub fn AXIsProcessTrusted() -> bool;
}

#[link(name = "CoreFoundation", kind = "framework")]
extern "C" {
    pub fn CFMachPortCreateRunLoopSource(
        allocator: CFTypeRef,
        port: CFMachPortRef,
        order: isize,
    ) -> CFRunLoopSourceRef;
    pub fn CFMachPortInvalidate(port: CFMachPortRef);
    pub fn CFRunLoopGetCurrent() -> CFTypeRef;
    pub fn CFRunLoopAddSource(rl: CFTypeRef, source: CFRunLoopSourceRef, mode: CFTypeRef);
    pub fn CFRunLoopRun();
}

// NSEvent, NSWorkspace and NSRunningApplication are looked up by name at
// runtime; linking AppKit makes sure the classes are registered.
#[link(name = "AppKit", kind = "framework")]
extern "C" {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mask() {
        let mask = event_mask(&[EVENT_GESTURE, EVENT_LEFT_MOUSE_DOWN, EVENT_LEFT_MOUSE_UP]);
        assert_eq!(mask, (1u64 << 29) | 0b110);
        assert_eq!(mask & (1u64 << NS_EVENT_TYPE_PRESSURE), 0);
    }
}
