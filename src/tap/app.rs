//! Application lookup through NSWorkspace / NSRunningApplication.

use std::ffi::CStr;
use std::os::raw::c_char;

use objc::runtime::{Class, Object};
use objc::{msg_send, sel, sel_impl};

use crate::gesture::AppResolver;

/// Resolves application display names (`localizedName`).
pub struct WorkspaceResolver;

impl AppResolver for WorkspaceResolver {
    fn frontmost_app(&self) -> Option<String> {
        let class = Class::get("NSWorkspace")?;
        unsafe {
            let workspace: *mut Object = msg_send![class, sharedWorkspace];
            if workspace.is_null() {
                return None;
            }
            let app: *mut Object = msg_send![workspace, frontmostApplication];
            localized_name(app)
        }
    }

    fn app_for_pid(&self, pid: i32) -> Option<String> {
        let class = Class::get("NSRunningApplication")?;
        unsafe {
            let app: *mut Object = msg_send![class, runningApplicationWithProcessIdentifier: pid];
            localized_name(app)
        }
    }
}

unsafe fn localized_name(app: *mut Object) -> Option<String> {
    if app.is_null() {
        return None;
    }
    let name: *mut Object = msg_send![app, localizedName];
    if name.is_null() {
        return None;
    }
    let utf8: *const c_char = msg_send![name, UTF8String];
    if utf8.is_null() {
        return None;
    }
    Some(CStr::from_ptr(utf8).to_string_lossy().into_owned())
}
