//! Quartz event tap for gesture (pressure) and left-button events.
//!
//! The tap sits at the head of the HID event stream, so it sees every
//! matching event before any application does. Its callback runs on the
//! thread that calls [`EventTap::run`], one event at a time, and synthesized
//! events posted from the callback come back through the same callback.
//!
//! Requires Accessibility permission (System Settings > Privacy & Security >
//! Accessibility) for the filtering tap, Input Monitoring for `dump`.

mod app;
mod event;
mod ffi;

pub use app::WorkspaceResolver;

use std::ffi::c_void;
use std::ptr;

use core_foundation::base::{CFRelease, CFTypeRef};
use core_foundation::runloop::kCFRunLoopCommonModes;

use crate::dump;
use crate::gesture::{Decision, Translator};
use crate::selection::AppSelection;

use ffi::{CFMachPortRef, CFRunLoopSourceRef, CGEventRef, CGEventTapProxy};

type TapResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Whether the process is trusted for Accessibility.
pub fn accessibility_trusted() -> bool {
    unsafe { ffi::AXIsProcessTrusted() }
}

enum Handler {
    Translate {
        translator: Translator,
        resolver: WorkspaceResolver,
        selection: AppSelection,
    },
    Dump {
        count: u64,
    },
}

/// State handed to the OS as the tap's user-info pointer. Only touched from
/// the run loop thread.
struct TapContext {
    port: CFMachPortRef,
    handler: Handler,
}

impl TapContext {
    fn on_event(&mut self, event_type: u32, raw: CGEventRef) -> CGEventRef {
        match &mut self.handler {
            Handler::Translate {
                translator,
                resolver,
                selection,
            } => {
                let Some(tap_event) = event::read(event_type, raw) else {
                    return raw;
                };
                log::trace!("{} [{:?}]", dump::describe(&tap_event), translator.state());

                match translator.handle(&tap_event, &*resolver, &*selection) {
                    Decision::Pass => raw,
                    Decision::Drop => event::dropped(),
                    Decision::Click { down, up } => match event::post_click(&down, &up) {
                        Some(up_event) => up_event,
                        None => {
                            log::warn!("Failed to create command-click events, passing force click through");
                            translator.abort_click();
                            raw
                        }
                    },
                }
            }
            Handler::Dump { count } => {
                if let Some(tap_event) = event::read(event_type, raw) {
                    *count += 1;
                    println!("{:>6}  {}", count, dump::describe(&tap_event));
                }
                raw
            }
        }
    }
}

extern "C" fn tap_callback(
    _proxy: CGEventTapProxy,
    event_type: u32,
    raw: CGEventRef,
    user_info: *mut c_void,
) -> CGEventRef {
    if user_info.is_null() {
        return raw;
    }
    let context = unsafe { &mut *(user_info as *mut TapContext) };

    if event_type == ffi::EVENT_TAP_DISABLED_BY_TIMEOUT
        || event_type == ffi::EVENT_TAP_DISABLED_BY_USER_INPUT
    {
        log::warn!("Event tap was disabled by the system, re-enabling");
        if !context.port.is_null() {
            unsafe { ffi::CGEventTapEnable(context.port, true) };
        }
        return raw;
    }

    objc::rc::autoreleasepool(|| context.on_event(event_type, raw))
}

/// An installed event tap. Disabled and released on drop.
pub struct EventTap {
    port: CFMachPortRef,
    source: CFRunLoopSourceRef,
    context: *mut TapContext,
}

impl EventTap {
    /// Install a filtering tap that translates force clicks for `selection`.
    pub fn install(translator: Translator, selection: AppSelection) -> TapResult<Self> {
        let handler = Handler::Translate {
            translator,
            resolver: WorkspaceResolver,
            selection,
        };
        Self::create(handler, ffi::TAP_OPTION_DEFAULT)
    }

    /// Install a listen-only tap that prints every event it sees.
    pub fn install_listener() -> TapResult<Self> {
        Self::create(Handler::Dump { count: 0 }, ffi::TAP_OPTION_LISTEN_ONLY)
    }

    fn create(handler: Handler, options: u32) -> TapResult<Self> {
        let mask = ffi::event_mask(&[
            ffi::EVENT_GESTURE,
            ffi::EVENT_LEFT_MOUSE_DOWN,
            ffi::EVENT_LEFT_MOUSE_UP,
        ]);

        let context = Box::into_raw(Box::new(TapContext {
            port: ptr::null(),
            handler,
        }));

        let port = unsafe {
            ffi::CGEventTapCreate(
                ffi::HID_EVENT_TAP,
                ffi::HEAD_INSERT_EVENT_TAP,
                options,
                mask,
                tap_callback,
                context as *mut c_void,
            )
        };
        if port.is_null() {
            unsafe { drop(Box::from_raw(context)) };
            return Err("failed to create event tap (is Accessibility access granted?)".into());
        }
        unsafe { (*context).port = port };

        let source = unsafe { ffi::CFMachPortCreateRunLoopSource(ptr::null(), port, 0) };
        if source.is_null() {
            unsafe {
                ffi::CFMachPortInvalidate(port);
                CFRelease(port);
                drop(Box::from_raw(context));
            }
            return Err("failed to create run loop source for event tap".into());
        }

        log::debug!("Event tap created (mask {:#x})", mask);
        Ok(Self {
            port,
            source,
            context,
        })
    }

    /// Enable the tap and process events on the current thread's run loop.
    /// Returns only if the run loop is stopped.
    pub fn run(&self) {
        unsafe {
            let run_loop = ffi::CFRunLoopGetCurrent();
            ffi::CFRunLoopAddSource(run_loop, self.source, kCFRunLoopCommonModes as CFTypeRef);
            ffi::CGEventTapEnable(self.port, true);
        }
        log::debug!("Event tap enabled, entering run loop");
        unsafe { ffi::CFRunLoopRun() };
    }
}

impl Drop for EventTap {
    fn drop(&mut self) {
        let context = unsafe {
            ffi::CGEventTapEnable(self.port, false);
            ffi::CFMachPortInvalidate(self.port);
            CFRelease(self.source);
            CFRelease(self.port);
            Box::from_raw(self.context)
        };
        if let Handler::Translate { translator, .. } = &context.handler {
            log::info!("Event tap stopped after {} force click(s)", translator.clicks());
        }
    }
}
