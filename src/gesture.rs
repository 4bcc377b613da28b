//! Force click to command-click translation.
//!
//! [`Translator::handle`] is consulted synchronously for every pressure and
//! left-button event the tap delivers. It decides whether the event passes,
//! is dropped, or is replaced by a synthesized command-click, and it tracks
//! whether the real button events of a translated gesture still have to be
//! swallowed.
//!
//! The synthesized down event is posted back into the same event stream, so
//! it re-enters the translator while [`Suppression::Suppressing`] is active.
//! That re-entry is the `Idle -> Suppressing -> Idle` cycle below.

use crate::selection::TargetSelection;
use crate::target::TargetPolicy;

/// Pressure stage reported for a deep (force) press.
pub const DEEP_STAGE: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Pressure,
    LeftDown,
    LeftUp,
}

/// Fields copied out of one delivered OS event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapEvent {
    pub kind: EventKind,
    /// Pressure stage (0 normal, 1 click, 2 deep). Zero for button events.
    pub stage: i64,
    /// Pressure magnitude in 0.0..=1.0. Zero for button events.
    pub pressure: f32,
    pub location: Point,
    /// Process the OS recorded as the event's target, if any.
    pub target_pid: Option<i32>,
}

impl TapEvent {
    pub fn pressure(stage: i64, pressure: f32, location: Point) -> Self {
        Self {
            kind: EventKind::Pressure,
            stage,
            pressure,
            location,
            target_pid: None,
        }
    }

    pub fn left_down(location: Point) -> Self {
        Self::button(EventKind::LeftDown, location)
    }

    pub fn left_up(location: Point) -> Self {
        Self::button(EventKind::LeftUp, location)
    }

    fn button(kind: EventKind, location: Point) -> Self {
        Self {
            kind,
            stage: 0,
            pressure: 0.0,
            location,
            target_pid: None,
        }
    }

    pub fn with_target_pid(mut self, pid: Option<i32>) -> Self {
        self.target_pid = pid;
        self
    }

    fn is_left_button(&self) -> bool {
        matches!(self.kind, EventKind::LeftDown | EventKind::LeftUp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickPhase {
    Down,
    Up,
}

/// A left-button event to be created and delivered in place of a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticClick {
    pub phase: ClickPhase,
    pub location: Point,
    pub command: bool,
}

impl SyntheticClick {
    fn command_click(phase: ClickPhase, location: Point) -> Self {
        Self {
            phase,
            location,
            command: true,
        }
    }
}

/// What the tap does with the event it was handed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Deliver the original event unchanged.
    Pass,
    /// Swallow the event.
    Drop,
    /// Post `down` into the event stream now and deliver `up` in place of
    /// the original event.
    Click {
        down: SyntheticClick,
        up: SyntheticClick,
    },
}

/// Looks up application names. Implemented over NSWorkspace on macOS.
pub trait AppResolver {
    /// Name of the application holding focus.
    fn frontmost_app(&self) -> Option<String>;
    /// Name of the application owning `pid`.
    fn app_for_pid(&self, pid: i32) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Suppression {
    /// Events pass through normally.
    #[default]
    Idle,
    /// A command-click was synthesized; left-button events are swallowed
    /// until the next left-up.
    Suppressing,
}

pub struct Translator {
    state: Suppression,
    policy: TargetPolicy,
    clicks: u64,
}

impl Translator {
    pub fn new(policy: TargetPolicy) -> Self {
        Self {
            state: Suppression::Idle,
            policy,
            clicks: 0,
        }
    }

    pub fn state(&self) -> Suppression {
        self.state
    }

    /// Number of force clicks translated so far.
    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    pub fn handle(
        &mut self,
        event: &TapEvent,
        resolver: &dyn AppResolver,
        selection: &dyn TargetSelection,
    ) -> Decision {
        if self.state == Suppression::Suppressing && event.is_left_button() {
            if event.kind == EventKind::LeftUp {
                self.transition(Suppression::Idle);
            }
            log::trace!("Suppressed {:?}", event.kind);
            return Decision::Drop;
        }

        if event.kind != EventKind::Pressure {
            return Decision::Pass;
        }

        // Only a left-up ends suppression; the gesture's own pressure ticks
        // stay hidden until then.
        if self.state == Suppression::Suppressing {
            log::trace!("Suppressed pressure stage {}", event.stage);
            return Decision::Drop;
        }

        // Light stages pass for every application, so skip the lookup.
        if event.stage != DEEP_STAGE {
            return Decision::Pass;
        }

        let Some(app) = self.policy.resolve(event, resolver) else {
            log::trace!("No {} application for pressure event, passing", self.policy);
            return Decision::Pass;
        };
        if !selection.is_selected(&app) {
            return Decision::Pass;
        }

        if event.pressure > 0.0 {
            log::trace!("Consuming deep press in {} (pressure {:.3})", app, event.pressure);
            return Decision::Drop;
        }

        // Negative or NaN pressure is not a release edge.
        if event.pressure != 0.0 {
            return Decision::Pass;
        }

        self.transition(Suppression::Suppressing);
        self.clicks += 1;
        log::debug!(
            "Force click #{} in {} at ({:.1}, {:.1})",
            self.clicks,
            app,
            event.location.x,
            event.location.y
        );

        Decision::Click {
            down: SyntheticClick::command_click(ClickPhase::Down, event.location),
            up: SyntheticClick::command_click(ClickPhase::Up, event.location),
        }
    }

    /// Undo the last [`Decision::Click`] when it could not be delivered, so
    /// the user's own button events are not swallowed.
    pub fn abort_click(&mut self) {
        if self.state == Suppression::Suppressing {
            self.clicks = self.clicks.saturating_sub(1);
            self.transition(Suppression::Idle);
        }
    }

    fn transition(&mut self, next: Suppression) {
        if self.state != next {
            log::debug!("Suppression {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}
