#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

mod kind;
mod registry;

pub use kind::TimerKind;
pub use registry::{KindGuard, KindRegistry};

use timing::ITimerVal;

/// Failure of the underlying interval timer call, carrying the OS error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("interval timer call failed with errno {errno}")]
pub struct ClockError {
    pub errno: i32,
}

impl ClockError {
    pub const fn new(errno: i32) -> Self {
        Self { errno }
    }
}

/// The OS facility behind an interval timer: one countdown clock per
/// [`TimerKind`], each armed with an [`ITimerVal`].
///
/// All values exchanged here are physical, i.e. exactly what the clock
/// counts down. Implementations must not rescale them.
pub trait IIntervalClock {
    /// Arms the clock of `kind` with `new`, returning what was armed before.
    fn arm(&self, kind: TimerKind, new: &ITimerVal) -> Result<ITimerVal, ClockError>;

    /// Disarms the clock of `kind`, returning the values that were live at the
    /// moment it was stopped.
    fn disarm(&self, kind: TimerKind) -> Result<ITimerVal, ClockError> {
        self.arm(kind, &ITimerVal::DISARMED)
    }

    /// Reads the clock of `kind` without changing it.
    fn current(&self, kind: TimerKind) -> Result<ITimerVal, ClockError>;

    /// Registry of timer kinds currently owned on this clock.
    fn registry(&self) -> &KindRegistry;
}
