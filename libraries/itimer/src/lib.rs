//! # Interval timers
//!
//! A process-level wrapper around the POSIX interval timers (`setitimer(2)`).
//!
//! Each of the three clocks, [`RealTimer`], [`VirtualTimer`] and
//! [`ProfTimer`], is a repeating countdown that can be started, stopped and
//! sped up or slowed down while running. Interval and remaining value are kept
//! at nominal speed and converted to the clock's physical values on every
//! arm, so a speed change never changes what the timer means.
//!
//! At most one timer per kind exists in a process. Creating a second one fails
//! with [`TimerError::InstanceAlreadyExists`] until the first is dropped.
//!
//! Installing handlers for the expiry signals is up to the caller.
//!
//! ```no_run
//! use itimer::RealTimer;
//! use timing::TimeVal;
//!
//! let mut timer = RealTimer::new(TimeVal::new(1, 0))?;
//! timer.set_speed_factor(2.0)?; // SIGALRM every 500ms
//! timer.start()?;
//! # timer.stop()?;
//! # Ok::<(), itimer::TimerError>(())
//! ```
//!
//! The clock is abstracted by [`IIntervalClock`], so [`IntervalTimer`] runs
//! on any implementation of it. [`SystemIntervalClock`] is the real one.

mod error;
mod kinds;
mod stream;
mod system;
mod timer;

pub use error::{ShutdownError, TimerError};
pub use itimer_abstractions::{ClockError, IIntervalClock, KindGuard, KindRegistry, TimerKind};
pub use kinds::{ProfTimer, RealTimer, VirtualTimer};
pub use system::SystemIntervalClock;
pub use timer::IntervalTimer;

/// Revision of this interval timer implementation, encoded as
/// `major * 1_000_000 + minor * 1_000 + patch`. For diagnostics only, it is
/// not part of the persisted record.
pub const ITIMER_REVISION: u64 = 1_000_000;

pub const fn revision() -> u64 {
    ITIMER_REVISION
}
