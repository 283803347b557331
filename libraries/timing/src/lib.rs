//! # Timing Library
//!
//! Fixed-point time values for driving POSIX interval timers.
//!
//! - [`TimeVal`]: POSIX-compatible time structure with microsecond precision
//! - [`ITimerVal`]: interval/value pair in the shape `setitimer(2)` expects
//!
//! Both types scale by a floating point factor through `*` and `/`. Scaling
//! converts to seconds, multiplies and converts back, truncating the result
//! to whole microseconds while keeping the microsecond field normalized.
//!
//! ## Examples
//!
//! ```
//! use timing::{ITimerVal, TimeVal};
//!
//! let tv = TimeVal::new(2, 750_000);
//! assert_eq!(tv.total_seconds(), 2.75);
//!
//! let timer = ITimerVal::new(TimeVal::new(1, 0), TimeVal::new(0, 500_000));
//! let doubled_speed = timer / 2.0;
//! assert_eq!(doubled_speed.it_interval, TimeVal::new(0, 500_000));
//! ```
//!
//! ## Feature Flags
//!
//! - `std`: Enables conversions to/from [`std::time::Duration`]
//! - `no_std`: Default feature for no-std environments

#![cfg_attr(not(any(feature = "std", test)), no_std)]

mod timeval;
pub use timeval::TimeVal;

mod itimerval;
pub use itimerval::{ITimerVal, ITIMERVAL_RECORD_SIZE};

/// Number of microseconds in one second
pub const USEC_PER_SEC: i64 = 1_000_000;

// Standard library conversions (only when std feature is enabled)
#[cfg(feature = "std")]
mod std_conversions;
#[cfg(feature = "std")]
pub use std_conversions::InvalidTimeVal;
