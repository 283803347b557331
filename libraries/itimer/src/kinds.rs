use core::ops::{Deref, DerefMut};

use itimer_abstractions::{IIntervalClock, TimerKind};
use timing::TimeVal;

use crate::{IntervalTimer, ShutdownError, SystemIntervalClock, TimerError};

macro_rules! impl_kind_timer {
    ($(#[$attr:meta])* $name:ident, $kind:expr) => {
        $(#[$attr])*
        pub struct $name<C: IIntervalClock = SystemIntervalClock>(IntervalTimer<C>);

        impl $name<SystemIntervalClock> {
            /// Creates the process timer of this kind, first expiring one
            /// interval after it is started.
            pub fn new(interval: TimeVal) -> Result<Self, TimerError> {
                Self::with_value(interval, interval)
            }

            /// Creates the process timer of this kind, first expiring `value`
            /// after it is started.
            pub fn with_value(interval: TimeVal, value: TimeVal) -> Result<Self, TimerError> {
                Self::with_clock(SystemIntervalClock, interval, value)
            }
        }

        impl<C: IIntervalClock> $name<C> {
            pub const KIND: TimerKind = $kind;

            pub fn with_clock(
                clock: C,
                interval: TimeVal,
                value: TimeVal,
            ) -> Result<Self, TimerError> {
                IntervalTimer::acquire_with_value(clock, $kind, interval, value).map(Self)
            }

            /// See [`IntervalTimer::shutdown`].
            pub fn shutdown(self) -> Result<(), ShutdownError> {
                self.0.shutdown()
            }

            pub fn into_inner(self) -> IntervalTimer<C> {
                self.0
            }
        }

        impl<C: IIntervalClock> core::fmt::Debug for $name<C> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        impl<C: IIntervalClock> Deref for $name<C> {
            type Target = IntervalTimer<C>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<C: IIntervalClock> DerefMut for $name<C> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }
    };
}

impl_kind_timer!(
    /// Counts down in wall clock time. Each expiry raises `SIGALRM`.
    RealTimer,
    TimerKind::Real
);

impl_kind_timer!(
    /// Counts down against the user-mode CPU time of all threads of the
    /// process. Each expiry raises `SIGVTALRM`.
    VirtualTimer,
    TimerKind::Virtual
);

impl_kind_timer!(
    /// Counts down against the user and system CPU time of all threads of
    /// the process. Each expiry raises `SIGPROF`.
    ProfTimer,
    TimerKind::Prof
);
