use itimer_abstractions::{IIntervalClock, KindGuard, TimerKind};
use log::{debug, error, trace, warn};
use timing::{ITimerVal, TimeVal};

use crate::{ShutdownError, TimerError};

/// `EX_OSERR` from sysexits.h, the exit status of a failed teardown.
pub(crate) const EX_OSERR: i32 = 71;

/// Shortest remaining time the clock can be armed with.
const MIN_ARMABLE: TimeVal = TimeVal::new(0, 1);

/// One repeating countdown bound to a [`TimerKind`] of an [`IIntervalClock`].
///
/// The timer keeps its interval and remaining value at nominal speed. While
/// running, the clock counts down `interval / speed_factor` physically and the
/// authoritative remaining time lives in the clock. While stopped, the stored
/// value is authoritative.
///
/// Only one timer per kind can exist for a clock's registry at a time. The
/// kind is released when the timer is dropped.
///
/// # Teardown
///
/// Dropping a running timer disarms it. If that fails the clock may still
/// deliver its signal into a context that is being torn down, so the failure
/// is logged and the process exits with `EX_OSERR`. Call
/// [`IntervalTimer::shutdown`] to get the failure reported instead.
pub struct IntervalTimer<C: IIntervalClock> {
    clock: C,
    kind: TimerKind,
    pub(crate) interval: TimeVal,
    pub(crate) value: TimeVal,
    speed_factor: f64,
    running: bool,
    _guard: KindGuard,
}

impl<C: IIntervalClock> IntervalTimer<C> {
    /// Claims `kind` on `clock` with the first expiry one interval from start.
    pub fn acquire(clock: C, kind: TimerKind, interval: TimeVal) -> Result<Self, TimerError> {
        Self::acquire_with_value(clock, kind, interval, interval)
    }

    /// Claims `kind` on `clock`, expiring first after `value` and then every
    /// `interval`.
    pub fn acquire_with_value(
        clock: C,
        kind: TimerKind,
        interval: TimeVal,
        value: TimeVal,
    ) -> Result<Self, TimerError> {
        if !interval.is_valid() {
            return Err(TimerError::InvalidArgument(
                "interval must be a normalized non-negative time",
            ));
        }

        if !value.is_valid() {
            return Err(TimerError::InvalidArgument(
                "value must be a normalized non-negative time",
            ));
        }

        let guard = clock
            .registry()
            .try_acquire(kind)
            .ok_or(TimerError::InstanceAlreadyExists(kind))?;

        debug!(
            "acquired {kind} timer (revision {}), interval {interval:?}, value {value:?}",
            crate::ITIMER_REVISION
        );

        Ok(Self {
            clock,
            kind,
            interval,
            value,
            speed_factor: 1.0,
            running: false,
            _guard: guard,
        })
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// Interval at nominal speed.
    pub fn interval(&self) -> TimeVal {
        self.interval
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Converts nominal interval and value into what the clock has to count
    /// down at `factor`.
    fn physical(&self, value: TimeVal, factor: f64) -> Result<ITimerVal, TimerError> {
        let mut physical = ITimerVal::new(self.interval, value) / factor;

        if physical.it_interval.is_zero() {
            return Err(TimerError::DegenerateInterval);
        }

        // an all-zero value would disarm the clock instead of arming it
        if physical.it_value.is_zero() {
            physical.it_value = MIN_ARMABLE;
        }

        Ok(physical)
    }

    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::AlreadyRunning);
        }

        let physical = self.physical(self.value, self.speed_factor)?;
        trace!("arming {} with {physical:?}", self.kind);

        self.clock.arm(self.kind, &physical)?;
        self.running = true;

        debug!("{} timer started at speed {}", self.kind, self.speed_factor);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), TimerError> {
        if !self.running {
            return Err(TimerError::AlreadyStopped);
        }

        let live = self.clock.disarm(self.kind)?;
        trace!("disarmed {} at {live:?}", self.kind);

        self.value = live.it_value * self.speed_factor;
        self.running = false;

        debug!("{} timer stopped, {:?} left", self.kind, self.value);
        Ok(())
    }

    /// Changes the speed factor, applying it immediately if the timer runs.
    ///
    /// Factors above 1 make the timer expire sooner, factors below 1 later.
    pub fn set_speed_factor(&mut self, speed_factor: f64) -> Result<(), TimerError> {
        if !speed_factor.is_finite() || speed_factor <= 0.0 {
            return Err(TimerError::InvalidArgument(
                "speed factor must be positive and finite",
            ));
        }

        self.adjust_speed(speed_factor)
    }

    pub fn set_speed_to_normal(&mut self) -> Result<(), TimerError> {
        self.adjust_speed(1.0)
    }

    fn adjust_speed(&mut self, new_factor: f64) -> Result<(), TimerError> {
        if !self.running {
            self.speed_factor = new_factor;
            return Ok(());
        }

        let interval = self.interval / new_factor;
        if interval.is_zero() {
            return Err(TimerError::DegenerateInterval);
        }

        let live = self.clock.disarm(self.kind)?;

        let mut rearm = ITimerVal::new(interval, live.it_value * (self.speed_factor / new_factor));
        if rearm.it_value.is_zero() {
            rearm.it_value = MIN_ARMABLE;
        }

        let err = match self.clock.arm(self.kind, &rearm) {
            Ok(_) => {
                debug!(
                    "{} timer speed {} -> {}",
                    self.kind, self.speed_factor, new_factor
                );
                self.speed_factor = new_factor;
                return Ok(());
            }
            Err(err) => err,
        };

        warn!(
            "re-arming {} at speed {new_factor} failed ({err}), restoring previous speed",
            self.kind
        );

        if let Err(rollback) = self.clock.arm(self.kind, &live) {
            error!(
                "restoring {} failed ({rollback}), the timer is now stopped",
                self.kind
            );
            self.value = live.it_value * self.speed_factor;
            self.running = false;
        }

        Err(err.into())
    }

    /// Time left until the next expiry, at nominal speed.
    pub fn get_value(&self) -> Result<TimeVal, TimerError> {
        if !self.running {
            return Ok(self.value);
        }

        let live = self.clock.current(self.kind)?;
        Ok(live.it_value * self.speed_factor)
    }

    /// Time left until the next expiry as the clock counts it, i.e. at the
    /// current speed.
    pub fn physical_value(&self) -> Result<TimeVal, TimerError> {
        if !self.running {
            return Ok(self.value / self.speed_factor);
        }

        Ok(self.clock.current(self.kind)?.it_value)
    }

    /// Disarms the timer if it is running and releases its kind.
    ///
    /// Unlike dropping, a failed disarm is returned to the caller. The kind is
    /// released in both cases.
    pub fn shutdown(mut self) -> Result<(), ShutdownError> {
        if !self.running {
            return Ok(());
        }

        let result = self.stop().map_err(|err| {
            let errno = match err {
                TimerError::SystemFailure { errno } => errno,
                _ => 0,
            };
            ShutdownError {
                kind: self.kind,
                errno,
            }
        });

        // reported to the caller, keep drop from escalating
        self.running = false;
        result
    }
}

impl<C: IIntervalClock> Drop for IntervalTimer<C> {
    fn drop(&mut self) {
        if !self.running {
            return;
        }

        if let Err(err) = self.stop() {
            error!(
                "cannot disarm {} while dropping its timer: {err}, a pending {} could outlive it",
                self.kind,
                self.kind.signal_name()
            );
            std::process::exit(EX_OSERR);
        }
    }
}

impl<C: IIntervalClock> core::fmt::Debug for IntervalTimer<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IntervalTimer")
            .field("kind", &self.kind)
            .field("interval", &self.interval)
            .field("value", &self.value)
            .field("speed_factor", &self.speed_factor)
            .field("running", &self.running)
            .finish()
    }
}
