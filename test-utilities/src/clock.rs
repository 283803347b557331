use std::{sync::Arc, vec::Vec};

use hermit_sync::SpinMutex;
use itimer_abstractions::{ClockError, IIntervalClock, KindRegistry, TimerKind};
use timing::{ITimerVal, TimeVal};

/// A call observed by [`TestIntervalClock`], in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCall {
    Arm(TimerKind, ITimerVal),
    Current(TimerKind),
}

#[derive(Default)]
struct TestClockState {
    armed: [ITimerVal; TimerKind::COUNT],
    expirations: [u64; TimerKind::COUNT],
    calls: Vec<ClockCall>,
    passing_calls: usize,
    failing_calls: usize,
    errno: i32,
}

impl TestClockState {
    fn record(&mut self, call: ClockCall) -> Result<(), ClockError> {
        self.calls.push(call);

        if self.passing_calls > 0 {
            self.passing_calls -= 1;
            return Ok(());
        }

        if self.failing_calls > 0 {
            self.failing_calls -= 1;
            log::debug!("injected failure for {call:?}");
            return Err(ClockError::new(self.errno));
        }

        Ok(())
    }
}

/// In-memory interval clock. Time only passes through [`TestIntervalClock::advance`].
///
/// Every instance owns a private [`KindRegistry`], so timers built on
/// different test clocks never contend with each other or with the process
/// registry of the real clock. Clones share state and registry.
#[derive(Clone, Default)]
pub struct TestIntervalClock {
    state: Arc<SpinMutex<TestClockState>>,
    registry: KindRegistry,
}

impl TestIntervalClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets `skip` further calls succeed, then fails the following `count`
    /// calls with `errno`.
    pub fn inject_failures(&self, skip: usize, count: usize, errno: i32) {
        let mut state = self.state.lock();
        state.passing_calls = skip;
        state.failing_calls = count;
        state.errno = errno;
    }

    pub fn fail_next(&self, errno: i32) {
        self.inject_failures(0, 1, errno);
    }

    /// Physical values currently armed for `kind`.
    pub fn armed(&self, kind: TimerKind) -> ITimerVal {
        self.state.lock().armed[kind.index()]
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        !self.armed(kind).is_disarmed()
    }

    pub fn expirations(&self, kind: TimerKind) -> u64 {
        self.state.lock().expirations[kind.index()]
    }

    pub fn calls(&self) -> Vec<ClockCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Lets `elapsed` of physical time pass on the clock of `kind`, reloading
    /// from the interval on every expiry like the kernel does.
    pub fn advance(&self, kind: TimerKind, elapsed: TimeVal) {
        let mut state = self.state.lock();
        let index = kind.index();
        let mut left = elapsed;

        while !state.armed[index].is_disarmed() {
            let armed = state.armed[index];

            if left < armed.it_value {
                state.armed[index].it_value = armed.it_value - left;
                break;
            }

            left = left - armed.it_value;
            state.expirations[index] += 1;
            state.armed[index].it_value = armed.it_interval;
        }
    }
}

impl IIntervalClock for TestIntervalClock {
    fn arm(&self, kind: TimerKind, new: &ITimerVal) -> Result<ITimerVal, ClockError> {
        let mut state = self.state.lock();
        state.record(ClockCall::Arm(kind, *new))?;

        let old = state.armed[kind.index()];
        state.armed[kind.index()] = if new.is_disarmed() {
            ITimerVal::DISARMED
        } else {
            *new
        };

        Ok(old)
    }

    fn current(&self, kind: TimerKind) -> Result<ITimerVal, ClockError> {
        let mut state = self.state.lock();
        state.record(ClockCall::Current(kind))?;

        Ok(state.armed[kind.index()])
    }

    fn registry(&self) -> &KindRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_returns_previous() {
        let clock = TestIntervalClock::new();
        let val = ITimerVal::new(TimeVal::new(1, 0), TimeVal::new(2, 0));

        assert_eq!(clock.arm(TimerKind::Real, &val), Ok(ITimerVal::DISARMED));
        assert_eq!(clock.disarm(TimerKind::Real), Ok(val));
        assert!(!clock.is_armed(TimerKind::Real));
    }

    #[test]
    fn test_advance_reloads_interval() {
        let clock = TestIntervalClock::new();
        let val = ITimerVal::new(TimeVal::new(1, 0), TimeVal::new(0, 500_000));
        clock.arm(TimerKind::Virtual, &val).unwrap();

        clock.advance(TimerKind::Virtual, TimeVal::new(1, 750_000));

        assert_eq!(clock.expirations(TimerKind::Virtual), 2);
        assert_eq!(
            clock.armed(TimerKind::Virtual).it_value,
            TimeVal::new(0, 750_000)
        );
    }

    #[test]
    fn test_one_shot_disarms_after_expiry() {
        let clock = TestIntervalClock::new();
        let val = ITimerVal::new(TimeVal::zero(), TimeVal::new(1, 0));
        clock.arm(TimerKind::Prof, &val).unwrap();

        clock.advance(TimerKind::Prof, TimeVal::new(5, 0));

        assert_eq!(clock.expirations(TimerKind::Prof), 1);
        assert!(!clock.is_armed(TimerKind::Prof));
    }

    #[test]
    fn test_injected_failures() {
        let clock = TestIntervalClock::new();
        clock.inject_failures(1, 1, libc::EINVAL);

        assert!(clock.current(TimerKind::Real).is_ok());
        assert_eq!(
            clock.current(TimerKind::Real),
            Err(ClockError::new(libc::EINVAL))
        );
        assert!(clock.current(TimerKind::Real).is_ok());
        assert_eq!(clock.calls().len(), 3);
    }

    #[test]
    fn test_failed_arm_keeps_state() {
        let clock = TestIntervalClock::new();
        clock.fail_next(libc::EFAULT);

        let val = ITimerVal::new(TimeVal::new(1, 0), TimeVal::new(1, 0));
        assert!(clock.arm(TimerKind::Real, &val).is_err());
        assert!(!clock.is_armed(TimerKind::Real));
    }

    #[test]
    fn test_clones_share_registry() {
        let clock = TestIntervalClock::new();
        let other = clock.clone();

        let _guard = clock.registry().try_acquire(TimerKind::Real).unwrap();
        assert!(other.registry().try_acquire(TimerKind::Real).is_none());
        assert!(TestIntervalClock::new()
            .registry()
            .try_acquire(TimerKind::Real)
            .is_some());
    }
}
