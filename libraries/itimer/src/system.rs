use std::{io, sync::OnceLock};

use itimer_abstractions::{ClockError, IIntervalClock, KindRegistry, TimerKind};
use timing::{ITimerVal, TimeVal};

static PROCESS_REGISTRY: OnceLock<KindRegistry> = OnceLock::new();

/// The process interval timers, driven through `setitimer(2)` and `getitimer(2)`.
///
/// All instances share one process-wide [`KindRegistry`], since the kernel
/// keeps a single timer of each kind per process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIntervalClock;

impl SystemIntervalClock {
    fn which(kind: TimerKind) -> libc::c_int {
        match kind {
            TimerKind::Real => libc::ITIMER_REAL,
            TimerKind::Virtual => libc::ITIMER_VIRTUAL,
            TimerKind::Prof => libc::ITIMER_PROF,
        }
    }
}

fn last_errno() -> ClockError {
    ClockError::new(io::Error::last_os_error().raw_os_error().unwrap_or(0))
}

fn to_native(val: &ITimerVal) -> libc::itimerval {
    fn timeval(tv: TimeVal) -> libc::timeval {
        // # SAFETY: timeval is plain integers, all-zero is a valid value and
        // keeps padding fields on some targets initialized
        let mut native: libc::timeval = unsafe { core::mem::zeroed() };
        native.tv_sec = tv.tv_sec as libc::time_t;
        native.tv_usec = tv.tv_usec as libc::suseconds_t;
        native
    }

    // # SAFETY: itimerval is two timevals, all-zero is a valid value
    let mut native: libc::itimerval = unsafe { core::mem::zeroed() };
    native.it_interval = timeval(val.it_interval);
    native.it_value = timeval(val.it_value);
    native
}

fn from_native(native: &libc::itimerval) -> ITimerVal {
    ITimerVal::new(
        TimeVal::new(
            native.it_interval.tv_sec as i64,
            native.it_interval.tv_usec as i64,
        ),
        TimeVal::new(native.it_value.tv_sec as i64, native.it_value.tv_usec as i64),
    )
}

impl IIntervalClock for SystemIntervalClock {
    fn arm(&self, kind: TimerKind, new: &ITimerVal) -> Result<ITimerVal, ClockError> {
        let new = to_native(new);
        // # SAFETY: itimerval is two timevals, all-zero is a valid value
        let mut old: libc::itimerval = unsafe { core::mem::zeroed() };

        // # SAFETY: both pointers come from live locals of the exact type
        // setitimer reads and writes
        let ret = unsafe { libc::setitimer(Self::which(kind) as _, &new, &mut old) };
        if ret < 0 {
            return Err(last_errno());
        }

        Ok(from_native(&old))
    }

    fn current(&self, kind: TimerKind) -> Result<ITimerVal, ClockError> {
        // # SAFETY: itimerval is two timevals, all-zero is a valid value
        let mut cur: libc::itimerval = unsafe { core::mem::zeroed() };

        // # SAFETY: `cur` is a live local of the exact type getitimer writes
        let ret = unsafe { libc::getitimer(Self::which(kind) as _, &mut cur) };
        if ret < 0 {
            return Err(last_errno());
        }

        Ok(from_native(&cur))
    }

    fn registry(&self) -> &KindRegistry {
        PROCESS_REGISTRY.get_or_init(KindRegistry::new)
    }
}
