use itimer_abstractions::{ClockError, TimerKind};

#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    #[error("timer is already running")]
    AlreadyRunning,
    #[error("timer is already stopped")]
    AlreadyStopped,
    #[error("an interval timer of kind {0} already exists")]
    InstanceAlreadyExists(TimerKind),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("speed factor too large, the scaled interval rounds down to zero")]
    DegenerateInterval,
    #[error("timer must be stopped to load a stored state")]
    NotStopped,
    #[error("interval timer system call failed with errno {errno}")]
    SystemFailure { errno: i32 },
    #[error("stored timer record is negative or not normalized")]
    CorruptRecord,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ClockError> for TimerError {
    fn from(err: ClockError) -> Self {
        TimerError::SystemFailure { errno: err.errno }
    }
}

/// A running timer could not be disarmed while shutting it down.
///
/// The kernel timer may still be armed and deliver its signal. Ignoring this
/// is unsafe unless the signal's handler outlives the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("failed to disarm {kind} during shutdown (errno {errno})")]
pub struct ShutdownError {
    pub kind: TimerKind,
    pub errno: i32,
}
