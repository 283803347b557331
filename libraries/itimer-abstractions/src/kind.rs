/// Which of the three per-process countdown clocks a timer is bound to.
#[repr(usize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Counts down in wall clock time, delivers `SIGALRM`.
    Real = 0,
    /// Counts down against user-mode CPU time, delivers `SIGVTALRM`.
    Virtual = 1,
    /// Counts down against user and system CPU time, delivers `SIGPROF`.
    Prof = 2,
}

impl TimerKind {
    pub const COUNT: usize = 3;

    pub const ALL: [TimerKind; TimerKind::COUNT] =
        [TimerKind::Real, TimerKind::Virtual, TimerKind::Prof];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            TimerKind::Real => "ITIMER_REAL",
            TimerKind::Virtual => "ITIMER_VIRTUAL",
            TimerKind::Prof => "ITIMER_PROF",
        }
    }

    /// Name of the signal raised on expiry, for diagnostics.
    pub const fn signal_name(self) -> &'static str {
        match self {
            TimerKind::Real => "SIGALRM",
            TimerKind::Virtual => "SIGVTALRM",
            TimerKind::Prof => "SIGPROF",
        }
    }
}

impl core::fmt::Display for TimerKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
