use crate::{TimeVal, USEC_PER_SEC};
use std::time::Duration;

impl From<Duration> for TimeVal {
    #[inline]
    fn from(duration: Duration) -> Self {
        TimeVal {
            tv_sec: duration.as_secs() as i64,
            tv_usec: duration.subsec_micros() as i64,
        }
    }
}

/// Rejected conversion of a negative or unnormalized [`TimeVal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTimeVal(pub TimeVal);

impl std::fmt::Display for InvalidTimeVal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}s {}us is not a valid duration",
            self.0.tv_sec, self.0.tv_usec
        )
    }
}

impl std::error::Error for InvalidTimeVal {}

impl TryFrom<TimeVal> for Duration {
    type Error = InvalidTimeVal;

    #[inline]
    fn try_from(timeval: TimeVal) -> Result<Self, Self::Error> {
        if !timeval.is_valid() {
            return Err(InvalidTimeVal(timeval));
        }

        Ok(Duration::from_secs(timeval.tv_sec as u64)
            + Duration::from_micros((timeval.tv_usec % USEC_PER_SEC) as u64))
    }
}
