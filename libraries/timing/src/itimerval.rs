use crate::TimeVal;

/// Size in bytes of one encoded [`ITimerVal`] record.
pub const ITIMERVAL_RECORD_SIZE: usize = 4 * core::mem::size_of::<i64>();

/// An interval/value pair as consumed and returned by `setitimer(2)`.
///
/// `it_interval` is the period between repeated expirations and `it_value`
/// is the time left until the next one. Scaling applies to both fields.
///
/// ```
/// use timing::{ITimerVal, TimeVal};
///
/// let val = ITimerVal::new(TimeVal::new(2, 0), TimeVal::new(1, 0));
/// let fast = val / 2.0;
///
/// assert_eq!(fast.it_interval, TimeVal::new(1, 0));
/// assert_eq!(fast.it_value, TimeVal::new(0, 500_000));
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Hash)]
pub struct ITimerVal {
    pub it_interval: TimeVal,
    pub it_value: TimeVal,
}

impl ITimerVal {
    /// All-zero pair. Arming a timer with it disarms the timer.
    pub const DISARMED: ITimerVal = ITimerVal {
        it_interval: TimeVal::zero(),
        it_value: TimeVal::zero(),
    };

    pub const fn new(interval: TimeVal, value: TimeVal) -> ITimerVal {
        ITimerVal {
            it_interval: interval,
            it_value: value,
        }
    }

    pub fn scale(&self, factor: f64) -> ITimerVal {
        ITimerVal {
            it_interval: self.it_interval.scale(factor),
            it_value: self.it_value.scale(factor),
        }
    }

    pub fn is_disarmed(&self) -> bool {
        self.it_value.is_zero()
    }

    /// Encodes the pair as interval then value, each as seconds then
    /// microseconds, all `i64` in native byte order.
    pub fn to_ne_bytes(&self) -> [u8; ITIMERVAL_RECORD_SIZE] {
        let fields = [
            self.it_interval.tv_sec,
            self.it_interval.tv_usec,
            self.it_value.tv_sec,
            self.it_value.tv_usec,
        ];

        let mut bytes = [0u8; ITIMERVAL_RECORD_SIZE];
        for (chunk, field) in bytes.chunks_exact_mut(8).zip(fields) {
            chunk.copy_from_slice(&field.to_ne_bytes());
        }
        bytes
    }

    /// Decodes a record written by [`ITimerVal::to_ne_bytes`]. The fields are
    /// taken verbatim, no normalization is applied.
    pub fn from_ne_bytes(bytes: &[u8; ITIMERVAL_RECORD_SIZE]) -> ITimerVal {
        let mut fields = [0i64; 4];
        for (field, chunk) in fields.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *field = i64::from_ne_bytes(buf);
        }

        ITimerVal {
            it_interval: TimeVal::new(fields[0], fields[1]),
            it_value: TimeVal::new(fields[2], fields[3]),
        }
    }
}

impl core::ops::Mul<f64> for ITimerVal {
    type Output = ITimerVal;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl core::ops::MulAssign<f64> for ITimerVal {
    fn mul_assign(&mut self, rhs: f64) {
        *self = self.scale(rhs);
    }
}

impl core::ops::Div<f64> for ITimerVal {
    type Output = ITimerVal;

    fn div(self, rhs: f64) -> Self::Output {
        self.scale(1.0 / rhs)
    }
}

impl core::ops::DivAssign<f64> for ITimerVal {
    fn div_assign(&mut self, rhs: f64) {
        *self = self.scale(1.0 / rhs);
    }
}
