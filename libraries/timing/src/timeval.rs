use crate::USEC_PER_SEC;

/// A time value structure representing time as seconds and microseconds.
///
/// This structure is layout-compatible with the POSIX `timeval` structure on
/// 64-bit Linux and is the unit both interval timer fields are expressed in.
///
/// A normalized value keeps `tv_usec` within `0..1_000_000`. Every arithmetic
/// operation of this type renormalizes its result.
///
/// # Examples
///
/// ```
/// use timing::TimeVal;
///
/// // Create a TimeVal representing 1.5 seconds
/// let tv = TimeVal::new(1, 500_000);
/// assert_eq!(tv.total_seconds(), 1.5);
///
/// // Scaling goes through floating point seconds
/// let doubled = tv * 2.0;
/// assert_eq!(doubled, TimeVal::new(3, 0));
///
/// let halved = tv / 2.0;
/// assert_eq!(halved, TimeVal::new(0, 750_000));
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeVal {
    /// Seconds component of the time
    pub tv_sec: i64,
    /// Microseconds component of the time (0-999,999)
    pub tv_usec: i64,
}

impl TimeVal {
    pub const fn new(sec: i64, usec: i64) -> TimeVal {
        TimeVal {
            tv_sec: sec,
            tv_usec: usec,
        }
    }

    pub const fn zero() -> TimeVal {
        TimeVal {
            tv_sec: 0,
            tv_usec: 0,
        }
    }

    /// Builds a normalized value from a total count of microseconds.
    pub fn from_micros(usec: i64) -> TimeVal {
        let mut time = TimeVal::zero();
        time.add_usec(usec);
        time
    }

    /// Converts floating point seconds into a `TimeVal`.
    ///
    /// The integral part becomes `tv_sec` and the fractional part becomes
    /// `tv_usec`. Both are truncated toward zero, so the sub-microsecond
    /// remainder is dropped and a negative input yields a negative
    /// `tv_usec`. Non-finite inputs saturate the way `as` casts do.
    ///
    /// ```
    /// use timing::TimeVal;
    ///
    /// assert_eq!(TimeVal::from_seconds_f64(2.25), TimeVal::new(2, 250_000));
    /// assert_eq!(TimeVal::from_seconds_f64(0.000_000_4), TimeVal::zero());
    /// ```
    pub fn from_seconds_f64(seconds: f64) -> TimeVal {
        TimeVal {
            tv_sec: seconds as i64,
            tv_usec: ((seconds % 1.0) * USEC_PER_SEC as f64) as i64,
        }
    }

    pub fn add_usec(&mut self, usec: i64) {
        self.tv_sec += usec / USEC_PER_SEC;
        self.tv_usec += usec % USEC_PER_SEC;

        // Handle overflow/underflow for microseconds
        if self.tv_usec >= USEC_PER_SEC {
            self.tv_sec += self.tv_usec / USEC_PER_SEC;
            self.tv_usec %= USEC_PER_SEC;
        } else if self.tv_usec < 0 {
            let borrow = (-self.tv_usec + USEC_PER_SEC - 1) / USEC_PER_SEC;
            self.tv_sec -= borrow;
            self.tv_usec += borrow * USEC_PER_SEC;
        }
    }

    pub fn total_seconds(&self) -> f64 {
        self.tv_sec as f64 + self.tv_usec as f64 / USEC_PER_SEC as f64
    }

    /// Get total microseconds as i64
    pub fn total_microseconds(&self) -> i64 {
        self.tv_sec * USEC_PER_SEC + self.tv_usec
    }

    /// Multiplies the value by `factor`.
    ///
    /// The computation runs through [`TimeVal::total_seconds`] and
    /// [`TimeVal::from_seconds_f64`], so the result is truncated to whole
    /// microseconds. Factor validity is the caller's concern.
    pub fn scale(&self, factor: f64) -> TimeVal {
        TimeVal::from_seconds_f64(self.total_seconds() * factor)
    }

    /// Check if this TimeVal is zero
    pub fn is_zero(&self) -> bool {
        self.tv_sec == 0 && self.tv_usec == 0
    }

    /// Non-negative with the microsecond component in `0..1_000_000`.
    pub fn is_valid(&self) -> bool {
        self.tv_sec >= 0 && (0..USEC_PER_SEC).contains(&self.tv_usec)
    }

    /// Subtracts `rhs`, clamping at zero instead of going negative.
    pub fn saturating_sub(self, rhs: TimeVal) -> TimeVal {
        if rhs >= self {
            TimeVal::zero()
        } else {
            self - rhs
        }
    }
}

impl Default for TimeVal {
    fn default() -> Self {
        Self::zero()
    }
}

impl core::ops::Add for TimeVal {
    type Output = TimeVal;

    fn add(self, rhs: Self) -> Self::Output {
        let mut time = self;
        time += rhs;
        time
    }
}

impl core::ops::AddAssign for TimeVal {
    fn add_assign(&mut self, rhs: Self) {
        self.tv_sec += rhs.tv_sec;
        self.add_usec(rhs.tv_usec);
    }
}

impl core::ops::Sub for TimeVal {
    type Output = TimeVal;

    fn sub(self, rhs: Self) -> Self::Output {
        let mut time = self;
        time -= rhs;
        time
    }
}

impl core::ops::SubAssign for TimeVal {
    fn sub_assign(&mut self, rhs: Self) {
        self.tv_sec -= rhs.tv_sec;
        self.add_usec(-rhs.tv_usec);
    }
}

impl core::ops::Mul<f64> for TimeVal {
    type Output = TimeVal;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl core::ops::MulAssign<f64> for TimeVal {
    fn mul_assign(&mut self, rhs: f64) {
        *self = self.scale(rhs);
    }
}

impl core::ops::Div<f64> for TimeVal {
    type Output = TimeVal;

    fn div(self, rhs: f64) -> Self::Output {
        self.scale(1.0 / rhs)
    }
}

impl core::ops::DivAssign<f64> for TimeVal {
    fn div_assign(&mut self, rhs: f64) {
        *self = self.scale(1.0 / rhs);
    }
}

#[cfg(test)]
mod test_timeval {
    use super::TimeVal;

    fn assert_close(left: TimeVal, right: TimeVal, tolerance_usec: i64) {
        let diff = (left.total_microseconds() - right.total_microseconds()).abs();
        assert!(
            diff <= tolerance_usec,
            "{left:?} and {right:?} differ by {diff}us"
        );
    }

    #[test]
    fn test_new() {
        let tv = TimeVal::new(10, 500_000);
        assert_eq!(tv.tv_sec, 10);
        assert_eq!(tv.tv_usec, 500_000);
    }

    #[test]
    fn test_default() {
        let tv = TimeVal::default();
        assert_eq!(tv, TimeVal::zero());
        assert!(tv.is_zero());
    }

    #[test]
    fn test_from_micros() {
        assert_eq!(TimeVal::from_micros(2_500_001), TimeVal::new(2, 500_001));
        assert_eq!(TimeVal::from_micros(999_999), TimeVal::new(0, 999_999));
    }

    #[test]
    fn test_add_usec() {
        let mut tv = TimeVal::new(1, 500_000);
        tv.add_usec(500_000);
        assert_eq!(tv, TimeVal::new(2, 0));

        // Test negative addition
        let mut tv2 = TimeVal::new(2, 300_000);
        tv2.add_usec(-500_000);
        assert_eq!(tv2, TimeVal::new(1, 800_000));
    }

    #[test]
    fn test_from_seconds_truncates() {
        assert_eq!(TimeVal::from_seconds_f64(1.5), TimeVal::new(1, 500_000));
        assert_eq!(TimeVal::from_seconds_f64(0.000_000_9), TimeVal::zero());
        assert_eq!(TimeVal::from_seconds_f64(3.0), TimeVal::new(3, 0));
    }

    #[test]
    fn test_from_seconds_negative_follows_sign() {
        let tv = TimeVal::from_seconds_f64(-1.25);
        assert_eq!(tv.tv_sec, -1);
        assert_eq!(tv.tv_usec, -250_000);
    }

    #[test]
    fn test_total_seconds() {
        assert_eq!(TimeVal::new(2, 500_000).total_seconds(), 2.5);
        assert_eq!(TimeVal::new(0, 250_000).total_seconds(), 0.25);
    }

    #[test]
    fn test_seconds_round_trip() {
        let mut x = 0.0;
        while x < 1e6 {
            let back = TimeVal::from_seconds_f64(x).total_seconds();
            assert!((back - x).abs() <= 1e-6 + 1e-9, "{x} came back as {back}");
            x = x * 1.7 + 0.123_457;
        }
    }

    #[test]
    fn test_scale_keeps_usec_in_range() {
        let tv = TimeVal::new(0, 700_000) * 3.0;
        assert!(tv.is_valid());
        assert_close(tv, TimeVal::new(2, 100_000), 1);

        let tv = TimeVal::new(5, 999_999) / 4.0;
        assert!(tv.is_valid());
        assert_close(tv, TimeVal::new(1, 499_999), 1);
    }

    #[test]
    fn test_scale_composes() {
        let samples = [
            TimeVal::new(0, 1),
            TimeVal::new(1, 0),
            TimeVal::new(2, 500_000),
            TimeVal::new(37, 123_456),
            TimeVal::new(3600, 999_999),
        ];
        let factors = [0.25, 0.5, 1.0, 2.0, 3.0];

        for tv in samples {
            for f1 in factors {
                for f2 in factors {
                    let stepwise = tv.scale(f1).scale(f2);
                    let direct = tv.scale(f1 * f2);
                    // each truncation drops under 1us, the second one is
                    // amplified by f2
                    assert_close(stepwise, direct, 1 + f2.ceil() as i64);
                }
            }
        }
    }

    #[test]
    fn test_div_is_mul_by_reciprocal() {
        let tv = TimeVal::new(2, 500_000);
        assert_eq!(tv / 2.0, tv * 0.5);

        let mut assigned = tv;
        assigned /= 2.0;
        assert_eq!(assigned, TimeVal::new(1, 250_000));

        assigned *= 4.0;
        assert_eq!(assigned, TimeVal::new(5, 0));
    }

    #[test]
    fn test_degenerate_scale_rounds_to_zero() {
        let tv = TimeVal::new(0, 1) / 1_000_000.0;
        assert!(tv.is_zero());
    }

    #[test]
    fn test_is_valid() {
        assert!(TimeVal::new(0, 0).is_valid());
        assert!(TimeVal::new(1, 999_999).is_valid());
        assert!(!TimeVal::new(1, 1_000_000).is_valid());
        assert!(!TimeVal::new(-1, 0).is_valid());
        assert!(!TimeVal::new(0, -1).is_valid());
    }

    #[test]
    fn test_sub_and_saturating_sub() {
        let tv1 = TimeVal::new(3, 200_000);
        let tv2 = TimeVal::new(1, 800_000);
        assert_eq!(tv1 - tv2, TimeVal::new(1, 400_000));
        assert_eq!(tv2.saturating_sub(tv1), TimeVal::zero());
        assert_eq!(tv1 + tv2, TimeVal::new(5, 0));
    }

    #[test]
    fn test_comparison() {
        let tv1 = TimeVal::new(1, 500_000);
        let tv2 = TimeVal::new(1, 500_000);
        let tv3 = TimeVal::new(2, 0);

        assert_eq!(tv1, tv2);
        assert!(tv1 < tv3);
        assert!(tv3 > tv1);
    }
}
