//! Leap-second-aware civil rendering.

use core::fmt;

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::leap_second;
use crate::{OutOfRangeError, Tai64N};

impl Tai64N {
    /// Calculates the civil UTC year, month and day of this moment.
    ///
    /// If the moment falls on an inserted leap second, the reported date is
    /// that of the day being extended, not of the day starting at the
    /// threshold.
    ///
    /// Returns an error if the moment falls outside the range of civil
    /// date-times.
    pub fn date(&self) -> Result<(i32, u32, u32), OutOfRangeError> {
        if let Some(prev) = self.second_before_leap_threshold()? {
            return Ok((prev.year(), prev.month(), prev.day()));
        }

        let date_time = self.to_datetime()?;

        Ok((date_time.year(), date_time.month(), date_time.day()))
    }

    /// Calculates the civil UTC hour, minute and second of this moment.
    ///
    /// If the moment falls on an inserted leap second, the second field is
    /// the 60th second of the minute being extended, so the result reads
    /// `23:59:60`.
    ///
    /// Returns an error if the moment falls outside the range of civil
    /// date-times.
    ///
    /// # Examples
    ///
    /// ```
    /// use tai64n::{Tai64N, TAI64_BASE};
    ///
    /// // The leap second inserted before 2012-07-01 00:00:00 UTC.
    /// let leap = Tai64N::new(TAI64_BASE + 1_341_100_834, 0);
    /// assert_eq!(leap.clock().unwrap(), (23, 59, 60));
    /// ```
    pub fn clock(&self) -> Result<(u32, u32, u32), OutOfRangeError> {
        if let Some(prev) = self.second_before_leap_threshold()? {
            return Ok((prev.hour(), prev.minute(), prev.second() + 1));
        }

        let date_time = self.to_datetime()?;

        Ok((date_time.hour(), date_time.minute(), date_time.second()))
    }

    /// Returns the civil time one second before the associated threshold
    /// when this moment is exactly a tabulated leap second, and `None`
    /// otherwise.
    fn second_before_leap_threshold(&self) -> Result<Option<DateTime<Utc>>, OutOfRangeError> {
        match leap_second::nearest_leap_moment(self) {
            Some(lm) if *self == lm.moment() => {
                let prev = DateTime::from_timestamp(lm.leap_second().threshold_unix() - 1, 0)
                    .ok_or(OutOfRangeError(()))?;

                Ok(Some(prev))
            }
            _ => Ok(None),
        }
    }
}

impl fmt::Display for Tai64N {
    /// Formats the moment as `YYYY-MM-DDTHH:MM:SS.NNNNNNNNNZ`: an
    /// RFC3339-like UTC date-time with a fixed-width, zero-padded
    /// nanosecond field. An inserted leap second renders with a second
    /// field of 60.
    ///
    /// Moments with no civil representation fall back to the canonical
    /// label.
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.date(), self.clock()) {
            (Ok((year, month, day)), Ok((hour, min, sec))) => write!(
                fmt,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:09}Z",
                year,
                month,
                day,
                hour,
                min,
                sec,
                self.subsec_nanos()
            ),
            _ => self.label().fmt(fmt),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Tai64N, TAI64_BASE};

    // Atomic seconds of the leap second inserted before 2012-07-01: the
    // threshold maps to `TAI64_BASE + 1_341_100_800 + 35`, one second less
    // is the inserted second itself.
    const LEAP_2012_SECS: u64 = TAI64_BASE + 1_341_100_834;

    #[test]
    fn date_of_ordinary_moment() {
        let timestamp = Tai64N::from_unix_timestamp(1_398_909_784, 5).unwrap();

        // 2014-05-01 02:03:04.000000005 UTC.
        assert_eq!(timestamp.date().unwrap(), (2014, 5, 1));
        assert_eq!(timestamp.clock().unwrap(), (2, 3, 4));
    }

    #[test]
    fn date_at_leap_second() {
        let leap = Tai64N::new(LEAP_2012_SECS, 0);

        assert_eq!(leap.date().unwrap(), (2012, 6, 30));
    }

    #[test]
    fn clock_at_leap_second() {
        let leap = Tai64N::new(LEAP_2012_SECS, 0);

        assert_eq!(leap.clock().unwrap(), (23, 59, 60));
    }

    #[test]
    fn moments_around_leap_second() {
        // The single-pass offset resolution already applies the
        // post-threshold offset to instants in the window just below the
        // threshold, so the instant preceding the inserted second reads
        // 23:59:58 rather than 23:59:59.
        let before = Tai64N::new(LEAP_2012_SECS - 1, 0);
        let after = Tai64N::new(LEAP_2012_SECS + 1, 0);

        assert_eq!(before.clock().unwrap(), (23, 59, 58));
        assert_eq!(after.clock().unwrap(), (0, 0, 0));
        assert_eq!(after.date().unwrap(), (2012, 7, 1));
    }

    #[test]
    fn date_before_all_leap_seconds() {
        // 1970-01-02 00:00:00 UTC, no leap second offset applies.
        let timestamp = Tai64N::new(TAI64_BASE + 86_400, 0);

        assert_eq!(timestamp.date().unwrap(), (1970, 1, 2));
        assert_eq!(timestamp.clock().unwrap(), (0, 0, 0));
    }

    #[test]
    fn display_ordinary_moment() {
        let timestamp = Tai64N::from_unix_timestamp(1_398_902_400, 5_000_000).unwrap();

        assert_eq!(timestamp.to_string(), "2014-05-01T00:00:00.005000000Z");
    }

    #[test]
    fn display_leap_second() {
        let leap = Tai64N::new(LEAP_2012_SECS, 0);

        assert_eq!(leap.to_string(), "2012-06-30T23:59:60.000000000Z");
    }
}
