//! Leap-second-aware TAI64N timestamps.
//!
//! # Overview
//!
//! A [`Tai64N`] timestamp counts atomic (TAI) seconds since the TAI64 origin
//! with nanosecond resolution. Because TAI is a continuous count of elapsed
//! seconds, the timestamp is monotonic and immune to the discontinuities
//! that leap seconds introduce into civil (UTC) time.
//!
//! The crate provides:
//!
//! - conversions between timestamps and civil date-times that account for
//!   every leap second tabulated through 2017-01-01 (see
//!   [`leap_second::LEAP_SECONDS`]),
//! - the canonical 12-byte binary encoding and the `@`-prefixed 24-digit
//!   hexadecimal label, bit-exact with other TAI64N implementations,
//! - total ordering and arithmetic over the standard [`Duration`] type,
//! - leap-second-aware display, rendering an inserted second as the 60th
//!   second of its minute.
//!
//! The `seconds` field of a timestamp is offset by [`TAI64_BASE`] (2^62) so
//! that civil times before 1970 still map to non-negative values.
//!
//! Leap seconds are never predicted: the table ships with the crate and
//! updating it for a future insertion is a data change, not a code change.
//!
//! # Features flags
//!
//! With the default `serde` feature, a timestamp (de)serializes as its civil
//! UTC date-time through [`chrono::DateTime`]'s own serde support, so on the
//! wire the value appears as an RFC3339-style string rather than as the raw
//! atomic fields.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use tai64n::Tai64N;
//!
//! // 2014-05-01 00:00:00 UTC, with the +35s TAI − UTC offset of that date
//! // baked into the atomic seconds.
//! let t0 = Tai64N::from_unix_timestamp(1_398_902_400, 0).unwrap();
//!
//! assert_eq!(t0.label(), "@4000000053618EA300000000");
//! assert_eq!(t0.to_string(), "2014-05-01T00:00:00.000000000Z");
//!
//! let t1 = t0 + Duration::new(1, 500_000_000);
//! assert!(t0.before(&t1));
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod errors;
mod format;
pub mod leap_second;

use core::cmp::Ordering;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::time::Duration;
use std::time::SystemTime;

use chrono::{DateTime, TimeDelta, Utc};

pub use errors::{BufferTooSmallError, OutOfRangeError};
pub use leap_second::{LeapMoment, LeapSecond};

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// The fixed offset, in seconds, between the TAI64 origin and the Unix
/// epoch.
///
/// This is 2^62: the atomic second count of 1970-01-01 00:00:00 TAI, chosen
/// so that the whole civil era maps to non-negative counts.
pub const TAI64_BASE: u64 = 4_611_686_018_427_387_904;

/// The length of the canonical binary storage format, in bytes.
pub const STORAGE_LEN: usize = 12;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// The relative ordering of two moments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimeComparison {
    /// The first moment lies in the past of the second.
    Before,
    /// The two moments coincide exactly.
    Equal,
    /// The first moment lies in the future of the second.
    After,
}

/// A nanosecond-precision TAI64N timestamp.
///
/// A timestamp is an unsigned 64-bit count of atomic seconds offset by
/// [`TAI64_BASE`], plus a positive sub-second number of nanoseconds. It is a
/// plain value type: copied freely, never mutated in place.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tai64n::Tai64N;
///
/// let mut timestamp = Tai64N::parse_label("@4000000053618EA300000000").unwrap();
/// timestamp += Duration::new(123, 456_000_000);
///
/// assert_eq!(timestamp.subsec_nanos(), 456_000_000);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tai64N {
    /// The number of whole atomic seconds since the TAI64 origin.
    ///
    /// Note that the automatic derivation of `PartialOrd` relies on
    /// lexicographical comparison so the `secs` field must appear before
    /// `nanos` in declaration order to be given higher priority.
    secs: u64,
    /// The sub-second number of nanoseconds in the future of the point in
    /// time defined by `secs`.
    nanos: u32,
}

impl Tai64N {
    /// Creates a timestamp from a raw second count and a number of
    /// nanoseconds.
    ///
    /// The nanoseconds are normalized on construction: a value of one second
    /// or more carries into the second count, so `nanos` is always strictly
    /// below one second afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use tai64n::Tai64N;
    ///
    /// let timestamp = Tai64N::new(4_611_686_019_826_290_339, 1_500_000_000);
    /// assert_eq!(timestamp.as_secs(), 4_611_686_019_826_290_340);
    /// assert_eq!(timestamp.subsec_nanos(), 500_000_000);
    /// ```
    pub const fn new(secs: u64, subsec_nanos: u32) -> Self {
        Self {
            secs: secs.wrapping_add((subsec_nanos / NANOS_PER_SEC) as u64),
            nanos: subsec_nanos % NANOS_PER_SEC,
        }
    }

    /// Creates a timestamp from the system clock.
    ///
    /// This is a shorthand for `from_system_time(&SystemTime::now())`.
    ///
    /// Beware that the behavior of the system clock near a leap second
    /// shouldn't be relied upon, where *near* might actually stand for the
    /// whole 24h period preceding a leap second due to the possible use of
    /// the so-called *leap second smearing* strategy.
    ///
    /// Returns an error if the system clock predates the Unix epoch.
    pub fn now() -> Result<Self, OutOfRangeError> {
        Self::from_system_time(&SystemTime::now())
    }

    /// Creates a timestamp from a `SystemTime`.
    ///
    /// The leap second offset applicable at the provided date is looked up
    /// in the tabulated history and added to the atomic second count.
    ///
    /// Returns an error if the provided time predates the Unix epoch or is
    /// outside the representable range.
    pub fn from_system_time(system_time: &SystemTime) -> Result<Self, OutOfRangeError> {
        let unix_time = system_time
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|_| OutOfRangeError(()))?;
        let unix_secs = i64::try_from(unix_time.as_secs()).map_err(|_| OutOfRangeError(()))?;

        Self::from_unix_timestamp(unix_secs, unix_time.subsec_nanos())
    }

    /// Creates a timestamp from a Unix timestamp.
    ///
    /// The leap second offset applicable at the provided date is looked up
    /// in the tabulated history and added to the atomic second count, so the
    /// resulting timestamp differs from the naive `TAI64_BASE + secs`
    /// mapping by the cumulative TAI − UTC offset.
    ///
    /// Returns an error if the timestamp is outside the representable range
    /// or if the number of nanoseconds is greater than or equal to 1 second.
    ///
    /// # Examples
    ///
    /// ```
    /// use tai64n::Tai64N;
    ///
    /// // 2014-05-01 00:00:00 UTC; the TAI − UTC offset on that date is 35s.
    /// let timestamp = Tai64N::from_unix_timestamp(1_398_902_400, 0).unwrap();
    /// assert_eq!(timestamp.as_secs(), 4_611_686_019_826_290_339);
    /// ```
    pub fn from_unix_timestamp(secs: i64, subsec_nanos: u32) -> Result<Self, OutOfRangeError> {
        if subsec_nanos >= NANOS_PER_SEC {
            return Err(OutOfRangeError(()));
        }

        let offset = leap_second::offset_at_unix(secs);
        let tai_secs = secs
            .checked_add(offset)
            .and_then(|secs| (TAI64_BASE as i64).checked_add(secs))
            .and_then(|secs| u64::try_from(secs).ok())
            .ok_or(OutOfRangeError(()))?;

        Ok(Self {
            secs: tai_secs,
            nanos: subsec_nanos,
        })
    }

    /// Creates a timestamp from a civil UTC date-time.
    ///
    /// The leap second offset applicable at the provided date is looked up
    /// in the tabulated history and added to the atomic second count.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use tai64n::Tai64N;
    ///
    /// let date_time = Utc.with_ymd_and_hms(2014, 5, 1, 0, 0, 0).unwrap();
    /// let timestamp = Tai64N::from_datetime(&date_time);
    /// assert_eq!(timestamp.label(), "@4000000053618EA300000000");
    /// ```
    pub fn from_datetime(date_time: &DateTime<Utc>) -> Self {
        let secs = date_time.timestamp();
        let subsec_nanos = date_time.timestamp_subsec_nanos();

        // `chrono` folds an inserted leap second into the nanoseconds part,
        // so move it to the seconds if necessary.
        let (secs_carry, subsec_nanos) = if subsec_nanos < NANOS_PER_SEC {
            (0, subsec_nanos)
        } else {
            (1, subsec_nanos - NANOS_PER_SEC)
        };

        let offset = leap_second::leap_seconds_involved(date_time);

        // `chrono` confines dates to ±262,000 years around the epoch, so the
        // shifted count cannot leave the TAI64 range.
        Self {
            secs: (TAI64_BASE as i64 + secs + secs_carry + offset) as u64,
            nanos: subsec_nanos,
        }
    }

    /// Returns the civil UTC date-time corresponding to the timestamp.
    ///
    /// The leap second offset is resolved in a single pass, from the
    /// candidate obtained by removing only the base offset: timestamps
    /// within one offset step below a leap second threshold therefore
    /// resolve against the offset in effect *after* the threshold. An
    /// inserted leap second itself maps to the last civil second before the
    /// threshold; [`date`](Self::date) and [`clock`](Self::clock) single it
    /// out and render it as the 60th second.
    ///
    /// Returns an error if the timestamp falls outside the range of civil
    /// date-times.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, OutOfRangeError> {
        let unix_secs = i64::try_from(self.secs as i128 - TAI64_BASE as i128)
            .map_err(|_| OutOfRangeError(()))?;

        let offset = leap_second::offset_at_unix(unix_secs);
        let candidate = DateTime::from_timestamp(unix_secs, self.nanos).ok_or(OutOfRangeError(()))?;

        candidate
            .checked_sub_signed(TimeDelta::seconds(offset))
            .ok_or(OutOfRangeError(()))
    }

    /// Returns the Unix timestamp corresponding to this timestamp, as whole
    /// seconds and sub-second nanoseconds.
    ///
    /// Returns an error if the timestamp falls outside the range of civil
    /// date-times.
    pub fn to_unix_timestamp(&self) -> Result<(i64, u32), OutOfRangeError> {
        self.to_datetime()
            .map(|date_time| (date_time.timestamp(), self.nanos))
    }

    /// Returns the number of whole atomic seconds since the TAI64 origin.
    pub const fn as_secs(&self) -> u64 {
        self.secs
    }

    /// Returns the sub-second fractional part in nanoseconds.
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Indicates how this moment compares to the argument.
    ///
    /// The ordering is total: seconds are the primary key and nanoseconds
    /// break ties.
    ///
    /// # Examples
    ///
    /// ```
    /// use tai64n::{Tai64N, TimeComparison};
    ///
    /// let t0 = Tai64N::new(100, 0);
    /// let t1 = Tai64N::new(100, 1);
    ///
    /// assert_eq!(t0.compare(&t1), TimeComparison::Before);
    /// assert_eq!(t0.compare(&t0), TimeComparison::Equal);
    /// assert_eq!(t1.compare(&t0), TimeComparison::After);
    /// ```
    pub fn compare(&self, other: &Self) -> TimeComparison {
        match self.cmp(other) {
            Ordering::Less => TimeComparison::Before,
            Ordering::Equal => TimeComparison::Equal,
            Ordering::Greater => TimeComparison::After,
        }
    }

    /// Indicates whether this moment lies in the past of the argument.
    pub fn before(&self, other: &Self) -> bool {
        self.compare(other) == TimeComparison::Before
    }

    /// Indicates whether this moment lies in the future of the argument.
    pub fn after(&self, other: &Self) -> bool {
        self.compare(other) == TimeComparison::After
    }

    /// Adds a duration to a timestamp, checking for overflow.
    ///
    /// The nanoseconds stay normalized: any sub-second overflow carries into
    /// the second count.
    ///
    /// Returns `None` if overflow occurred.
    pub const fn checked_add(self, rhs: Duration) -> Option<Self> {
        let mut secs = match self.secs.checked_add(rhs.as_secs()) {
            Some(secs) => secs,
            None => return None,
        };

        let mut nanos = self.nanos + rhs.subsec_nanos();
        if nanos >= NANOS_PER_SEC {
            secs = match secs.checked_add(1) {
                Some(secs) => secs,
                None => return None,
            };
            nanos -= NANOS_PER_SEC;
        }

        Some(Self { secs, nanos })
    }

    /// Subtracts a duration from a timestamp, checking for underflow.
    ///
    /// The nanoseconds stay normalized: any sub-second underflow borrows
    /// from the second count.
    ///
    /// Returns `None` if the result would precede the TAI64 origin of the
    /// second count.
    pub const fn checked_sub(self, rhs: Duration) -> Option<Self> {
        let mut secs = match self.secs.checked_sub(rhs.as_secs()) {
            Some(secs) => secs,
            None => return None,
        };

        let nanos = if self.nanos < rhs.subsec_nanos() {
            secs = match secs.checked_sub(1) {
                Some(secs) => secs,
                None => return None,
            };

            (self.nanos + NANOS_PER_SEC) - rhs.subsec_nanos()
        } else {
            self.nanos - rhs.subsec_nanos()
        };

        Some(Self { secs, nanos })
    }

    /// Subtracts a timestamp from another timestamp.
    ///
    /// The difference is taken over civil time, not over the raw atomic
    /// fields: the leap second offsets of both endpoints are removed first,
    /// so across a leap second boundary the result is smaller than the
    /// atomic difference by the offset delta.
    ///
    /// # Panics
    ///
    /// Panics if the argument lies in the future of `self` or if either
    /// endpoint has no civil representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use tai64n::Tai64N;
    ///
    /// let earlier = Tai64N::from_unix_timestamp(1_398_902_400, 0).unwrap();
    /// let later = Tai64N::from_unix_timestamp(1_398_902_420, 500_000_000).unwrap();
    ///
    /// assert_eq!(later.duration_since(earlier), Duration::new(20, 500_000_000));
    /// ```
    pub fn duration_since(self, earlier: Self) -> Duration {
        if let Some(duration) = self.checked_duration_since(earlier) {
            return duration;
        }

        panic!("attempt to subtract a timestamp from an earlier timestamp");
    }

    /// Computes the civil-time duration elapsed between a timestamp and an
    /// earlier timestamp, checking that the timestamps are appropriately
    /// ordered.
    ///
    /// Returns `None` if the argument lies in the future of `self` or if
    /// either endpoint has no civil representation.
    pub fn checked_duration_since(self, earlier: Self) -> Option<Duration> {
        let (later_secs, later_nanos) = self.to_unix_timestamp().ok()?;
        let (earlier_secs, earlier_nanos) = earlier.to_unix_timestamp().ok()?;

        // If the subtraction of the nanosecond fractions would underflow,
        // borrow one second.
        let (secs, nanos) = if later_nanos < earlier_nanos {
            (
                later_secs.checked_sub(earlier_secs)?.checked_sub(1)?,
                later_nanos + NANOS_PER_SEC - earlier_nanos,
            )
        } else {
            (later_secs.checked_sub(earlier_secs)?, later_nanos - earlier_nanos)
        };

        if secs < 0 {
            return None;
        }

        Some(Duration::new(secs as u64, nanos))
    }

    /// Writes the canonical 12-byte binary form to the beginning of the
    /// provided buffer: 8 big-endian bytes of seconds followed by 4
    /// big-endian bytes of nanoseconds.
    ///
    /// Fails without touching the buffer if it is shorter than
    /// [`STORAGE_LEN`] bytes; bytes past the first 12 are left unchanged.
    pub fn write_storage(&self, buf: &mut [u8]) -> Result<(), BufferTooSmallError> {
        if buf.len() < STORAGE_LEN {
            return Err(BufferTooSmallError(()));
        }

        buf[..STORAGE_LEN].copy_from_slice(&self.storage_bytes());

        Ok(())
    }

    /// Reads a timestamp from the canonical 12-byte binary form at the
    /// beginning of the provided buffer.
    ///
    /// Fails if the buffer is shorter than [`STORAGE_LEN`] bytes.
    pub fn read_storage(buf: &[u8]) -> Result<Self, BufferTooSmallError> {
        if buf.len() < STORAGE_LEN {
            return Err(BufferTooSmallError(()));
        }

        let mut secs = [0u8; 8];
        secs.copy_from_slice(&buf[..8]);
        let mut nanos = [0u8; 4];
        nanos.copy_from_slice(&buf[8..STORAGE_LEN]);

        Ok(Self::new(u64::from_be_bytes(secs), u32::from_be_bytes(nanos)))
    }

    /// Renders the moment in the canonical ASCII format: a `@` followed by
    /// the 24 uppercase hexadecimal digits of the binary form.
    ///
    /// # Examples
    ///
    /// ```
    /// use tai64n::Tai64N;
    ///
    /// let timestamp = Tai64N::from_unix_timestamp(1_398_902_400, 0).unwrap();
    /// assert_eq!(timestamp.label(), "@4000000053618EA300000000");
    /// ```
    pub fn label(&self) -> String {
        let mut label = String::with_capacity(1 + 2 * STORAGE_LEN);
        label.push('@');
        for byte in self.storage_bytes() {
            label.push(HEX_DIGITS[(byte >> 4) as usize] as char);
            label.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
        }

        label
    }

    /// Parses the canonical ASCII format.
    ///
    /// Returns `None` if the string does not start with `@`, if the
    /// remainder is not uppercase hexadecimal, or if it does not decode to
    /// exactly 12 bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use tai64n::Tai64N;
    ///
    /// assert!(Tai64N::parse_label("@4000000053618EA300000000").is_some());
    /// assert!(Tai64N::parse_label("4000000053618EA300000000").is_none());
    /// assert!(Tai64N::parse_label("@ZZ").is_none());
    /// ```
    pub fn parse_label(label: &str) -> Option<Self> {
        let hex = label.strip_prefix('@')?.as_bytes();
        if hex.len() != 2 * STORAGE_LEN {
            return None;
        }

        let mut storage = [0u8; STORAGE_LEN];
        for (byte, pair) in storage.iter_mut().zip(hex.chunks_exact(2)) {
            *byte = (hex_value(pair[0])? << 4) | hex_value(pair[1])?;
        }

        Self::read_storage(&storage).ok()
    }

    fn storage_bytes(&self) -> [u8; STORAGE_LEN] {
        let mut buf = [0u8; STORAGE_LEN];
        buf[..8].copy_from_slice(&self.secs.to_be_bytes());
        buf[8..].copy_from_slice(&self.nanos.to_be_bytes());

        buf
    }
}

const fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

impl Add<Duration> for Tai64N {
    type Output = Self;

    /// Adds a duration to a timestamp.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting timestamp cannot be
    /// represented. See [`Tai64N::checked_add`] for a panic-free version.
    fn add(self, other: Duration) -> Self {
        self.checked_add(other)
            .expect("overflow when adding duration to timestamp")
    }
}

impl Sub<Duration> for Tai64N {
    type Output = Self;

    /// Subtracts a duration from a timestamp.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting timestamp cannot be
    /// represented. See [`Tai64N::checked_sub`] for a panic-free version.
    fn sub(self, other: Duration) -> Self {
        self.checked_sub(other)
            .expect("overflow when subtracting duration from timestamp")
    }
}

impl AddAssign<Duration> for Tai64N {
    /// Increments the timestamp by a duration.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting timestamp cannot be
    /// represented.
    fn add_assign(&mut self, other: Duration) {
        *self = *self + other;
    }
}

impl SubAssign<Duration> for Tai64N {
    /// Decrements the timestamp by a duration.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting timestamp cannot be
    /// represented.
    fn sub_assign(&mut self, other: Duration) {
        *self = *self - other;
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Tai64N;

    impl Serialize for Tai64N {
        /// Serializes the timestamp as its civil UTC date-time, delegating
        /// the string form to `chrono`.
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let date_time = self.to_datetime().map_err(serde::ser::Error::custom)?;

            date_time.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Tai64N {
        /// Deserializes a civil UTC date-time and converts it to a
        /// timestamp. Parse failures are propagated unchanged.
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let date_time = DateTime::<Utc>::deserialize(deserializer)?;

            Ok(Tai64N::from_datetime(&date_time))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    #[test]
    fn new_normalizes_nanoseconds() {
        let timestamp = Tai64N::new(100, 2_345_678_901);

        assert_eq!(timestamp.as_secs(), 102);
        assert_eq!(timestamp.subsec_nanos(), 345_678_901);
    }

    #[test]
    fn from_unix_timestamp_known_values() {
        // 2016-05-01, 2014-05-01 and 2011-05-01 00:00:00 UTC, with +36, +35
        // and +34 leap seconds respectively.
        let t = Tai64N::from_unix_timestamp(1_462_060_800, 0).unwrap();
        assert_eq!(t.as_secs(), 4_611_686_019_889_448_740);

        let t = Tai64N::from_unix_timestamp(1_398_902_400, 0).unwrap();
        assert_eq!(t.as_secs(), 4_611_686_019_826_290_339);

        let t = Tai64N::from_unix_timestamp(1_304_208_000, 0).unwrap();
        assert_eq!(t.as_secs(), 4_611_686_019_731_595_938);
    }

    #[test]
    fn from_unix_timestamp_invalid_nanoseconds() {
        assert_eq!(
            Tai64N::from_unix_timestamp(0, 1_000_000_000),
            Err(OutOfRangeError(()))
        );
    }

    #[test]
    fn from_datetime_matches_from_unix_timestamp() {
        let date_time = Utc.with_ymd_and_hms(2014, 5, 1, 0, 0, 0).unwrap();

        assert_eq!(
            Tai64N::from_datetime(&date_time),
            Tai64N::from_unix_timestamp(1_398_902_400, 0).unwrap()
        );
    }

    #[test]
    fn civil_round_trip() {
        let date_time = Utc
            .with_ymd_and_hms(2011, 5, 1, 2, 3, 4)
            .unwrap()
            .with_nanosecond(5)
            .unwrap();

        let timestamp = Tai64N::from_datetime(&date_time);

        assert_eq!(timestamp.to_datetime().unwrap(), date_time);
    }

    #[test]
    fn to_unix_timestamp_round_trip() {
        let timestamp = Tai64N::from_unix_timestamp(1_398_902_400, 123_456_789).unwrap();

        assert_eq!(
            timestamp.to_unix_timestamp().unwrap(),
            (1_398_902_400, 123_456_789)
        );
    }

    #[test]
    fn label_encode() {
        let timestamp = Tai64N::from_unix_timestamp(1_398_902_400, 0).unwrap();

        assert_eq!(timestamp.label(), "@4000000053618EA300000000");
    }

    #[test]
    fn label_round_trip() {
        let timestamp = Tai64N::from_unix_timestamp(1_398_902_400, 123_456_789).unwrap();

        assert_eq!(Tai64N::parse_label(&timestamp.label()), Some(timestamp));
    }

    #[test]
    fn parse_label_rejects_malformed_input() {
        // Missing prefix.
        assert_eq!(Tai64N::parse_label("4000000053618EA300000000"), None);
        // Invalid hexadecimal.
        assert_eq!(Tai64N::parse_label("@ZZ"), None);
        // Lowercase digits are not canonical.
        assert_eq!(Tai64N::parse_label("@4000000053618ea300000000"), None);
        // Wrong decoded length.
        assert_eq!(Tai64N::parse_label("@4000000053618EA3000000"), None);
        assert_eq!(Tai64N::parse_label("@4000000053618EA30000000000"), None);
        // Empty string.
        assert_eq!(Tai64N::parse_label(""), None);
    }

    #[test]
    fn storage_round_trip() {
        let timestamp = Tai64N::new(4_611_686_019_826_290_339, 987_654_321);

        let mut buf = [0u8; STORAGE_LEN];
        timestamp.write_storage(&mut buf).unwrap();

        assert_eq!(Tai64N::read_storage(&buf), Ok(timestamp));
    }

    #[test]
    fn storage_layout_is_big_endian() {
        let timestamp = Tai64N::from_unix_timestamp(1_398_902_400, 1).unwrap();

        let mut buf = [0u8; STORAGE_LEN];
        timestamp.write_storage(&mut buf).unwrap();

        assert_eq!(
            buf,
            [0x40, 0x00, 0x00, 0x00, 0x53, 0x61, 0x8E, 0xA3, 0x00, 0x00, 0x00, 0x01]
        );
    }

    #[test]
    fn storage_rejects_short_buffers() {
        let timestamp = Tai64N::new(123, 456);

        let mut buf = [0u8; STORAGE_LEN - 1];
        assert_eq!(
            timestamp.write_storage(&mut buf),
            Err(BufferTooSmallError(()))
        );
        assert_eq!(Tai64N::read_storage(&buf), Err(BufferTooSmallError(())));
    }

    #[test]
    fn storage_accepts_longer_buffers() {
        let timestamp = Tai64N::new(123, 456);

        let mut buf = [0xffu8; STORAGE_LEN + 4];
        timestamp.write_storage(&mut buf).unwrap();

        // Bytes past the storage format are untouched.
        assert_eq!(&buf[STORAGE_LEN..], &[0xff; 4]);
        assert_eq!(Tai64N::read_storage(&buf), Ok(timestamp));
    }

    #[test]
    fn comparison_is_total() {
        let t0 = Tai64N::new(100, 500);
        let t1 = Tai64N::new(100, 501);
        let t2 = Tai64N::new(101, 0);

        assert_eq!(t0.compare(&t1), TimeComparison::Before);
        assert_eq!(t1.compare(&t0), TimeComparison::After);
        assert_eq!(t0.compare(&t0), TimeComparison::Equal);
        assert_eq!(t1.compare(&t2), TimeComparison::Before);

        assert!(t0.before(&t1));
        assert!(t2.after(&t1));
        assert!(!t0.after(&t0));
        assert!(!t0.before(&t0));
    }

    #[test]
    fn now_is_monotonic() {
        let t1 = Tai64N::now().unwrap();
        let t2 = Tai64N::now().unwrap();

        assert!(t1.compare(&t2) != TimeComparison::After);
    }

    #[test]
    fn now_is_in_a_plausible_range() {
        // 2020-01-01 and 2100-01-01, ignoring leap seconds.
        let now = Tai64N::now().unwrap();

        assert!(now.as_secs() > TAI64_BASE + 1_577_836_800);
        assert!(now.as_secs() < TAI64_BASE + 4_102_444_800);
    }

    #[test]
    fn add_whole_second() {
        let t0 = Tai64N::new(1_000, 123_456_789);
        let t1 = t0 + Duration::from_secs(1);

        assert_eq!(t1.as_secs(), 1_001);
        assert_eq!(t1.subsec_nanos(), 123_456_789);
    }

    #[test]
    fn add_duration_with_carry() {
        let t = Tai64N::new(100, 900_000_000);

        assert_eq!(t + Duration::new(4, 100_000_000), Tai64N::new(105, 0));
        assert_eq!(
            t + Duration::new(4, 300_000_000),
            Tai64N::new(105, 200_000_000)
        );
    }

    #[test]
    fn add_duration_overflow() {
        let t = Tai64N::new(u64::MAX, 0);

        assert_eq!(t.checked_add(Duration::from_secs(1)), None);
    }

    #[test]
    fn sub_duration_with_borrow() {
        let t = Tai64N::new(100, 100_000_000);

        assert_eq!(t - Duration::new(4, 100_000_000), Tai64N::new(96, 0));
        assert_eq!(
            t - Duration::new(4, 300_000_000),
            Tai64N::new(95, 800_000_000)
        );
    }

    #[test]
    fn sub_duration_underflow() {
        let t = Tai64N::new(0, 100_000_000);

        assert_eq!(t.checked_sub(Duration::from_secs(1)), None);
        assert_eq!(t.checked_sub(Duration::new(0, 200_000_000)), None);
    }

    #[test]
    fn duration_since_smoke() {
        let t0 = Tai64N::from_unix_timestamp(1_398_902_400, 100_000_000).unwrap();
        let t1 = Tai64N::from_unix_timestamp(1_398_902_423, 223_456_789).unwrap();

        assert_eq!(
            t1.checked_duration_since(t0),
            Some(Duration::new(23, 123_456_789))
        );
    }

    #[test]
    fn duration_since_with_borrow() {
        let t0 = Tai64N::from_unix_timestamp(1_398_902_400, 200_000_000).unwrap();
        let t1 = Tai64N::from_unix_timestamp(1_398_902_401, 100_000_000).unwrap();

        assert_eq!(
            t1.checked_duration_since(t0),
            Some(Duration::new(0, 900_000_000))
        );
    }

    #[test]
    fn duration_since_invalid() {
        let t0 = Tai64N::from_unix_timestamp(1_398_902_400, 0).unwrap();
        let t1 = Tai64N::from_unix_timestamp(1_398_902_401, 0).unwrap();

        assert_eq!(t0.checked_duration_since(t1), None);
    }

    #[test]
    fn duration_since_across_leap_boundary() {
        // 40 civil seconds before the 2012-07-01 threshold and the threshold
        // itself: the interval straddles the inserted leap second, so the
        // atomic difference exceeds the civil difference by one second.
        let t0 = Tai64N::from_unix_timestamp(1_341_100_760, 0).unwrap();
        let t1 = Tai64N::from_unix_timestamp(1_341_100_800, 0).unwrap();

        assert_eq!(t1.as_secs() - t0.as_secs(), 41);
        assert_eq!(t1.duration_since(t0), Duration::from_secs(40));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_round_trip() {
        let timestamp = Tai64N::from_unix_timestamp(1_398_902_400, 5_000_000).unwrap();

        let json = serde_json::to_string(&timestamp).unwrap();
        let parsed: Tai64N = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, timestamp);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_wire_form_is_civil() {
        let timestamp = Tai64N::from_unix_timestamp(1_398_902_400, 0).unwrap();

        let json = serde_json::to_string(&timestamp).unwrap();

        // The atomic fields never appear on the wire.
        assert!(json.starts_with("\"2014-05-01T00:00:00"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_parse_failure_is_propagated() {
        assert!(serde_json::from_str::<Tai64N>("\"not a date\"").is_err());
    }
}
