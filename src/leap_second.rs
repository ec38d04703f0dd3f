//! Leap second table and the derived leap moment index.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};

use crate::{Tai64N, TAI64_BASE};

/// A leap second insertion event.
///
/// The threshold is the first civil moment *after* the inserted second; the
/// offset is the cumulative TAI − UTC difference, in seconds, in effect from
/// the threshold onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeapSecond {
    threshold: i64,
    offset: i64,
}

impl LeapSecond {
    /// The threshold as a Unix timestamp, in seconds.
    pub const fn threshold_unix(&self) -> i64 {
        self.threshold
    }

    /// The cumulative TAI − UTC offset, in seconds, effective from the
    /// threshold onward.
    pub const fn offset(&self) -> i64 {
        self.offset
    }
}

const fn entry(threshold: i64, offset: i64) -> LeapSecond {
    LeapSecond { threshold, offset }
}

/// All leap second insertions through the 2017-01-01 bulletin.
///
/// The table is ordered by strictly ascending threshold and strictly
/// ascending offset; adding a future leap second means appending an entry
/// that preserves both orderings.
pub static LEAP_SECONDS: [LeapSecond; 28] = [
    entry(63_072_000, 10),    // 1972-01-01
    entry(78_796_800, 11),    // 1972-07-01
    entry(94_694_400, 12),    // 1973-01-01
    entry(126_230_400, 13),   // 1974-01-01
    entry(157_766_400, 14),   // 1975-01-01
    entry(189_302_400, 15),   // 1976-01-01
    entry(220_924_800, 16),   // 1977-01-01
    entry(252_460_800, 17),   // 1978-01-01
    entry(283_996_800, 18),   // 1979-01-01
    entry(315_532_800, 19),   // 1980-01-01
    entry(362_793_600, 20),   // 1981-07-01
    entry(394_329_600, 21),   // 1982-07-01
    entry(425_865_600, 22),   // 1983-07-01
    entry(489_024_000, 23),   // 1985-07-01
    entry(567_993_600, 24),   // 1988-01-01
    entry(631_152_000, 25),   // 1990-01-01
    entry(662_688_000, 26),   // 1991-01-01
    entry(709_948_800, 27),   // 1992-07-01
    entry(741_484_800, 28),   // 1993-07-01
    entry(773_020_800, 29),   // 1994-07-01
    entry(820_454_400, 30),   // 1996-01-01
    entry(867_715_200, 31),   // 1997-07-01
    entry(915_148_800, 32),   // 1999-01-01
    entry(1_136_073_600, 33), // 2006-01-01
    entry(1_230_768_000, 34), // 2009-01-01
    entry(1_341_100_800, 35), // 2012-07-01
    entry(1_435_708_800, 36), // 2015-07-01
    entry(1_483_228_800, 37), // 2017-01-01
];

/// Returns the cumulative TAI − UTC offset in effect at the provided civil
/// time, or 0 for civil times preceding the first tabulated leap second.
pub fn leap_seconds_involved(date_time: &DateTime<Utc>) -> i64 {
    offset_at_unix(date_time.timestamp())
}

/// Offset lookup over raw Unix seconds.
///
/// Queried times are typically near the present, so the scan runs from the
/// most recent entry backwards. The result is the same as an ascending scan
/// would give.
pub(crate) fn offset_at_unix(unix_secs: i64) -> i64 {
    for leap_second in LEAP_SECONDS.iter().rev() {
        if unix_secs >= leap_second.threshold {
            return leap_second.offset;
        }
    }

    0
}

/// A tabulated leap second paired with the atomic moment of the inserted
/// second itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeapMoment {
    leap_second: &'static LeapSecond,
    moment: Tai64N,
}

impl LeapMoment {
    /// The associated leap second table entry.
    pub const fn leap_second(&self) -> &'static LeapSecond {
        self.leap_second
    }

    /// The atomic moment of the inserted second, i.e. the atomic mapping of
    /// the threshold minus one atomic second.
    pub const fn moment(&self) -> Tai64N {
        self.moment
    }
}

static LEAP_MOMENTS: LazyLock<Vec<LeapMoment>> = LazyLock::new(|| {
    LEAP_SECONDS
        .iter()
        .map(|leap_second| {
            // The entry's own offset is already in effect at its threshold,
            // so the threshold maps to `TAI64_BASE + threshold + offset`;
            // one second earlier is the inserted second itself.
            let moment = Tai64N::new(
                TAI64_BASE + (leap_second.threshold + leap_second.offset - 1) as u64,
                0,
            );

            LeapMoment {
                leap_second,
                moment,
            }
        })
        .collect()
});

/// Returns the leap moment with the greatest moment at or before the
/// provided timestamp, or `None` if the timestamp precedes all tabulated
/// leap seconds.
pub fn nearest_leap_moment(timestamp: &Tai64N) -> Option<&'static LeapMoment> {
    LEAP_MOMENTS.iter().rev().find(|lm| *timestamp >= lm.moment)
}
