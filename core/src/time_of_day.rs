//! Wall-clock delivery times.
//!
//! A [`TimeOfDay`] is an hour on the 12-hour clock plus a [`Meridiem`], with no
//! minutes, date or timezone. Comparisons happen within a single day: `11PM` is
//! after `1AM`, and there is no notion of `2AM` belonging to the next day.
//!
//! # Example
//!
//! ```
//! use recipe_stats_core::TimeOfDay;
//!
//! # fn main() -> Result<(), recipe_stats_core::TimeOfDayError> {
//! let start = TimeOfDay::parse("10AM")?;
//! let end = TimeOfDay::parse("3PM")?;
//! let noon = TimeOfDay::parse("12PM")?;
//!
//! assert!(noon.inclusive_between(&start, &end));
//! assert!(start.inclusive_between(&start, &end));
//! assert_eq!(noon.as_str(), "12PM");
//! # Ok(())
//! # }
//! ```

use crate::error::TimeOfDayError;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Half of the day an hour belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meridiem {
    /// Midnight up to (not including) noon
    Am,
    /// Noon up to (not including) midnight
    Pm,
}

impl Meridiem {
    /// The upper-case suffix used in delivery texts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An hour and meridiem, compared chronologically within one day.
///
/// Equality, ordering and hashing only look at the clock time. The parsed
/// text is kept for display so reports echo exactly what was supplied.
#[derive(Debug, Clone)]
pub struct TimeOfDay {
    time: NaiveTime,
    raw: String,
}

impl TimeOfDay {
    /// Parse a token of the exact shape `<1-12><AM|PM>`, e.g. `3PM` or `12AM`.
    ///
    /// Leading zeros, minutes, whitespace and lower-case suffixes are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TimeOfDayError::Invalid`] for any other shape.
    pub fn parse(text: &str) -> Result<Self, TimeOfDayError> {
        let invalid = || TimeOfDayError::Invalid(text.to_string());

        let (digits, meridiem) = if let Some(digits) = text.strip_suffix("AM") {
            (digits, Meridiem::Am)
        } else if let Some(digits) = text.strip_suffix("PM") {
            (digits, Meridiem::Pm)
        } else {
            return Err(invalid());
        };

        if digits.is_empty()
            || digits.len() > 2
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let hour: u32 = digits.parse().map_err(|_| invalid())?;
        let time = Self::clock_time(hour, meridiem).ok_or_else(invalid)?;

        Ok(Self {
            time,
            raw: text.to_string(),
        })
    }

    /// Build a time from its parts, rendering the display text canonically.
    ///
    /// # Errors
    ///
    /// Returns [`TimeOfDayError::Invalid`] if `hour` is outside 1..=12.
    pub fn new(hour: u32, meridiem: Meridiem) -> Result<Self, TimeOfDayError> {
        let raw = format!("{hour}{meridiem}");
        let time = Self::clock_time(hour, meridiem)
            .ok_or_else(|| TimeOfDayError::Invalid(raw.clone()))?;
        Ok(Self { time, raw })
    }

    /// `12AM`, the earliest time of day.
    #[must_use]
    pub fn midnight() -> Self {
        Self {
            time: NaiveTime::MIN,
            raw: "12AM".to_string(),
        }
    }

    fn clock_time(hour: u32, meridiem: Meridiem) -> Option<NaiveTime> {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let hour24 = match meridiem {
            Meridiem::Am => hour % 12,
            Meridiem::Pm => hour % 12 + 12,
        };
        NaiveTime::from_hms_opt(hour24, 0, 0)
    }

    /// The hour on the 12-hour clock (1..=12).
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.time.hour12().1
    }

    /// Whether this is a morning or afternoon time.
    #[must_use]
    pub fn meridiem(&self) -> Meridiem {
        if self.time.hour12().0 {
            Meridiem::Pm
        } else {
            Meridiem::Am
        }
    }

    /// The text this value was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The time as a clock reading on an arbitrary day.
    #[must_use]
    pub const fn as_naive_time(&self) -> NaiveTime {
        self.time
    }

    /// `true` if `self` is strictly earlier than `other`.
    #[must_use]
    pub fn before(&self, other: &Self) -> bool {
        self.time < other.time
    }

    /// `true` if `self` is strictly later than `other`.
    #[must_use]
    pub fn after(&self, other: &Self) -> bool {
        self.time > other.time
    }

    /// `true` if both denote the same clock time, regardless of display text.
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.time == other.time
    }

    /// `true` if `self` is not before `start` and not after `end`.
    ///
    /// Both bounds are inclusive.
    #[must_use]
    pub fn inclusive_between(&self, start: &Self, end: &Self) -> bool {
        !self.before(start) && !self.after(end)
    }
}

impl PartialEq for TimeOfDay {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for TimeOfDay {}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.cmp(&other.time)
    }
}

impl Hash for TimeOfDay {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.time.hash(state);
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn time(text: &str) -> TimeOfDay {
        TimeOfDay::parse(text).expect("valid time of day")
    }

    #[test]
    fn test_parse_afternoon() {
        let t = time("4PM");
        assert_eq!(t.as_naive_time(), NaiveTime::from_hms_opt(16, 0, 0).unwrap());
        assert_eq!(t.hour(), 4);
        assert_eq!(t.meridiem(), Meridiem::Pm);
        assert_eq!(t.as_str(), "4PM");
    }

    #[test]
    fn test_parse_midnight_and_noon() {
        assert_eq!(time("12AM").as_naive_time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(time("12PM").as_naive_time(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(time("12AM").hour(), 12);
        assert_eq!(time("12AM").meridiem(), Meridiem::Am);
        assert_eq!(TimeOfDay::midnight(), time("12AM"));
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        for text in [
            "", "PM", "0AM", "13PM", "03PM", "3pm", "3 PM", " 3PM", "3:30PM", "100AM", "-1AM",
            "+1AM", "3XM", "Monday",
        ] {
            assert_eq!(
                TimeOfDay::parse(text),
                Err(TimeOfDayError::Invalid(text.to_string())),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_new_renders_canonical_text() {
        let t = TimeOfDay::new(10, Meridiem::Am).unwrap();
        assert_eq!(t.as_str(), "10AM");
        assert_eq!(t, time("10AM"));
        assert!(TimeOfDay::new(0, Meridiem::Am).is_err());
        assert!(TimeOfDay::new(13, Meridiem::Pm).is_err());
    }

    #[test]
    fn test_after() {
        let given = time("1PM");
        assert!(!given.after(&time("3PM")));
        assert!(given.after(&time("11AM")));
        assert!(!given.after(&time("1PM")));
    }

    #[test]
    fn test_before() {
        let given = time("1PM");
        assert!(given.before(&time("3PM")));
        assert!(!given.before(&time("11AM")));
        assert!(!given.before(&time("1PM")));
    }

    #[test]
    fn test_no_day_wraparound() {
        assert!(time("11PM").after(&time("1AM")));
        assert!(time("2AM").before(&time("11PM")));
        assert!(time("12AM").before(&time("1AM")));
        assert!(time("11AM").before(&time("12PM")));
    }

    #[test]
    fn test_inclusive_between() {
        let start = time("1PM");
        let end = time("10PM");

        assert!(time("3PM").inclusive_between(&start, &end));
        assert!(!time("10AM").inclusive_between(&start, &end));
        assert!(!time("11PM").inclusive_between(&start, &end));
        assert!(start.inclusive_between(&start, &end));
        assert!(end.inclusive_between(&start, &end));
    }

    #[test]
    fn test_serde_uses_display_text() {
        let t = time("9AM");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"9AM\"");

        let parsed: TimeOfDay = serde_json::from_str("\"11PM\"").unwrap();
        assert_eq!(parsed, time("11PM"));
        assert!(serde_json::from_str::<TimeOfDay>("\"25PM\"").is_err());
    }

    fn any_time() -> impl Strategy<Value = TimeOfDay> {
        (1u32..=12, prop::bool::ANY).prop_map(|(hour, pm)| {
            let meridiem = if pm { Meridiem::Pm } else { Meridiem::Am };
            TimeOfDay::new(hour, meridiem).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_bounds_are_inclusive(a in any_time(), b in any_time()) {
            let (start, end) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(start.inclusive_between(&start, &end));
            prop_assert!(end.inclusive_between(&start, &end));
        }

        #[test]
        fn prop_exactly_one_relation_holds(a in any_time(), b in any_time()) {
            let relations = [a.before(&b), a.after(&b), a.equal(&b)];
            prop_assert_eq!(relations.iter().filter(|r| **r).count(), 1);
        }

        #[test]
        fn prop_display_text_parses_back(t in any_time()) {
            prop_assert_eq!(TimeOfDay::parse(t.as_str()).unwrap(), t);
        }
    }
}
