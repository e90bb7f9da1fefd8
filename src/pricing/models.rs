//! Pricing domain types and the database rows they are loaded from.
//!
//! Row structs use sqlx's FromRow derive for direct database deserialization
//! and are converted into validated domain values before pricing.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::error::PricingError;

const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Weekday for a Sunday-based index (0=Sunday .. 6=Saturday)
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    SUNDAY_FIRST.get(index as usize).copied()
}

/// Sunday-based index of a weekday (0=Sunday .. 6=Saturday)
pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

/// Full English name of a weekday
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a clock time given as `HH:MM` or `HH:MM:SS`
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Kind of pricing rule. Only used for labeling, never for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingKind {
    Peak,
    OffPeak,
    Weekend,
    Holiday,
}

impl PricingKind {
    /// Stored value, as in `venues_pricingrule.pricing_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingKind::Peak => "peak",
            PricingKind::OffPeak => "off_peak",
            PricingKind::Weekend => "weekend",
            PricingKind::Holiday => "holiday",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PricingKind::Peak => "Peak Hours",
            PricingKind::OffPeak => "Off-Peak Hours",
            PricingKind::Weekend => "Weekend Premium",
            PricingKind::Holiday => "Holiday Premium",
        }
    }
}

impl FromStr for PricingKind {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "peak" => Ok(PricingKind::Peak),
            "off_peak" => Ok(PricingKind::OffPeak),
            "weekend" => Ok(PricingKind::Weekend),
            "holiday" => Ok(PricingKind::Holiday),
            other => Err(PricingError::UnknownPricingKind(other.to_string())),
        }
    }
}

/// Set of weekdays a rule is restricted to.
///
/// Bit `n` is set for Sunday-based index `n`. The empty set means the rule
/// applies every day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    pub const EVERY_DAY: DaySet = DaySet(0);

    pub fn from_days(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut set = DaySet::default();
        for day in days {
            set.insert(day);
        }
        set
    }

    /// Build from Sunday-based indices, rejecting anything outside 0..=6
    pub fn from_indices(indices: &[u8]) -> Result<Self, PricingError> {
        let mut set = DaySet::default();
        for &index in indices {
            let day = weekday_from_index(index).ok_or_else(|| PricingError::InvalidDaysOfWeek {
                value: index.to_string(),
            })?;
            set.insert(day);
        }
        Ok(set)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << weekday_index(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << weekday_index(day)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when the set is empty or contains `day`
    pub fn applies_to(&self, day: Weekday) -> bool {
        self.is_empty() || self.contains(day)
    }

    /// Days in Sunday-first order
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        SUNDAY_FIRST.iter().copied().filter(move |day| self.contains(*day))
    }

    pub fn indices(&self) -> Vec<u8> {
        self.iter().map(weekday_index).collect()
    }
}

/// Parses the stored comma-separated form, e.g. `"1,2,3,4,5"`.
impl FromStr for DaySet {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = DaySet::default();
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let day = token
                .parse::<u8>()
                .ok()
                .and_then(weekday_from_index)
                .ok_or_else(|| PricingError::InvalidDaysOfWeek {
                    value: s.to_string(),
                })?;
            set.insert(day);
        }
        Ok(set)
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days: Vec<String> = self.indices().iter().map(u8::to_string).collect();
        f.write_str(&days.join(","))
    }
}

/// A venue-scoped multiplier over a time-of-day window
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRule {
    pub id: i64,
    pub venue_id: i64,
    pub kind: PricingKind,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub multiplier: Decimal,
    pub days_of_week: DaySet,
    pub active: bool,
}

impl PricingRule {
    /// Window crosses midnight (end at or before start)
    pub fn is_overnight(&self) -> bool {
        self.end_time <= self.start_time
    }
}

impl fmt::Display for PricingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}-{} x{:.2}",
            self.kind.display_name(),
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M"),
            self.multiplier
        )?;
        if !self.days_of_week.is_empty() {
            write!(f, " (Days: {})", self.days_of_week)?;
        }
        Ok(())
    }
}

/// A slot to price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub venue_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TimeSlot {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Sunday-based weekday index of the slot's date
    pub fn weekday_index(&self) -> u8 {
        weekday_index(self.weekday())
    }
}

/// Pricing inputs of a venue: base hourly price and its rule set
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub base_price_per_hour: Decimal,
    pub pricing_rules: Vec<PricingRule>,
}

/// Venue from venues_venue
#[derive(Debug, Clone, FromRow)]
pub struct VenueRow {
    pub id: i64,
    pub name: String,
    pub price_per_hour: Decimal,
    pub is_active: bool,
}

impl VenueRow {
    pub fn into_venue(self, pricing_rules: Vec<PricingRule>) -> Venue {
        Venue {
            id: self.id,
            name: self.name,
            base_price_per_hour: self.price_per_hour,
            pricing_rules,
        }
    }
}

/// PricingRule from venues_pricingrule
#[derive(Debug, Clone, FromRow)]
pub struct PricingRuleRow {
    pub id: i64,
    pub venue_id: i64,
    pub pricing_type: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub multiplier: Decimal,
    pub days_of_week: String,
    pub is_active: bool,
}

impl TryFrom<PricingRuleRow> for PricingRule {
    type Error = PricingError;

    fn try_from(row: PricingRuleRow) -> Result<Self, Self::Error> {
        Ok(PricingRule {
            id: row.id,
            venue_id: row.venue_id,
            kind: row.pricing_type.parse()?,
            start_time: row.start_time,
            end_time: row.end_time,
            multiplier: row.multiplier,
            days_of_week: row.days_of_week.parse()?,
            active: row.is_active,
        })
    }
}

/// TimeSlot from venues_timeslot
#[derive(Debug, Clone, FromRow)]
pub struct TimeSlotRow {
    pub id: i64,
    pub venue_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_booked: bool,
}

impl TimeSlotRow {
    pub fn slot(&self) -> TimeSlot {
        TimeSlot {
            venue_id: self.venue_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}
