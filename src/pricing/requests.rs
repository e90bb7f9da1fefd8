//! Request DTOs for pricing API endpoints.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::calculators::validate_base_price;
use super::error::PricingError;
use super::models::{parse_clock, DaySet, PricingKind, PricingRule, TimeSlot, Venue};

/// Slot end when the caller only gives a start time
fn default_end(start_time: NaiveTime) -> NaiveTime {
    start_time + chrono::Duration::hours(1)
}

fn parse_slot_time(value: &str) -> Result<NaiveTime, PricingError> {
    parse_clock(value).ok_or_else(|| PricingError::InvalidSlotTime(value.to_string()))
}

fn default_true() -> bool {
    true
}

/// Query for pricing an ad-hoc slot at a stored venue
#[derive(Debug, Deserialize)]
pub struct VenuePriceQuery {
    pub date: NaiveDate,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
}

impl VenuePriceQuery {
    pub fn into_slot(self, venue_id: i64) -> Result<TimeSlot, PricingError> {
        let start_time = parse_slot_time(&self.start_time)?;
        let end_time = match self.end_time.as_deref() {
            Some(end) => parse_slot_time(end)?,
            None => default_end(start_time),
        };

        Ok(TimeSlot {
            venue_id,
            date: self.date,
            start_time,
            end_time,
        })
    }
}

/// Query for listing priced open slots
#[derive(Debug, Deserialize)]
pub struct OpenSlotsQuery {
    #[serde(default)]
    pub from: Option<NaiveDate>,
}

/// A pricing rule supplied inline with a quote request
#[derive(Debug, Deserialize)]
pub struct PricingRuleRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub kind: PricingKind,
    pub start_time: String,
    pub end_time: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub multiplier: Decimal,
    /// Sunday-based day indices; empty means every day
    #[serde(default)]
    pub days_of_week: Vec<u8>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl PricingRuleRequest {
    /// Validate and convert. Rules without an id get `fallback_id`.
    pub fn into_rule(self, fallback_id: i64, venue_id: i64) -> Result<PricingRule, PricingError> {
        let window_error = |reason: &str| PricingError::InvalidRuleWindow {
            start: self.start_time.clone(),
            end: self.end_time.clone(),
            reason: reason.to_string(),
        };
        let start_time = parse_clock(&self.start_time).ok_or_else(|| window_error("bad start time"))?;
        let end_time = parse_clock(&self.end_time).ok_or_else(|| window_error("bad end time"))?;

        Ok(PricingRule {
            id: self.id.unwrap_or(fallback_id),
            venue_id,
            kind: self.kind,
            start_time,
            end_time,
            multiplier: self.multiplier,
            days_of_week: DaySet::from_indices(&self.days_of_week)?,
            active: self.active,
        })
    }
}

/// Request to quote a slot against an inline rule set
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub venue_id: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price_per_hour: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub rules: Vec<PricingRuleRequest>,
    pub date: NaiveDate,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Validated parts of a [`QuoteRequest`]
#[derive(Debug)]
pub struct Quote {
    pub venue: Venue,
    pub slot: TimeSlot,
    pub currency: Option<String>,
}

impl QuoteRequest {
    pub fn into_quote(self) -> Result<Quote, PricingError> {
        validate_base_price(self.base_price_per_hour)?;

        let venue_id = self.venue_id;
        let pricing_rules = self
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| rule.into_rule(index as i64 + 1, venue_id))
            .collect::<Result<Vec<_>, _>>()?;

        let slot = VenuePriceQuery {
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
        .into_slot(venue_id)?;

        Ok(Quote {
            venue: Venue {
                id: venue_id,
                name: String::new(),
                base_price_per_hour: self.base_price_per_hour,
                pricing_rules,
            },
            slot,
            currency: self.currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use rust_decimal_macros::dec;

    fn quote_json(rules: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "base_price_per_hour": "500.00",
            "rules": rules,
            "date": "2026-01-26",
            "start_time": "18:00"
        })
    }

    #[test]
    fn test_quote_request_defaults() {
        let request: QuoteRequest = serde_json::from_value(quote_json(serde_json::json!([
            {"kind": "peak", "start_time": "18:00", "end_time": "22:00", "multiplier": "1.5"}
        ])))
        .unwrap();

        let quote = request.into_quote().unwrap();
        assert_eq!(quote.venue.base_price_per_hour, dec!(500.00));
        assert_eq!(quote.slot.end_time, NaiveTime::from_hms_opt(19, 0, 0).unwrap());
        assert_eq!(quote.slot.weekday(), Weekday::Mon);

        let rule = &quote.venue.pricing_rules[0];
        assert_eq!(rule.id, 1);
        assert!(rule.active);
        assert!(rule.days_of_week.is_empty());
        assert!(quote.currency.is_none());
    }

    #[test]
    fn test_late_slot_default_end_wraps_midnight() {
        let query = VenuePriceQuery {
            date: NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(),
            start_time: "23:00".to_string(),
            end_time: None,
        };
        let slot = query.into_slot(4).unwrap();
        assert_eq!(slot.end_time, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_bad_rule_window_rejected() {
        let request: QuoteRequest = serde_json::from_value(quote_json(serde_json::json!([
            {"kind": "peak", "start_time": "24:30", "end_time": "22:00", "multiplier": "1.5"}
        ])))
        .unwrap();

        assert!(matches!(
            request.into_quote(),
            Err(PricingError::InvalidRuleWindow { .. })
        ));
    }

    #[test]
    fn test_multiplier_passes_through_unchanged() {
        let request: QuoteRequest = serde_json::from_value(quote_json(serde_json::json!([
            {"kind": "peak", "start_time": "18:00", "end_time": "22:00", "multiplier": "2.125"},
            {"kind": "off_peak", "start_time": "06:00", "end_time": "09:00", "multiplier": "0"}
        ])))
        .unwrap();

        let quote = request.into_quote().unwrap();
        assert_eq!(quote.venue.pricing_rules[0].multiplier, dec!(2.125));
        assert_eq!(quote.venue.pricing_rules[1].multiplier, Decimal::ZERO);
    }

    #[test]
    fn test_bad_day_index_rejected() {
        let request: QuoteRequest = serde_json::from_value(quote_json(serde_json::json!([
            {"kind": "weekend", "start_time": "08:00", "end_time": "20:00",
             "multiplier": "1.2", "days_of_week": [0, 7]}
        ])))
        .unwrap();

        assert!(matches!(
            request.into_quote(),
            Err(PricingError::InvalidDaysOfWeek { .. })
        ));
    }

    #[test]
    fn test_negative_base_price_rejected() {
        let mut body = quote_json(serde_json::json!([]));
        body["base_price_per_hour"] = serde_json::json!("-10.00");
        let request: QuoteRequest = serde_json::from_value(body).unwrap();

        assert!(matches!(
            request.into_quote(),
            Err(PricingError::NegativeBasePrice(_))
        ));
    }

    #[test]
    fn test_bad_slot_time_rejected() {
        let mut body = quote_json(serde_json::json!([]));
        body["start_time"] = serde_json::json!("6pm");
        let request: QuoteRequest = serde_json::from_value(body).unwrap();

        assert!(matches!(
            request.into_quote(),
            Err(PricingError::InvalidSlotTime(_))
        ));
    }
}
