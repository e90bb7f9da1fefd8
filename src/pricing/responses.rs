//! Response DTOs for pricing API endpoints.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{PriceStatus, PricingExplanation};
use super::models::{PricingKind, PricingRule, TimeSlotRow};

fn clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }
}

/// A rule as reported in a pricing breakdown
#[derive(Debug, Serialize)]
pub struct PricingRuleResponse {
    pub id: i64,
    pub kind: PricingKind,
    pub kind_display: &'static str,
    pub start_time: String,
    pub end_time: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub multiplier: Decimal,
    pub days_of_week: Vec<u8>,
    pub overnight: bool,
    /// e.g. "Peak Hours: 17:00-21:00 x1.50"
    pub label: String,
}

impl From<&PricingRule> for PricingRuleResponse {
    fn from(rule: &PricingRule) -> Self {
        Self {
            id: rule.id,
            kind: rule.kind,
            kind_display: rule.kind.display_name(),
            start_time: clock(rule.start_time),
            end_time: clock(rule.end_time),
            multiplier: rule.multiplier,
            days_of_week: rule.days_of_week.indices(),
            overnight: rule.is_overnight(),
            label: rule.to_string(),
        }
    }
}

/// Response for a slot price breakdown
#[derive(Debug, Serialize)]
pub struct PricingExplanationResponse {
    pub day: &'static str,
    pub base_price: MoneyResponse,
    pub final_price: MoneyResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub multiplier: Decimal,
    pub rules_applied: Vec<PricingRuleResponse>,
    pub is_peak: bool,
    pub is_discount: bool,
    pub status: PriceStatus,
}

impl PricingExplanationResponse {
    pub fn new(explanation: &PricingExplanation, currency: &str) -> Self {
        Self {
            day: explanation.day_name(),
            base_price: MoneyResponse::new(explanation.base_price, currency),
            final_price: MoneyResponse::new(explanation.final_price, currency),
            multiplier: explanation.multiplier.normalize(),
            rules_applied: explanation
                .rules_applied
                .iter()
                .map(PricingRuleResponse::from)
                .collect(),
            is_peak: explanation.is_peak,
            is_discount: explanation.is_discount,
            status: explanation.status(),
        }
    }
}

/// Response for a stored slot with its price
#[derive(Debug, Serialize)]
pub struct SlotPriceResponse {
    pub slot_id: i64,
    pub venue_id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub is_booked: bool,
    pub pricing: PricingExplanationResponse,
}

impl SlotPriceResponse {
    pub fn new(slot: &TimeSlotRow, explanation: &PricingExplanation, currency: &str) -> Self {
        Self {
            slot_id: slot.id,
            venue_id: slot.venue_id,
            date: slot.date,
            start_time: clock(slot.start_time),
            end_time: clock(slot.end_time),
            is_booked: slot.is_booked,
            pricing: PricingExplanationResponse::new(explanation, currency),
        }
    }
}

/// Response for the amount a booking must snapshot
#[derive(Debug, Serialize)]
pub struct BookingQuoteResponse {
    pub slot_id: i64,
    pub venue_id: i64,
    pub total_price: MoneyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::DaySet;
    use chrono::Weekday;
    use rust_decimal_macros::dec;

    #[test]
    fn test_explanation_serializes_amounts_as_strings() {
        let rule = PricingRule {
            id: 9,
            venue_id: 1,
            kind: PricingKind::OffPeak,
            start_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            multiplier: dec!(0.80),
            days_of_week: "1,2,3,4,5".parse::<DaySet>().unwrap(),
            active: true,
        };
        let explanation = PricingExplanation {
            day: Weekday::Mon,
            base_price: dec!(500.00),
            final_price: dec!(400.00),
            multiplier: dec!(0.8000),
            rules_applied: vec![rule],
            is_peak: false,
            is_discount: true,
        };

        let json = serde_json::to_value(PricingExplanationResponse::new(&explanation, "INR")).unwrap();
        assert_eq!(json["day"], "Monday");
        assert_eq!(json["base_price"]["amount"], "500.00");
        assert_eq!(json["final_price"]["amount"], "400.00");
        assert_eq!(json["final_price"]["currency"], "INR");
        assert_eq!(json["multiplier"], "0.8");
        assert_eq!(json["status"], "discount");
        assert_eq!(json["rules_applied"][0]["kind"], "off_peak");
        assert_eq!(json["rules_applied"][0]["start_time"], "06:00");
        assert_eq!(json["rules_applied"][0]["days_of_week"], serde_json::json!([1, 2, 3, 4, 5]));
        assert_eq!(json["rules_applied"][0]["overnight"], false);
        assert_eq!(
            json["rules_applied"][0]["label"],
            "Off-Peak Hours: 06:00-09:00 x0.80 (Days: 1,2,3,4,5)"
        );
    }
}
