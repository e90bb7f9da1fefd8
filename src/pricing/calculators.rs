//! Core pricing calculation functions.
//!
//! Pure functions for slot pricing - no database access. Given a venue's base
//! hourly price and its rule set, every function here is deterministic in its
//! inputs and safe to call any number of times.

use std::collections::HashSet;

use chrono::{NaiveTime, Weekday};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::error::PricingError;
use super::models::{weekday_name, PricingRule, TimeSlot, Venue};

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use sportshub_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Check whether a rule's time window covers a slot start time.
///
/// Both ends are inclusive. Overnight windows (end at or before start) cover
/// everything from the start time to midnight and from midnight to the end
/// time, so a rule with equal start and end covers the whole day.
pub fn rule_covers(rule: &PricingRule, start_time: NaiveTime) -> bool {
    if rule.is_overnight() {
        start_time >= rule.start_time || start_time <= rule.end_time
    } else {
        rule.start_time <= start_time && start_time <= rule.end_time
    }
}

/// Check whether a rule takes part in pricing a slot on `day` starting at `start_time`
pub fn rule_applies(rule: &PricingRule, day: Weekday, start_time: NaiveTime) -> bool {
    rule.active && rule.days_of_week.applies_to(day) && rule_covers(rule, start_time)
}

/// Select the rules that apply to a slot.
///
/// Only the slot's start time is tested against rule windows. A rule id
/// appearing more than once in `rules` is returned once.
pub fn match_rules<'a>(slot: &TimeSlot, rules: &'a [PricingRule]) -> Vec<&'a PricingRule> {
    let day = slot.weekday();
    let mut seen = HashSet::new();

    rules
        .iter()
        .filter(|rule| rule_applies(rule, day, slot.start_time))
        .filter(|rule| seen.insert(rule.id))
        .collect()
}

/// Highest multiplier among matched rules, 1.0 when none matched.
///
/// Rules never compound: a 1.5 peak rule and a 0.8 discount rule active at the
/// same time yield 1.5.
pub fn effective_multiplier(matched: &[&PricingRule]) -> Decimal {
    matched
        .iter()
        .map(|rule| rule.multiplier)
        .max()
        .unwrap_or(Decimal::ONE)
}

fn price_from_matches(base_price: Decimal, matched: &[&PricingRule]) -> Decimal {
    // Stored prices are numeric(10,2) and multipliers numeric(3,2); their
    // product is far inside Decimal's range, so saturation never kicks in
    // for store data.
    round_money(base_price.saturating_mul(effective_multiplier(matched)), 2)
}

/// Price of a slot at a venue, rounded to 2 decimal places
pub fn compute_price(venue: &Venue, slot: &TimeSlot) -> Decimal {
    let matched = match_rules(slot, &venue.pricing_rules);
    price_from_matches(venue.base_price_per_hour, &matched)
}

/// Classification of a final price relative to the base price
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceStatus {
    Peak,
    Discount,
    Regular,
}

/// Breakdown of how a slot price was reached
#[derive(Debug, Clone, PartialEq)]
pub struct PricingExplanation {
    pub day: Weekday,
    pub base_price: Decimal,
    pub final_price: Decimal,
    /// `final_price / base_price`, or 1 when the base price is zero
    pub multiplier: Decimal,
    pub rules_applied: Vec<PricingRule>,
    pub is_peak: bool,
    pub is_discount: bool,
}

impl PricingExplanation {
    pub fn day_name(&self) -> &'static str {
        weekday_name(self.day)
    }

    pub fn status(&self) -> PriceStatus {
        if self.is_peak {
            PriceStatus::Peak
        } else if self.is_discount {
            PriceStatus::Discount
        } else {
            PriceStatus::Regular
        }
    }
}

/// Explain the price of a slot.
///
/// Uses the same matching as [`compute_price`], so `explain(v, s).final_price`
/// always equals `compute_price(v, s)`.
pub fn explain(venue: &Venue, slot: &TimeSlot) -> PricingExplanation {
    let matched = match_rules(slot, &venue.pricing_rules);
    let base_price = venue.base_price_per_hour;
    let final_price = price_from_matches(base_price, &matched);

    let multiplier = if base_price.is_zero() {
        Decimal::ONE
    } else {
        final_price.checked_div(base_price).unwrap_or(Decimal::ONE)
    };

    PricingExplanation {
        day: slot.weekday(),
        base_price,
        final_price,
        multiplier,
        rules_applied: matched.into_iter().cloned().collect(),
        is_peak: final_price > base_price,
        is_discount: final_price < base_price,
    }
}

/// Validate a venue base price
pub fn validate_base_price(base_price: Decimal) -> Result<(), PricingError> {
    if base_price < Decimal::ZERO {
        return Err(PricingError::NegativeBasePrice(base_price));
    }
    Ok(())
}
