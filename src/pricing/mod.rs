//! Pricing engine module for venue slots.
//!
//! Computes the price of a venue time slot from the venue's base hourly price
//! and its time-of-day / weekday pricing rules, and explains which rules
//! applied. The calculators are pure; services and routes are thin plumbing
//! that fetch inputs and expose them over HTTP.

pub mod calculators;
pub mod error;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{compute_price, explain, match_rules, round_money, PriceStatus, PricingExplanation};
pub use error::PricingError;
pub use models::{DaySet, PricingKind, PricingRule, TimeSlot, Venue};
pub use routes::router;
pub use services::{BookingQuote, SlotQuote};
