//! Pricing validation errors.
//!
//! The engine itself never fails; these are raised where rules and slots
//! enter the system (store rows, request bodies) before they reach it.

use rust_decimal::Decimal;

/// Pricing error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid rule window {start}-{end}: {reason}")]
    InvalidRuleWindow {
        start: String,
        end: String,
        reason: String,
    },

    #[error("Invalid days of week '{value}': expected comma-separated digits 0-6 (0=Sunday)")]
    InvalidDaysOfWeek { value: String },

    #[error("Unknown pricing type '{0}'")]
    UnknownPricingKind(String),

    #[error("Base price must not be negative (got {0})")]
    NegativeBasePrice(Decimal),

    #[error("Invalid slot time '{0}': expected HH:MM")]
    InvalidSlotTime(String),
}
