//! Database queries for the pricing service.
//!
//! Reads venues, pricing rules and time slots from the marketplace tables.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::error::AppError;

use super::models::{PricingRuleRow, TimeSlotRow, VenueRow};

/// Get an active venue by id
pub async fn get_venue(pool: &PgPool, venue_id: i64) -> Result<VenueRow, AppError> {
    sqlx::query_as::<_, VenueRow>(
        r#"
        SELECT id, name, price_per_hour, is_active
        FROM venues_venue
        WHERE id = $1
          AND is_active = TRUE
        "#,
    )
    .bind(venue_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", venue_id)))
}

/// Get the active pricing rules of a venue
pub async fn get_active_pricing_rules(
    pool: &PgPool,
    venue_id: i64,
) -> Result<Vec<PricingRuleRow>, AppError> {
    let rules = sqlx::query_as::<_, PricingRuleRow>(
        r#"
        SELECT
            id, venue_id, pricing_type,
            start_time, end_time, multiplier,
            days_of_week, is_active
        FROM venues_pricingrule
        WHERE venue_id = $1
          AND is_active = TRUE
        ORDER BY start_time
        "#,
    )
    .bind(venue_id)
    .fetch_all(pool)
    .await?;

    Ok(rules)
}

/// Get a time slot by id
pub async fn get_time_slot(pool: &PgPool, slot_id: i64) -> Result<TimeSlotRow, AppError> {
    sqlx::query_as::<_, TimeSlotRow>(
        r#"
        SELECT id, venue_id, date, start_time, end_time, is_booked
        FROM venues_timeslot
        WHERE id = $1
        "#,
    )
    .bind(slot_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Time slot {} not found", slot_id)))
}

/// Get unbooked slots of a venue on or after `from`, in calendar order
pub async fn get_open_time_slots(
    pool: &PgPool,
    venue_id: i64,
    from: NaiveDate,
) -> Result<Vec<TimeSlotRow>, AppError> {
    let slots = sqlx::query_as::<_, TimeSlotRow>(
        r#"
        SELECT id, venue_id, date, start_time, end_time, is_booked
        FROM venues_timeslot
        WHERE venue_id = $1
          AND date >= $2
          AND is_booked = FALSE
        ORDER BY date, start_time
        "#,
    )
    .bind(venue_id)
    .bind(from)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Ids of active venues (used for cache warming)
pub async fn get_active_venue_ids(pool: &PgPool, limit: i64) -> Result<Vec<i64>, AppError> {
    let ids = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id
        FROM venues_venue
        WHERE is_active = TRUE
        ORDER BY updated_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}
