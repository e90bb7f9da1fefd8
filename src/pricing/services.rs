//! Pricing service functions with database access.
//!
//! These functions fetch a venue's pricing inputs and hand them to the pure
//! calculators. Display quotes go through the cache; booking quotes always
//! read fresh rules. Nothing here writes to the database.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;

use crate::cache::AppCache;
use crate::error::AppError;

use super::calculators::{compute_price, explain, PricingExplanation};
use super::error::PricingError;
use super::models::{PricingRule, PricingRuleRow, TimeSlot, TimeSlotRow, Venue, VenueRow};
use super::queries;

/// A stored slot together with its current price breakdown
#[derive(Debug, Clone)]
pub struct SlotQuote {
    pub slot: TimeSlotRow,
    pub explanation: PricingExplanation,
}

/// Amount a booking for a slot must store as its total price
#[derive(Debug, Clone)]
pub struct BookingQuote {
    pub slot_id: i64,
    pub venue_id: i64,
    pub total_price: Decimal,
}

/// Build a venue from its stored row and rule rows.
///
/// A stored rule that fails validation fails the whole venue: pricing with a
/// silently dropped rule could undercharge.
pub fn venue_from_rows(row: VenueRow, rule_rows: Vec<PricingRuleRow>) -> Result<Venue, PricingError> {
    let rules = rule_rows
        .into_iter()
        .map(PricingRule::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(row.into_venue(rules))
}

/// Read a venue's base price and active rules straight from the database
pub async fn fetch_venue(pool: &PgPool, venue_id: i64) -> Result<Venue, AppError> {
    let row = queries::get_venue(pool, venue_id).await?;
    let rule_rows = queries::get_active_pricing_rules(pool, venue_id).await?;
    Ok(venue_from_rows(row, rule_rows)?)
}

/// Load a venue's base price and active rules, cache first
pub async fn load_venue(
    pool: &PgPool,
    cache: &AppCache,
    venue_id: i64,
) -> Result<Arc<Venue>, AppError> {
    if let Some(cached) = cache.venues.get(&venue_id).await {
        debug!("Cache HIT for venue pricing: {}", venue_id);
        return Ok(cached);
    }
    debug!("Cache MISS for venue pricing: {}", venue_id);

    let generation = cache.generation();
    let venue = Arc::new(fetch_venue(pool, venue_id).await?);
    cache
        .insert_if_current(venue_id, venue.clone(), generation)
        .await;

    Ok(venue)
}

/// Explain the price of an ad-hoc slot at a stored venue
pub async fn quote_venue_slot(
    pool: &PgPool,
    cache: &AppCache,
    slot: TimeSlot,
) -> Result<PricingExplanation, AppError> {
    let venue = load_venue(pool, cache, slot.venue_id).await?;
    Ok(explain(&venue, &slot))
}

/// Explain the current price of a stored slot
pub async fn quote_time_slot(
    pool: &PgPool,
    cache: &AppCache,
    slot_id: i64,
) -> Result<SlotQuote, AppError> {
    let slot = queries::get_time_slot(pool, slot_id).await?;
    let venue = load_venue(pool, cache, slot.venue_id).await?;
    let explanation = explain(&venue, &slot.slot());

    Ok(SlotQuote { slot, explanation })
}

/// Price a stored slot for booking.
///
/// Reads the venue's rules from the database, bypassing the cache, so the
/// stored total reflects rules as they are now. The caller persists
/// `total_price` on the booking record. Reserving the slot itself
/// (atomically flipping `is_booked`) is the booking flow's job; this only
/// refuses slots that are already booked at the time of the call.
pub async fn quote_for_booking(pool: &PgPool, slot_id: i64) -> Result<BookingQuote, AppError> {
    let slot = queries::get_time_slot(pool, slot_id).await?;
    if slot.is_booked {
        return Err(booked_conflict(&slot));
    }

    let venue = fetch_venue(pool, slot.venue_id).await?;
    booking_quote_for(&slot, &venue)
}

fn booked_conflict(slot: &TimeSlotRow) -> AppError {
    AppError::Conflict(format!("Time slot {} is already booked", slot.id))
}

/// Booking total for a slot at an already loaded venue
pub fn booking_quote_for(slot: &TimeSlotRow, venue: &Venue) -> Result<BookingQuote, AppError> {
    if slot.is_booked {
        return Err(booked_conflict(slot));
    }

    let total_price = compute_price(venue, &slot.slot());
    debug!(
        "Booking quote for slot {} at venue {}: {}",
        slot.id, slot.venue_id, total_price
    );

    Ok(BookingQuote {
        slot_id: slot.id,
        venue_id: slot.venue_id,
        total_price,
    })
}

/// Price every open slot of a venue from `from` onward
pub async fn price_open_slots(
    pool: &PgPool,
    cache: &AppCache,
    venue_id: i64,
    from: NaiveDate,
) -> Result<Vec<SlotQuote>, AppError> {
    let venue = load_venue(pool, cache, venue_id).await?;
    let slots = queries::get_open_time_slots(pool, venue_id, from).await?;

    Ok(slots
        .into_iter()
        .map(|slot| {
            let explanation = explain(&venue, &slot.slot());
            SlotQuote { slot, explanation }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use chrono::NaiveTime;
    use rust_decimal_macros::dec;
    use sqlx::postgres::PgPoolOptions;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn venue_row() -> VenueRow {
        VenueRow {
            id: 1,
            name: "Court 1".to_string(),
            price_per_hour: dec!(500.00),
            is_active: true,
        }
    }

    fn rule_row(id: i64, pricing_type: &str, days_of_week: &str) -> PricingRuleRow {
        PricingRuleRow {
            id,
            venue_id: 1,
            pricing_type: pricing_type.to_string(),
            start_time: time(18, 0),
            end_time: time(22, 0),
            multiplier: dec!(1.5),
            days_of_week: days_of_week.to_string(),
            is_active: true,
        }
    }

    fn slot_row(is_booked: bool) -> TimeSlotRow {
        TimeSlotRow {
            id: 42,
            venue_id: 1,
            // Monday
            date: NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(),
            start_time: time(18, 0),
            end_time: time(19, 0),
            is_booked,
        }
    }

    /// Pool that errors on first use; proves a code path never queries
    fn unreachable_pool() -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap()
    }

    #[test]
    fn test_venue_from_rows() {
        let venue = venue_from_rows(venue_row(), vec![rule_row(1, "peak", "1,2,3,4,5")]).unwrap();
        assert_eq!(venue.base_price_per_hour, dec!(500.00));
        assert_eq!(venue.pricing_rules.len(), 1);
        assert_eq!(venue.pricing_rules[0].days_of_week.indices(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_bad_stored_days_fail_the_venue() {
        let result = venue_from_rows(
            venue_row(),
            vec![rule_row(1, "peak", "1,2"), rule_row(2, "weekend", "0,7")],
        );
        assert!(matches!(result, Err(PricingError::InvalidDaysOfWeek { .. })));
    }

    #[test]
    fn test_unknown_stored_kind_fails_the_venue() {
        let result = venue_from_rows(venue_row(), vec![rule_row(1, "surge", "")]);
        assert_eq!(result, Err(PricingError::UnknownPricingKind("surge".to_string())));

        // Surfaces as 422 through the API error type
        let response = AppError::from(result.unwrap_err()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_booking_quote_for_open_slot() {
        let venue = venue_from_rows(venue_row(), vec![rule_row(1, "peak", "")]).unwrap();
        let quote = booking_quote_for(&slot_row(false), &venue).unwrap();

        assert_eq!(quote.slot_id, 42);
        assert_eq!(quote.venue_id, 1);
        assert_eq!(quote.total_price, dec!(750.00));
    }

    #[test]
    fn test_booking_quote_for_booked_slot_conflicts() {
        let venue = venue_from_rows(venue_row(), vec![]).unwrap();
        let err = booking_quote_for(&slot_row(true), &venue).unwrap_err();

        assert!(matches!(&err, AppError::Conflict(msg) if msg.contains("42")));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_load_venue_serves_cached_entry() {
        let cache = AppCache::default();
        let cached = Arc::new(venue_from_rows(venue_row(), vec![rule_row(1, "peak", "")]).unwrap());
        cache.venues.insert(1, cached.clone()).await;

        let loaded = load_venue(&unreachable_pool(), &cache, 1).await.unwrap();
        assert!(Arc::ptr_eq(&loaded, &cached));

        let slot = TimeSlot {
            venue_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(),
            start_time: time(19, 0),
            end_time: time(20, 0),
        };
        let explanation = quote_venue_slot(&unreachable_pool(), &cache, slot).await.unwrap();
        assert_eq!(explanation.final_price, dec!(750.00));
        assert_eq!(explanation.rules_applied.len(), 1);
    }

    #[tokio::test]
    async fn test_load_venue_miss_reaches_database() {
        let cache = AppCache::default();
        let result = load_venue(&unreachable_pool(), &cache, 1).await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(cache.venues.get(&1).await.is_none());
    }
}
