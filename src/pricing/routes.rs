//! Pricing route handlers

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;

use crate::error::Result;
use crate::AppState;

use super::calculators::explain;
use super::requests::{OpenSlotsQuery, QuoteRequest, VenuePriceQuery};
use super::responses::{
    BookingQuoteResponse, MoneyResponse, PricingExplanationResponse, SlotPriceResponse,
};
use super::services;

/// Pricing endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/quote", post(quote))
        .route("/api/venues/:venue_id/price", get(venue_price))
        .route("/api/venues/:venue_id/slots", get(open_slots))
        .route("/api/slots/:slot_id/price", get(slot_price))
        .route("/api/slots/:slot_id/booking-quote", get(booking_quote))
}

/// Quote a slot against rules supplied in the request body
async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<PricingExplanationResponse>> {
    let quote = request.into_quote()?;
    let currency = quote
        .currency
        .as_deref()
        .unwrap_or(&state.config.default_currency);

    let explanation = explain(&quote.venue, &quote.slot);
    Ok(Json(PricingExplanationResponse::new(&explanation, currency)))
}

/// Price an ad-hoc slot at a stored venue
async fn venue_price(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
    Query(query): Query<VenuePriceQuery>,
) -> Result<Json<PricingExplanationResponse>> {
    let slot = query.into_slot(venue_id)?;
    let explanation = services::quote_venue_slot(&state.db, &state.cache, slot).await?;

    Ok(Json(PricingExplanationResponse::new(
        &explanation,
        &state.config.default_currency,
    )))
}

/// Open slots of a venue with their prices
async fn open_slots(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
    Query(query): Query<OpenSlotsQuery>,
) -> Result<Json<Vec<SlotPriceResponse>>> {
    let from = query.from.unwrap_or_else(|| Local::now().date_naive());
    let quotes = services::price_open_slots(&state.db, &state.cache, venue_id, from).await?;

    let currency = &state.config.default_currency;
    Ok(Json(
        quotes
            .iter()
            .map(|q| SlotPriceResponse::new(&q.slot, &q.explanation, currency))
            .collect(),
    ))
}

/// Current price of a stored slot
async fn slot_price(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
) -> Result<Json<SlotPriceResponse>> {
    let quote = services::quote_time_slot(&state.db, &state.cache, slot_id).await?;

    Ok(Json(SlotPriceResponse::new(
        &quote.slot,
        &quote.explanation,
        &state.config.default_currency,
    )))
}

/// Amount to charge when booking a slot
async fn booking_quote(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
) -> Result<Json<BookingQuoteResponse>> {
    let quote = services::quote_for_booking(&state.db, slot_id).await?;

    Ok(Json(BookingQuoteResponse {
        slot_id: quote.slot_id,
        venue_id: quote.venue_id,
        total_price: MoneyResponse::new(quote.total_price, &state.config.default_currency),
    }))
}
