use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::ids;
use crate::models::attendee::{AttendeeCreate, AttendeePatch};
use crate::models::booking::{BookingCreate, BookingPatch};
use crate::models::event::{EventCreate, EventPatch};
use crate::models::venue::{VenueCreate, VenuePatch};
use crate::refs;
use crate::repo::{EntityKind, Repository};
use crate::serialize::document_to_json;
use crate::AppState;

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: u64,
}

async fn list_entities(repo: &Repository, query: ListQuery) -> Result<Json<Value>, ApiError> {
    let docs = repo.list(query.limit, query.skip).await?;
    Ok(Json(Value::Array(
        docs.into_iter().map(document_to_json).collect(),
    )))
}

async fn get_entity(repo: &Repository, raw_id: &str) -> Result<Json<Value>, ApiError> {
    let id = ids::decode(raw_id)?;
    Ok(Json(document_to_json(repo.get(id).await?)))
}

async fn delete_entity(repo: &Repository, raw_id: &str) -> Result<Json<Value>, ApiError> {
    let id = ids::decode(raw_id)?;
    repo.delete(id).await?;
    Ok(Json(json!({ "deleted": true, "id": raw_id })))
}

// ---------------------------------------------------------------------------
// Venues
// ---------------------------------------------------------------------------

/// POST /venues — Create venue
pub async fn create_venue(
    State(state): State<AppState>,
    Json(payload): Json<VenueCreate>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;
    let created = state.repos.venues.create(payload.into_document()).await?;
    Ok(Json(document_to_json(created)))
}

/// GET /venues — List venues
pub async fn list_venues(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    list_entities(&state.repos.venues, query).await
}

/// GET /venues/:id — Fetch one venue
pub async fn get_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    get_entity(&state.repos.venues, &id).await
}

/// PUT /venues/:id — Partial update
pub async fn update_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<VenuePatch>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;
    let id = ids::decode(&id)?;
    let updated = state.repos.venues.update(id, payload.into_updates()).await?;
    Ok(Json(document_to_json(updated)))
}

/// DELETE /venues/:id — Delete venue
pub async fn delete_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    delete_entity(&state.repos.venues, &id).await
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// POST /events — Create event; `venue_id` must resolve first
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<EventCreate>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;
    let venue_id = refs::resolve(&state.repos, EntityKind::Venue, &payload.venue_id).await?;
    let created = state
        .repos
        .events
        .create(payload.into_document(venue_id))
        .await?;
    Ok(Json(document_to_json(created)))
}

/// GET /events — List events
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    list_entities(&state.repos.events, query).await
}

/// GET /events/:id — Fetch one event
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    get_entity(&state.repos.events, &id).await
}

/// PUT /events/:id — Partial update; a provided `venue_id` is re-validated
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<EventPatch>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;
    let id = ids::decode(&id)?;
    let (mut set, venue_ref) = payload.into_updates();
    if set.is_empty() && venue_ref.is_none() {
        return Err(ApiError::EmptyUpdate);
    }
    if let Some(raw) = venue_ref {
        let venue_id = refs::resolve(&state.repos, EntityKind::Venue, &raw).await?;
        set.insert("venue_id", venue_id);
    }
    let updated = state.repos.events.update(id, set).await?;
    Ok(Json(document_to_json(updated)))
}

/// DELETE /events/:id — Delete event
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    delete_entity(&state.repos.events, &id).await
}

// ---------------------------------------------------------------------------
// Attendees
// ---------------------------------------------------------------------------

/// POST /attendees — Create attendee
pub async fn create_attendee(
    State(state): State<AppState>,
    Json(payload): Json<AttendeeCreate>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;
    let created = state
        .repos
        .attendees
        .create(payload.into_document())
        .await?;
    Ok(Json(document_to_json(created)))
}

/// GET /attendees — List attendees
pub async fn list_attendees(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    list_entities(&state.repos.attendees, query).await
}

/// GET /attendees/:id — Fetch one attendee
pub async fn get_attendee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    get_entity(&state.repos.attendees, &id).await
}

/// PUT /attendees/:id — Partial update
pub async fn update_attendee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AttendeePatch>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;
    let id = ids::decode(&id)?;
    let updated = state
        .repos
        .attendees
        .update(id, payload.into_updates())
        .await?;
    Ok(Json(document_to_json(updated)))
}

/// DELETE /attendees/:id — Delete attendee
pub async fn delete_attendee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    delete_entity(&state.repos.attendees, &id).await
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

/// POST /bookings — Create booking; validates `event_id` then `attendee_id`,
/// first failure short-circuits
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<BookingCreate>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;
    let event_id = refs::resolve(&state.repos, EntityKind::Event, &payload.event_id).await?;
    let attendee_id =
        refs::resolve(&state.repos, EntityKind::Attendee, &payload.attendee_id).await?;
    let created = state
        .repos
        .bookings
        .create(payload.into_document(event_id, attendee_id))
        .await?;
    Ok(Json(document_to_json(created)))
}

/// GET /bookings — List bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    list_entities(&state.repos.bookings, query).await
}

/// GET /bookings/:id — Fetch one booking
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    get_entity(&state.repos.bookings, &id).await
}

/// PUT /bookings/:id — Partial update; provided references are re-validated
/// in event-then-attendee order
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<BookingPatch>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;
    let id = ids::decode(&id)?;
    let (mut set, event_ref, attendee_ref) = payload.into_updates();
    if set.is_empty() && event_ref.is_none() && attendee_ref.is_none() {
        return Err(ApiError::EmptyUpdate);
    }
    if let Some(raw) = event_ref {
        let event_id = refs::resolve(&state.repos, EntityKind::Event, &raw).await?;
        set.insert("event_id", event_id);
    }
    if let Some(raw) = attendee_ref {
        let attendee_id = refs::resolve(&state.repos, EntityKind::Attendee, &raw).await?;
        set.insert("attendee_id", attendee_id);
    }
    let updated = state.repos.bookings.update(id, set).await?;
    Ok(Json(document_to_json(updated)))
}

/// DELETE /bookings/:id — Delete booking
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    delete_entity(&state.repos.bookings, &id).await
}
