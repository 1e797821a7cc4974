use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::api::{crud, media};
use crate::AppState;

/// Simple request logger middleware
async fn log_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    tracing::info!(">>> {} {}", method, uri);
    let res = next.run(req).await;
    tracing::info!("<<< {} {} -> {}", method, uri, res.status());
    res
}

/// GET /health — Liveness probe
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_mb * 1024 * 1024;

    Router::new()
        .route("/health", get(health))
        // Venues
        .route("/venues", post(crud::create_venue).get(crud::list_venues))
        .route("/venues/:id", get(crud::get_venue))
        .route("/venues/:id", put(crud::update_venue))
        .route("/venues/:id", delete(crud::delete_venue))
        // Events
        .route("/events", post(crud::create_event).get(crud::list_events))
        .route("/events/:id", get(crud::get_event))
        .route("/events/:id", put(crud::update_event))
        .route("/events/:id", delete(crud::delete_event))
        // Attendees
        .route(
            "/attendees",
            post(crud::create_attendee).get(crud::list_attendees),
        )
        .route("/attendees/:id", get(crud::get_attendee))
        .route("/attendees/:id", put(crud::update_attendee))
        .route("/attendees/:id", delete(crud::delete_attendee))
        // Bookings
        .route(
            "/bookings",
            post(crud::create_booking).get(crud::list_bookings),
        )
        .route("/bookings/:id", get(crud::get_booking))
        .route("/bookings/:id", put(crud::update_booking))
        .route("/bookings/:id", delete(crud::delete_booking))
        // Media slots
        .route(
            "/upload_event_poster/:event_id",
            post(media::upload_event_poster),
        )
        .route(
            "/upload_event_promo_video/:event_id",
            post(media::upload_event_promo_video),
        )
        .route(
            "/upload_venue_photo/:venue_id",
            post(media::upload_venue_photo),
        )
        .route("/event_poster/:event_id", get(media::download_event_poster))
        .route(
            "/event_promo_video/:event_id",
            get(media::download_event_promo_video),
        )
        .route("/venue_photo/:venue_id", get(media::download_venue_photo))
        // Apply logger middleware
        .layer(middleware::from_fn(log_middleware))
        .layer(CorsLayer::permissive())
        // Raise body limit for media uploads
        .layer(DefaultBodyLimit::max(max_upload as usize))
        .with_state(state)
}
