use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::storage::media::MediaSlot;
use crate::AppState;

/// POST /upload_event_poster/:event_id — Attach a poster image
pub async fn upload_event_poster(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    upload(state, MediaSlot::EventPoster, event_id, multipart).await
}

/// POST /upload_event_promo_video/:event_id — Attach a promo video
pub async fn upload_event_promo_video(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    upload(state, MediaSlot::EventPromoVideo, event_id, multipart).await
}

/// POST /upload_venue_photo/:venue_id — Attach a venue photo
pub async fn upload_venue_photo(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    upload(state, MediaSlot::VenuePhoto, venue_id, multipart).await
}

/// GET /event_poster/:event_id — Stream the current poster
pub async fn download_event_poster(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Response, ApiError> {
    download(state, MediaSlot::EventPoster, event_id).await
}

/// GET /event_promo_video/:event_id — Stream the current promo video
pub async fn download_event_promo_video(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Response, ApiError> {
    download(state, MediaSlot::EventPromoVideo, event_id).await
}

/// GET /venue_photo/:venue_id — Stream the current venue photo
pub async fn download_venue_photo(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> Result<Response, ApiError> {
    download(state, MediaSlot::VenuePhoto, venue_id).await
}

async fn upload(
    state: AppState,
    slot: MediaSlot,
    raw_owner_id: String,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .unwrap_or("upload.bin")
            .to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to read file field: {}", e)))?;

        let record = state
            .media
            .upload(slot, &raw_owner_id, &content_type, &filename, &data)
            .await?;
        return Ok(Json(record));
    }

    Err(ApiError::Validation("Missing 'file' field".to_string()))
}

async fn download(
    state: AppState,
    slot: MediaSlot,
    raw_owner_id: String,
) -> Result<Response, ApiError> {
    let media = state.media.download(slot, &raw_owner_id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, media.content_type)
        .header(header::CONTENT_LENGTH, media.length.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", media.filename),
        )
        .body(Body::from_stream(media.stream))
        .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))
}
