use bson::oid::ObjectId;

use crate::api::error::ApiError;

/// Parse an externally-supplied identifier string into a store ObjectId.
/// Validates shape only, not existence.
pub fn decode(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::InvalidIdentifier)
}
