use bson::oid::ObjectId;

use crate::api::error::ApiError;
use crate::ids;
use crate::repo::{EntityKind, Repositories};

/// Resolve a raw foreign-key string against the owning repository.
///
/// Decodes the identifier, then confirms the referenced entity exists at
/// this moment; absence fails the enclosing operation before any write.
/// The check is not atomic with the caller's write — the referenced entity
/// can disappear in between, which the design accepts.
pub async fn resolve(
    repos: &Repositories,
    kind: EntityKind,
    raw: &str,
) -> Result<ObjectId, ApiError> {
    let id = ids::decode(raw)?;
    if repos.of(kind).find(id).await?.is_none() {
        return Err(ApiError::InvalidReference(kind));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use bson::doc;
    use std::sync::Arc;

    fn repos() -> Repositories {
        Repositories::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_resolves_existing_reference() {
        let repos = repos();
        let venue = repos
            .venues
            .create(doc! { "name": "Hall A" })
            .await
            .unwrap();
        let raw = venue.get_object_id("_id").unwrap().to_hex();
        let resolved = resolve(&repos, EntityKind::Venue, &raw).await.unwrap();
        assert_eq!(resolved.to_hex(), raw);
    }

    #[tokio::test]
    async fn test_well_formed_but_absent_reference_is_invalid() {
        let repos = repos();
        let err = resolve(&repos, EntityKind::Venue, "000000000000000000000000")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidReference(EntityKind::Venue)));
    }

    #[tokio::test]
    async fn test_malformed_reference_fails_decode() {
        let repos = repos();
        let err = resolve(&repos, EntityKind::Event, "not-an-id")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidIdentifier));
    }
}
