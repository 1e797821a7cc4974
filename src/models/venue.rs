use bson::{doc, Document};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::models::{check_min, check_str};

/// POST /venues payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VenueCreate {
    pub name: String,
    pub address: String,
    pub capacity: i64,
}

impl VenueCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_str("name", &self.name, 1, 200)?;
        check_str("address", &self.address, 1, 300)?;
        check_min("capacity", self.capacity, 1)
    }

    pub fn into_document(self) -> Document {
        doc! {
            "name": self.name,
            "address": self.address,
            "capacity": self.capacity,
        }
    }
}

/// PUT /venues/:id payload. Absent fields are left untouched.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VenuePatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub capacity: Option<i64>,
}

impl VenuePatch {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            check_str("name", name, 1, 200)?;
        }
        if let Some(address) = &self.address {
            check_str("address", address, 1, 300)?;
        }
        if let Some(capacity) = self.capacity {
            check_min("capacity", capacity, 1)?;
        }
        Ok(())
    }

    /// Collect the provided fields into a $set document.
    pub fn into_updates(self) -> Document {
        let mut set = Document::new();
        if let Some(name) = self.name {
            set.insert("name", name);
        }
        if let Some(address) = self.address {
            set.insert("address", address);
        }
        if let Some(capacity) = self.capacity {
            set.insert("capacity", capacity);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch_yields_empty_updates() {
        let patch = VenuePatch {
            name: None,
            address: None,
            capacity: None,
        };
        assert!(patch.into_updates().is_empty());
    }

    #[test]
    fn test_partial_patch_keeps_only_given_fields() {
        let patch = VenuePatch {
            name: Some("Hall B".into()),
            address: None,
            capacity: None,
        };
        let set = patch.into_updates();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get_str("name").unwrap(), "Hall B");
    }

    #[test]
    fn test_create_validation() {
        let ok = VenueCreate {
            name: "Hall A".into(),
            address: "1 Main St".into(),
            capacity: 100,
        };
        assert!(ok.validate().is_ok());

        let bad = VenueCreate {
            name: "".into(),
            address: "1 Main St".into(),
            capacity: 100,
        };
        assert!(bad.validate().is_err());

        let bad = VenueCreate {
            name: "Hall A".into(),
            address: "1 Main St".into(),
            capacity: 0,
        };
        assert!(bad.validate().is_err());
    }
}
