use bson::{doc, oid::ObjectId, Document};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::models::{check_min, check_str};

/// POST /events payload. `venue_id` is resolved against the venue
/// repository before the document is written.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventCreate {
    pub name: String,
    pub description: String,
    pub date: String,
    pub max_attendees: i64,
    pub venue_id: String,
}

impl EventCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_str("name", &self.name, 1, 200)?;
        check_str("description", &self.description, 1, 1000)?;
        check_str("date", &self.date, 4, 40)?;
        check_min("max_attendees", self.max_attendees, 1)
    }

    /// Build the stored document with the resolved venue reference.
    pub fn into_document(self, venue_id: ObjectId) -> Document {
        doc! {
            "name": self.name,
            "description": self.description,
            "date": self.date,
            "max_attendees": self.max_attendees,
            "venue_id": venue_id,
        }
    }
}

/// PUT /events/:id payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub max_attendees: Option<i64>,
    pub venue_id: Option<String>,
}

impl EventPatch {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            check_str("name", name, 1, 200)?;
        }
        if let Some(description) = &self.description {
            check_str("description", description, 1, 1000)?;
        }
        if let Some(date) = &self.date {
            check_str("date", date, 4, 40)?;
        }
        if let Some(max_attendees) = self.max_attendees {
            check_min("max_attendees", max_attendees, 1)?;
        }
        Ok(())
    }

    /// Collect the provided non-reference fields into a $set document.
    /// The caller resolves `venue_id` separately and inserts the ObjectId.
    pub fn into_updates(self) -> (Document, Option<String>) {
        let mut set = Document::new();
        if let Some(name) = self.name {
            set.insert("name", name);
        }
        if let Some(description) = self.description {
            set.insert("description", description);
        }
        if let Some(date) = self.date {
            set.insert("date", date);
        }
        if let Some(max_attendees) = self.max_attendees {
            set.insert("max_attendees", max_attendees);
        }
        (set, self.venue_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_length_bounds() {
        let mut event = EventCreate {
            name: "Expo".into(),
            description: "desc".into(),
            date: "2025-01-01".into(),
            max_attendees: 50,
            venue_id: "507f1f77bcf86cd799439011".into(),
        };
        assert!(event.validate().is_ok());

        event.date = "25".into(); // below 4 chars
        assert!(event.validate().is_err());
    }

    #[test]
    fn test_patch_splits_reference_from_fields() {
        let patch = EventPatch {
            name: Some("Expo 2".into()),
            description: None,
            date: None,
            max_attendees: None,
            venue_id: Some("507f1f77bcf86cd799439011".into()),
        };
        let (set, venue_id) = patch.into_updates();
        assert_eq!(set.len(), 1);
        assert_eq!(venue_id.as_deref(), Some("507f1f77bcf86cd799439011"));
    }
}
