use bson::{doc, oid::ObjectId, Document};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::models::{check_min, check_str};

/// POST /bookings payload. Both references are resolved before the write:
/// `event_id` first, then `attendee_id`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookingCreate {
    pub ticket_type: String,
    pub quantity: i64,
    pub event_id: String,
    pub attendee_id: String,
}

impl BookingCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_str("ticket_type", &self.ticket_type, 1, 50)?;
        check_min("quantity", self.quantity, 1)
    }

    pub fn into_document(self, event_id: ObjectId, attendee_id: ObjectId) -> Document {
        doc! {
            "ticket_type": self.ticket_type,
            "quantity": self.quantity,
            "event_id": event_id,
            "attendee_id": attendee_id,
        }
    }
}

/// PUT /bookings/:id payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookingPatch {
    pub ticket_type: Option<String>,
    pub quantity: Option<i64>,
    pub event_id: Option<String>,
    pub attendee_id: Option<String>,
}

impl BookingPatch {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(ticket_type) = &self.ticket_type {
            check_str("ticket_type", ticket_type, 1, 50)?;
        }
        if let Some(quantity) = self.quantity {
            check_min("quantity", quantity, 1)?;
        }
        Ok(())
    }

    /// Collect the provided non-reference fields into a $set document,
    /// handing the raw reference strings back for resolution.
    pub fn into_updates(self) -> (Document, Option<String>, Option<String>) {
        let mut set = Document::new();
        if let Some(ticket_type) = self.ticket_type {
            set.insert("ticket_type", ticket_type);
        }
        if let Some(quantity) = self.quantity {
            set.insert("quantity", quantity);
        }
        (set, self.event_id, self.attendee_id)
    }
}
