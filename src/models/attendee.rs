use bson::{doc, Document};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::models::check_str;

/// POST /attendees payload. Email and phone are checked for length only;
/// format validation is deliberately out of scope.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttendeeCreate {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl AttendeeCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_str("name", &self.name, 1, 200)?;
        check_str("email", &self.email, 3, 254)?;
        check_str("phone", &self.phone, 3, 30)
    }

    pub fn into_document(self) -> Document {
        doc! {
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
        }
    }
}

/// PUT /attendees/:id payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttendeePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl AttendeePatch {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            check_str("name", name, 1, 200)?;
        }
        if let Some(email) = &self.email {
            check_str("email", email, 3, 254)?;
        }
        if let Some(phone) = &self.phone {
            check_str("phone", phone, 3, 30)?;
        }
        Ok(())
    }

    pub fn into_updates(self) -> Document {
        let mut set = Document::new();
        if let Some(name) = self.name {
            set.insert("name", name);
        }
        if let Some(email) = self.email {
            set.insert("email", email);
        }
        if let Some(phone) = self.phone {
            set.insert("phone", phone);
        }
        set
    }
}
