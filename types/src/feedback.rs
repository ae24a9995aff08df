//! Messages sent through the public contact form.

use serde::{Deserialize, Serialize};

use crate::{FeedbackId, Timestamp, TypeError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub name: String,
    pub email: String,
    /// Free-form category chosen on the form ("question", "error", ...).
    pub message_type: String,
    pub message: String,
    pub created_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub name: String,
    pub email: String,
    pub message_type: String,
    pub message: String,
}

impl NewFeedback {
    /// Every field must be non-blank and the address must look like one.
    pub fn validate(&self) -> Result<(), TypeError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message_type", &self.message_type),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(TypeError::EmptyField(field));
            }
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(TypeError::InvalidEmail(email.to_string())),
        }
    }

    pub fn into_feedback(self, id: FeedbackId, created_at: Timestamp) -> Feedback {
        Feedback {
            id,
            name: self.name,
            email: self.email,
            message_type: self.message_type,
            message: self.message,
            created_at,
        }
    }
}
