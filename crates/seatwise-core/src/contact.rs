//! Contact form submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One submission from the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    /// Submission id.
    pub id: Uuid,

    /// Submitter name.
    pub name: String,

    /// Submitter email.
    pub email: String,

    /// Submitter mobile number, if given.
    pub mobile: Option<String>,

    /// Free-form message.
    pub message: String,

    /// Set once an admin has handled the submission.
    pub resolved: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ContactSubmission {
    /// Create an unresolved submission.
    #[must_use]
    pub fn new(name: String, email: String, mobile: Option<String>, message: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            mobile,
            message,
            resolved: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the submission handled.
    pub fn resolve(&mut self) {
        self.resolved = true;
        self.updated_at = Utc::now();
    }
}
