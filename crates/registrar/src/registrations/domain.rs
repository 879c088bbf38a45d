use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Store-assigned identifier for a committed registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(pub i64);

/// Raw field values as posted by the registration form.
///
/// Fields missing from the request decode to empty text; rejecting empty values is left to the
/// store's schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub graduation_year: String,
    pub school: String,
}

impl RegistrationForm {
    /// Stamp the submission with its creation time, producing the candidate record.
    pub fn into_candidate(self, created_at: DateTime<Utc>) -> NewRegistration {
        NewRegistration {
            form: self,
            created_at,
        }
    }
}

/// Candidate record awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub form: RegistrationForm,
    pub created_at: DateTime<Utc>,
}

impl NewRegistration {
    /// Attach the identifier the store assigned on insert.
    pub fn commit(self, id: RegistrationId) -> Registration {
        let RegistrationForm {
            first_name,
            last_name,
            email,
            phone,
            graduation_year,
            school,
        } = self.form;

        Registration {
            id,
            first_name,
            last_name,
            email,
            phone,
            graduation_year,
            school,
            created_at: self.created_at,
        }
    }
}

/// A registration that has been committed to the store. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub id: RegistrationId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub graduation_year: String,
    pub school: String,
    pub created_at: DateTime<Utc>,
}

