use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::domain::{Registration, RegistrationForm};
use super::repository::{RegistrationRepository, RepositoryError};

pub const DUPLICATE_EMAIL_MESSAGE: &str = "This email is already registered!";
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Service turning form submissions into committed registrations.
pub struct RegistrationService<R> {
    repository: Arc<R>,
}

impl<R> RegistrationService<R>
where
    R: RegistrationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Stamp the submission and persist it. Nothing is written unless the insert commits.
    pub async fn register(
        &self,
        form: RegistrationForm,
    ) -> Result<Registration, RegistrationError> {
        let candidate = form.into_candidate(Utc::now());

        match self.repository.insert(candidate).await {
            Ok(registration) => {
                info!(id = registration.id.0, "registration committed");
                Ok(registration)
            }
            Err(RepositoryError::DuplicateEmail) => {
                warn!("registration rejected: email already registered");
                Err(RegistrationError::DuplicateEmail)
            }
            Err(err) => {
                error!(error = %err, "registration could not be stored");
                Err(RegistrationError::Storage(err))
            }
        }
    }

    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Registration>, RegistrationError> {
        Ok(self.repository.find_by_email(email).await?)
    }
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl RegistrationError {
    /// Text shown inline on the re-rendered form.
    pub fn user_message(&self) -> &'static str {
        match self {
            RegistrationError::DuplicateEmail => DUPLICATE_EMAIL_MESSAGE,
            RegistrationError::Storage(_) => GENERIC_FAILURE_MESSAGE,
        }
    }
}
