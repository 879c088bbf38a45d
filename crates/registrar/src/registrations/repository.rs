use async_trait::async_trait;

use super::domain::{NewRegistration, Registration};

/// Storage abstraction so the service and router can be exercised without a database.
///
/// Implementations own email uniqueness: a colliding insert must fail with
/// [`RepositoryError::DuplicateEmail`] and leave no record behind.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn insert(&self, registration: NewRegistration) -> Result<Registration, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Registration>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("record rejected by schema: {0}")]
    ConstraintViolation(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
