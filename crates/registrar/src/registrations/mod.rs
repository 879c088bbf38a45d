//! Registration intake: form rendering, submission handling, and the backing store.

pub mod domain;
pub mod postgres;
pub mod repository;
pub mod router;
pub mod service;
pub mod sqlite;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{NewRegistration, Registration, RegistrationForm, RegistrationId};
pub use postgres::PgRegistrationRepository;
pub use repository::{RegistrationRepository, RepositoryError};
pub use router::{registration_router, SUCCESS_PATH};
pub use service::{
    RegistrationError, RegistrationService, DUPLICATE_EMAIL_MESSAGE, GENERIC_FAILURE_MESSAGE,
};
pub use sqlite::SqliteRegistrationRepository;
pub use store::RegistrationStore;
