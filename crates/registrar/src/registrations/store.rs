use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;

use super::domain::{NewRegistration, Registration, RegistrationId};
use super::postgres::PgRegistrationRepository;
use super::repository::{RegistrationRepository, RepositoryError};
use super::sqlite::SqliteRegistrationRepository;
use crate::config::{DatabaseBackend, DatabaseConfig};

/// SQLSTATE raised when a value overflows a `VARCHAR(n)` column.
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// The relational store selected by the connection string's scheme.
#[derive(Debug, Clone)]
pub enum RegistrationStore {
    Sqlite(SqliteRegistrationRepository),
    Postgres(PgRegistrationRepository),
}

impl RegistrationStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        match config.backend() {
            DatabaseBackend::Sqlite => Ok(Self::Sqlite(
                SqliteRegistrationRepository::connect(config).await?,
            )),
            DatabaseBackend::Postgres => Ok(Self::Postgres(
                PgRegistrationRepository::connect(config).await?,
            )),
        }
    }

    pub fn backend(&self) -> DatabaseBackend {
        match self {
            Self::Sqlite(_) => DatabaseBackend::Sqlite,
            Self::Postgres(_) => DatabaseBackend::Postgres,
        }
    }

    /// Create the `registrations` table with the backend's DDL if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Sqlite(store) => store.ensure_schema().await,
            Self::Postgres(store) => store.ensure_schema().await,
        }
    }

    pub async fn count(&self) -> Result<i64, RepositoryError> {
        match self {
            Self::Sqlite(store) => store.count().await,
            Self::Postgres(store) => store.count().await,
        }
    }

    pub async fn close(&self) {
        match self {
            Self::Sqlite(store) => store.close().await,
            Self::Postgres(store) => store.close().await,
        }
    }
}

#[async_trait]
impl RegistrationRepository for RegistrationStore {
    async fn insert(&self, registration: NewRegistration) -> Result<Registration, RepositoryError> {
        match self {
            Self::Sqlite(store) => store.insert(registration).await,
            Self::Postgres(store) => store.insert(registration).await,
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Registration>, RepositoryError> {
        match self {
            Self::Sqlite(store) => store.find_by_email(email).await,
            Self::Postgres(store) => store.find_by_email(email).await,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RegistrationRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    graduation_year: String,
    school: String,
    created_at: DateTime<Utc>,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Registration {
            id: RegistrationId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            graduation_year: row.graduation_year,
            school: row.school,
            created_at: row.created_at,
        }
    }
}

/// Map driver errors onto repository errors using the database's constraint codes.
pub(crate) fn classify(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) => match db.kind() {
            // `email` is the only unique column; the key is auto-assigned.
            ErrorKind::UniqueViolation => RepositoryError::DuplicateEmail,
            ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                RepositoryError::ConstraintViolation(db.message().to_string())
            }
            _ if db.code().as_deref() == Some(STRING_DATA_RIGHT_TRUNCATION) => {
                RepositoryError::ConstraintViolation(db.message().to_string())
            }
            _ => RepositoryError::Unavailable(err.to_string()),
        },
        _ => RepositoryError::Unavailable(err.to_string()),
    }
}
