use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, warn};

use super::domain::{NewRegistration, Registration, RegistrationId};
use super::repository::{RegistrationRepository, RepositoryError};
use super::store::{classify, RegistrationRow};
use crate::config::DatabaseConfig;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Table creation is the only migration this service performs.
///
/// SQLite ignores `VARCHAR(n)`, so the declared lengths are enforced with CHECK constraints.
/// `AUTOINCREMENT` keeps identifiers from being reused after a row disappears.
const CREATE_REGISTRATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS registrations (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name      VARCHAR(100) NOT NULL CHECK (length(first_name) BETWEEN 1 AND 100),
    last_name       VARCHAR(100) NOT NULL CHECK (length(last_name) BETWEEN 1 AND 100),
    email           VARCHAR(120) NOT NULL UNIQUE CHECK (length(email) BETWEEN 1 AND 120),
    phone           VARCHAR(20)  NOT NULL CHECK (length(phone) BETWEEN 1 AND 20),
    graduation_year VARCHAR(4)   NOT NULL CHECK (length(graduation_year) BETWEEN 1 AND 4),
    school          VARCHAR(200) NOT NULL CHECK (length(school) BETWEEN 1 AND 200),
    created_at      TIMESTAMP    NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const INSERT_REGISTRATION: &str = r#"
INSERT INTO registrations
    (first_name, last_name, email, phone, graduation_year, school, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
RETURNING id
"#;

const SELECT_BY_EMAIL: &str = r#"
SELECT id, first_name, last_name, email, phone, graduation_year, school, created_at
FROM registrations
WHERE email = ?1
"#;

/// Registration store backed by a pooled SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationRepository {
    /// Open (creating if needed) the database named by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(config.url())
            .map_err(classify)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = if config.is_in_memory() {
            // The database vanishes with its last connection, so pin exactly one.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options.journal_mode(SqliteJournalMode::Wal))
                .await
        }
        .map_err(classify)?;

        Ok(Self { pool })
    }

    /// Create the `registrations` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_REGISTRATIONS)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        debug!("registrations table ready");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM registrations")
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepository {
    async fn insert(&self, registration: NewRegistration) -> Result<Registration, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(classify)?;

        let form = &registration.form;
        let inserted = sqlx::query_scalar::<_, i64>(INSERT_REGISTRATION)
            .bind(&form.first_name)
            .bind(&form.last_name)
            .bind(&form.email)
            .bind(&form.phone)
            .bind(&form.graduation_year)
            .bind(&form.school)
            .bind(registration.created_at)
            .fetch_one(&mut *tx)
            .await;

        let id = match inserted {
            Ok(id) => id,
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "registration rollback failed");
                }
                return Err(classify(err));
            }
        };

        tx.commit().await.map_err(classify)?;
        Ok(registration.commit(RegistrationId(id)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Registration>, RepositoryError> {
        let row = sqlx::query_as::<_, RegistrationRow>(SELECT_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Registration::from))
    }
}
