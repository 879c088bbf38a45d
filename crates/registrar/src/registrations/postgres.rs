use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, warn};

use super::domain::{NewRegistration, Registration, RegistrationId};
use super::repository::{RegistrationRepository, RepositoryError};
use super::store::{classify, RegistrationRow};
use crate::config::DatabaseConfig;

/// Postgres enforces `VARCHAR(n)` itself; the CHECKs only reject empty text.
const CREATE_REGISTRATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS registrations (
    id              BIGSERIAL    PRIMARY KEY,
    first_name      VARCHAR(100) NOT NULL CHECK (length(first_name) > 0),
    last_name       VARCHAR(100) NOT NULL CHECK (length(last_name) > 0),
    email           VARCHAR(120) NOT NULL UNIQUE CHECK (length(email) > 0),
    phone           VARCHAR(20)  NOT NULL CHECK (length(phone) > 0),
    graduation_year VARCHAR(4)   NOT NULL CHECK (length(graduation_year) > 0),
    school          VARCHAR(200) NOT NULL CHECK (length(school) > 0),
    created_at      TIMESTAMPTZ  NOT NULL DEFAULT now()
)
"#;

const INSERT_REGISTRATION: &str = r#"
INSERT INTO registrations
    (first_name, last_name, email, phone, graduation_year, school, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)
RETURNING id
"#;

const SELECT_BY_EMAIL: &str = r#"
SELECT id, first_name, last_name, email, phone, graduation_year, school, created_at
FROM registrations
WHERE email = $1
"#;

/// Registration store backed by a pooled Postgres database.
#[derive(Debug, Clone)]
pub struct PgRegistrationRepository {
    pool: PgPool,
}

impl PgRegistrationRepository {
    /// Accepts both `postgres://` and `postgresql://` connection strings.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(config.url())
            .await
            .map_err(classify)?;

        Ok(Self { pool })
    }

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
impl RegistrationRepository for PgRegistrationRepository {
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
