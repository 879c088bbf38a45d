use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;

use crate::config::DatabaseConfig;
use crate::registrations::domain::{
    NewRegistration, Registration, RegistrationForm, RegistrationId,
};
use crate::registrations::repository::{RegistrationRepository, RepositoryError};
use crate::registrations::service::RegistrationService;
use crate::registrations::sqlite::SqliteRegistrationRepository;

pub(super) fn ada() -> RegistrationForm {
    RegistrationForm {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "555-0100".to_string(),
        graduation_year: "2026".to_string(),
        school: "Analytical Academy".to_string(),
    }
}

pub(super) fn grace() -> RegistrationForm {
    RegistrationForm {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: "grace@example.com".to_string(),
        phone: "555-0199".to_string(),
        graduation_year: "2027".to_string(),
        school: "Compiler Prep".to_string(),
    }
}

/// In-process store mirroring the schema rules: unique email, non-empty fields.
#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<Vec<Registration>>,
}

impl MemoryRepository {
    pub(super) fn records(&self) -> Vec<Registration> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

#[async_trait]
impl RegistrationRepository for MemoryRepository {
    async fn insert(&self, registration: NewRegistration) -> Result<Registration, RepositoryError> {
        let form = &registration.form;
        let fields = [
            &form.first_name,
            &form.last_name,
            &form.email,
            &form.phone,
            &form.graduation_year,
            &form.school,
        ];
        if fields.iter().any(|value| value.is_empty()) {
            return Err(RepositoryError::ConstraintViolation(
                "empty required field".to_string(),
            ));
        }

        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|record| record.email == form.email) {
            return Err(RepositoryError::DuplicateEmail);
        }
        let id = RegistrationId(guard.len() as i64 + 1);
        let committed = registration.commit(id);
        guard.push(committed.clone());
        Ok(committed)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Registration>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| record.email == email).cloned())
    }
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl RegistrationRepository for UnavailableRepository {
    async fn insert(&self, _registration: NewRegistration) -> Result<Registration, RepositoryError> {
        Err(RepositoryError::Unavailable("database is locked".to_string()))
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<Registration>, RepositoryError> {
        Err(RepositoryError::Unavailable("database is locked".to_string()))
    }
}

pub(super) fn build_service() -> (RegistrationService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    (RegistrationService::new(repository.clone()), repository)
}

pub(super) async fn memory_store() -> SqliteRegistrationRepository {
    let config = DatabaseConfig::new("sqlite::memory:", 1).expect("sqlite url");
    let store = SqliteRegistrationRepository::connect(&config)
        .await
        .expect("in-memory database opens");
    store.ensure_schema().await.expect("schema created");
    store
}

/// Encode a form the way a browser would for `application/x-www-form-urlencoded`.
pub(super) fn encode_form(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            ' ' => "+".to_string(),
            ch if ch.is_ascii_alphanumeric() || "-_.*".contains(ch) => ch.to_string(),
            ch => {
                let mut buf = [0u8; 4];
                ch.encode_utf8(&mut buf)
                    .bytes()
                    .map(|byte| format!("%{byte:02X}"))
                    .collect()
            }
        })
        .collect()
}

pub(super) fn form_pairs(form: &RegistrationForm) -> Vec<(&'static str, &str)> {
    vec![
        ("first_name", form.first_name.as_str()),
        ("last_name", form.last_name.as_str()),
        ("email", form.email.as_str()),
        ("phone", form.phone.as_str()),
        ("graduation_year", form.graduation_year.as_str()),
        ("school", form.school.as_str()),
    ]
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
