use super::common::*;
use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::registrations::domain::RegistrationForm;
use crate::registrations::repository::{RegistrationRepository, RepositoryError};
use crate::registrations::store::RegistrationStore;
use chrono::{TimeZone, Utc};

#[tokio::test]
async fn insert_round_trips_through_find_by_email() {
    let store = memory_store().await;
    let created_at = Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();

    let stored = store
        .insert(ada().into_candidate(created_at))
        .await
        .expect("insert succeeds");
    let found = store
        .find_by_email("ada@example.com")
        .await
        .expect("lookup succeeds")
        .expect("record present");

    assert_eq!(found, stored);
    assert_eq!(found.created_at, created_at);
}

#[tokio::test]
async fn insert_reports_unique_violation_as_duplicate_email() {
    let store = memory_store().await;
    store
        .insert(ada().into_candidate(Utc::now()))
        .await
        .expect("first insert");

    let clash = RegistrationForm {
        last_name: "Byron".to_string(),
        ..ada()
    };
    match store.insert(clash.into_candidate(Utc::now())).await {
        Err(RepositoryError::DuplicateEmail) => {}
        other => panic!("expected duplicate email, got {other:?}"),
    }
    assert_eq!(store.count().await.expect("count"), 1);
}

#[tokio::test]
async fn insert_rejects_empty_fields() {
    let store = memory_store().await;
    let incomplete = RegistrationForm {
        school: String::new(),
        ..ada()
    };

    match store.insert(incomplete.into_candidate(Utc::now())).await {
        Err(RepositoryError::ConstraintViolation(_)) => {}
        other => panic!("expected constraint violation, got {other:?}"),
    }
    assert_eq!(store.count().await.expect("count"), 0);
}

#[tokio::test]
async fn insert_enforces_declared_column_lengths() {
    let store = memory_store().await;
    let long_year = RegistrationForm {
        graduation_year: "20266".to_string(),
        ..ada()
    };

    match store.insert(long_year.into_candidate(Utc::now())).await {
        Err(RepositoryError::ConstraintViolation(_)) => {}
        other => panic!("expected constraint violation, got {other:?}"),
    }
}

#[tokio::test]
async fn insert_keeps_malformed_values_verbatim() {
    let store = memory_store().await;
    let odd = RegistrationForm {
        email: "not-an-email".to_string(),
        phone: "call me".to_string(),
        graduation_year: "soon".to_string(),
        ..ada()
    };

    let stored = store
        .insert(odd.into_candidate(Utc::now()))
        .await
        .expect("format is not validated");
    assert_eq!(stored.email, "not-an-email");
    assert_eq!(stored.graduation_year, "soon");
}

#[tokio::test]
async fn identifiers_increase_and_are_not_reused() {
    let store = memory_store().await;
    let first = store
        .insert(ada().into_candidate(Utc::now()))
        .await
        .expect("ada");
    let _ = store
        .insert(ada().into_candidate(Utc::now()))
        .await
        .expect_err("duplicate");
    let second = store
        .insert(grace().into_candidate(Utc::now()))
        .await
        .expect("grace");

    assert!(second.id > first.id);
}

#[tokio::test]
async fn ensure_schema_is_idempotent() {
    let store = memory_store().await;
    store.ensure_schema().await.expect("second run is a no-op");
    assert_eq!(store.count().await.expect("count"), 0);
}

#[tokio::test]
async fn registration_store_dispatches_on_url_scheme() {
    let config = DatabaseConfig::new("sqlite::memory:", 1).expect("sqlite url");
    let store = RegistrationStore::connect(&config)
        .await
        .expect("in-memory database opens");
    assert_eq!(store.backend(), DatabaseBackend::Sqlite);
    store.ensure_schema().await.expect("schema created");

    store
        .insert(ada().into_candidate(Utc::now()))
        .await
        .expect("ada");
    match store.insert(ada().into_candidate(Utc::now())).await {
        Err(RepositoryError::DuplicateEmail) => {}
        other => panic!("expected duplicate email, got {other:?}"),
    }
    assert_eq!(store.count().await.expect("count"), 1);
}
