//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `workshop_test`)
//!   `TEST_DB_PASSWORD` (default: `workshop_test`)
//!   `TEST_DB_NAME` (default: `workshop_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use sea_orm::Set;
use workshop_db::entities::{registration, user, workshop};
use workshop_db::repositories::{RegistrationRepository, UserRepository, WorkshopRepository};
use workshop_db::test_utils::{TestDatabase, TestDbConfig};

fn new_id() -> String {
    ulid::Ulid::new().to_string().to_lowercase()
}

fn test_user_model(email: &str) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(new_id()),
        name: Set("Integration User".to_string()),
        email: Set(email.to_string()),
        phone: Set(None),
        password_hash: Set("$argon2id$test".to_string()),
        role: Set(user::UserRole::User),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now().into()),
        updated_at: Set(None),
    }
}

fn test_workshop_model(seats: i32) -> workshop::ActiveModel {
    workshop::ActiveModel {
        id: Set(new_id()),
        title: Set("Integration Workshop".to_string()),
        description: Set(None),
        organizer: Set("Test Org".to_string()),
        organizer_user_id: Set(None),
        instructor: Set("Test Instructor".to_string()),
        date: Set(chrono::Utc::now().into()),
        time: Set("10:00 AM".to_string()),
        location: Set("Hall A".to_string()),
        city: Set("Pune".to_string()),
        category: Set("Technology".to_string()),
        level: Set("Beginner".to_string()),
        duration: Set("2 hours".to_string()),
        price: Set(0.0),
        max_seats: Set(seats),
        available_seats: Set(seats),
        mode: Set(workshop::WorkshopMode::Manual),
        status: Set(workshop::WorkshopStatus::Active),
        featured: Set(false),
        image_url: Set(None),
        prerequisites: Set(None),
        what_you_learn: Set(None),
        agenda: Set(None),
        created_at: Set(chrono::Utc::now().into()),
        updated_at: Set(None),
    }
}

fn test_registration_model(user_id: &str, workshop_id: &str) -> registration::ActiveModel {
    registration::ActiveModel {
        id: Set(new_id()),
        user_id: Set(user_id.to_string()),
        workshop_id: Set(workshop_id.to_string()),
        registration_type: Set(workshop::WorkshopMode::Manual),
        status: Set(registration::RegistrationStatus::Pending),
        payment_status: Set(registration::PaymentStatus::NotRequired),
        payment_verified: Set(false),
        payment_method: Set(None),
        transaction_id: Set(None),
        upi_id: Set(None),
        payment_screenshot_url: Set(None),
        notes: Set(None),
        admin_notes: Set(None),
        registered_at: Set(chrono::Utc::now().into()),
        confirmed_at: Set(None),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_registration_unique_index() {
    let db = TestDatabase::create_unique().await.unwrap();
    // `sea-orm`'s `mock` feature (enabled for the in-crate unit tests) removes the
    // `Clone` impl on `DatabaseConnection`, so open a second handle to the same
    // test database rather than cloning `db.conn`.
    let conn = Arc::new(
        sea_orm::Database::connect(db.config.database_url())
            .await
            .unwrap(),
    );

    let users = UserRepository::new(conn.clone());
    let workshops = WorkshopRepository::new(conn.clone());
    let registrations = RegistrationRepository::new(conn);

    let user = users.create(test_user_model("dup@example.com")).await.unwrap();
    let workshop = workshops.create(test_workshop_model(5)).await.unwrap();

    registrations
        .create(test_registration_model(&user.id, &workshop.id))
        .await
        .unwrap();

    // Second row for the same pair must hit the unique index.
    let err = registrations
        .create(test_registration_model(&user.id, &workshop.id))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        workshop_common::AppError::DuplicateRegistration
    ));

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_seat_decrement_stops_at_zero() {
    let db = TestDatabase::create_unique().await.unwrap();
    // `sea-orm`'s `mock` feature (enabled for the in-crate unit tests) removes the
    // `Clone` impl on `DatabaseConnection`, so open a second handle to the same
    // test database rather than cloning `db.conn`.
    let conn = Arc::new(
        sea_orm::Database::connect(db.config.database_url())
            .await
            .unwrap(),
    );

    let workshops = WorkshopRepository::new(conn.clone());
    let workshop = workshops.create(test_workshop_model(1)).await.unwrap();

    let first = WorkshopRepository::decrement_available_seats(conn.as_ref(), &workshop.id)
        .await
        .unwrap();
    let second = WorkshopRepository::decrement_available_seats(conn.as_ref(), &workshop.id)
        .await
        .unwrap();

    assert!(first);
    assert!(!second);

    let reloaded = workshops.get_by_id(&workshop.id).await.unwrap();
    assert_eq!(reloaded.available_seats, 0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_concurrent_decrement_takes_one_seat() {
    let db = TestDatabase::create_unique().await.unwrap();
    // `sea-orm`'s `mock` feature (enabled for the in-crate unit tests) removes the
    // `Clone` impl on `DatabaseConnection`, so open a second handle to the same
    // test database rather than cloning `db.conn`.
    let conn = Arc::new(
        sea_orm::Database::connect(db.config.database_url())
            .await
            .unwrap(),
    );

    let workshops = WorkshopRepository::new(conn.clone());
    let workshop = workshops.create(test_workshop_model(1)).await.unwrap();

    let (a, b) = tokio::join!(
        WorkshopRepository::decrement_available_seats(conn.as_ref(), &workshop.id),
        WorkshopRepository::decrement_available_seats(conn.as_ref(), &workshop.id),
    );

    let taken = [a.unwrap(), b.unwrap()];
    assert_eq!(taken.iter().filter(|t| **t).count(), 1);

    let reloaded = workshops.get_by_id(&workshop.id).await.unwrap();
    assert_eq!(reloaded.available_seats, 0);

    db.drop_database().await.unwrap();
}
