use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use schooldesk_application::{PaymentRepository, RosterRepository, SchoolRepository};
use schooldesk_core::{AppError, TenantId};
use schooldesk_domain::{
    LoginCode, LoginCodeKind, Payment, PaymentDecision, PaymentId, PaymentMethod, School,
    SchoolStatus, SeatCheck, Shift, Student, StudentId, StudentProfile, Subscription,
};
use serde_json::json;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::{DocumentRow, PostgresDocumentStore, decode, readable_rows};
use crate::documents::{PAYMENTS, PaymentDocument};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres document store tests: {error}");
    }

    Some(pool)
}

fn school(max_students: u32) -> School {
    let subscription = Subscription::new(max_students, 5, Utc::now() + Duration::days(90))
        .unwrap_or_else(|_| panic!("valid subscription"));
    School::new(
        TenantId::new(),
        "Riverside High School",
        None,
        LoginCode::from_random_bytes(LoginCodeKind::School, [9; 6]),
        SchoolStatus::Active,
        subscription,
        Utc::now(),
    )
    .unwrap_or_else(|_| panic!("valid school"))
}

fn student(school_id: TenantId, id: &str) -> Student {
    Student::new(
        StudentId::new(id).unwrap_or_else(|_| panic!("valid id")),
        school_id,
        StudentProfile {
            name: "Tanvir Hasan".to_owned(),
            class: "Class 8".to_owned(),
            roll: 12,
            shift: Shift::Morning,
            session: 2025,
        },
        LoginCode::from_random_bytes(LoginCodeKind::Student, [7; 6]),
        Utc::now(),
    )
    .unwrap_or_else(|_| panic!("valid student"))
}

#[tokio::test]
async fn schools_round_trip_through_documents() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = PostgresDocumentStore::new(pool);
    let school = school(10);

    assert!(store.create_school(school.clone()).await.is_ok());
    assert!(matches!(
        store.create_school(school.clone()).await,
        Err(AppError::Conflict(_))
    ));

    let stored = store.find_school(school.id()).await.unwrap_or_default();
    assert_eq!(
        stored.as_ref().map(|stored| stored.code().as_str()),
        Some(school.code().as_str())
    );
    assert_eq!(
        stored.map(|stored| stored.subscription().max_students()),
        Some(10)
    );
}

#[tokio::test]
async fn concurrent_student_inserts_respect_the_limit() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = Arc::new(PostgresDocumentStore::new(pool));
    let school = school(3);
    assert!(store.create_school(school.clone()).await.is_ok());

    let mut handles = Vec::new();
    for index in 0..8 {
        let store = store.clone();
        let school_id = school.id();
        handles.push(tokio::spawn(async move {
            store
                .insert_student_within_limit(student(school_id, &format!("pg-s-{index}")), 3)
                .await
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        if let Ok(Ok(SeatCheck::Available)) = handle.await {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 3);
    assert_eq!(
        store.count_students(school.id()).await.unwrap_or_default(),
        3
    );
}

#[tokio::test]
async fn payment_decisions_persist() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = PostgresDocumentStore::new(pool);
    let school_id = TenantId::new();
    let student_id = StudentId::new("pg-payer").unwrap_or_else(|_| panic!("valid id"));

    let payment = Payment::submit(
        PaymentId::generate(),
        student_id.clone(),
        "Tanvir Hasan",
        school_id,
        Decimal::new(250_050, 2),
        PaymentMethod::Stripe,
        "ch_3PQ9X2",
        Utc::now(),
    )
    .unwrap_or_else(|_| panic!("valid payment"));
    assert!(store.create_payment(payment.clone()).await.is_ok());

    let decided = store
        .decide_pending_payment(school_id, payment.id(), PaymentDecision::Approve, Utc::now())
        .await;
    assert!(decided.is_ok());
    assert!(matches!(
        store
            .decide_pending_payment(school_id, payment.id(), PaymentDecision::Reject, Utc::now())
            .await,
        Err(AppError::Conflict(_))
    ));

    let listed = store
        .list_payments_for_student(school_id, &student_id)
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().map(Payment::amount), Some(Decimal::new(250_050, 2)));
    assert!(listed.iter().all(|stored| stored.approved_at().is_some()));
}

#[tokio::test]
async fn deciding_a_missing_payment_is_not_found() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = PostgresDocumentStore::new(pool);

    assert!(matches!(
        store
            .decide_pending_payment(
                TenantId::new(),
                &PaymentId::generate(),
                PaymentDecision::Approve,
                Utc::now(),
            )
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn unreadable_documents_are_skipped_in_listings() {
    let row = |id: &str, status: &str| DocumentRow {
        tenant_id: Uuid::new_v4(),
        id: id.to_owned(),
        body: json!({
            "studentId": "uid-7",
            "studentName": "Rafi Ahmed",
            "amount": 1500,
            "method": "Bank Transfer",
            "trx": "BANK-100200",
            "status": status,
        }),
        created_at: Utc::now(),
    };
    let rows = vec![row("p-1", "approved"), row("p-2", "refunded"), row("p-3", "pending")];
    let school_id = TenantId::new();

    let payments = readable_rows(PAYMENTS, &rows, |row| {
        decode::<PaymentDocument>(PAYMENTS, row)?.into_domain(
            school_id,
            row.id.as_str(),
            row.created_at,
        )
    });

    let ids: Vec<&str> = payments.iter().map(|payment| payment.id().as_str()).collect();
    assert_eq!(ids, vec!["p-1", "p-3"]);
}
