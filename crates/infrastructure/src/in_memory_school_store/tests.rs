use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use schooldesk_application::{
    NoticeRepository, PaymentRepository, ResultRepository, RosterRepository, SchoolRepository,
};
use schooldesk_core::{AppError, TenantId};
use schooldesk_domain::{
    ExamResult, LoginCode, LoginCodeKind, Notice, NoticeAudience, NoticeId, NoticeParts, Payment,
    PaymentDecision, PaymentId, PaymentMethod, ResultId, School, SchoolStatus, SeatCheck, Shift,
    Student, StudentId, StudentProfile, SubjectMark, Subscription, Teacher, TeacherId,
};

use super::InMemorySchoolStore;

fn school() -> School {
    let subscription = Subscription::new(2, 1, Utc::now() + Duration::days(30))
        .unwrap_or_else(|_| panic!("valid subscription"));
    School::new(
        TenantId::new(),
        "Green Valley School",
        Some("12 Lake Road".to_owned()),
        LoginCode::from_random_bytes(LoginCodeKind::School, [1; 6]),
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
            name: "Rafi Ahmed".to_owned(),
            class: "Class 9".to_owned(),
            roll: 4,
            shift: Shift::Day,
            session: 2025,
        },
        LoginCode::from_random_bytes(LoginCodeKind::Student, [2; 6]),
        Utc::now(),
    )
    .unwrap_or_else(|_| panic!("valid student"))
}

fn teacher(school_id: TenantId, id: &str) -> Teacher {
    Teacher::new(
        TeacherId::new(id).unwrap_or_else(|_| panic!("valid id")),
        school_id,
        "Nusrat Jahan",
        "Class 9",
        &["Math".to_owned()],
        LoginCode::from_random_bytes(LoginCodeKind::Teacher, [3; 6]),
        Utc::now(),
    )
    .unwrap_or_else(|_| panic!("valid teacher"))
}

#[tokio::test]
async fn schools_are_created_once_and_saved_in_place() {
    let store = InMemorySchoolStore::new();
    let mut school = school();

    assert!(store.create_school(school.clone()).await.is_ok());
    assert!(matches!(
        store.create_school(school.clone()).await,
        Err(AppError::Conflict(_))
    ));

    school.set_status(SchoolStatus::Disabled);
    assert!(store.save_school(school.clone()).await.is_ok());
    let stored = store.find_school(school.id()).await.unwrap_or_default();
    assert_eq!(
        stored.map(|school| school.status()),
        Some(SchoolStatus::Disabled)
    );
}

#[tokio::test]
async fn saving_an_unknown_school_is_not_found() {
    let store = InMemorySchoolStore::new();
    assert!(matches!(
        store.save_school(school()).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn student_inserts_stop_at_the_seat_limit() {
    let store = InMemorySchoolStore::new();
    let school_id = TenantId::new();

    let first = store
        .insert_student_within_limit(student(school_id, "s-1"), 2)
        .await;
    let second = store
        .insert_student_within_limit(student(school_id, "s-2"), 2)
        .await;
    let third = store
        .insert_student_within_limit(student(school_id, "s-3"), 2)
        .await;

    assert_eq!(first.ok(), Some(SeatCheck::Available));
    assert_eq!(second.ok(), Some(SeatCheck::Available));
    assert_eq!(
        third.ok(),
        Some(SeatCheck::LimitReached { current: 2, max: 2 })
    );
    assert_eq!(store.count_students(school_id).await.unwrap_or_default(), 2);
}

#[tokio::test]
async fn seat_limits_hold_under_concurrent_inserts() {
    let store = Arc::new(InMemorySchoolStore::new());
    let school_id = TenantId::new();

    let mut handles = Vec::new();
    for index in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .insert_teacher_within_limit(teacher(school_id, &format!("t-{index}")), 4)
                .await
        }));
    }
    for handle in handles {
        assert!(handle.await.is_ok());
    }

    assert_eq!(store.count_teachers(school_id).await.unwrap_or_default(), 4);
}

#[tokio::test]
async fn concurrent_payment_decisions_apply_once() {
    let store = Arc::new(InMemorySchoolStore::new());
    let school_id = TenantId::new();
    let payment = Payment::submit(
        PaymentId::generate(),
        StudentId::new("s-race").unwrap_or_else(|_| panic!("valid id")),
        "Nusrat Jahan",
        school_id,
        Decimal::new(900, 0),
        PaymentMethod::Cash,
        "CASH-778812",
        Utc::now(),
    )
    .unwrap_or_else(|_| panic!("valid payment"));
    assert!(store.create_payment(payment.clone()).await.is_ok());

    let mut handles = Vec::new();
    for index in 0..8 {
        let store = store.clone();
        let payment_id = payment.id().clone();
        let decision = if index % 2 == 0 {
            PaymentDecision::Approve
        } else {
            PaymentDecision::Reject
        };
        handles.push(tokio::spawn(async move {
            store
                .decide_pending_payment(school_id, &payment_id, decision, Utc::now())
                .await
        }));
    }

    let mut winners = Vec::new();
    let mut conflicts = 0;
    for handle in handles {
        match handle.await {
            Ok(Ok(decided)) => winners.push(decided.status()),
            Ok(Err(AppError::Conflict(_))) => conflicts += 1,
            Ok(Err(error)) => panic!("unexpected decision error: {error}"),
            Err(error) => panic!("decision task failed: {error}"),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(conflicts, 7);
    let stored = store
        .find_payment(school_id, payment.id())
        .await
        .unwrap_or_default();
    assert_eq!(stored.map(|payment| payment.status()), winners.first().copied());
}

#[tokio::test]
async fn duplicate_student_ids_conflict() {
    let store = InMemorySchoolStore::new();
    let school_id = TenantId::new();

    let _ = store
        .insert_student_within_limit(student(school_id, "s-1"), 10)
        .await;
    let duplicate = store
        .insert_student_within_limit(student(school_id, "s-1"), 10)
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn records_are_partitioned_by_school() {
    let store = InMemorySchoolStore::new();
    let school_a = TenantId::new();
    let school_b = TenantId::new();

    let _ = store
        .insert_student_within_limit(student(school_a, "s-1"), 10)
        .await;
    let _ = store
        .insert_teacher_within_limit(teacher(school_a, "t-1"), 10)
        .await;

    assert!(store.list_students(school_b).await.unwrap_or_default().is_empty());
    assert!(store.list_teachers(school_b).await.unwrap_or_default().is_empty());
    let student_id = StudentId::new("s-1").unwrap_or_else(|_| panic!("valid id"));
    assert!(
        store
            .find_student(school_b, &student_id)
            .await
            .unwrap_or_default()
            .is_none()
    );
    assert!(
        store
            .find_student(school_a, &student_id)
            .await
            .unwrap_or_default()
            .is_some()
    );
}

#[tokio::test]
async fn results_and_payments_filter_by_student() {
    let store = InMemorySchoolStore::new();
    let school_id = TenantId::new();
    let rafi = StudentId::new("s-1").unwrap_or_else(|_| panic!("valid id"));
    let mita = StudentId::new("s-2").unwrap_or_else(|_| panic!("valid id"));

    for (student_id, name) in [(&rafi, "Rafi Ahmed"), (&mita, "Mita Das")] {
        let result = ExamResult::record(
            ResultId::generate(),
            student_id.clone(),
            name,
            school_id,
            "Half Yearly",
            vec![SubjectMark::new("Math", 81.0).unwrap_or_else(|_| panic!("valid mark"))],
            Utc::now(),
        )
        .unwrap_or_else(|_| panic!("valid result"));
        assert!(store.create_result(result).await.is_ok());

        let payment = Payment::submit(
            PaymentId::generate(),
            student_id.clone(),
            name,
            school_id,
            Decimal::new(1200, 0),
            PaymentMethod::PayPal,
            "PP-8823410",
            Utc::now(),
        )
        .unwrap_or_else(|_| panic!("valid payment"));
        assert!(store.create_payment(payment).await.is_ok());
    }

    let results = store
        .list_results_for_student(school_id, &rafi)
        .await
        .unwrap_or_default();
    assert_eq!(results.len(), 1);
    assert_eq!(store.list_results(school_id).await.unwrap_or_default().len(), 2);

    let mut payments = store
        .list_payments_for_student(school_id, &mita)
        .await
        .unwrap_or_default();
    assert_eq!(payments.len(), 1);

    let Some(payment) = payments.pop() else {
        panic!("payment should be listed");
    };
    let decided = store
        .decide_pending_payment(school_id, payment.id(), PaymentDecision::Approve, Utc::now())
        .await;
    assert!(decided.is_ok());
    let stored = store
        .find_payment(school_id, payment.id())
        .await
        .unwrap_or_default();
    assert_eq!(stored.map(|payment| payment.approved_at().is_some()), Some(true));
}

#[tokio::test]
async fn notices_save_publication_changes() {
    let store = InMemorySchoolStore::new();
    let school_id = TenantId::new();
    let notice = Notice::new(NoticeParts {
        id: NoticeId::generate(),
        school_id,
        title: "Sports Day".to_owned(),
        content: "Sports day is held on the main field next Friday.".to_owned(),
        audience: NoticeAudience::All,
        class_details: None,
        published: false,
        created_at: Utc::now(),
    })
    .unwrap_or_else(|_| panic!("valid notice"));

    assert!(store.create_notice(notice.clone()).await.is_ok());
    let mut published = notice.clone();
    published.set_published(true);
    assert!(store.save_notice(published).await.is_ok());

    let stored = store
        .find_notice(school_id, notice.id())
        .await
        .unwrap_or_default();
    assert_eq!(stored.map(|notice| notice.published()), Some(true));
}
