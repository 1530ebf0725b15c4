use std::sync::Arc;

use chrono::Duration;

use schooldesk_core::{AppError, UserRole};
use schooldesk_domain::{Gpa, gpa_of_marks};

use crate::test_support::{FakeStore, claims, seed_school, seed_student};

use super::{RecordResultInput, ResultService, SubjectMarkInput};

fn service(store: &Arc<FakeStore>) -> ResultService {
    ResultService::new(store.clone(), store.clone())
}

fn marks(values: &[(&str, f64)]) -> Vec<SubjectMarkInput> {
    values
        .iter()
        .map(|(name, mark)| SubjectMarkInput {
            name: (*name).to_owned(),
            mark: *mark,
        })
        .collect()
}

fn entry(student_id: &str, subjects: &[(&str, f64)]) -> RecordResultInput {
    RecordResultInput {
        student_id: student_id.to_owned(),
        exam_name: "Mid Term".to_owned(),
        subjects: marks(subjects),
    }
}

#[tokio::test]
async fn recorded_results_start_unpublished_with_engine_gpa() {
    let store = FakeStore::shared();
    let school = seed_school(&store, 10, 5, Duration::days(30)).await;
    seed_student(&store, school.id(), "s-1", "Rafi Ahmed", "Class 9").await;
    let teacher = claims(UserRole::Teacher, Some(school.id()), "t-1");

    let result = service(&store)
        .record_result(&teacher, entry("s-1", &[("Math", 85.0), ("English", 75.0)]))
        .await;
    let Ok(result) = result else {
        panic!("result should be recorded");
    };

    assert!(!result.published());
    assert_eq!(result.gpa(), gpa_of_marks([85.0, 75.0]));
    assert_eq!(result.gpa().to_string(), "4.50");
    assert_eq!(result.student_name().as_str(), "Rafi Ahmed");
}

#[tokio::test]
async fn failing_subject_zeroes_recorded_gpa() {
    let store = FakeStore::shared();
    let school = seed_school(&store, 10, 5, Duration::days(30)).await;
    seed_student(&store, school.id(), "s-1", "Rafi Ahmed", "Class 9").await;
    let teacher = claims(UserRole::Teacher, Some(school.id()), "t-1");

    let result = service(&store)
        .record_result(&teacher, entry("s-1", &[("Math", 100.0), ("Art", 20.0)]))
        .await;
    assert_eq!(result.map(|result| result.gpa()).ok(), Some(Gpa::ZERO));
}

#[tokio::test]
async fn unknown_students_and_bad_marks_are_rejected() {
    let store = FakeStore::shared();
    let school = seed_school(&store, 10, 5, Duration::days(30)).await;
    seed_student(&store, school.id(), "s-1", "Rafi Ahmed", "Class 9").await;
    let teacher = claims(UserRole::Teacher, Some(school.id()), "t-1");
    let service = service(&store);

    let missing = service
        .record_result(&teacher, entry("s-404", &[("Math", 50.0)]))
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let out_of_range = service
        .record_result(&teacher, entry("s-1", &[("Math", 101.0)]))
        .await;
    assert!(matches!(out_of_range, Err(AppError::Validation(_))));

    let empty = service.record_result(&teacher, entry("s-1", &[])).await;
    assert!(matches!(empty, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn students_only_see_their_published_results() {
    let store = FakeStore::shared();
    let school = seed_school(&store, 10, 5, Duration::days(30)).await;
    seed_student(&store, school.id(), "s-1", "Rafi Ahmed", "Class 9").await;
    seed_student(&store, school.id(), "s-2", "Mina Rahman", "Class 9").await;
    let teacher = claims(UserRole::Teacher, Some(school.id()), "t-1");
    let admin = claims(UserRole::Admin, Some(school.id()), "admin-1");
    let student = claims(UserRole::Student, Some(school.id()), "s-1");
    let service = service(&store);

    let Ok(own) = service
        .record_result(&teacher, entry("s-1", &[("Math", 70.0)]))
        .await
    else {
        panic!("result should be recorded");
    };
    let Ok(other) = service
        .record_result(&teacher, entry("s-2", &[("Math", 90.0)]))
        .await
    else {
        panic!("result should be recorded");
    };

    assert!(service.list_my_results(&student).await.unwrap_or_default().is_empty());

    assert!(service.set_result_published(&admin, own.id(), true).await.is_ok());
    assert!(service.set_result_published(&admin, other.id(), true).await.is_ok());

    let visible = service.list_my_results(&student).await.unwrap_or_default();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id(), own.id());
}

#[tokio::test]
async fn publishing_is_admin_only() {
    let store = FakeStore::shared();
    let school = seed_school(&store, 10, 5, Duration::days(30)).await;
    seed_student(&store, school.id(), "s-1", "Rafi Ahmed", "Class 9").await;
    let teacher = claims(UserRole::Teacher, Some(school.id()), "t-1");
    let service = service(&store);

    let Ok(result) = service
        .record_result(&teacher, entry("s-1", &[("Math", 70.0)]))
        .await
    else {
        panic!("result should be recorded");
    };

    let denied = service.set_result_published(&teacher, result.id(), true).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
}

#[test]
fn preview_grades_without_storing() {
    let store = FakeStore::shared();
    let sheet = service(&store).preview_gpa(&marks(&[("Math", 85.0), ("Art", 35.0)]));
    let Ok(sheet) = sheet else {
        panic!("preview should grade");
    };

    assert_eq!(sheet.gpa.to_string(), "3.00");
    assert!(!sheet.failed);
    assert_eq!(sheet.subjects[1].grade.letter, "D");
}
