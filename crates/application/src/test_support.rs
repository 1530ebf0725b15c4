//! Fakes shared by the service tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use schooldesk_core::{AppError, AppResult, RoleClaims, TenantId, UserRole};
use schooldesk_domain::{
    ExamResult, LoginCode, LoginCodeKind, Notice, NoticeId, Payment, PaymentDecision, PaymentId, ResultId, School,
    SchoolStatus, SeatCheck, Shift, Student, StudentId, StudentProfile, Subscription, Teacher,
    TeacherId, check_seat_limit,
};

use crate::{
    NoticeDraftGenerator, NoticeDraftRequest, NoticeRepository, PaymentRepository,
    ResultRepository, RosterRepository, SchoolRepository,
};

#[derive(Default)]
pub(crate) struct FakeStore {
    schools: Mutex<Vec<School>>,
    students: Mutex<Vec<Student>>,
    teachers: Mutex<Vec<Teacher>>,
    results: Mutex<Vec<ExamResult>>,
    payments: Mutex<Vec<Payment>>,
    notices: Mutex<Vec<Notice>>,
}

impl FakeStore {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

fn replace<T>(items: &mut [T], item: T, same: impl Fn(&T) -> bool) -> AppResult<()> {
    let slot = items
        .iter_mut()
        .find(|stored| same(&**stored))
        .ok_or_else(|| AppError::NotFound("record does not exist".to_owned()))?;
    *slot = item;
    Ok(())
}

#[async_trait]
impl SchoolRepository for FakeStore {
    async fn create_school(&self, school: School) -> AppResult<()> {
        self.schools.lock().await.push(school);
        Ok(())
    }

    async fn find_school(&self, school_id: TenantId) -> AppResult<Option<School>> {
        Ok(self
            .schools
            .lock()
            .await
            .iter()
            .find(|school| school.id() == school_id)
            .cloned())
    }

    async fn list_schools(&self) -> AppResult<Vec<School>> {
        Ok(self.schools.lock().await.clone())
    }

    async fn save_school(&self, school: School) -> AppResult<()> {
        let school_id = school.id();
        let mut schools = self.schools.lock().await;
        replace(schools.as_mut_slice(), school, |stored| stored.id() == school_id)
    }
}

#[async_trait]
impl RosterRepository for FakeStore {
    async fn insert_student_within_limit(
        &self,
        student: Student,
        max_students: u32,
    ) -> AppResult<SeatCheck> {
        let mut students = self.students.lock().await;
        let current = students
            .iter()
            .filter(|stored| stored.school_id() == student.school_id())
            .count() as u64;
        let check = check_seat_limit(current, u64::from(max_students));
        if check.is_available() {
            students.push(student);
        }
        Ok(check)
    }

    async fn count_students(&self, school_id: TenantId) -> AppResult<u64> {
        Ok(self.list_students(school_id).await?.len() as u64)
    }

    async fn find_student(
        &self,
        school_id: TenantId,
        student_id: &StudentId,
    ) -> AppResult<Option<Student>> {
        Ok(self
            .students
            .lock()
            .await
            .iter()
            .find(|student| student.school_id() == school_id && student.id() == student_id)
            .cloned())
    }

    async fn list_students(&self, school_id: TenantId) -> AppResult<Vec<Student>> {
        Ok(self
            .students
            .lock()
            .await
            .iter()
            .filter(|student| student.school_id() == school_id)
            .cloned()
            .collect())
    }

    async fn insert_teacher_within_limit(
        &self,
        teacher: Teacher,
        max_teachers: u32,
    ) -> AppResult<SeatCheck> {
        let mut teachers = self.teachers.lock().await;
        let current = teachers
            .iter()
            .filter(|stored| stored.school_id() == teacher.school_id())
            .count() as u64;
        let check = check_seat_limit(current, u64::from(max_teachers));
        if check.is_available() {
            teachers.push(teacher);
        }
        Ok(check)
    }

    async fn count_teachers(&self, school_id: TenantId) -> AppResult<u64> {
        Ok(self.list_teachers(school_id).await?.len() as u64)
    }

    async fn find_teacher(
        &self,
        school_id: TenantId,
        teacher_id: &TeacherId,
    ) -> AppResult<Option<Teacher>> {
        Ok(self
            .teachers
            .lock()
            .await
            .iter()
            .find(|teacher| teacher.school_id() == school_id && teacher.id() == teacher_id)
            .cloned())
    }

    async fn list_teachers(&self, school_id: TenantId) -> AppResult<Vec<Teacher>> {
        Ok(self
            .teachers
            .lock()
            .await
            .iter()
            .filter(|teacher| teacher.school_id() == school_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ResultRepository for FakeStore {
    async fn create_result(&self, result: ExamResult) -> AppResult<()> {
        self.results.lock().await.push(result);
        Ok(())
    }

    async fn find_result(
        &self,
        school_id: TenantId,
        result_id: &ResultId,
    ) -> AppResult<Option<ExamResult>> {
        Ok(self
            .results
            .lock()
            .await
            .iter()
            .find(|result| result.school_id() == school_id && result.id() == result_id)
            .cloned())
    }

    async fn save_result(&self, result: ExamResult) -> AppResult<()> {
        let result_id = result.id().clone();
        let mut results = self.results.lock().await;
        replace(results.as_mut_slice(), result, |stored| stored.id() == &result_id)
    }

    async fn list_results(&self, school_id: TenantId) -> AppResult<Vec<ExamResult>> {
        Ok(self
            .results
            .lock()
            .await
            .iter()
            .filter(|result| result.school_id() == school_id)
            .cloned()
            .collect())
    }

    async fn list_results_for_student(
        &self,
        school_id: TenantId,
        student_id: &StudentId,
    ) -> AppResult<Vec<ExamResult>> {
        Ok(self
            .list_results(school_id)
            .await?
            .into_iter()
            .filter(|result| result.student_id() == student_id)
            .collect())
    }
}

#[async_trait]
impl PaymentRepository for FakeStore {
    async fn create_payment(&self, payment: Payment) -> AppResult<()> {
        self.payments.lock().await.push(payment);
        Ok(())
    }

    async fn find_payment(
        &self,
        school_id: TenantId,
        payment_id: &PaymentId,
    ) -> AppResult<Option<Payment>> {
        Ok(self
            .payments
            .lock()
            .await
            .iter()
            .find(|payment| payment.school_id() == school_id && payment.id() == payment_id)
            .cloned())
    }

    async fn decide_pending_payment(
        &self,
        school_id: TenantId,
        payment_id: &PaymentId,
        decision: PaymentDecision,
        decided_at: DateTime<Utc>,
    ) -> AppResult<Payment> {
        let mut payments = self.payments.lock().await;
        let payment = payments
            .iter_mut()
            .find(|payment| payment.school_id() == school_id && payment.id() == payment_id)
            .ok_or_else(|| AppError::NotFound("record does not exist".to_owned()))?;
        payment.decide(decision, decided_at)?;
        Ok(payment.clone())
    }

    async fn list_payments(&self, school_id: TenantId) -> AppResult<Vec<Payment>> {
        Ok(self
            .payments
            .lock()
            .await
            .iter()
            .filter(|payment| payment.school_id() == school_id)
            .cloned()
            .collect())
    }

    async fn list_payments_for_student(
        &self,
        school_id: TenantId,
        student_id: &StudentId,
    ) -> AppResult<Vec<Payment>> {
        Ok(self
            .list_payments(school_id)
            .await?
            .into_iter()
            .filter(|payment| payment.student_id() == student_id)
            .collect())
    }
}

#[async_trait]
impl NoticeRepository for FakeStore {
    async fn create_notice(&self, notice: Notice) -> AppResult<()> {
        self.notices.lock().await.push(notice);
        Ok(())
    }

    async fn find_notice(
        &self,
        school_id: TenantId,
        notice_id: &NoticeId,
    ) -> AppResult<Option<Notice>> {
        Ok(self
            .notices
            .lock()
            .await
            .iter()
            .find(|notice| notice.school_id() == school_id && notice.id() == notice_id)
            .cloned())
    }

    async fn save_notice(&self, notice: Notice) -> AppResult<()> {
        let notice_id = notice.id().clone();
        let mut notices = self.notices.lock().await;
        replace(notices.as_mut_slice(), notice, |stored| stored.id() == &notice_id)
    }

    async fn list_notices(&self, school_id: TenantId) -> AppResult<Vec<Notice>> {
        Ok(self
            .notices
            .lock()
            .await
            .iter()
            .filter(|notice| notice.school_id() == school_id)
            .cloned()
            .collect())
    }
}

pub(crate) struct FakeDrafter {
    pub(crate) fail: bool,
}

#[async_trait]
impl NoticeDraftGenerator for FakeDrafter {
    async fn generate(&self, request: &NoticeDraftRequest) -> AppResult<String> {
        if self.fail {
            return Err(AppError::Internal("model unavailable".to_owned()));
        }
        Ok(format!(
            "Dear {} readers, please note: {}.",
            request.audience.as_str(),
            request.title
        ))
    }
}

pub(crate) fn claims(role: UserRole, school_id: Option<TenantId>, subject: &str) -> RoleClaims {
    RoleClaims::new(subject, role, school_id, true)
}

pub(crate) fn master() -> RoleClaims {
    claims(UserRole::Master, None, "owner")
}

/// Seeds an active school with the given seat limits and expiry offset.
pub(crate) async fn seed_school(
    store: &FakeStore,
    max_students: u32,
    max_teachers: u32,
    expires_in: Duration,
) -> School {
    let now = Utc::now();
    let subscription = Subscription::new(max_students, max_teachers, now + expires_in)
        .unwrap_or_else(|_| panic!("valid subscription"));
    let school = School::new(
        TenantId::new(),
        "Green Valley School",
        None,
        LoginCode::from_random_bytes(LoginCodeKind::School, [4; 6]),
        SchoolStatus::Active,
        subscription,
        now,
    )
    .unwrap_or_else(|_| panic!("valid school"));
    let _ = store.create_school(school.clone()).await;
    school
}

/// Seeds a student directly into the store.
pub(crate) async fn seed_student(
    store: &FakeStore,
    school_id: TenantId,
    student_id: &str,
    name: &str,
    class: &str,
) -> Student {
    let student = Student::new(
        StudentId::new(student_id).unwrap_or_else(|_| panic!("valid id")),
        school_id,
        StudentProfile {
            name: name.to_owned(),
            class: class.to_owned(),
            roll: 1,
            shift: Shift::Morning,
            session: 2025,
        },
        LoginCode::from_random_bytes(LoginCodeKind::Student, [5; 6]),
        Utc::now(),
    )
    .unwrap_or_else(|_| panic!("valid student"));
    let _ = store
        .insert_student_within_limit(student.clone(), u32::MAX)
        .await;
    student
}
