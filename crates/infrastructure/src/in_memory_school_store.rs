//! In-memory school store for local runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use schooldesk_application::{
    NoticeRepository, PaymentRepository, ResultRepository, RosterRepository, SchoolRepository,
};
use schooldesk_core::{AppError, AppResult, TenantId};
use schooldesk_domain::{
    ExamResult, Notice, NoticeId, Payment, PaymentDecision, PaymentId, ResultId, School, SeatCheck, Student,
    StudentId, Teacher, TeacherId, check_seat_limit,
};
use tokio::sync::RwLock;

type TenantTable<T> = HashMap<(TenantId, String), T>;

/// In-memory store backing every repository port. Used for local runs and tests.
#[derive(Debug, Default)]
pub struct InMemorySchoolStore {
    schools: RwLock<HashMap<TenantId, School>>,
    students: RwLock<TenantTable<Student>>,
    teachers: RwLock<TenantTable<Teacher>>,
    results: RwLock<TenantTable<ExamResult>>,
    payments: RwLock<TenantTable<Payment>>,
    notices: RwLock<TenantTable<Notice>>,
}

impl InMemorySchoolStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert_new<T>(
    table: &mut TenantTable<T>,
    kind: &str,
    key: (TenantId, String),
    value: T,
) -> AppResult<()> {
    if table.contains_key(&key) {
        return Err(AppError::Conflict(format!(
            "{kind} '{}' already exists for school '{}'",
            key.1, key.0
        )));
    }

    table.insert(key, value);
    Ok(())
}

fn replace_existing<T>(
    table: &mut TenantTable<T>,
    kind: &str,
    key: (TenantId, String),
    value: T,
) -> AppResult<()> {
    let Some(slot) = table.get_mut(&key) else {
        return Err(AppError::NotFound(format!(
            "{kind} '{}' does not exist for school '{}'",
            key.1, key.0
        )));
    };

    *slot = value;
    Ok(())
}

fn in_school<T: Clone>(
    table: &TenantTable<T>,
    school_id: TenantId,
    keep: impl Fn(&T) -> bool,
) -> Vec<T> {
    table
        .iter()
        .filter_map(|((stored_school_id, _), value)| {
            (stored_school_id == &school_id && keep(value)).then(|| value.clone())
        })
        .collect()
}

fn count_in_school<T>(table: &TenantTable<T>, school_id: TenantId) -> u64 {
    table
        .keys()
        .filter(|(stored_school_id, _)| stored_school_id == &school_id)
        .count() as u64
}

#[async_trait]
impl SchoolRepository for InMemorySchoolStore {
    async fn create_school(&self, school: School) -> AppResult<()> {
        let mut schools = self.schools.write().await;
        if schools.contains_key(&school.id()) {
            return Err(AppError::Conflict(format!(
                "school '{}' already exists",
                school.id()
            )));
        }

        schools.insert(school.id(), school);
        Ok(())
    }

    async fn find_school(&self, school_id: TenantId) -> AppResult<Option<School>> {
        Ok(self.schools.read().await.get(&school_id).cloned())
    }

    async fn list_schools(&self) -> AppResult<Vec<School>> {
        Ok(self.schools.read().await.values().cloned().collect())
    }

    async fn save_school(&self, school: School) -> AppResult<()> {
        let mut schools = self.schools.write().await;
        let Some(slot) = schools.get_mut(&school.id()) else {
            return Err(AppError::NotFound(format!(
                "school '{}' does not exist",
                school.id()
            )));
        };

        *slot = school;
        Ok(())
    }
}

#[async_trait]
impl RosterRepository for InMemorySchoolStore {
    async fn insert_student_within_limit(
        &self,
        student: Student,
        max_students: u32,
    ) -> AppResult<SeatCheck> {
        let mut students = self.students.write().await;
        let seat = check_seat_limit(
            count_in_school(&students, student.school_id()),
            u64::from(max_students),
        );
        if seat.is_available() {
            let key = (student.school_id(), student.id().as_str().to_owned());
            insert_new(&mut students, "student", key, student)?;
        }

        Ok(seat)
    }

    async fn count_students(&self, school_id: TenantId) -> AppResult<u64> {
        Ok(count_in_school(&*self.students.read().await, school_id))
    }

    async fn find_student(
        &self,
        school_id: TenantId,
        student_id: &StudentId,
    ) -> AppResult<Option<Student>> {
        Ok(self
            .students
            .read()
            .await
            .get(&(school_id, student_id.as_str().to_owned()))
            .cloned())
    }

    async fn list_students(&self, school_id: TenantId) -> AppResult<Vec<Student>> {
        Ok(in_school(&*self.students.read().await, school_id, |_| true))
    }

    async fn insert_teacher_within_limit(
        &self,
        teacher: Teacher,
        max_teachers: u32,
    ) -> AppResult<SeatCheck> {
        let mut teachers = self.teachers.write().await;
        let seat = check_seat_limit(
            count_in_school(&teachers, teacher.school_id()),
            u64::from(max_teachers),
        );
        if seat.is_available() {
            let key = (teacher.school_id(), teacher.id().as_str().to_owned());
            insert_new(&mut teachers, "teacher", key, teacher)?;
        }

        Ok(seat)
    }

    async fn count_teachers(&self, school_id: TenantId) -> AppResult<u64> {
        Ok(count_in_school(&*self.teachers.read().await, school_id))
    }

    async fn find_teacher(
        &self,
        school_id: TenantId,
        teacher_id: &TeacherId,
    ) -> AppResult<Option<Teacher>> {
        Ok(self
            .teachers
            .read()
            .await
            .get(&(school_id, teacher_id.as_str().to_owned()))
            .cloned())
    }

    async fn list_teachers(&self, school_id: TenantId) -> AppResult<Vec<Teacher>> {
        Ok(in_school(&*self.teachers.read().await, school_id, |_| true))
    }
}

#[async_trait]
impl ResultRepository for InMemorySchoolStore {
    async fn create_result(&self, result: ExamResult) -> AppResult<()> {
        let key = (result.school_id(), result.id().as_str().to_owned());
        insert_new(&mut *self.results.write().await, "result", key, result)
    }

    async fn find_result(
        &self,
        school_id: TenantId,
        result_id: &ResultId,
    ) -> AppResult<Option<ExamResult>> {
        Ok(self
            .results
            .read()
            .await
            .get(&(school_id, result_id.as_str().to_owned()))
            .cloned())
    }

    async fn save_result(&self, result: ExamResult) -> AppResult<()> {
        let key = (result.school_id(), result.id().as_str().to_owned());
        replace_existing(&mut *self.results.write().await, "result", key, result)
    }

    async fn list_results(&self, school_id: TenantId) -> AppResult<Vec<ExamResult>> {
        Ok(in_school(&*self.results.read().await, school_id, |_| true))
    }

    async fn list_results_for_student(
        &self,
        school_id: TenantId,
        student_id: &StudentId,
    ) -> AppResult<Vec<ExamResult>> {
        Ok(in_school(&*self.results.read().await, school_id, |result| {
            result.student_id() == student_id
        }))
    }
}

#[async_trait]
impl PaymentRepository for InMemorySchoolStore {
    async fn create_payment(&self, payment: Payment) -> AppResult<()> {
        let key = (payment.school_id(), payment.id().as_str().to_owned());
        insert_new(&mut *self.payments.write().await, "payment", key, payment)
    }

    async fn find_payment(
        &self,
        school_id: TenantId,
        payment_id: &PaymentId,
    ) -> AppResult<Option<Payment>> {
        Ok(self
            .payments
            .read()
            .await
            .get(&(school_id, payment_id.as_str().to_owned()))
            .cloned())
    }

    async fn decide_pending_payment(
        &self,
        school_id: TenantId,
        payment_id: &PaymentId,
        decision: PaymentDecision,
        decided_at: DateTime<Utc>,
    ) -> AppResult<Payment> {
        let mut payments = self.payments.write().await;
        let payment = payments
            .get_mut(&(school_id, payment_id.as_str().to_owned()))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "payment '{payment_id}' does not exist for school '{school_id}'"
                ))
            })?;
        payment.decide(decision, decided_at)?;
        Ok(payment.clone())
    }

    async fn list_payments(&self, school_id: TenantId) -> AppResult<Vec<Payment>> {
        Ok(in_school(&*self.payments.read().await, school_id, |_| true))
    }

    async fn list_payments_for_student(
        &self,
        school_id: TenantId,
        student_id: &StudentId,
    ) -> AppResult<Vec<Payment>> {
        Ok(in_school(&*self.payments.read().await, school_id, |payment| {
            payment.student_id() == student_id
        }))
    }
}

#[async_trait]
impl NoticeRepository for InMemorySchoolStore {
    async fn create_notice(&self, notice: Notice) -> AppResult<()> {
        let key = (notice.school_id(), notice.id().as_str().to_owned());
        insert_new(&mut *self.notices.write().await, "notice", key, notice)
    }

    async fn find_notice(
        &self,
        school_id: TenantId,
        notice_id: &NoticeId,
    ) -> AppResult<Option<Notice>> {
        Ok(self
            .notices
            .read()
            .await
            .get(&(school_id, notice_id.as_str().to_owned()))
            .cloned())
    }

    async fn save_notice(&self, notice: Notice) -> AppResult<()> {
        let key = (notice.school_id(), notice.id().as_str().to_owned());
        replace_existing(&mut *self.notices.write().await, "notice", key, notice)
    }

    async fn list_notices(&self, school_id: TenantId) -> AppResult<Vec<Notice>> {
        Ok(in_school(&*self.notices.read().await, school_id, |_| true))
    }
}

#[cfg(test)]
mod tests;
