//! Persistence ports. Every record is partitioned by school.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use schooldesk_core::{AppResult, TenantId};
use schooldesk_domain::{
    ExamResult, Notice, NoticeId, Payment, PaymentDecision, PaymentId, ResultId, School, SeatCheck, Student,
    StudentId, Teacher, TeacherId,
};

/// Repository port for school tenants.
#[async_trait]
pub trait SchoolRepository: Send + Sync {
    /// Stores a new school. Fails with a conflict when the id already exists.
    async fn create_school(&self, school: School) -> AppResult<()>;

    /// Finds a school by id.
    async fn find_school(&self, school_id: TenantId) -> AppResult<Option<School>>;

    /// Lists every school on the platform.
    async fn list_schools(&self) -> AppResult<Vec<School>>;

    /// Replaces an existing school. Fails with not found for unknown ids.
    async fn save_school(&self, school: School) -> AppResult<()>;
}

/// Repository port for students and teachers.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Inserts a student unless the school already holds `max_students`.
    ///
    /// Counting and inserting happen atomically, so concurrent callers never
    /// push the school past its limit. Returns the seat check that decided.
    async fn insert_student_within_limit(
        &self,
        student: Student,
        max_students: u32,
    ) -> AppResult<SeatCheck>;

    /// Counts the students of a school.
    async fn count_students(&self, school_id: TenantId) -> AppResult<u64>;

    /// Finds a student in school scope.
    async fn find_student(
        &self,
        school_id: TenantId,
        student_id: &StudentId,
    ) -> AppResult<Option<Student>>;

    /// Lists the students of a school.
    async fn list_students(&self, school_id: TenantId) -> AppResult<Vec<Student>>;

    /// Inserts a teacher unless the school already holds `max_teachers`.
    async fn insert_teacher_within_limit(
        &self,
        teacher: Teacher,
        max_teachers: u32,
    ) -> AppResult<SeatCheck>;

    /// Counts the teachers of a school.
    async fn count_teachers(&self, school_id: TenantId) -> AppResult<u64>;

    /// Finds a teacher in school scope.
    async fn find_teacher(
        &self,
        school_id: TenantId,
        teacher_id: &TeacherId,
    ) -> AppResult<Option<Teacher>>;

    /// Lists the teachers of a school.
    async fn list_teachers(&self, school_id: TenantId) -> AppResult<Vec<Teacher>>;
}

/// Repository port for exam results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Stores a new result.
    async fn create_result(&self, result: ExamResult) -> AppResult<()>;

    /// Finds a result in school scope.
    async fn find_result(
        &self,
        school_id: TenantId,
        result_id: &ResultId,
    ) -> AppResult<Option<ExamResult>>;

    /// Replaces an existing result.
    async fn save_result(&self, result: ExamResult) -> AppResult<()>;

    /// Lists the results of a school.
    async fn list_results(&self, school_id: TenantId) -> AppResult<Vec<ExamResult>>;

    /// Lists the results of one student.
    async fn list_results_for_student(
        &self,
        school_id: TenantId,
        student_id: &StudentId,
    ) -> AppResult<Vec<ExamResult>>;
}

/// Repository port for payments.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Stores a new payment.
    async fn create_payment(&self, payment: Payment) -> AppResult<()>;

    /// Finds a payment in school scope.
    async fn find_payment(
        &self,
        school_id: TenantId,
        payment_id: &PaymentId,
    ) -> AppResult<Option<Payment>>;

    /// Applies a decision to a payment that is still pending, atomically.
    ///
    /// Returns `Conflict` when the payment was already decided and
    /// `NotFound` when it does not exist.
    async fn decide_pending_payment(
        &self,
        school_id: TenantId,
        payment_id: &PaymentId,
        decision: PaymentDecision,
        decided_at: DateTime<Utc>,
    ) -> AppResult<Payment>;

    /// Lists the payments of a school.
    async fn list_payments(&self, school_id: TenantId) -> AppResult<Vec<Payment>>;

    /// Lists the payments of one student.
    async fn list_payments_for_student(
        &self,
        school_id: TenantId,
        student_id: &StudentId,
    ) -> AppResult<Vec<Payment>>;
}

/// Repository port for notices.
#[async_trait]
pub trait NoticeRepository: Send + Sync {
    /// Stores a new notice.
    async fn create_notice(&self, notice: Notice) -> AppResult<()>;

    /// Finds a notice in school scope.
    async fn find_notice(
        &self,
        school_id: TenantId,
        notice_id: &NoticeId,
    ) -> AppResult<Option<Notice>>;

    /// Replaces an existing notice.
    async fn save_notice(&self, notice: Notice) -> AppResult<()>;

    /// Lists the notices of a school.
    async fn list_notices(&self, school_id: TenantId) -> AppResult<Vec<Notice>>;
}
