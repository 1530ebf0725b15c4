//! PostgreSQL-backed document store for every school collection.

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
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

use crate::documents::{
    NOTICES, NoticeDocument, PAYMENTS, PaymentDocument, RESULTS, ResultDocument, SCHOOLS,
    STUDENTS, SchoolDocument, StudentDocument, TEACHERS, TeacherDocument,
};

/// PostgreSQL-backed store keeping every record as a JSON document.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    tenant_id: Uuid,
    id: String,
    body: Value,
    created_at: DateTime<Utc>,
}

fn encode<T: Serialize>(collection: &str, document: &T) -> AppResult<Value> {
    serde_json::to_value(document).map_err(|error| {
        AppError::Internal(format!("failed to encode {collection} document: {error}"))
    })
}

fn decode<T: DeserializeOwned>(collection: &str, row: &DocumentRow) -> AppResult<T> {
    serde_json::from_value(row.body.clone()).map_err(|error| {
        AppError::Internal(format!(
            "failed to decode {collection} document '{}': {error}",
            row.id
        ))
    })
}

/// Reads listed rows, skipping documents that no longer decode or validate.
fn readable_rows<T>(
    collection: &str,
    rows: &[DocumentRow],
    read: impl Fn(&DocumentRow) -> AppResult<T>,
) -> Vec<T> {
    rows.iter()
        .filter_map(|row| match read(row) {
            Ok(item) => Some(item),
            Err(error) => {
                warn!(collection, id = %row.id, %error, "skipping unreadable document");
                None
            }
        })
        .collect()
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(database_error) if database_error.code().as_deref() == Some("23505")
    )
}

impl PostgresDocumentStore {
    async fn insert_document(
        &self,
        school_id: TenantId,
        collection: &str,
        id: &str,
        body: Value,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO documents (tenant_id, collection, id, body)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(school_id.as_uuid())
        .bind(collection)
        .bind(id)
        .bind(body)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) if is_unique_violation(&error) => Err(AppError::Conflict(format!(
                "{collection} document '{id}' already exists for school '{school_id}'"
            ))),
            Err(error) => Err(AppError::Internal(format!(
                "failed to insert {collection} document: {error}"
            ))),
        }
    }

    async fn replace_document(
        &self,
        school_id: TenantId,
        collection: &str,
        id: &str,
        body: Value,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = $4, updated_at = now()
            WHERE tenant_id = $1 AND collection = $2 AND id = $3
            "#,
        )
        .bind(school_id.as_uuid())
        .bind(collection)
        .bind(id)
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update {collection} document: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "{collection} document '{id}' does not exist for school '{school_id}'"
            )));
        }

        Ok(())
    }

    async fn find_document(
        &self,
        school_id: TenantId,
        collection: &str,
        id: &str,
    ) -> AppResult<Option<DocumentRow>> {
        sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT tenant_id, id, body, created_at
            FROM documents
            WHERE tenant_id = $1 AND collection = $2 AND id = $3
            "#,
        )
        .bind(school_id.as_uuid())
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find {collection} document: {error}"))
        })
    }

    async fn list_documents(
        &self,
        school_id: TenantId,
        collection: &str,
        student_id: Option<&StudentId>,
    ) -> AppResult<Vec<DocumentRow>> {
        sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT tenant_id, id, body, created_at
            FROM documents
            WHERE tenant_id = $1
              AND collection = $2
              AND ($3::TEXT IS NULL
                   OR COALESCE(body ->> 'student_id', body ->> 'studentId') = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(school_id.as_uuid())
        .bind(collection)
        .bind(student_id.map(StudentId::as_str))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list {collection} documents: {error}"))
        })
    }

    async fn count_documents(&self, school_id: TenantId, collection: &str) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM documents
            WHERE tenant_id = $1 AND collection = $2
            "#,
        )
        .bind(school_id.as_uuid())
        .bind(collection)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count {collection} documents: {error}"))
        })?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Counts and inserts under a per-school, per-collection transaction lock.
    async fn insert_within_limit(
        &self,
        school_id: TenantId,
        collection: &str,
        id: &str,
        body: Value,
        max_allowed: u32,
    ) -> AppResult<SeatCheck> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("{school_id}/{collection}"))
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to lock {collection} seats: {error}"))
            })?;

        let current = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM documents
            WHERE tenant_id = $1 AND collection = $2
            "#,
        )
        .bind(school_id.as_uuid())
        .bind(collection)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count {collection} documents: {error}"))
        })?;

        let seat = check_seat_limit(
            u64::try_from(current).unwrap_or_default(),
            u64::from(max_allowed),
        );
        if !seat.is_available() {
            return Ok(seat);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO documents (tenant_id, collection, id, body)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(school_id.as_uuid())
        .bind(collection)
        .bind(id)
        .bind(body)
        .execute(&mut *transaction)
        .await;

        match inserted {
            Ok(_) => {}
            Err(error) if is_unique_violation(&error) => {
                return Err(AppError::Conflict(format!(
                    "{collection} document '{id}' already exists for school '{school_id}'"
                )));
            }
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to insert {collection} document: {error}"
                )));
            }
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(seat)
    }
}

#[async_trait]
impl SchoolRepository for PostgresDocumentStore {
    async fn create_school(&self, school: School) -> AppResult<()> {
        let id = school.id().to_string();
        let body = encode(SCHOOLS, &SchoolDocument::from_domain(&school))?;
        self.insert_document(school.id(), SCHOOLS, id.as_str(), body)
            .await
    }

    async fn find_school(&self, school_id: TenantId) -> AppResult<Option<School>> {
        let id = school_id.to_string();
        let Some(row) = self.find_document(school_id, SCHOOLS, id.as_str()).await? else {
            return Ok(None);
        };

        decode::<SchoolDocument>(SCHOOLS, &row)?
            .into_domain(school_id, row.created_at)
            .map(Some)
    }

    async fn list_schools(&self) -> AppResult<Vec<School>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT tenant_id, id, body, created_at
            FROM documents
            WHERE collection = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(SCHOOLS)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list schools: {error}")))?;

        Ok(readable_rows(SCHOOLS, &rows, |row| {
            decode::<SchoolDocument>(SCHOOLS, row)?
                .into_domain(TenantId::from_uuid(row.tenant_id), row.created_at)
        }))
    }

    async fn save_school(&self, school: School) -> AppResult<()> {
        let id = school.id().to_string();
        let body = encode(SCHOOLS, &SchoolDocument::from_domain(&school))?;
        self.replace_document(school.id(), SCHOOLS, id.as_str(), body)
            .await
    }
}

#[async_trait]
impl RosterRepository for PostgresDocumentStore {
    async fn insert_student_within_limit(
        &self,
        student: Student,
        max_students: u32,
    ) -> AppResult<SeatCheck> {
        let body = encode(STUDENTS, &StudentDocument::from_domain(&student))?;
        self.insert_within_limit(
            student.school_id(),
            STUDENTS,
            student.id().as_str(),
            body,
            max_students,
        )
        .await
    }

    async fn count_students(&self, school_id: TenantId) -> AppResult<u64> {
        self.count_documents(school_id, STUDENTS).await
    }

    async fn find_student(
        &self,
        school_id: TenantId,
        student_id: &StudentId,
    ) -> AppResult<Option<Student>> {
        let Some(row) = self
            .find_document(school_id, STUDENTS, student_id.as_str())
            .await?
        else {
            return Ok(None);
        };

        decode::<StudentDocument>(STUDENTS, &row)?
            .into_domain(school_id, row.id.as_str(), row.created_at)
            .map(Some)
    }

    async fn list_students(&self, school_id: TenantId) -> AppResult<Vec<Student>> {
        let rows = self.list_documents(school_id, STUDENTS, None).await?;
        Ok(readable_rows(STUDENTS, &rows, |row| {
            decode::<StudentDocument>(STUDENTS, row)?.into_domain(school_id, row.id.as_str(), row.created_at)
        }))
    }

    async fn insert_teacher_within_limit(
        &self,
        teacher: Teacher,
        max_teachers: u32,
    ) -> AppResult<SeatCheck> {
        let body = encode(TEACHERS, &TeacherDocument::from_domain(&teacher))?;
        self.insert_within_limit(
            teacher.school_id(),
            TEACHERS,
            teacher.id().as_str(),
            body,
            max_teachers,
        )
        .await
    }

    async fn count_teachers(&self, school_id: TenantId) -> AppResult<u64> {
        self.count_documents(school_id, TEACHERS).await
    }

    async fn find_teacher(
        &self,
        school_id: TenantId,
        teacher_id: &TeacherId,
    ) -> AppResult<Option<Teacher>> {
        let Some(row) = self
            .find_document(school_id, TEACHERS, teacher_id.as_str())
            .await?
        else {
            return Ok(None);
        };

        decode::<TeacherDocument>(TEACHERS, &row)?
            .into_domain(school_id, row.id.as_str(), row.created_at)
            .map(Some)
    }

    async fn list_teachers(&self, school_id: TenantId) -> AppResult<Vec<Teacher>> {
        let rows = self.list_documents(school_id, TEACHERS, None).await?;
        Ok(readable_rows(TEACHERS, &rows, |row| {
            decode::<TeacherDocument>(TEACHERS, row)?.into_domain(school_id, row.id.as_str(), row.created_at)
        }))
    }
}

#[async_trait]
impl ResultRepository for PostgresDocumentStore {
    async fn create_result(&self, result: ExamResult) -> AppResult<()> {
        let body = encode(RESULTS, &ResultDocument::from_domain(&result))?;
        self.insert_document(result.school_id(), RESULTS, result.id().as_str(), body)
            .await
    }

    async fn find_result(
        &self,
        school_id: TenantId,
        result_id: &ResultId,
    ) -> AppResult<Option<ExamResult>> {
        let Some(row) = self
            .find_document(school_id, RESULTS, result_id.as_str())
            .await?
        else {
            return Ok(None);
        };

        decode::<ResultDocument>(RESULTS, &row)?
            .into_domain(school_id, row.id.as_str(), row.created_at)
            .map(Some)
    }

    async fn save_result(&self, result: ExamResult) -> AppResult<()> {
        let body = encode(RESULTS, &ResultDocument::from_domain(&result))?;
        self.replace_document(result.school_id(), RESULTS, result.id().as_str(), body)
            .await
    }

    async fn list_results(&self, school_id: TenantId) -> AppResult<Vec<ExamResult>> {
        self.results_where(school_id, None).await
    }

    async fn list_results_for_student(
        &self,
        school_id: TenantId,
        student_id: &StudentId,
    ) -> AppResult<Vec<ExamResult>> {
        self.results_where(school_id, Some(student_id)).await
    }
}

#[async_trait]
impl PaymentRepository for PostgresDocumentStore {
    async fn create_payment(&self, payment: Payment) -> AppResult<()> {
        let body = encode(PAYMENTS, &PaymentDocument::from_domain(&payment))?;
        self.insert_document(payment.school_id(), PAYMENTS, payment.id().as_str(), body)
            .await
    }

    async fn find_payment(
        &self,
        school_id: TenantId,
        payment_id: &PaymentId,
    ) -> AppResult<Option<Payment>> {
        let Some(row) = self
            .find_document(school_id, PAYMENTS, payment_id.as_str())
            .await?
        else {
            return Ok(None);
        };

        decode::<PaymentDocument>(PAYMENTS, &row)?
            .into_domain(school_id, row.id.as_str(), row.created_at)
            .map(Some)
    }

    async fn decide_pending_payment(
        &self,
        school_id: TenantId,
        payment_id: &PaymentId,
        decision: PaymentDecision,
        decided_at: DateTime<Utc>,
    ) -> AppResult<Payment> {
        let mut payment = self
            .find_payment(school_id, payment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "payment '{payment_id}' does not exist for school '{school_id}'"
                ))
            })?;
        payment.decide(decision, decided_at)?;
        let body = encode(PAYMENTS, &PaymentDocument::from_domain(&payment))?;

        // The status guard makes a concurrent decision lose instead of overwrite.
        let updated = sqlx::query(
            r#"
            UPDATE documents
            SET body = $4, updated_at = now()
            WHERE tenant_id = $1
              AND collection = $2
              AND id = $3
              AND body ->> 'status' = 'pending'
            "#,
        )
        .bind(school_id.as_uuid())
        .bind(PAYMENTS)
        .bind(payment_id.as_str())
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to decide payment: {error}")))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "payment '{payment_id}' was already decided"
            )));
        }

        Ok(payment)
    }

    async fn list_payments(&self, school_id: TenantId) -> AppResult<Vec<Payment>> {
        self.payments_where(school_id, None).await
    }

    async fn list_payments_for_student(
        &self,
        school_id: TenantId,
        student_id: &StudentId,
    ) -> AppResult<Vec<Payment>> {
        self.payments_where(school_id, Some(student_id)).await
    }
}

#[async_trait]
impl NoticeRepository for PostgresDocumentStore {
    async fn create_notice(&self, notice: Notice) -> AppResult<()> {
        let body = encode(NOTICES, &NoticeDocument::from_domain(&notice))?;
        self.insert_document(notice.school_id(), NOTICES, notice.id().as_str(), body)
            .await
    }

    async fn find_notice(
        &self,
        school_id: TenantId,
        notice_id: &NoticeId,
    ) -> AppResult<Option<Notice>> {
        let Some(row) = self
            .find_document(school_id, NOTICES, notice_id.as_str())
            .await?
        else {
            return Ok(None);
        };

        decode::<NoticeDocument>(NOTICES, &row)?
            .into_domain(school_id, row.id.as_str(), row.created_at)
            .map(Some)
    }

    async fn save_notice(&self, notice: Notice) -> AppResult<()> {
        let body = encode(NOTICES, &NoticeDocument::from_domain(&notice))?;
        self.replace_document(notice.school_id(), NOTICES, notice.id().as_str(), body)
            .await
    }

    async fn list_notices(&self, school_id: TenantId) -> AppResult<Vec<Notice>> {
        let rows = self.list_documents(school_id, NOTICES, None).await?;
        Ok(readable_rows(NOTICES, &rows, |row| {
            decode::<NoticeDocument>(NOTICES, row)?.into_domain(school_id, row.id.as_str(), row.created_at)
        }))
    }
}

impl PostgresDocumentStore {
    async fn results_where(
        &self,
        school_id: TenantId,
        student_id: Option<&StudentId>,
    ) -> AppResult<Vec<ExamResult>> {
        let rows = self.list_documents(school_id, RESULTS, student_id).await?;
        Ok(readable_rows(RESULTS, &rows, |row| {
            decode::<ResultDocument>(RESULTS, row)?.into_domain(school_id, row.id.as_str(), row.created_at)
        }))
    }

    async fn payments_where(
        &self,
        school_id: TenantId,
        student_id: Option<&StudentId>,
    ) -> AppResult<Vec<Payment>> {
        let rows = self.list_documents(school_id, PAYMENTS, student_id).await?;
        Ok(readable_rows(PAYMENTS, &rows, |row| {
            decode::<PaymentDocument>(PAYMENTS, row)?.into_domain(school_id, row.id.as_str(), row.created_at)
        }))
    }
}

#[cfg(test)]
mod tests;
