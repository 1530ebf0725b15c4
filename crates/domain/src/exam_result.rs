//! Exam results with their cached GPA.

use chrono::{DateTime, Utc};
use schooldesk_core::{AppError, AppResult, NonEmptyString, TenantId};

use crate::grading::{Gpa, SubjectMark, compute_gpa};
use crate::identifiers::{ResultId, StudentId};

/// Minimum characters in an exam name.
pub const EXAM_NAME_MIN_LENGTH: usize = 3;

/// Marks of one student in one exam.
///
/// The GPA is computed once when the result is created and never edited.
/// Publishing is the only mutation a result supports.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamResult {
    id: ResultId,
    student_id: StudentId,
    student_name: NonEmptyString,
    school_id: TenantId,
    exam_name: NonEmptyString,
    subjects: Vec<SubjectMark>,
    gpa: Gpa,
    published: bool,
    created_at: DateTime<Utc>,
}

/// Stored result fields required to rebuild an [`ExamResult`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExamResultParts {
    /// Result id.
    pub id: ResultId,
    /// Student the result belongs to.
    pub student_id: StudentId,
    /// Student name at the time of entry.
    pub student_name: String,
    /// Owning school.
    pub school_id: TenantId,
    /// Exam name.
    pub exam_name: String,
    /// Subject marks.
    pub subjects: Vec<SubjectMark>,
    /// Publication flag.
    pub published: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl ExamResult {
    /// Records a new, unpublished result and computes its GPA.
    pub fn record(
        id: ResultId,
        student_id: StudentId,
        student_name: impl Into<String>,
        school_id: TenantId,
        exam_name: impl Into<String>,
        subjects: Vec<SubjectMark>,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Self::from_parts(ExamResultParts {
            id,
            student_id,
            student_name: student_name.into(),
            school_id,
            exam_name: exam_name.into(),
            subjects,
            published: false,
            created_at,
        })
    }

    /// Rebuilds a stored result. The GPA is recomputed from the marks.
    pub fn from_parts(parts: ExamResultParts) -> AppResult<Self> {
        let student_name = NonEmptyString::new(parts.student_name)
            .map_err(|_| AppError::Validation("student name must not be empty".to_owned()))?;
        let exam_name =
            NonEmptyString::with_min_length("exam name", parts.exam_name, EXAM_NAME_MIN_LENGTH)?;
        if parts.subjects.is_empty() {
            return Err(AppError::Validation(
                "a result must contain at least one subject".to_owned(),
            ));
        }
        let gpa = compute_gpa(&parts.subjects);

        Ok(Self {
            id: parts.id,
            student_id: parts.student_id,
            student_name,
            school_id: parts.school_id,
            exam_name,
            subjects: parts.subjects,
            gpa,
            published: parts.published,
            created_at: parts.created_at,
        })
    }

    /// Returns the result id.
    #[must_use]
    pub fn id(&self) -> &ResultId {
        &self.id
    }

    /// Returns the student id.
    #[must_use]
    pub fn student_id(&self) -> &StudentId {
        &self.student_id
    }

    /// Returns the student name.
    #[must_use]
    pub fn student_name(&self) -> &NonEmptyString {
        &self.student_name
    }

    /// Returns the owning school.
    #[must_use]
    pub fn school_id(&self) -> TenantId {
        self.school_id
    }

    /// Returns the exam name.
    #[must_use]
    pub fn exam_name(&self) -> &NonEmptyString {
        &self.exam_name
    }

    /// Returns the subject marks.
    #[must_use]
    pub fn subjects(&self) -> &[SubjectMark] {
        &self.subjects
    }

    /// Returns the cached GPA.
    #[must_use]
    pub fn gpa(&self) -> Gpa {
        self.gpa
    }

    /// Returns whether the student may see the result.
    #[must_use]
    pub fn published(&self) -> bool {
        self.published
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sets the publication flag.
    pub fn set_published(&mut self, published: bool) {
        self.published = published;
    }

    /// Returns whether the student behind `student_id` may read this result.
    #[must_use]
    pub fn is_visible_to_student(&self, student_id: &StudentId) -> bool {
        self.published && &self.student_id == student_id
    }
}
