//! Exam result entry, publication and student views.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use schooldesk_core::{AppError, AppResult, RoleClaims, UserRole};
use schooldesk_domain::{
    ExamResult, GradeSheet, ResultId, StudentId, SubjectMark, grade_sheet,
};

use crate::{ResultRepository, RosterRepository};

/// One subject mark as entered by a teacher.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectMarkInput {
    /// Subject name.
    pub name: String,
    /// Mark between 0 and 100.
    pub mark: f64,
}

/// Input payload for recording a result.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordResultInput {
    /// Student the result belongs to.
    pub student_id: String,
    /// Exam name, at least three characters.
    pub exam_name: String,
    /// Subject marks.
    pub subjects: Vec<SubjectMarkInput>,
}

/// Application service for exam results.
#[derive(Clone)]
pub struct ResultService {
    results: Arc<dyn ResultRepository>,
    roster: Arc<dyn RosterRepository>,
}

impl ResultService {
    /// Creates a new result service.
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>, roster: Arc<dyn RosterRepository>) -> Self {
        Self { results, roster }
    }

    /// Records an unpublished result for a student of the teacher's school.
    pub async fn record_result(
        &self,
        actor: &RoleClaims,
        input: RecordResultInput,
    ) -> AppResult<ExamResult> {
        actor.require_role(&[UserRole::Teacher])?;
        let school_id = actor.require_school()?;
        let student_id = StudentId::new(input.student_id)?;
        let subjects = subject_marks(&input.subjects)?;

        let student = self
            .roster
            .find_student(school_id, &student_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("student '{student_id}' does not exist")))?;

        let result = ExamResult::record(
            ResultId::generate(),
            student_id,
            student.name().as_str(),
            school_id,
            input.exam_name,
            subjects,
            Utc::now(),
        )?;
        self.results.create_result(result.clone()).await?;
        info!(
            %school_id,
            result_id = %result.id(),
            gpa = %result.gpa(),
            "result recorded"
        );

        Ok(result)
    }

    /// Grades marks without storing anything.
    pub fn preview_gpa(&self, subjects: &[SubjectMarkInput]) -> AppResult<GradeSheet> {
        Ok(grade_sheet(&subject_marks(subjects)?))
    }

    /// Lists every result of the administrator's school, newest first.
    pub async fn list_results(&self, actor: &RoleClaims) -> AppResult<Vec<ExamResult>> {
        actor.require_role(&[UserRole::Admin])?;
        let school_id = actor.require_school()?;

        let mut results = self.results.list_results(school_id).await?;
        newest_first(&mut results);
        Ok(results)
    }

    /// Publishes or withdraws a result.
    pub async fn set_result_published(
        &self,
        actor: &RoleClaims,
        result_id: &ResultId,
        published: bool,
    ) -> AppResult<ExamResult> {
        actor.require_role(&[UserRole::Admin])?;
        let school_id = actor.require_school()?;

        let mut result = self
            .results
            .find_result(school_id, result_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("result '{result_id}' does not exist")))?;
        result.set_published(published);
        self.results.save_result(result.clone()).await?;
        info!(%school_id, %result_id, published, "result publication changed");

        Ok(result)
    }

    /// Lists the calling student's published results, newest first.
    pub async fn list_my_results(&self, actor: &RoleClaims) -> AppResult<Vec<ExamResult>> {
        actor.require_role(&[UserRole::Student])?;
        let school_id = actor.require_school()?;
        let student_id = StudentId::new(actor.subject())?;

        let mut results: Vec<ExamResult> = self
            .results
            .list_results_for_student(school_id, &student_id)
            .await?
            .into_iter()
            .filter(|result| result.is_visible_to_student(&student_id))
            .collect();
        newest_first(&mut results);
        Ok(results)
    }
}

fn subject_marks(inputs: &[SubjectMarkInput]) -> AppResult<Vec<SubjectMark>> {
    if inputs.is_empty() {
        return Err(AppError::Validation(
            "at least one subject mark is required".to_owned(),
        ));
    }

    inputs
        .iter()
        .map(|input| SubjectMark::new(input.name.as_str(), input.mark))
        .collect()
}

fn newest_first(results: &mut [ExamResult]) {
    results.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
}

#[cfg(test)]
mod tests;
