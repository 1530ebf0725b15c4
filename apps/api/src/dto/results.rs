use chrono::{DateTime, Utc};
use schooldesk_application::{RecordResultInput, SubjectMarkInput};
use schooldesk_domain::{ExamResult, GradeSheet, GradedSubject, grade_sheet};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One subject mark in a request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/subject-mark-request.ts"
)]
pub struct SubjectMarkRequest {
    pub name: String,
    pub mark: f64,
}

impl From<SubjectMarkRequest> for SubjectMarkInput {
    fn from(value: SubjectMarkRequest) -> Self {
        Self {
            name: value.name,
            mark: value.mark,
        }
    }
}

/// Incoming exam result payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/record-result-request.ts"
)]
pub struct RecordResultRequest {
    pub student_id: String,
    pub exam_name: String,
    pub subjects: Vec<SubjectMarkRequest>,
}

impl From<RecordResultRequest> for RecordResultInput {
    fn from(value: RecordResultRequest) -> Self {
        Self {
            student_id: value.student_id,
            exam_name: value.exam_name,
            subjects: value
                .subjects
                .into_iter()
                .map(SubjectMarkInput::from)
                .collect(),
        }
    }
}

/// Marks to grade without saving a result.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/preview-gpa-request.ts"
)]
pub struct PreviewGpaRequest {
    pub subjects: Vec<SubjectMarkRequest>,
}

impl PreviewGpaRequest {
    pub fn into_inputs(self) -> Vec<SubjectMarkInput> {
        self.subjects
            .into_iter()
            .map(SubjectMarkInput::from)
            .collect()
    }
}

/// Graded subject row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/graded-subject-response.ts"
)]
pub struct GradedSubjectResponse {
    pub name: String,
    pub mark: f64,
    pub letter: String,
    pub point: f64,
}

impl From<GradedSubject> for GradedSubjectResponse {
    fn from(value: GradedSubject) -> Self {
        Self {
            name: value.name,
            mark: value.mark,
            letter: value.grade.letter.to_owned(),
            point: value.grade.point,
        }
    }
}

/// Per-subject grades with the overall GPA.
///
/// The GPA is rendered with two decimals, e.g. `"4.50"`.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/grade-sheet-response.ts"
)]
pub struct GradeSheetResponse {
    pub subjects: Vec<GradedSubjectResponse>,
    pub gpa: String,
    pub failed: bool,
}

impl From<GradeSheet> for GradeSheetResponse {
    fn from(value: GradeSheet) -> Self {
        Self {
            subjects: value
                .subjects
                .into_iter()
                .map(GradedSubjectResponse::from)
                .collect(),
            gpa: value.gpa.to_string(),
            failed: value.failed,
        }
    }
}

/// API representation of a recorded exam result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/result-response.ts"
)]
pub struct ResultResponse {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub exam_name: String,
    pub sheet: GradeSheetResponse,
    pub published: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<ExamResult> for ResultResponse {
    fn from(value: ExamResult) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            student_id: value.student_id().as_str().to_owned(),
            student_name: value.student_name().as_str().to_owned(),
            exam_name: value.exam_name().as_str().to_owned(),
            sheet: GradeSheetResponse::from(grade_sheet(value.subjects())),
            published: value.published(),
            created_at: value.created_at(),
        }
    }
}
