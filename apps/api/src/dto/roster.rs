use chrono::{DateTime, Utc};
use schooldesk_application::AddTeacherInput;
use schooldesk_core::AppError;
use schooldesk_domain::{Student, StudentProfile, Teacher};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming student enrolment payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-student-request.ts"
)]
pub struct CreateStudentRequest {
    pub name: String,
    pub class: String,
    pub roll: u32,
    #[ts(type = "\"Morning\" | \"Day\"")]
    pub shift: String,
    pub session: u16,
}

impl TryFrom<CreateStudentRequest> for StudentProfile {
    type Error = AppError;

    fn try_from(value: CreateStudentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            class: value.class,
            roll: value.roll,
            shift: value.shift.parse()?,
            session: value.session,
        })
    }
}

/// API representation of an enrolled student.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/student-response.ts"
)]
pub struct StudentResponse {
    pub id: String,
    pub name: String,
    pub class: String,
    pub roll: u32,
    pub shift: String,
    pub session: u16,
    pub login_code: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<Student> for StudentResponse {
    fn from(value: Student) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            name: value.name().as_str().to_owned(),
            class: value.class().as_str().to_owned(),
            roll: value.roll(),
            shift: value.shift().as_str().to_owned(),
            session: value.session().year(),
            login_code: value.login_code().as_str().to_owned(),
            created_at: value.created_at(),
        }
    }
}

/// Incoming teacher hiring payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-teacher-request.ts"
)]
pub struct CreateTeacherRequest {
    pub name: String,
    pub assigned_class: String,
    #[serde(default)]
    pub assigned_subjects: Vec<String>,
}

impl From<CreateTeacherRequest> for AddTeacherInput {
    fn from(value: CreateTeacherRequest) -> Self {
        Self {
            name: value.name,
            assigned_class: value.assigned_class,
            assigned_subjects: value.assigned_subjects,
        }
    }
}

/// API representation of a teacher.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/teacher-response.ts"
)]
pub struct TeacherResponse {
    pub id: String,
    pub name: String,
    pub assigned_class: String,
    pub assigned_subjects: Vec<String>,
    pub login_code: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<Teacher> for TeacherResponse {
    fn from(value: Teacher) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            name: value.name().as_str().to_owned(),
            assigned_class: value.assigned_class().as_str().to_owned(),
            assigned_subjects: value
                .assigned_subjects()
                .iter()
                .map(|subject| subject.as_str().to_owned())
                .collect(),
            login_code: value.login_code().as_str().to_owned(),
            created_at: value.created_at(),
        }
    }
}
