use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use schooldesk_core::RoleClaims;
use schooldesk_domain::{SchoolClass, Session, Shift, StudentFilter, StudentProfile};
use serde::Deserialize;

use crate::dto::{CreateStudentRequest, CreateTeacherRequest, StudentResponse, TeacherResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Optional roster filters. Blank values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct StudentListQuery {
    pub class: Option<String>,
    pub session: Option<u16>,
    pub shift: Option<String>,
}

impl StudentListQuery {
    fn into_filter(self) -> ApiResult<StudentFilter> {
        let class = non_blank(self.class)
            .map(|class| SchoolClass::parse(class.as_str()))
            .transpose()?;
        let session = self.session.map(Session::new).transpose()?;
        let shift = non_blank(self.shift)
            .map(|shift| shift.parse::<Shift>())
            .transpose()?;

        Ok(StudentFilter {
            class,
            session,
            shift,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

pub async fn list_students_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Query(query): Query<StudentListQuery>,
) -> ApiResult<Json<Vec<StudentResponse>>> {
    let filter = query.into_filter()?;
    let students = state
        .roster_service
        .list_students(&claims, &filter)
        .await?
        .into_iter()
        .map(StudentResponse::from)
        .collect();

    Ok(Json(students))
}

pub async fn create_student_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Json(payload): Json<CreateStudentRequest>,
) -> ApiResult<(StatusCode, Json<StudentResponse>)> {
    let profile = StudentProfile::try_from(payload)?;
    let student = state.roster_service.add_student(&claims, profile).await?;

    Ok((StatusCode::CREATED, Json(StudentResponse::from(student))))
}

pub async fn list_teachers_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
) -> ApiResult<Json<Vec<TeacherResponse>>> {
    let teachers = state
        .roster_service
        .list_teachers(&claims)
        .await?
        .into_iter()
        .map(TeacherResponse::from)
        .collect();

    Ok(Json(teachers))
}

pub async fn create_teacher_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Json(payload): Json<CreateTeacherRequest>,
) -> ApiResult<(StatusCode, Json<TeacherResponse>)> {
    let teacher = state
        .roster_service
        .add_teacher(&claims, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(TeacherResponse::from(teacher))))
}

pub async fn list_my_students_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
) -> ApiResult<Json<Vec<StudentResponse>>> {
    let students = state
        .roster_service
        .list_my_students(&claims)
        .await?
        .into_iter()
        .map(StudentResponse::from)
        .collect();

    Ok(Json(students))
}
