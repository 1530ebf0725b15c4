//! Student and teacher roster management.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use schooldesk_core::{AppError, AppResult, RoleClaims, TenantId, UserRole};
use schooldesk_domain::{
    LoginCodeKind, School, SchoolStatus, SeatCheck, SeatKind, Student, StudentFilter, StudentId,
    StudentProfile, Teacher, TeacherId,
};

use crate::login_codes::generate_unique_login_code;
use crate::{RosterRepository, SchoolRepository};

/// Input payload for hiring a teacher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTeacherInput {
    /// Teacher name, at least three characters.
    pub name: String,
    /// Class the teacher is responsible for.
    pub assigned_class: String,
    /// Subjects the teacher teaches.
    pub assigned_subjects: Vec<String>,
}

/// Application service for school rosters.
#[derive(Clone)]
pub struct RosterService {
    schools: Arc<dyn SchoolRepository>,
    roster: Arc<dyn RosterRepository>,
}

impl RosterService {
    /// Creates a new roster service.
    #[must_use]
    pub fn new(schools: Arc<dyn SchoolRepository>, roster: Arc<dyn RosterRepository>) -> Self {
        Self { schools, roster }
    }

    /// Enrols a student in the administrator's school.
    pub async fn add_student(
        &self,
        actor: &RoleClaims,
        profile: StudentProfile,
    ) -> AppResult<Student> {
        actor.require_role(&[UserRole::Admin])?;
        let school = self.enrolling_school(actor).await?;

        let enrolled = self.roster.list_students(school.id()).await?;
        let login_code = generate_unique_login_code(LoginCodeKind::Student, |code| {
            enrolled.iter().any(|student| student.login_code() == code)
        })?;
        let student = Student::new(
            StudentId::generate(),
            school.id(),
            profile,
            login_code,
            Utc::now(),
        )?;

        let check = self
            .roster
            .insert_student_within_limit(student.clone(), school.subscription().max_students())
            .await?;
        seat_taken(check, SeatKind::Student, school.id())?;
        info!(school_id = %school.id(), student_id = %student.id(), "student enrolled");

        Ok(student)
    }

    /// Hires a teacher in the administrator's school.
    pub async fn add_teacher(
        &self,
        actor: &RoleClaims,
        input: AddTeacherInput,
    ) -> AppResult<Teacher> {
        actor.require_role(&[UserRole::Admin])?;
        let school = self.enrolling_school(actor).await?;

        let employed = self.roster.list_teachers(school.id()).await?;
        let login_code = generate_unique_login_code(LoginCodeKind::Teacher, |code| {
            employed.iter().any(|teacher| teacher.login_code() == code)
        })?;
        let teacher = Teacher::new(
            TeacherId::generate(),
            school.id(),
            input.name,
            input.assigned_class.as_str(),
            &input.assigned_subjects,
            login_code,
            Utc::now(),
        )?;

        let check = self
            .roster
            .insert_teacher_within_limit(teacher.clone(), school.subscription().max_teachers())
            .await?;
        seat_taken(check, SeatKind::Teacher, school.id())?;
        info!(school_id = %school.id(), teacher_id = %teacher.id(), "teacher hired");

        Ok(teacher)
    }

    /// Lists the students of the administrator's school ordered by name.
    pub async fn list_students(
        &self,
        actor: &RoleClaims,
        filter: &StudentFilter,
    ) -> AppResult<Vec<Student>> {
        actor.require_role(&[UserRole::Admin])?;
        let school_id = actor.require_school()?;

        let mut students: Vec<Student> = self
            .roster
            .list_students(school_id)
            .await?
            .into_iter()
            .filter(|student| filter.matches(student))
            .collect();
        students.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(students)
    }

    /// Lists the teachers of the administrator's school ordered by name.
    pub async fn list_teachers(&self, actor: &RoleClaims) -> AppResult<Vec<Teacher>> {
        actor.require_role(&[UserRole::Admin])?;
        let school_id = actor.require_school()?;

        let mut teachers = self.roster.list_teachers(school_id).await?;
        teachers.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(teachers)
    }

    /// Lists the students in the calling teacher's assigned class.
    pub async fn list_my_students(&self, actor: &RoleClaims) -> AppResult<Vec<Student>> {
        actor.require_role(&[UserRole::Teacher])?;
        let school_id = actor.require_school()?;
        let teacher_id = TeacherId::new(actor.subject())?;

        let teacher = self
            .roster
            .find_teacher(school_id, &teacher_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("teacher '{teacher_id}' does not exist"))
            })?;
        let filter = StudentFilter {
            class: Some(teacher.assigned_class().clone()),
            ..StudentFilter::default()
        };

        let mut students: Vec<Student> = self
            .roster
            .list_students(school_id)
            .await?
            .into_iter()
            .filter(|student| filter.matches(student))
            .collect();
        students.sort_by_key(Student::roll);
        Ok(students)
    }

    async fn enrolling_school(&self, actor: &RoleClaims) -> AppResult<School> {
        let school_id = actor.require_school()?;
        let school = self
            .schools
            .find_school(school_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("school '{school_id}' does not exist")))?;

        if school.status() == SchoolStatus::Disabled {
            warn!(%school_id, "roster change refused for disabled school");
            return Err(AppError::Forbidden(format!(
                "school '{school_id}' is disabled"
            )));
        }
        if !school.subscription().is_active_at(Utc::now()) {
            warn!(%school_id, "roster change refused for expired subscription");
            return Err(AppError::Forbidden(format!(
                "subscription of school '{school_id}' has expired"
            )));
        }

        Ok(school)
    }
}

fn seat_taken(check: SeatCheck, kind: SeatKind, school_id: TenantId) -> AppResult<()> {
    match check {
        SeatCheck::Available => Ok(()),
        SeatCheck::LimitReached { current, max } => {
            warn!(%school_id, seat = kind.as_str(), current, max, "seat limit reached");
            Err(AppError::Conflict(format!(
                "{} limit of {max} reached for this subscription",
                kind.as_str()
            )))
        }
    }
}
