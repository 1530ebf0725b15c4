//! Students and teachers enrolled in a school.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schooldesk_core::{AppError, AppResult, NonEmptyString, TenantId};
use serde::{Deserialize, Serialize};

use crate::identifiers::{LoginCode, StudentId, TeacherId};

/// Minimum characters in a student or teacher name.
pub const PERSON_NAME_MIN_LENGTH: usize = 3;

/// Classes a school may enrol students into, youngest first.
pub const CLASSES: [&str; 15] = [
    "Play", "Nursery", "KG", "Class 1", "Class 2", "Class 3", "Class 4", "Class 5", "Class 6",
    "Class 7", "Class 8", "Class 9", "Class 10", "Class 11", "Class 12",
];

/// Subjects a teacher may be assigned.
pub const SUBJECTS: [&str; 9] = [
    "Bangla",
    "English",
    "Math",
    "Science",
    "History",
    "Geography",
    "Art",
    "Music",
    "Physical Education",
];

/// First academic session year accepted.
pub const FIRST_SESSION: u16 = 2024;

/// Last academic session year accepted.
pub const LAST_SESSION: u16 = 2050;

/// Class from the fixed class list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchoolClass(&'static str);

impl SchoolClass {
    /// Parses a class name from [`CLASSES`].
    pub fn parse(value: &str) -> AppResult<Self> {
        let value = value.trim();
        CLASSES
            .into_iter()
            .find(|class| *class == value)
            .map(Self)
            .ok_or_else(|| AppError::Validation(format!("unknown class '{value}'")))
    }

    /// Returns the class name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl TryFrom<String> for SchoolClass {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.as_str())
    }
}

impl From<SchoolClass> for String {
    fn from(value: SchoolClass) -> Self {
        value.0.to_owned()
    }
}

impl Display for SchoolClass {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0)
    }
}

/// Subject from the fixed subject list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchoolSubject(&'static str);

impl SchoolSubject {
    /// Parses a subject name from [`SUBJECTS`].
    pub fn parse(value: &str) -> AppResult<Self> {
        let value = value.trim();
        SUBJECTS
            .into_iter()
            .find(|subject| *subject == value)
            .map(Self)
            .ok_or_else(|| AppError::Validation(format!("unknown subject '{value}'")))
    }

    /// Returns the subject name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl TryFrom<String> for SchoolSubject {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.as_str())
    }
}

impl From<SchoolSubject> for String {
    fn from(value: SchoolSubject) -> Self {
        value.0.to_owned()
    }
}

/// Daily shift a student attends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    /// Morning shift.
    Morning,
    /// Day shift.
    Day,
}

impl Shift {
    /// Returns the display and storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Day => "Day",
        }
    }
}

impl FromStr for Shift {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Morning" => Ok(Self::Morning),
            "Day" => Ok(Self::Day),
            _ => Err(AppError::Validation(format!("unknown shift '{value}'"))),
        }
    }
}

/// Academic session year between [`FIRST_SESSION`] and [`LAST_SESSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Session(u16);

impl Session {
    /// Creates a validated session year.
    pub fn new(year: u16) -> AppResult<Self> {
        if !(FIRST_SESSION..=LAST_SESSION).contains(&year) {
            return Err(AppError::Validation(format!(
                "session must be between {FIRST_SESSION} and {LAST_SESSION}"
            )));
        }

        Ok(Self(year))
    }

    /// Returns the session year.
    #[must_use]
    pub fn year(&self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Session {
    type Error = AppError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Session> for u16 {
    fn from(value: Session) -> Self {
        value.0
    }
}

/// Enrolment details of a new student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentProfile {
    /// Full name.
    pub name: String,
    /// Class name from [`CLASSES`].
    pub class: String,
    /// Roll number within the class.
    pub roll: u32,
    /// Attended shift.
    pub shift: Shift,
    /// Session year.
    pub session: u16,
}

/// Student enrolled in a school.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    school_id: TenantId,
    name: NonEmptyString,
    class: SchoolClass,
    roll: u32,
    shift: Shift,
    session: Session,
    login_code: LoginCode,
    created_at: DateTime<Utc>,
}

impl Student {
    /// Creates a validated student.
    pub fn new(
        id: StudentId,
        school_id: TenantId,
        profile: StudentProfile,
        login_code: LoginCode,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let name =
            NonEmptyString::with_min_length("student name", profile.name, PERSON_NAME_MIN_LENGTH)?;
        let class = SchoolClass::parse(profile.class.as_str())?;
        if profile.roll == 0 {
            return Err(AppError::Validation(
                "roll must be a positive number".to_owned(),
            ));
        }
        let session = Session::new(profile.session)?;

        Ok(Self {
            id,
            school_id,
            name,
            class,
            roll: profile.roll,
            shift: profile.shift,
            session,
            login_code,
            created_at,
        })
    }

    /// Returns the student id.
    #[must_use]
    pub fn id(&self) -> &StudentId {
        &self.id
    }

    /// Returns the school the student belongs to.
    #[must_use]
    pub fn school_id(&self) -> TenantId {
        self.school_id
    }

    /// Returns the student name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the class.
    #[must_use]
    pub fn class(&self) -> &SchoolClass {
        &self.class
    }

    /// Returns the roll number.
    #[must_use]
    pub fn roll(&self) -> u32 {
        self.roll
    }

    /// Returns the shift.
    #[must_use]
    pub fn shift(&self) -> Shift {
        self.shift
    }

    /// Returns the session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session
    }

    /// Returns the login code.
    #[must_use]
    pub fn login_code(&self) -> &LoginCode {
        &self.login_code
    }

    /// Returns the enrolment time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Optional roster filter. Unset fields match every student.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Restrict to one class.
    pub class: Option<SchoolClass>,
    /// Restrict to one session.
    pub session: Option<Session>,
    /// Restrict to one shift.
    pub shift: Option<Shift>,
}

impl StudentFilter {
    /// Returns whether the student passes every set criterion.
    #[must_use]
    pub fn matches(&self, student: &Student) -> bool {
        self.class
            .as_ref()
            .is_none_or(|class| student.class() == class)
            && self
                .session
                .is_none_or(|session| student.session() == session)
            && self.shift.is_none_or(|shift| student.shift() == shift)
    }
}

/// Teacher employed by a school.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    id: TeacherId,
    school_id: TenantId,
    name: NonEmptyString,
    assigned_class: SchoolClass,
    assigned_subjects: Vec<SchoolSubject>,
    login_code: LoginCode,
    created_at: DateTime<Utc>,
}

impl Teacher {
    /// Creates a validated teacher. At least one subject must be assigned.
    pub fn new(
        id: TeacherId,
        school_id: TenantId,
        name: impl Into<String>,
        assigned_class: &str,
        assigned_subjects: &[String],
        login_code: LoginCode,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let name = NonEmptyString::with_min_length("teacher name", name, PERSON_NAME_MIN_LENGTH)?;
        let assigned_class = SchoolClass::parse(assigned_class)?;

        let mut subjects: Vec<SchoolSubject> = Vec::with_capacity(assigned_subjects.len());
        for subject in assigned_subjects {
            let subject = SchoolSubject::parse(subject.as_str())?;
            if !subjects.contains(&subject) {
                subjects.push(subject);
            }
        }
        if subjects.is_empty() {
            return Err(AppError::Validation(
                "a teacher must be assigned at least one subject".to_owned(),
            ));
        }

        Ok(Self {
            id,
            school_id,
            name,
            assigned_class,
            assigned_subjects: subjects,
            login_code,
            created_at,
        })
    }

    /// Returns the teacher id.
    #[must_use]
    pub fn id(&self) -> &TeacherId {
        &self.id
    }

    /// Returns the school the teacher belongs to.
    #[must_use]
    pub fn school_id(&self) -> TenantId {
        self.school_id
    }

    /// Returns the teacher name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the class the teacher is responsible for.
    #[must_use]
    pub fn assigned_class(&self) -> &SchoolClass {
        &self.assigned_class
    }

    /// Returns the assigned subjects without duplicates.
    #[must_use]
    pub fn assigned_subjects(&self) -> &[SchoolSubject] {
        &self.assigned_subjects
    }

    /// Returns the login code.
    #[must_use]
    pub fn login_code(&self) -> &LoginCode {
        &self.login_code
    }

    /// Returns the hiring time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use schooldesk_core::TenantId;

    use super::{Shift, Student, StudentFilter, StudentProfile, Teacher};
    use crate::identifiers::{LoginCode, LoginCodeKind, StudentId, TeacherId};

    fn profile() -> StudentProfile {
        StudentProfile {
            name: "Rafi Ahmed".to_owned(),
            class: "Class 9".to_owned(),
            roll: 12,
            shift: Shift::Morning,
            session: 2025,
        }
    }

    fn student(profile: StudentProfile) -> Result<Student, schooldesk_core::AppError> {
        Student::new(
            StudentId::generate(),
            TenantId::new(),
            profile,
            LoginCode::from_random_bytes(LoginCodeKind::Student, [7; 6]),
            Utc::now(),
        )
    }

    #[test]
    fn valid_student_is_accepted() {
        let student = student(profile());
        assert_eq!(
            student.map(|value| value.class().as_str()).ok(),
            Some("Class 9")
        );
    }

    #[test]
    fn student_fields_are_validated() {
        assert!(
            student(StudentProfile {
                name: "Al".to_owned(),
                ..profile()
            })
            .is_err()
        );
        assert!(
            student(StudentProfile {
                class: "Class 13".to_owned(),
                ..profile()
            })
            .is_err()
        );
        assert!(student(StudentProfile { roll: 0, ..profile() }).is_err());
        assert!(
            student(StudentProfile {
                session: 2023,
                ..profile()
            })
            .is_err()
        );
        assert!(
            student(StudentProfile {
                session: 2051,
                ..profile()
            })
            .is_err()
        );
    }

    #[test]
    fn filter_matches_every_set_field() {
        let Ok(student) = student(profile()) else {
            panic!("valid student");
        };

        assert!(StudentFilter::default().matches(&student));
        let filter = StudentFilter {
            shift: Some(Shift::Day),
            ..StudentFilter::default()
        };
        assert!(!filter.matches(&student));
    }

    #[test]
    fn teacher_requires_known_subjects() {
        let make = |subjects: &[String]| {
            Teacher::new(
                TeacherId::generate(),
                TenantId::new(),
                "Nasrin Sultana",
                "Class 5",
                subjects,
                LoginCode::from_random_bytes(LoginCodeKind::Teacher, [3; 6]),
                Utc::now(),
            )
        };

        assert!(make(&[]).is_err());
        assert!(make(&["Alchemy".to_owned()]).is_err());

        let teacher = make(&["Math".to_owned(), "Math".to_owned(), "Science".to_owned()]);
        assert_eq!(
            teacher.map(|value| value.assigned_subjects().len()).ok(),
            Some(2)
        );
    }
}
