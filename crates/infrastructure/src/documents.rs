//! JSON document shapes persisted by the document store.
//!
//! Documents written by older clients use camelCase keys and store
//! timestamps either as `{seconds, nanoseconds}` objects or RFC 3339
//! strings. Both are accepted on read; writes always use snake_case keys and
//! RFC 3339 strings.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use schooldesk_core::{AppError, AppResult, TenantId};
use schooldesk_domain::{
    ExamResult, ExamResultParts, LoginCode, LoginCodeKind, Notice, NoticeAudience, NoticeId,
    NoticeParts, Payment, PaymentId, PaymentMethod, PaymentParts, PaymentStatus, ResultId, School,
    SchoolStatus, Shift, Student, StudentId, StudentProfile, SubjectMark, Subscription, Teacher,
    TeacherId,
};

/// Collection holding school documents.
pub const SCHOOLS: &str = "schools";
/// Collection holding student documents.
pub const STUDENTS: &str = "students";
/// Collection holding teacher documents.
pub const TEACHERS: &str = "teachers";
/// Collection holding exam result documents.
pub const RESULTS: &str = "results";
/// Collection holding payment documents.
pub const PAYMENTS: &str = "payments";
/// Collection holding notice documents.
pub const NOTICES: &str = "notices";

/// Timestamp in one of the stored encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredTimestamp {
    /// Seconds and nanoseconds since the Unix epoch.
    Epoch {
        /// Whole seconds.
        #[serde(alias = "_seconds")]
        seconds: i64,
        /// Sub-second nanoseconds.
        #[serde(alias = "_nanoseconds", default)]
        nanoseconds: u32,
    },
    /// RFC 3339 string.
    Rfc3339(String),
}

impl StoredTimestamp {
    /// Encodes an instant for storage.
    #[must_use]
    pub fn from_utc(value: DateTime<Utc>) -> Self {
        Self::Rfc3339(value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    /// Normalises the stored value to UTC.
    pub fn to_utc(&self) -> AppResult<DateTime<Utc>> {
        match self {
            Self::Epoch {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds).ok_or_else(|| {
                AppError::Internal(format!(
                    "stored timestamp {seconds}.{nanoseconds:09} is out of range"
                ))
            }),
            Self::Rfc3339(value) => DateTime::parse_from_rfc3339(value)
                .map(|parsed| parsed.with_timezone(&Utc))
                .map_err(|error| {
                    AppError::Internal(format!("stored timestamp '{value}' is invalid: {error}"))
                }),
        }
    }
}

fn created_at_or(
    stored: Option<&StoredTimestamp>,
    row_created_at: DateTime<Utc>,
) -> AppResult<DateTime<Utc>> {
    stored.map_or(Ok(row_created_at), StoredTimestamp::to_utc)
}

fn corrupt(collection: &str, id: &str, error: AppError) -> AppError {
    AppError::Internal(format!(
        "stored {collection} document '{id}' is invalid: {error}"
    ))
}

/// Stored subscription terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDocument {
    /// Student seat limit.
    #[serde(alias = "maxStudent")]
    pub max_students: u32,
    /// Teacher seat limit.
    #[serde(alias = "maxTeacher")]
    pub max_teachers: u32,
    /// Expiry instant.
    pub expiry: StoredTimestamp,
}

/// Stored school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolDocument {
    /// School name.
    pub name: String,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Login code.
    pub code: String,
    /// Operating status.
    pub status: String,
    /// Subscription terms.
    pub subscription: SubscriptionDocument,
    /// Creation time.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<StoredTimestamp>,
}

impl SchoolDocument {
    /// Encodes a school.
    #[must_use]
    pub fn from_domain(school: &School) -> Self {
        let subscription = school.subscription();
        Self {
            name: school.name().as_str().to_owned(),
            address: school.address().map(str::to_owned),
            code: school.code().as_str().to_owned(),
            status: school.status().as_str().to_owned(),
            subscription: SubscriptionDocument {
                max_students: subscription.max_students(),
                max_teachers: subscription.max_teachers(),
                expiry: StoredTimestamp::from_utc(subscription.expiry()),
            },
            created_at: Some(StoredTimestamp::from_utc(school.created_at())),
        }
    }

    /// Decodes a school stored under `school_id`.
    pub fn into_domain(
        self,
        school_id: TenantId,
        row_created_at: DateTime<Utc>,
    ) -> AppResult<School> {
        let id = school_id.to_string();
        let decode = || -> AppResult<School> {
            let subscription = Subscription::new(
                self.subscription.max_students,
                self.subscription.max_teachers,
                self.subscription.expiry.to_utc()?,
            )?;
            School::new(
                school_id,
                self.name,
                self.address,
                LoginCode::parse(LoginCodeKind::School, self.code)?,
                self.status.parse::<SchoolStatus>()?,
                subscription,
                created_at_or(self.created_at.as_ref(), row_created_at)?,
            )
        };

        decode().map_err(|error| corrupt(SCHOOLS, id.as_str(), error))
    }
}

/// Session year, stored as a number or as legacy text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredSession {
    /// Numeric year.
    Year(u16),
    /// Year as text.
    Text(String),
}

impl StoredSession {
    fn year(&self) -> AppResult<u16> {
        match self {
            Self::Year(year) => Ok(*year),
            Self::Text(text) => text
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::Validation(format!("session '{text}' is not a year"))),
        }
    }
}

/// Stored student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDocument {
    /// Student name.
    pub name: String,
    /// Class name.
    pub class: String,
    /// Roll number.
    pub roll: u32,
    /// Shift name.
    pub shift: String,
    /// Session year.
    pub session: StoredSession,
    /// Login code.
    #[serde(alias = "loginCode")]
    pub login_code: String,
    /// Enrolment time.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<StoredTimestamp>,
}

impl StudentDocument {
    /// Encodes a student.
    #[must_use]
    pub fn from_domain(student: &Student) -> Self {
        Self {
            name: student.name().as_str().to_owned(),
            class: student.class().as_str().to_owned(),
            roll: student.roll(),
            shift: student.shift().as_str().to_owned(),
            session: StoredSession::Year(student.session().year()),
            login_code: student.login_code().as_str().to_owned(),
            created_at: Some(StoredTimestamp::from_utc(student.created_at())),
        }
    }

    /// Decodes a student stored under `id`.
    pub fn into_domain(
        self,
        school_id: TenantId,
        id: &str,
        row_created_at: DateTime<Utc>,
    ) -> AppResult<Student> {
        let decode = || -> AppResult<Student> {
            Student::new(
                StudentId::new(id)?,
                school_id,
                StudentProfile {
                    name: self.name,
                    class: self.class,
                    roll: self.roll,
                    shift: self.shift.parse::<Shift>()?,
                    session: self.session.year()?,
                },
                LoginCode::parse(LoginCodeKind::Student, self.login_code)?,
                created_at_or(self.created_at.as_ref(), row_created_at)?,
            )
        };

        decode().map_err(|error| corrupt(STUDENTS, id, error))
    }
}

/// Stored teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherDocument {
    /// Teacher name.
    pub name: String,
    /// Assigned class.
    #[serde(alias = "assignedClass")]
    pub assigned_class: String,
    /// Assigned subjects.
    #[serde(alias = "assignedSubjects")]
    pub assigned_subjects: Vec<String>,
    /// Login code.
    #[serde(alias = "loginCode")]
    pub login_code: String,
    /// Hiring time.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<StoredTimestamp>,
}

impl TeacherDocument {
    /// Encodes a teacher.
    #[must_use]
    pub fn from_domain(teacher: &Teacher) -> Self {
        Self {
            name: teacher.name().as_str().to_owned(),
            assigned_class: teacher.assigned_class().as_str().to_owned(),
            assigned_subjects: teacher
                .assigned_subjects()
                .iter()
                .map(|subject| subject.as_str().to_owned())
                .collect(),
            login_code: teacher.login_code().as_str().to_owned(),
            created_at: Some(StoredTimestamp::from_utc(teacher.created_at())),
        }
    }

    /// Decodes a teacher stored under `id`.
    pub fn into_domain(
        self,
        school_id: TenantId,
        id: &str,
        row_created_at: DateTime<Utc>,
    ) -> AppResult<Teacher> {
        let decode = || -> AppResult<Teacher> {
            Teacher::new(
                TeacherId::new(id)?,
                school_id,
                self.name,
                self.assigned_class.as_str(),
                &self.assigned_subjects,
                LoginCode::parse(LoginCodeKind::Teacher, self.login_code)?,
                created_at_or(self.created_at.as_ref(), row_created_at)?,
            )
        };

        decode().map_err(|error| corrupt(TEACHERS, id, error))
    }
}

/// Stored subject mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMarkDocument {
    /// Subject name.
    pub name: String,
    /// Mark.
    pub mark: f64,
}

/// Stored exam result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    /// Student id.
    #[serde(alias = "studentId")]
    pub student_id: String,
    /// Student name.
    #[serde(alias = "studentName")]
    pub student_name: String,
    /// Exam name.
    #[serde(alias = "examName")]
    pub exam_name: String,
    /// Subject marks.
    pub subjects: Vec<SubjectMarkDocument>,
    /// GPA as written. Recomputed from the marks on read.
    #[serde(default)]
    pub gpa: f64,
    /// Publication flag.
    #[serde(default)]
    pub published: bool,
    /// Creation time.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<StoredTimestamp>,
}

impl ResultDocument {
    /// Encodes a result.
    #[must_use]
    pub fn from_domain(result: &ExamResult) -> Self {
        Self {
            student_id: result.student_id().as_str().to_owned(),
            student_name: result.student_name().as_str().to_owned(),
            exam_name: result.exam_name().as_str().to_owned(),
            subjects: result
                .subjects()
                .iter()
                .map(|subject| SubjectMarkDocument {
                    name: subject.name().as_str().to_owned(),
                    mark: subject.mark(),
                })
                .collect(),
            gpa: result.gpa().value(),
            published: result.published(),
            created_at: Some(StoredTimestamp::from_utc(result.created_at())),
        }
    }

    /// Decodes a result stored under `id`.
    pub fn into_domain(
        self,
        school_id: TenantId,
        id: &str,
        row_created_at: DateTime<Utc>,
    ) -> AppResult<ExamResult> {
        let decode = || -> AppResult<ExamResult> {
            let subjects = self
                .subjects
                .into_iter()
                .map(|subject| SubjectMark::new(subject.name, subject.mark))
                .collect::<AppResult<Vec<_>>>()?;
            ExamResult::from_parts(ExamResultParts {
                id: ResultId::new(id)?,
                student_id: StudentId::new(self.student_id)?,
                student_name: self.student_name,
                school_id,
                exam_name: self.exam_name,
                subjects,
                published: self.published,
                created_at: created_at_or(self.created_at.as_ref(), row_created_at)?,
            })
        };

        decode().map_err(|error| corrupt(RESULTS, id, error))
    }
}

/// Stored payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDocument {
    /// Student id.
    #[serde(alias = "studentId")]
    pub student_id: String,
    /// Student name.
    #[serde(alias = "studentName")]
    pub student_name: String,
    /// Amount.
    pub amount: Decimal,
    /// Method display name.
    pub method: String,
    /// Transaction reference.
    pub trx: String,
    /// Review state.
    pub status: String,
    /// Submission time.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<StoredTimestamp>,
    /// Approval time.
    #[serde(default, alias = "approvedAt")]
    pub approved_at: Option<StoredTimestamp>,
}

impl PaymentDocument {
    /// Encodes a payment.
    #[must_use]
    pub fn from_domain(payment: &Payment) -> Self {
        Self {
            student_id: payment.student_id().as_str().to_owned(),
            student_name: payment.student_name().as_str().to_owned(),
            amount: payment.amount(),
            method: payment.method().as_str().to_owned(),
            trx: payment.trx().as_str().to_owned(),
            status: payment.status().as_str().to_owned(),
            created_at: Some(StoredTimestamp::from_utc(payment.created_at())),
            approved_at: payment.approved_at().map(StoredTimestamp::from_utc),
        }
    }

    /// Decodes a payment stored under `id`.
    pub fn into_domain(
        self,
        school_id: TenantId,
        id: &str,
        row_created_at: DateTime<Utc>,
    ) -> AppResult<Payment> {
        let decode = || -> AppResult<Payment> {
            Payment::from_parts(PaymentParts {
                id: PaymentId::new(id)?,
                student_id: StudentId::new(self.student_id)?,
                student_name: self.student_name,
                school_id,
                amount: self.amount,
                method: self.method.parse::<PaymentMethod>()?,
                trx: self.trx,
                status: self.status.parse::<PaymentStatus>()?,
                created_at: created_at_or(self.created_at.as_ref(), row_created_at)?,
                approved_at: self
                    .approved_at
                    .as_ref()
                    .map(StoredTimestamp::to_utc)
                    .transpose()?,
            })
        };

        decode().map_err(|error| corrupt(PAYMENTS, id, error))
    }
}

/// Stored notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeDocument {
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Audience value.
    #[serde(alias = "publishTo")]
    pub audience: String,
    /// Target class of class notices.
    #[serde(default, alias = "classDetails")]
    pub class_details: Option<String>,
    /// Publication flag.
    #[serde(default)]
    pub published: bool,
    /// Creation time.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<StoredTimestamp>,
}

impl NoticeDocument {
    /// Encodes a notice.
    #[must_use]
    pub fn from_domain(notice: &Notice) -> Self {
        Self {
            title: notice.title().as_str().to_owned(),
            content: notice.content().as_str().to_owned(),
            audience: notice.audience().as_str().to_owned(),
            class_details: notice.class_details().map(|class| class.as_str().to_owned()),
            published: notice.published(),
            created_at: Some(StoredTimestamp::from_utc(notice.created_at())),
        }
    }

    /// Decodes a notice stored under `id`.
    pub fn into_domain(
        self,
        school_id: TenantId,
        id: &str,
        row_created_at: DateTime<Utc>,
    ) -> AppResult<Notice> {
        let decode = || -> AppResult<Notice> {
            Notice::new(NoticeParts {
                id: NoticeId::new(id)?,
                school_id,
                title: self.title,
                content: self.content,
                audience: self.audience.parse::<NoticeAudience>()?,
                class_details: self.class_details,
                published: self.published,
                created_at: created_at_or(self.created_at.as_ref(), row_created_at)?,
            })
        };

        decode().map_err(|error| corrupt(NOTICES, id, error))
    }
}
