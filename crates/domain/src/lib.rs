//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod exam_result;
mod grading;
mod identifiers;
mod notice;
mod payment;
mod roster;
mod school;
mod subscription;

pub use access::{AccessRule, AccessTable, NavigationOutcome, classify_navigation, resolve_access};
pub use exam_result::{EXAM_NAME_MIN_LENGTH, ExamResult, ExamResultParts};
pub use grading::{
    FAILING_LETTER, Gpa, Grade, GradeSheet, GradedSubject, MARK_MAX, MARK_MIN, SubjectMark,
    compute_gpa, gpa_of_marks, grade_letter_of, grade_of, grade_point_of, grade_sheet,
};
pub use identifiers::{
    LOGIN_CODE_LENGTH, LoginCode, LoginCodeKind, NoticeId, PaymentId, ResultId, StudentId,
    TeacherId,
};
pub use notice::{
    NOTICE_CONTENT_MIN_LENGTH, NOTICE_TITLE_MIN_LENGTH, Notice, NoticeAudience, NoticeParts,
};
pub use payment::{
    Payment, PaymentDecision, PaymentMethod, PaymentParts, PaymentReceipt, PaymentStatus,
    TRX_MIN_LENGTH,
};
pub use roster::{
    CLASSES, FIRST_SESSION, LAST_SESSION, PERSON_NAME_MIN_LENGTH, SUBJECTS, SchoolClass,
    SchoolSubject, Session, Shift, Student, StudentFilter, StudentProfile, Teacher,
};
pub use school::{SCHOOL_NAME_MIN_LENGTH, School, SchoolStatus};
pub use subscription::{
    SeatCheck, SeatKind, Subscription, check_seat_limit, days_until_expiry,
    is_subscription_active,
};
