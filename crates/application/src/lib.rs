//! Application services and ports.

#![forbid(unsafe_code)]

mod access_service;
mod dashboard_service;
mod identity_ports;
mod login_codes;
mod notice_drafting;
mod notice_service;
mod payment_service;
mod repository_ports;
mod result_service;
mod roster_service;
mod school_service;

#[cfg(test)]
mod test_support;

pub use access_service::AccessService;
pub use dashboard_service::{DashboardService, DashboardSummary};
pub use identity_ports::{IdentityTokenIssuer, IdentityTokenVerifier};
pub use login_codes::{generate_login_code, generate_unique_login_code};
pub use notice_drafting::{NoticeDraftGenerator, NoticeDraftRequest};
pub use notice_service::{CreateNoticeInput, DRAFT_FAILED_MESSAGE, NoticeService};
pub use payment_service::{PaymentService, SubmitPaymentInput};
pub use repository_ports::{
    NoticeRepository, PaymentRepository, ResultRepository, RosterRepository, SchoolRepository,
};
pub use result_service::{RecordResultInput, ResultService, SubjectMarkInput};
pub use roster_service::{AddTeacherInput, RosterService};
pub use school_service::{
    ProvisionSchoolInput, SchoolService, SubscriptionInput, SubscriptionOverview,
};
