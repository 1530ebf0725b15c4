use std::sync::Arc;

use schooldesk_application::{
    AccessService, DashboardService, IdentityTokenVerifier, NoticeService, PaymentService,
    ResultService, RosterService, SchoolService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessService,
    pub school_service: SchoolService,
    pub roster_service: RosterService,
    pub result_service: ResultService,
    pub payment_service: PaymentService,
    pub notice_service: NoticeService,
    pub dashboard_service: DashboardService,
    pub token_verifier: Arc<dyn IdentityTokenVerifier>,
}
