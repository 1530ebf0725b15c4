use std::sync::Arc;

use chrono::Duration;
use schooldesk_application::{
    AccessService, DashboardService, NoticeDraftGenerator, NoticeService, PaymentService,
    ResultService, RosterService, SchoolService,
};
use schooldesk_core::AppError;
use schooldesk_infrastructure::{HttpNoticeDrafter, JwtIdentityCodec, TemplateNoticeDrafter};

use crate::api_config::{ApiConfig, NoticeDrafterConfig};
use crate::state::AppState;

use super::Repositories;

const DRAFTER_MAX_ATTEMPTS: u8 = 3;
const DRAFTER_RETRY_BACKOFF_MS: u64 = 250;

pub fn build_token_codec(config: &ApiConfig) -> Result<JwtIdentityCodec, AppError> {
    JwtIdentityCodec::new(
        config.jwt_secret.as_str(),
        Duration::hours(config.token_ttl_hours),
    )
}

fn build_notice_drafter(config: &NoticeDrafterConfig) -> Arc<dyn NoticeDraftGenerator> {
    match config {
        NoticeDrafterConfig::Template => Arc::new(TemplateNoticeDrafter::new()),
        NoticeDrafterConfig::Http { endpoint, api_key } => Arc::new(HttpNoticeDrafter::new(
            reqwest::Client::new(),
            endpoint.as_str(),
            api_key.clone(),
            DRAFTER_MAX_ATTEMPTS,
            DRAFTER_RETRY_BACKOFF_MS,
        )),
    }
}

pub fn build_app_state(
    repositories: Repositories,
    config: &ApiConfig,
) -> Result<AppState, AppError> {
    let token_verifier = Arc::new(build_token_codec(config)?);
    let notice_drafter = build_notice_drafter(&config.notice_drafter);
    let school_service = SchoolService::new(
        repositories.schools.clone(),
        repositories.roster.clone(),
    );

    Ok(AppState {
        access_service: AccessService::dashboard()?,
        roster_service: RosterService::new(
            repositories.schools.clone(),
            repositories.roster.clone(),
        ),
        result_service: ResultService::new(
            repositories.results.clone(),
            repositories.roster.clone(),
        ),
        payment_service: PaymentService::new(
            repositories.payments.clone(),
            repositories.roster.clone(),
        ),
        notice_service: NoticeService::new(repositories.notices.clone(), notice_drafter),
        dashboard_service: DashboardService::new(
            school_service.clone(),
            repositories.roster,
            repositories.payments,
        ),
        school_service,
        token_verifier,
    })
}
