use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use schooldesk_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let dashboard_routes = Router::new()
        .route("/api/dashboard/me", get(handlers::dashboard::me_handler))
        .route(
            "/api/dashboard/access",
            get(handlers::dashboard::access_handler),
        )
        .route(
            "/api/dashboard/summary",
            get(handlers::dashboard::summary_handler),
        )
        .route(
            "/api/dashboard/schools",
            get(handlers::schools::list_schools_handler)
                .post(handlers::schools::create_school_handler),
        )
        .route(
            "/api/dashboard/schools/{school_id}",
            get(handlers::schools::get_school_handler),
        )
        .route(
            "/api/dashboard/schools/{school_id}/subscription",
            put(handlers::schools::update_subscription_handler),
        )
        .route(
            "/api/dashboard/schools/{school_id}/status",
            put(handlers::schools::update_school_status_handler),
        )
        .route(
            "/api/dashboard/students",
            get(handlers::roster::list_students_handler)
                .post(handlers::roster::create_student_handler),
        )
        .route(
            "/api/dashboard/teachers",
            get(handlers::roster::list_teachers_handler)
                .post(handlers::roster::create_teacher_handler),
        )
        .route(
            "/api/dashboard/results",
            get(handlers::results::list_results_handler),
        )
        .route(
            "/api/dashboard/results/{result_id}/published",
            put(handlers::results::set_result_published_handler),
        )
        .route(
            "/api/dashboard/payments",
            get(handlers::payments::list_payments_handler),
        )
        .route(
            "/api/dashboard/payments/{payment_id}/decision",
            put(handlers::payments::decide_payment_handler),
        )
        .route(
            "/api/dashboard/notices",
            get(handlers::notices::list_notices_handler)
                .post(handlers::notices::create_notice_handler),
        )
        .route(
            "/api/dashboard/notices/draft",
            post(handlers::notices::draft_notice_handler),
        )
        .route(
            "/api/dashboard/notices/{notice_id}/published",
            put(handlers::notices::set_notice_published_handler),
        )
        .route(
            "/api/dashboard/result-entry",
            post(handlers::results::record_result_handler),
        )
        .route(
            "/api/dashboard/result-entry/preview",
            post(handlers::results::preview_gpa_handler),
        )
        .route(
            "/api/dashboard/my-students",
            get(handlers::roster::list_my_students_handler),
        )
        .route(
            "/api/dashboard/my-result",
            get(handlers::results::list_my_results_handler),
        )
        .route(
            "/api/dashboard/my-payments",
            get(handlers::payments::list_my_payments_handler)
                .post(handlers::payments::submit_payment_handler),
        )
        .route(
            "/api/dashboard/my-payments/{payment_id}/receipt",
            get(handlers::payments::payment_receipt_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_access,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(dashboard_routes)
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}

#[cfg(test)]
mod tests;
