//! SchoolDesk API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use schooldesk_application::IdentityTokenIssuer;
use schooldesk_core::{AppError, RoleClaims};
use tracing::info;

use crate::api_config::{ApiCommand, ApiConfig, StorageConfig};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    match &config.command {
        ApiCommand::Migrate => {
            let StorageConfig::Postgres { database_url } = &config.storage else {
                return Err(AppError::Validation(
                    "migrate requires STORAGE_BACKEND=postgres".to_owned(),
                ));
            };
            api_services::connect_and_migrate(database_url).await?;
            info!("database migrations applied");
            Ok(())
        }
        ApiCommand::IssueToken {
            subject,
            role,
            school_id,
        } => {
            let codec = api_services::build_token_codec(&config)?;
            let claims = RoleClaims::new(subject.clone(), *role, *school_id, school_id.is_some());
            let token = codec.issue(&claims)?;
            info!(subject = %subject, role = role.as_str(), "session token issued");
            println!("{token}");
            Ok(())
        }
        ApiCommand::Serve => serve(&config).await,
    }
}

async fn serve(config: &ApiConfig) -> Result<(), AppError> {
    let repositories = api_services::build_repositories(&config.storage).await?;
    let app_state = api_services::build_app_state(repositories, config)?;
    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "schooldesk api listening");
    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))
}
