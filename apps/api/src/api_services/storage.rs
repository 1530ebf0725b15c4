use std::sync::Arc;

use schooldesk_application::{
    NoticeRepository, PaymentRepository, ResultRepository, RosterRepository, SchoolRepository,
};
use schooldesk_core::AppError;
use schooldesk_infrastructure::{InMemorySchoolStore, PostgresDocumentStore};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::api_config::StorageConfig;

/// Repository ports handed to the application services.
#[derive(Clone)]
pub struct Repositories {
    pub schools: Arc<dyn SchoolRepository>,
    pub roster: Arc<dyn RosterRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub notices: Arc<dyn NoticeRepository>,
}

impl Repositories {
    /// Uses one store for every port.
    pub fn backed_by<S>(store: Arc<S>) -> Self
    where
        S: SchoolRepository
            + RosterRepository
            + ResultRepository
            + PaymentRepository
            + NoticeRepository
            + 'static,
    {
        Self {
            schools: store.clone(),
            roster: store.clone(),
            results: store.clone(),
            payments: store.clone(),
            notices: store,
        }
    }
}

pub async fn connect_and_migrate(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}

pub async fn build_repositories(storage: &StorageConfig) -> Result<Repositories, AppError> {
    match storage {
        StorageConfig::Memory => {
            warn!("using in-memory storage, records are lost on restart");
            Ok(Repositories::backed_by(Arc::new(InMemorySchoolStore::new())))
        }
        StorageConfig::Postgres { database_url } => {
            let pool = connect_and_migrate(database_url).await?;
            info!("connected to postgres document store");
            Ok(Repositories::backed_by(Arc::new(
                PostgresDocumentStore::new(pool),
            )))
        }
    }
}
