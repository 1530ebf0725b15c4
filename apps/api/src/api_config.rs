use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use schooldesk_core::{AppError, TenantId, UserRole};
use tracing_subscriber::EnvFilter;

/// Session token lifetime used when `JWT_TTL_HOURS` is not set.
const DEFAULT_TOKEN_TTL_HOURS: i64 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeDrafterConfig {
    Template,
    Http {
        endpoint: String,
        api_key: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCommand {
    Serve,
    Migrate,
    IssueToken {
        subject: String,
        role: UserRole,
        school_id: Option<TenantId>,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub command: ApiCommand,
    pub storage: StorageConfig,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub notice_drafter: NoticeDrafterConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let args: Vec<String> = env::args().skip(1).collect();
        let command = parse_command(&args)?;

        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_owned())
            .as_str()
        {
            "memory" => StorageConfig::Memory,
            "postgres" => StorageConfig::Postgres {
                database_url: required_non_empty_env("DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let jwt_secret = required_env("JWT_SECRET")?;
        let token_ttl_hours = env::var("JWT_TTL_HOURS")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|hours| *hours > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_HOURS);

        let notice_drafter = match env::var("NOTICE_DRAFTER")
            .unwrap_or_else(|_| "template".to_owned())
            .as_str()
        {
            "template" => NoticeDrafterConfig::Template,
            "http" => NoticeDrafterConfig::Http {
                endpoint: required_non_empty_env("NOTICE_DRAFTER_URL")?,
                api_key: env::var("NOTICE_DRAFTER_API_KEY").ok(),
            },
            other => {
                return Err(AppError::Validation(format!(
                    "NOTICE_DRAFTER must be either 'template' or 'http', got '{other}'"
                )));
            }
        };

        Ok(Self {
            command,
            storage,
            frontend_url,
            api_host,
            api_port,
            jwt_secret,
            token_ttl_hours,
            notice_drafter,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

fn parse_command(args: &[String]) -> Result<ApiCommand, AppError> {
    match args.first().map(String::as_str) {
        None | Some("serve") => Ok(ApiCommand::Serve),
        Some("migrate") => Ok(ApiCommand::Migrate),
        Some("issue-token") => {
            let (Some(subject), Some(role)) = (args.get(1), args.get(2)) else {
                return Err(AppError::Validation(
                    "usage: schooldesk-api issue-token <subject> <role> [school_id]".to_owned(),
                ));
            };
            let school_id = args
                .get(3)
                .map(|value| value.parse::<TenantId>())
                .transpose()?;

            Ok(ApiCommand::IssueToken {
                subject: subject.clone(),
                role: role.parse::<UserRole>()?,
                school_id,
            })
        }
        Some(other) => Err(AppError::Validation(format!("unknown command '{other}'"))),
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
