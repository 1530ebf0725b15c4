//! Role-scoped page access over the dashboard rule table.

use std::sync::Arc;

use schooldesk_core::{AppError, AppResult, RoleClaims, UserRole};
use schooldesk_domain::{AccessTable, NavigationOutcome, classify_navigation};
use tracing::warn;

/// Application service deciding page and endpoint access per request.
///
/// Nothing is cached between calls: every decision reads the claims passed
/// in with the request.
#[derive(Clone)]
pub struct AccessService {
    table: Arc<AccessTable>,
}

impl AccessService {
    /// Creates an access service over a rule table.
    #[must_use]
    pub fn new(table: AccessTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Creates an access service over the dashboard rule table.
    pub fn dashboard() -> AppResult<Self> {
        Ok(Self::new(AccessTable::dashboard()?))
    }

    /// Classifies one navigation.
    #[must_use]
    pub fn classify(&self, claims: Option<&RoleClaims>, resource_path: &str) -> NavigationOutcome {
        classify_navigation(claims, resource_path, &self.table)
    }

    /// Rejects navigations that are unauthenticated or denied.
    pub fn authorize(&self, claims: Option<&RoleClaims>, resource_path: &str) -> AppResult<()> {
        match self.classify(claims, resource_path) {
            NavigationOutcome::Authorized => Ok(()),
            NavigationOutcome::Unauthenticated => Err(AppError::Unauthorized(
                "authentication required".to_owned(),
            )),
            NavigationOutcome::Denied => {
                let role = claims.map_or("unknown", |claims| claims.role().as_str());
                warn!(role, resource_path, "access denied");
                Err(AppError::Forbidden(format!(
                    "role '{role}' may not open '{resource_path}'"
                )))
            }
        }
    }

    /// Returns the roles admitted to a path.
    #[must_use]
    pub fn allowed_roles(&self, resource_path: &str) -> Vec<UserRole> {
        self.table.roles_for(resource_path).to_vec()
    }

    /// Returns the page prefixes a role may open, in table order.
    #[must_use]
    pub fn navigation_for(&self, role: UserRole) -> Vec<String> {
        self.table
            .rules()
            .iter()
            .filter(|rule| rule.admits(role))
            .map(|rule| rule.prefix().to_owned())
            .collect()
    }
}
