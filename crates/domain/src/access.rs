//! Role-scoped access policy over resource paths.

use schooldesk_core::{AppError, AppResult, RoleClaims, UserRole};

/// One access rule: a resource path prefix and the roles it admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    prefix: String,
    allowed_roles: Vec<UserRole>,
}

impl AccessRule {
    /// Creates a rule for a non-empty path prefix.
    pub fn new(prefix: impl Into<String>, allowed_roles: &[UserRole]) -> AppResult<Self> {
        let prefix = prefix.into();
        if prefix.trim().is_empty() {
            return Err(AppError::Validation(
                "access rule prefix must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            prefix,
            allowed_roles: allowed_roles.to_vec(),
        })
    }

    /// Returns the path prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    /// Returns the admitted roles.
    #[must_use]
    pub fn allowed_roles(&self) -> &[UserRole] {
        &self.allowed_roles
    }

    /// Returns whether the rule admits the role.
    #[must_use]
    pub fn admits(&self, role: UserRole) -> bool {
        self.allowed_roles.contains(&role)
    }
}

/// Ordered access rule table resolved by longest matching prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTable {
    rules: Vec<AccessRule>,
}

impl AccessTable {
    /// Creates a table from rules in declaration order.
    #[must_use]
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Returns the dashboard table guarding every page of the product.
    pub fn dashboard() -> AppResult<Self> {
        use UserRole::{Admin, Master, Student, Teacher};

        let rules = vec![
            AccessRule::new("/dashboard/schools", &[Master])?,
            AccessRule::new("/dashboard/subscriptions", &[Master])?,
            AccessRule::new("/dashboard/students", &[Admin])?,
            AccessRule::new("/dashboard/teachers", &[Admin])?,
            AccessRule::new("/dashboard/results", &[Admin])?,
            AccessRule::new("/dashboard/payments", &[Admin])?,
            AccessRule::new("/dashboard/notices", &[Admin, Teacher, Student])?,
            AccessRule::new("/dashboard/result-entry", &[Teacher])?,
            AccessRule::new("/dashboard/my-students", &[Teacher])?,
            AccessRule::new("/dashboard/my-result", &[Student])?,
            AccessRule::new("/dashboard/my-payments", &[Student])?,
            AccessRule::new("/dashboard", &[Master, Admin, Teacher, Student])?,
        ];

        Ok(Self::new(rules))
    }

    /// Returns the rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    /// Returns the most specific rule matching the path.
    ///
    /// Among rules of equal prefix length the earliest declared one wins.
    #[must_use]
    pub fn matching_rule(&self, resource_path: &str) -> Option<&AccessRule> {
        let mut winner: Option<&AccessRule> = None;
        for rule in &self.rules {
            if !resource_path.starts_with(rule.prefix()) {
                continue;
            }
            if winner.is_none_or(|current| rule.prefix().len() > current.prefix().len()) {
                winner = Some(rule);
            }
        }

        winner
    }

    /// Returns the roles that may open the path, empty when nothing matches.
    #[must_use]
    pub fn roles_for(&self, resource_path: &str) -> &[UserRole] {
        self.matching_rule(resource_path)
            .map_or(&[], AccessRule::allowed_roles)
    }
}

/// Decides whether a role may open a resource path.
///
/// The longest matching prefix decides alone; shorter ancestor rules never
/// widen it. Paths without any matching rule are denied.
#[must_use]
pub fn resolve_access(role: UserRole, resource_path: &str, table: &AccessTable) -> bool {
    table
        .matching_rule(resource_path)
        .is_some_and(|rule| rule.admits(role))
}

/// Per-navigation classification of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// No verified claims accompany the request.
    Unauthenticated,
    /// The claimed role may open the path.
    Authorized,
    /// The claimed role may not open the path.
    Denied,
}

impl NavigationOutcome {
    /// Returns whether the navigation may proceed.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }
}

/// Classifies one navigation from the caller's current claims.
#[must_use]
pub fn classify_navigation(
    claims: Option<&RoleClaims>,
    resource_path: &str,
    table: &AccessTable,
) -> NavigationOutcome {
    match claims {
        None => NavigationOutcome::Unauthenticated,
        Some(claims) if resolve_access(claims.role(), resource_path, table) => {
            NavigationOutcome::Authorized
        }
        Some(_) => NavigationOutcome::Denied,
    }
}
