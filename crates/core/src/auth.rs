use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AppError, OrgId};

/// Coarse roles granted by the legacy RBAC system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyRole {
    /// May read integrations and their history.
    IntegrationsEndpointsRead,
    /// May modify integrations. Implies read.
    IntegrationsEndpointsWrite,
}

impl LegacyRole {
    /// Returns the stable role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntegrationsEndpointsRead => "integrations_endpoints_read",
            Self::IntegrationsEndpointsWrite => "integrations_endpoints_write",
        }
    }
}

impl FromStr for LegacyRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "integrations_endpoints_read" => Ok(Self::IntegrationsEndpointsRead),
            "integrations_endpoints_write" => Ok(Self::IntegrationsEndpointsWrite),
            other => Err(AppError::Validation(format!(
                "unknown legacy role '{other}'"
            ))),
        }
    }
}

/// Caller identity for one request.
///
/// Built by the transport layer from the identity header and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    org_id: OrgId,
    username: String,
    roles: BTreeSet<LegacyRole>,
}

impl Principal {
    /// Creates a principal from identity data and resolved legacy roles.
    #[must_use]
    pub fn new(
        org_id: OrgId,
        username: impl Into<String>,
        roles: BTreeSet<LegacyRole>,
    ) -> Self {
        Self {
            org_id,
            username: username.into(),
            roles,
        }
    }

    /// Returns the organization the caller belongs to.
    #[must_use]
    pub fn org_id(&self) -> &OrgId {
        &self.org_id
    }

    /// Returns the caller's username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns whether the session carries the role, honouring write-implies-read.
    #[must_use]
    pub fn has_role(&self, role: LegacyRole) -> bool {
        match role {
            LegacyRole::IntegrationsEndpointsRead => {
                self.roles.contains(&LegacyRole::IntegrationsEndpointsRead)
                    || self.roles.contains(&LegacyRole::IntegrationsEndpointsWrite)
            }
            LegacyRole::IntegrationsEndpointsWrite => {
                self.roles.contains(&LegacyRole::IntegrationsEndpointsWrite)
            }
        }
    }
}
