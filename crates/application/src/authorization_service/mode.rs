use super::*;

/// Authorization subsystem in charge of an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationMode {
    /// Relation-based checks against the permission oracle.
    Relations,
    /// Static roles attached to the session.
    LegacyRbac,
}

impl AuthorizationMode {
    /// Returns the stable name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relations => "relations",
            Self::LegacyRbac => "legacy_rbac",
        }
    }
}

/// Read-only rollout configuration of relation-based authorization.
///
/// Relations are authoritative when enabled for everyone, or when the
/// organization is listed. Both modes are permanent options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationModeConfig {
    relations_enabled: bool,
    relations_org_ids: BTreeSet<OrgId>,
}

impl AuthorizationModeConfig {
    /// Creates a rollout configuration.
    #[must_use]
    pub fn new(relations_enabled: bool, relations_org_ids: BTreeSet<OrgId>) -> Self {
        Self {
            relations_enabled,
            relations_org_ids,
        }
    }

    /// Returns the authoritative mode for the organization.
    #[must_use]
    pub fn mode_for(&self, org_id: &OrgId) -> AuthorizationMode {
        if self.relations_enabled || self.relations_org_ids.contains(org_id) {
            AuthorizationMode::Relations
        } else {
            AuthorizationMode::LegacyRbac
        }
    }
}
