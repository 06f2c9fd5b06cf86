use integrations_core::LegacyRole;
use serde::{Deserialize, Serialize};

/// Actions that can be authorized on a single integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationPermission {
    /// Read the integration itself.
    View,
    /// Read the delivery history of the integration.
    ViewHistory,
    /// Change the integration, including enabling and disabling it.
    Edit,
    /// Remove the integration.
    Delete,
}

impl IntegrationPermission {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::ViewHistory => "view_history",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    /// Returns the relation name checked in the relation-based system.
    #[must_use]
    pub fn relation(&self) -> &'static str {
        match self {
            Self::View => "notifications_integration_view",
            Self::ViewHistory => "notifications_integration_view_history",
            Self::Edit => "notifications_integration_edit",
            Self::Delete => "notifications_integration_delete",
        }
    }

    /// Returns the legacy role that grants this permission.
    #[must_use]
    pub fn legacy_role(&self) -> LegacyRole {
        match self {
            Self::View | Self::ViewHistory => LegacyRole::IntegrationsEndpointsRead,
            Self::Edit | Self::Delete => LegacyRole::IntegrationsEndpointsWrite,
        }
    }
}
