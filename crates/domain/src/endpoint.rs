use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use integrations_core::{AppError, AppResult, NonEmptyString, OrgId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Delivery mechanism of an integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    /// Generic HTTP webhook.
    Webhook,
    /// Email subscription delivery.
    EmailSubscription,
    /// Camel-routed connector, qualified by a sub type such as `slack`.
    Camel,
    /// Ansible automation platform.
    Ansible,
    /// Notification drawer in the console.
    Drawer,
    /// PagerDuty incident routing.
    Pagerduty,
}

impl EndpointType {
    /// Returns the stable storage value for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Webhook => "webhook",
            Self::EmailSubscription => "email_subscription",
            Self::Camel => "camel",
            Self::Ansible => "ansible",
            Self::Drawer => "drawer",
            Self::Pagerduty => "pagerduty",
        }
    }

    /// Returns whether integrations of this type carry a sub type.
    #[must_use]
    pub fn requires_sub_type(&self) -> bool {
        matches!(self, Self::Camel)
    }
}

impl Display for EndpointType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for EndpointType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "webhook" => Ok(Self::Webhook),
            "email_subscription" => Ok(Self::EmailSubscription),
            "camel" => Ok(Self::Camel),
            "ansible" => Ok(Self::Ansible),
            "drawer" => Ok(Self::Drawer),
            "pagerduty" => Ok(Self::Pagerduty),
            other => Err(AppError::Validation(format!(
                "unknown endpoint type '{other}'"
            ))),
        }
    }
}

/// Provisioning state of an integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointStatus {
    /// Usable for delivery.
    Ready,
    /// State was never reported.
    Unknown,
    /// Backing resources are being created.
    Provisioning,
    /// Backing resources are being removed.
    Deleting,
    /// Provisioning failed.
    Failed,
}

impl EndpointStatus {
    /// Returns the stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Unknown => "unknown",
            Self::Provisioning => "provisioning",
            Self::Deleting => "deleting",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for EndpointStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ready" => Ok(Self::Ready),
            "unknown" => Ok(Self::Unknown),
            "provisioning" => Ok(Self::Provisioning),
            "deleting" => Ok(Self::Deleting),
            "failed" => Ok(Self::Failed),
            _ => Err(AppError::Validation(format!(
                "unknown endpoint status '{value}'"
            ))),
        }
    }
}

/// One `type=` filter value, e.g. `webhook` or `camel:slack`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointTypeFilter {
    endpoint_type: EndpointType,
    sub_type: Option<String>,
}

impl EndpointTypeFilter {
    /// Creates a filter from a type and an optional sub type.
    pub fn new(endpoint_type: EndpointType, sub_type: Option<String>) -> AppResult<Self> {
        let sub_type = sub_type
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty());

        if sub_type.is_some() && !endpoint_type.requires_sub_type() {
            return Err(AppError::Validation(format!(
                "endpoint type '{endpoint_type}' does not support a sub type"
            )));
        }

        Ok(Self {
            endpoint_type,
            sub_type,
        })
    }

    /// Parses the transport form `type[:sub_type]`.
    pub fn parse_transport(value: &str) -> AppResult<Self> {
        match value.split_once(':') {
            Some((endpoint_type, sub_type)) => {
                if sub_type.trim().is_empty() {
                    return Err(AppError::Validation(format!(
                        "endpoint type filter '{value}' has an empty sub type"
                    )));
                }
                Self::new(EndpointType::from_str(endpoint_type)?, Some(sub_type.to_owned()))
            }
            None => Self::new(EndpointType::from_str(value)?, None),
        }
    }

    /// Returns the filtered type.
    #[must_use]
    pub fn endpoint_type(&self) -> EndpointType {
        self.endpoint_type
    }

    /// Returns the filtered sub type, when one was given.
    #[must_use]
    pub fn sub_type(&self) -> Option<&str> {
        self.sub_type.as_deref()
    }

    /// Returns whether the endpoint satisfies this filter.
    #[must_use]
    pub fn matches(&self, endpoint: &Endpoint) -> bool {
        if endpoint.endpoint_type() != self.endpoint_type {
            return false;
        }

        match self.sub_type.as_deref() {
            Some(sub_type) => endpoint.sub_type() == Some(sub_type),
            None => true,
        }
    }
}

/// Input used to build a validated [`Endpoint`].
#[derive(Debug, Clone)]
pub struct EndpointInput {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning organization.
    pub org_id: OrgId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Delivery mechanism.
    pub endpoint_type: EndpointType,
    /// Sub type for camel integrations.
    pub sub_type: Option<String>,
    /// Whether deliveries are attempted.
    pub enabled: bool,
    /// Provisioning state.
    pub status: EndpointStatus,
    /// Consecutive server-side delivery failures.
    pub server_errors: i32,
    /// Type-specific properties, e.g. the webhook URL.
    pub properties: Option<Value>,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Last update timestamp.
    pub updated: Option<DateTime<Utc>>,
}

/// A notification integration owned by one organization.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    id: Uuid,
    org_id: OrgId,
    name: NonEmptyString,
    description: String,
    endpoint_type: EndpointType,
    sub_type: Option<String>,
    enabled: bool,
    status: EndpointStatus,
    server_errors: i32,
    properties: Option<Value>,
    created: DateTime<Utc>,
    updated: Option<DateTime<Utc>>,
}

impl Endpoint {
    /// Creates a validated endpoint.
    pub fn new(input: EndpointInput) -> AppResult<Self> {
        let sub_type = input
            .sub_type
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty());

        match (input.endpoint_type.requires_sub_type(), sub_type.is_some()) {
            (true, false) => {
                return Err(AppError::Validation(format!(
                    "endpoint type '{}' requires a sub type",
                    input.endpoint_type
                )));
            }
            (false, true) => {
                return Err(AppError::Validation(format!(
                    "endpoint type '{}' does not support a sub type",
                    input.endpoint_type
                )));
            }
            _ => {}
        }

        if input
            .properties
            .as_ref()
            .is_some_and(|properties| !properties.is_object())
        {
            return Err(AppError::Validation(
                "endpoint properties must be a JSON object".to_owned(),
            ));
        }

        Ok(Self {
            id: input.id,
            org_id: input.org_id,
            name: NonEmptyString::new(input.name)?,
            description: input.description,
            endpoint_type: input.endpoint_type,
            sub_type,
            enabled: input.enabled,
            status: input.status,
            server_errors: input.server_errors,
            properties: input.properties,
            created: input.created,
            updated: input.updated,
        })
    }

    /// Returns the endpoint identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the owning organization.
    #[must_use]
    pub fn org_id(&self) -> &OrgId {
        &self.org_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the delivery mechanism.
    #[must_use]
    pub fn endpoint_type(&self) -> EndpointType {
        self.endpoint_type
    }

    /// Returns the sub type, for camel integrations.
    #[must_use]
    pub fn sub_type(&self) -> Option<&str> {
        self.sub_type.as_deref()
    }

    /// Returns whether deliveries are attempted.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the provisioning state.
    #[must_use]
    pub fn status(&self) -> EndpointStatus {
        self.status
    }

    /// Returns the consecutive server error count.
    #[must_use]
    pub fn server_errors(&self) -> i32 {
        self.server_errors
    }

    /// Returns the type-specific properties.
    #[must_use]
    pub fn properties(&self) -> Option<&Value> {
        self.properties.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    /// Returns a copy with the enabled flag changed. Enabling resets the
    /// server error counter.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool, updated: DateTime<Utc>) -> Self {
        self.enabled = enabled;
        if enabled {
            self.server_errors = 0;
        }
        self.updated = Some(updated);
        self
    }

    /// Returns a copy without type-specific properties.
    #[must_use]
    pub fn without_properties(mut self) -> Self {
        self.properties = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use integrations_core::OrgId;
    use serde_json::json;
    use uuid::Uuid;

    use super::{Endpoint, EndpointInput, EndpointStatus, EndpointType, EndpointTypeFilter};

    fn input(endpoint_type: EndpointType, sub_type: Option<&str>) -> EndpointInput {
        let Ok(org_id) = OrgId::new("org-1") else {
            panic!("org id should be valid");
        };
        EndpointInput {
            id: Uuid::new_v4(),
            org_id,
            name: "Ops hook".to_owned(),
            description: String::new(),
            endpoint_type,
            sub_type: sub_type.map(ToOwned::to_owned),
            enabled: true,
            status: EndpointStatus::Ready,
            server_errors: 0,
            properties: Some(json!({"url": "https://example.com/hook"})),
            created: Utc::now(),
            updated: None,
        }
    }

    #[test]
    fn camel_endpoints_require_sub_type() {
        assert!(Endpoint::new(input(EndpointType::Camel, None)).is_err());
        assert!(Endpoint::new(input(EndpointType::Camel, Some("slack"))).is_ok());
    }

    #[test]
    fn webhook_endpoints_reject_sub_type() {
        assert!(Endpoint::new(input(EndpointType::Webhook, Some("slack"))).is_err());
    }

    #[test]
    fn properties_must_be_an_object() {
        let mut value = input(EndpointType::Webhook, None);
        value.properties = Some(json!(["not", "an", "object"]));
        assert!(Endpoint::new(value).is_err());
    }

    #[test]
    fn type_filter_parses_qualified_camel_values() {
        let filter = EndpointTypeFilter::parse_transport("camel:Slack");
        assert!(matches!(
            filter,
            Ok(ref value) if value.endpoint_type() == EndpointType::Camel
                && value.sub_type() == Some("slack")
        ));
        assert!(EndpointTypeFilter::parse_transport("webhook:slack").is_err());
        assert!(EndpointTypeFilter::parse_transport("camel:").is_err());
        assert!(EndpointTypeFilter::parse_transport("carrier_pigeon").is_err());
    }

    #[test]
    fn type_filter_matches_on_sub_type_only_when_given() {
        let Ok(slack) = Endpoint::new(input(EndpointType::Camel, Some("slack"))) else {
            panic!("endpoint should be valid");
        };
        let Ok(any_camel) = EndpointTypeFilter::parse_transport("camel") else {
            panic!("filter should parse");
        };
        let Ok(teams) = EndpointTypeFilter::parse_transport("camel:teams") else {
            panic!("filter should parse");
        };

        assert!(any_camel.matches(&slack));
        assert!(!teams.matches(&slack));
    }

    #[test]
    fn enabling_resets_server_errors() {
        let mut value = input(EndpointType::Webhook, None);
        value.enabled = false;
        value.server_errors = 7;
        let Ok(endpoint) = Endpoint::new(value) else {
            panic!("endpoint should be valid");
        };

        let enabled = endpoint.with_enabled(true, Utc::now());
        assert!(enabled.enabled());
        assert_eq!(enabled.server_errors(), 0);
        assert!(enabled.updated().is_some());
    }
}
