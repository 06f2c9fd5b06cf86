use std::collections::BTreeSet;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use integrations_core::{AppError, LegacyRole, OrgId};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyRoleSource {
    Rbac,
    Static(BTreeSet<LegacyRole>),
}

#[derive(Debug, Clone)]
pub struct KesselConfig {
    pub relations_enabled: bool,
    pub relations_org_ids: BTreeSet<OrgId>,
    pub relations_url: Url,
    pub inventory_url: Url,
    pub list_timeout: Duration,
    pub list_page_size: u32,
}

#[derive(Debug, Clone)]
pub struct RbacConfig {
    pub url: Url,
    pub psk: String,
    pub client_id: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub api_host: String,
    pub api_port: u16,
    pub max_page_size: u64,
    pub http_timeout: Duration,
    pub kessel: KesselConfig,
    pub rbac: RbacConfig,
    pub legacy_role_source: LegacyRoleSource,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let storage = match env::var("STORAGE")
            .unwrap_or_else(|_| "postgres".to_owned())
            .as_str()
        {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        let database_url = match storage {
            StorageBackend::Postgres => Some(required_non_empty_env("DATABASE_URL")?),
            StorageBackend::Memory if migrate_only => {
                return Err(AppError::Validation(
                    "the migrate command requires STORAGE=postgres".to_owned(),
                ));
            }
            StorageBackend::Memory => None,
        };

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8085);

        let kessel = KesselConfig {
            relations_enabled: env::var("KESSEL_RELATIONS_ENABLED")
                .unwrap_or_else(|_| "false".to_owned())
                .eq_ignore_ascii_case("true"),
            relations_org_ids: parse_org_ids(
                env::var("KESSEL_RELATIONS_ORG_IDS").unwrap_or_default().as_str(),
            )?,
            relations_url: url_env("KESSEL_RELATIONS_URL", "http://localhost:9000")?,
            inventory_url: url_env("KESSEL_INVENTORY_URL", "http://localhost:9081")?,
            list_timeout: Duration::from_secs(number_env("KESSEL_LIST_TIMEOUT_SECS", 30)?),
            list_page_size: u32::try_from(number_env("KESSEL_LIST_PAGE_SIZE", 1000)?).map_err(
                |error| AppError::Validation(format!("invalid KESSEL_LIST_PAGE_SIZE: {error}")),
            )?,
        };

        let rbac = RbacConfig {
            url: url_env("RBAC_URL", "http://localhost:8111")?,
            psk: env::var("RBAC_PSK").unwrap_or_default(),
            client_id: env::var("RBAC_CLIENT_ID").unwrap_or_else(|_| "notifications".to_owned()),
        };

        let legacy_role_source = match env::var("LEGACY_ROLE_SOURCE")
            .unwrap_or_else(|_| "rbac".to_owned())
            .as_str()
        {
            "rbac" => LegacyRoleSource::Rbac,
            "static" => LegacyRoleSource::Static(parse_roles(
                env::var("STATIC_LEGACY_ROLES").unwrap_or_default().as_str(),
            )?),
            other => {
                return Err(AppError::Validation(format!(
                    "LEGACY_ROLE_SOURCE must be either 'rbac' or 'static', got '{other}'"
                )));
            }
        };

        Ok(Self {
            migrate_only,
            storage,
            database_url,
            api_host,
            api_port,
            max_page_size: number_env("MAX_PAGE_SIZE", 200)?,
            http_timeout: Duration::from_secs(number_env("HTTP_TIMEOUT_SECS", 10)?),
            kessel,
            rbac,
            legacy_role_source,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }

    /// Whether any organization is served by relation-based authorization.
    pub fn relations_in_use(&self) -> bool {
        self.kessel.relations_enabled || !self.kessel.relations_org_ids.is_empty()
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

fn parse_org_ids(value: &str) -> Result<BTreeSet<OrgId>, AppError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(OrgId::new)
        .collect()
}

fn parse_roles(value: &str) -> Result<BTreeSet<LegacyRole>, AppError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(LegacyRole::from_str)
        .collect()
}

fn url_env(name: &str, default: &str) -> Result<Url, AppError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_owned());
    Url::parse(value.as_str())
        .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}")))
}

fn number_env(name: &str, default: u64) -> Result<u64, AppError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        Err(_) => Ok(default),
    }
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use integrations_core::{AppError, LegacyRole};

    use super::{parse_org_ids, parse_roles};

    #[test]
    fn org_id_list_ignores_blank_items() {
        let parsed = parse_org_ids(" org-1 ,, org-2 ,");

        assert!(matches!(parsed, Ok(ref ids) if ids.len() == 2));
    }

    #[test]
    fn role_list_rejects_unknown_roles() {
        assert!(matches!(
            parse_roles("integrations_endpoints_read"),
            Ok(ref roles) if roles.contains(&LegacyRole::IntegrationsEndpointsRead)
        ));
        assert!(matches!(
            parse_roles("integrations_endpoints_read,admin"),
            Err(AppError::Validation(_))
        ));
    }
}
