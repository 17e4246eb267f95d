//! Connection configuration: where the organization lives, which project to
//! fall back to, and how to authenticate.
//!
//! Values come from an optional KDL file and are then overridden by
//! environment variables:
//!
//! ```kdl
//! organization "https://dev.azure.com/contoso"
//! project "Fabrikam"
//! auth "pat" token="..."
//! api-version "7.1"
//! timeout-secs 30
//! ```

use kdl::{KdlDocument, KdlNode};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::org_url::base_url;
use crate::{ConfigError, ConfigResult};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "azpipes.kdl";

pub const DEFAULT_API_VERSION: &str = "7.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_ORG_URL: &str = "AZURE_DEVOPS_ORG_URL";
pub const ENV_DEFAULT_PROJECT: &str = "AZURE_DEVOPS_DEFAULT_PROJECT";
pub const ENV_PAT: &str = "AZURE_DEVOPS_PAT";
pub const ENV_AUTH_METHOD: &str = "AZURE_DEVOPS_AUTH_METHOD";

/// How requests are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Personal access token, sent as HTTP basic auth.
    Pat { token: String },
    /// No credentials (e.g. a proxy adds them).
    None,
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Pat { .. } => f.write_str("Pat { token: <redacted> }"),
            AuthMethod::None => f.write_str("None"),
        }
    }
}

/// Fully resolved connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub organization_url: Url,
    pub default_project: String,
    pub auth: AuthMethod,
    pub api_version: String,
    pub timeout: Duration,
}

/// Printable view of a [`ConnectionConfig`] without secrets.
#[derive(Debug, Clone, Serialize)]
pub struct RedactedConfig {
    pub organization_url: String,
    pub base_url: String,
    pub default_project: String,
    pub auth: &'static str,
    pub api_version: String,
    pub timeout_secs: u64,
}

impl ConnectionConfig {
    /// Load from `path` (or [`DEFAULT_CONFIG_FILE`] if it exists) and apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let file = match path {
            Some(path) => Some(PartialConfig::from_file(path)?),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Some(PartialConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?)
            }
            None => None,
        };

        file.unwrap_or_default()
            .merge(PartialConfig::from_env())
            .resolve()
    }

    /// Organization URL without a trailing slash.
    pub fn organization(&self) -> &str {
        self.organization_url.as_str().trim_end_matches('/')
    }

    pub fn redacted(&self) -> RedactedConfig {
        RedactedConfig {
            organization_url: self.organization().to_string(),
            base_url: base_url(self.organization_url.as_str()).unwrap_or_default(),
            default_project: self.default_project.clone(),
            auth: match self.auth {
                AuthMethod::Pat { .. } => "pat",
                AuthMethod::None => "none",
            },
            api_version: self.api_version.clone(),
            timeout_secs: self.timeout.as_secs(),
        }
    }
}

/// Configuration values gathered from one source, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialConfig {
    pub organization: Option<String>,
    pub project: Option<String>,
    pub auth_method: Option<String>,
    pub token: Option<String>,
    pub api_version: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loaded configuration file");
        parse_config(&content)
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            organization: get(ENV_ORG_URL),
            project: get(ENV_DEFAULT_PROJECT),
            auth_method: get(ENV_AUTH_METHOD),
            token: get(ENV_PAT),
            api_version: None,
            timeout_secs: None,
        }
    }

    /// Overlay `overrides` on top of `self`.
    pub fn merge(self, overrides: PartialConfig) -> Self {
        Self {
            organization: overrides.organization.or(self.organization),
            project: overrides.project.or(self.project),
            auth_method: overrides.auth_method.or(self.auth_method),
            token: overrides.token.or(self.token),
            api_version: overrides.api_version.or(self.api_version),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Validate and fill in defaults.
    pub fn resolve(self) -> ConfigResult<ConnectionConfig> {
        let organization = self
            .organization
            .ok_or_else(|| ConfigError::MissingField("organization".to_string()))?;
        base_url(&organization)?;
        let organization_url = Url::parse(&organization)?;
        if !matches!(organization_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "organization".to_string(),
                message: format!("unsupported URL scheme: {}", organization_url.scheme()),
            });
        }

        let default_project = self
            .project
            .ok_or_else(|| ConfigError::MissingField("project".to_string()))?;

        let auth = match self.auth_method.as_deref().unwrap_or("pat") {
            "pat" => AuthMethod::Pat {
                token: self
                    .token
                    .ok_or_else(|| ConfigError::MissingField("auth token".to_string()))?,
            },
            "none" => AuthMethod::None,
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "auth".to_string(),
                    message: format!("unknown auth method: {}", other),
                });
            }
        };

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout-secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(ConnectionConfig {
            organization_url,
            default_project,
            auth,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Parse a configuration file from KDL text.
pub fn parse_config(kdl: &str) -> ConfigResult<PartialConfig> {
    let doc: KdlDocument = kdl.parse()?;
    let mut config = PartialConfig::default();

    for node in doc.nodes() {
        match node.name().value() {
            "organization" => {
                config.organization = Some(required_string_arg(node, "organization")?);
            }
            "project" => {
                config.project = Some(required_string_arg(node, "project")?);
            }
            "auth" => {
                config.auth_method = Some(required_string_arg(node, "auth")?);
                config.token = get_string_prop(node, "token");
            }
            "api-version" => {
                config.api_version = Some(required_string_arg(node, "api-version")?);
            }
            "timeout-secs" => {
                let secs = get_first_integer_arg(node)
                    .ok_or_else(|| ConfigError::MissingField("timeout-secs".to_string()))?;
                config.timeout_secs =
                    Some(u64::try_from(secs).map_err(|_| ConfigError::InvalidValue {
                        field: "timeout-secs".to_string(),
                        message: format!("out of range: {}", secs),
                    })?);
            }
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(config)
}

// Helper functions for extracting values from KDL nodes

fn required_string_arg(node: &KdlNode, field: &str) -> ConfigResult<String> {
    get_first_string_arg(node).ok_or_else(|| ConfigError::MissingField(field.to_string()))
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_first_integer_arg(node: &KdlNode) -> Option<i128> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_integer())
}

fn get_string_prop(node: &KdlNode, name: &str) -> Option<String> {
    node.get(name)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}
