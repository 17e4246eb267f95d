//! Configuration for azpipes.
//!
//! This crate handles:
//! - Connection settings (organization, default project, credentials)
//! - KDL configuration files with environment overrides
//! - Organization URL validation

pub mod connection;
pub mod error;
pub mod org_url;

pub use connection::{AuthMethod, ConnectionConfig, PartialConfig, RedactedConfig, parse_config};
pub use error::{ConfigError, ConfigResult};
pub use org_url::base_url;
