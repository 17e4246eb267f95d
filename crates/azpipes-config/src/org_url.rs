//! Organization URL helpers.

use regex::Regex;
use std::sync::LazyLock;

use crate::{ConfigError, ConfigResult};

static BASE_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https?://[^/]+)").unwrap());

/// Extract `scheme://host` from an organization URL.
///
/// `https://dev.azure.com/contoso/Fabrikam` yields `https://dev.azure.com`.
pub fn base_url(organization_url: &str) -> ConfigResult<String> {
    BASE_URL_REGEX
        .captures(organization_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ConfigError::InvalidValue {
            field: "organization".to_string(),
            message: "Invalid organization URL format".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_extraction() {
        assert_eq!(
            base_url("https://dev.azure.com/org-name").unwrap(),
            "https://dev.azure.com"
        );
        assert_eq!(
            base_url("https://dev.azure.com/org-name/project").unwrap(),
            "https://dev.azure.com"
        );
        assert_eq!(
            base_url("http://dev.azure.com/org-name").unwrap(),
            "http://dev.azure.com"
        );
        assert_eq!(
            base_url("https://custom-server.com/org-name").unwrap(),
            "https://custom-server.com"
        );
    }

    #[test]
    fn test_invalid_urls_rejected() {
        for url in ["invalid-url", "not-a-url/org-name", "", "http://", "https://"] {
            let err = base_url(url).unwrap_err();
            assert!(
                err.to_string().contains("Invalid organization URL format"),
                "unexpected error for {url:?}: {err}"
            );
        }
    }
}
