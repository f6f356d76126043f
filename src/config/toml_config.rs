use crate::utils::error::{PreviewError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreviewConfig {
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
    pub require_https: Option<bool>,
}

impl PreviewConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses the configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PreviewError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PreviewError::ConfigValidation {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn user_agent(&self) -> &str {
        self.http
            .user_agent
            .as_deref()
            .unwrap_or(crate::adapters::http::DEFAULT_USER_AGENT)
    }

    pub fn require_https(&self) -> bool {
        self.http.require_https.unwrap_or(true)
    }
}

impl Validate for PreviewConfig {
    fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.http.timeout_seconds {
            validate_positive_number("http.timeout_seconds", timeout, 1)?;
        }
        if let Some(agent) = &self.http.user_agent {
            validate_non_empty_string("http.user_agent", agent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = PreviewConfig::from_toml_str("").unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.require_https());
        assert!(config.user_agent().starts_with("wms-preview/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml() {
        let config = PreviewConfig::from_toml_str(
            r#"
[http]
timeout_seconds = 5
user_agent = "card-preview/2"
require_https = false
"#,
        )
        .unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.user_agent(), "card-preview/2");
        assert!(!config.require_https());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("WMS_PREVIEW_TEST_AGENT", "agent-from-env");

        let config = PreviewConfig::from_toml_str(
            r#"
[http]
user_agent = "${WMS_PREVIEW_TEST_AGENT}"
"#,
        )
        .unwrap();
        assert_eq!(config.user_agent(), "agent-from-env");

        std::env::remove_var("WMS_PREVIEW_TEST_AGENT");
    }

    #[test]
    fn test_config_validation() {
        let config = PreviewConfig::from_toml_str("[http]\ntimeout_seconds = 0\n").unwrap();
        assert!(config.validate().is_err());

        let config = PreviewConfig::from_toml_str("[http]\nuser_agent = \"  \"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_service_section_is_rejected() {
        // Only WMS 1.3.0 is supported, so there is no version knob to set.
        let err = PreviewConfig::from_toml_str("[service]\nsupported_version = \"1.1.1\"\n")
            .unwrap_err();
        assert!(matches!(err, PreviewError::ConfigValidation { .. }));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = PreviewConfig::from_toml_str("[http\ntimeout_seconds = ").unwrap_err();
        assert!(matches!(err, PreviewError::ConfigValidation { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[http]\ntimeout_seconds = 12\n")
            .unwrap();

        let config = PreviewConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(12));
    }
}
