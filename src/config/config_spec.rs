use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::EnvironmentProvider;
use crate::config::errors::ApplicationError;

/// Where a loaded value came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValueSource {
    EnvironmentVariable { name: String },
    Default,
}

#[derive(Debug, Clone)]
pub struct ConfigValue {
    pub value: String,
    pub source: ConfigValueSource,
}

/// Configuration specification with environment override → default priority
pub struct ConfigSpec {
    env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    pub env_override: Option<String>,
    pub default_value: Option<String>,
    pub required: bool,
    pub min_length: Option<usize>,
    pub validator: Option<fn(&str) -> Result<(), String>>,
}

impl ConfigSpec {
    pub fn new(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Self {
        Self {
            env_provider,
            env_override: None,
            default_value: None,
            required: false,
            min_length: None,
            validator: None,
        }
    }

    pub fn env_override(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    fn setting_name(&self) -> &str {
        self.env_override.as_deref().unwrap_or("unknown_setting")
    }

    /// Load a setting value with source tracking
    ///
    /// Environment variable wins over the default. A required setting with neither is an error;
    /// an optional one yields an empty value.
    pub fn load_setting_with_source(&self) -> Result<ConfigValue, ApplicationError> {
        if let Some(env_var) = &self.env_override {
            if let Some(value) = self.env_provider.get_var(env_var) {
                self.validate_value(&value, env_var)?;

                return Ok(ConfigValue {
                    value,
                    source: ConfigValueSource::EnvironmentVariable {
                        name: env_var.clone(),
                    },
                });
            }
        }

        if let Some(default) = &self.default_value {
            self.validate_value(default, self.setting_name())?;

            return Ok(ConfigValue {
                value: default.clone(),
                source: ConfigValueSource::Default,
            });
        }

        if self.required {
            return Err(ApplicationError::MissingSetting {
                setting_name: self.setting_name().to_string(),
            });
        }

        Ok(ConfigValue {
            value: String::new(),
            source: ConfigValueSource::Default,
        })
    }

    /// Shorthand for the value only
    pub fn load(&self) -> Result<String, ApplicationError> {
        let loaded = self.load_setting_with_source()?;
        tracing::debug!(setting = self.setting_name(), source = ?loaded.source, "setting loaded");
        Ok(loaded.value)
    }

    pub fn validate_value(&self, value: &str, setting_name: &str) -> Result<(), ApplicationError> {
        if let Some(min) = self.min_length.filter(|min| value.len() < *min) {
            return Err(ApplicationError::InvalidSetting {
                setting_name: setting_name.to_string(),
                reason: format!("shorter than {} characters", min),
            });
        }

        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| ApplicationError::InvalidSetting {
                setting_name: setting_name.to_string(),
                reason,
            })?;
        }

        Ok(())
    }
}

/// Type parsing utilities for configuration values
impl ConfigSpec {
    pub fn parse_duration_millis(value: &str, setting_name: &str) -> Result<Duration, ApplicationError> {
        let millis = value.trim().parse::<u64>().map_err(|e| ApplicationError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("Expected positive integer for milliseconds, got '{}': {}", value, e),
        })?;

        Ok(Duration::from_millis(millis))
    }

    /// Parse a duration value in days from string
    pub fn parse_duration_days(value: &str, setting_name: &str) -> Result<Duration, ApplicationError> {
        let days = value.trim().parse::<u64>().map_err(|e| ApplicationError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("Expected positive integer for days, got '{}': {}", value, e),
        })?;

        if days == 0 {
            return Err(ApplicationError::InvalidSetting {
                setting_name: setting_name.to_string(),
                reason: "Duration must be at least one day".to_string(),
            });
        }

        Ok(Duration::from_secs(days * 24 * 60 * 60))
    }

    /// Parse a boolean value from string
    ///
    /// - true: "true", "1", "yes", "on", "enabled" (case insensitive)
    /// - false: "false", "0", "no", "off", "disabled" (case insensitive)
    pub fn parse_bool(value: &str, setting_name: &str) -> Result<bool, ApplicationError> {
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
            "false" | "0" | "no" | "off" | "disabled" => Ok(false),
            _ => Err(ApplicationError::ParseError {
                setting_name: setting_name.to_string(),
                error: format!(
                    "Expected boolean value, got '{}'. Valid values: true/false, 1/0, yes/no, on/off, enabled/disabled",
                    value
                ),
            }),
        }
    }

    /// Parse a port number from string, rejecting 0
    pub fn parse_port(value: &str, setting_name: &str) -> Result<u16, ApplicationError> {
        let port = value.trim().parse::<u16>().map_err(|e| ApplicationError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("Expected port number (1-65535), got '{}': {}", value, e),
        })?;

        if port == 0 {
            return Err(ApplicationError::InvalidSetting {
                setting_name: setting_name.to_string(),
                reason: "Port number must be between 1 and 65535".to_string(),
            });
        }

        Ok(port)
    }

    /// Parse an RFC 3339 timestamp
    pub fn parse_timestamp(value: &str, setting_name: &str) -> Result<DateTime<Utc>, ApplicationError> {
        DateTime::parse_from_rfc3339(value.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| ApplicationError::ParseError {
                setting_name: setting_name.to_string(),
                error: format!("Expected RFC 3339 timestamp, got '{}': {}", value, e),
            })
    }

    /// Parse a comma separated list, dropping blanks
    pub fn parse_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Validation utilities
impl ConfigSpec {
    pub fn validate_port_range(value: &str, min: u16, max: u16) -> Result<(), String> {
        let parsed = value
            .trim()
            .parse::<u16>()
            .map_err(|_| format!("Expected port number between {} and {}", min, max))?;

        if parsed < min || parsed > max {
            return Err(format!("Port {} is outside valid range {}-{}", parsed, min, max));
        }

        Ok(())
    }

    /// Host must be non-empty and whitespace free; IPv6 must be bracketed
    pub fn validate_host_address(value: &str) -> Result<(), String> {
        let host = value.trim();

        if host.is_empty() {
            return Err("Host address cannot be empty".to_string());
        }
        if host.chars().any(char::is_whitespace) {
            return Err("Host address cannot contain whitespace characters".to_string());
        }
        if !host.starts_with('[') && host.matches(':').count() > 1 {
            return Err("IPv6 addresses must be enclosed in brackets [::1]".to_string());
        }

        Ok(())
    }

    /// Paths must be absolute and carry no query or fragment
    pub fn validate_path(value: &str) -> Result<(), String> {
        if !value.starts_with('/') {
            return Err(format!("Path '{}' must start with '/'", value));
        }
        if value.contains('?') || value.contains('#') {
            return Err(format!("Path '{}' must not contain a query or fragment", value));
        }
        Ok(())
    }

    pub fn validate_path_list(value: &str) -> Result<(), String> {
        for path in Self::parse_list(value) {
            Self::validate_path(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn spec_with(vars: &[(&str, &str)]) -> ConfigSpec {
        ConfigSpec::new(Arc::new(MockEnvironment::empty().with_vars(vars)))
    }

    #[test]
    fn test_parse_bool() {
        for value in ["true", "1", "YES", "on", "Enabled"] {
            assert!(ConfigSpec::parse_bool(value, "flag").unwrap());
        }
        for value in ["false", "0", "no", "OFF", "disabled"] {
            assert!(!ConfigSpec::parse_bool(value, "flag").unwrap());
        }
        assert!(ConfigSpec::parse_bool("maybe", "flag").is_err());
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(ConfigSpec::parse_port("8080", "PORT").unwrap(), 8080);
        assert!(ConfigSpec::parse_port("0", "PORT").is_err());
        assert!(ConfigSpec::parse_port("70000", "PORT").is_err());
    }

    #[test]
    fn test_parse_duration_days_rejects_zero() {
        let thirty = ConfigSpec::parse_duration_days("30", "SESSION_MAX_AGE_DAYS").unwrap();
        assert_eq!(thirty, Duration::from_secs(30 * 86_400));
        assert!(ConfigSpec::parse_duration_days("0", "SESSION_MAX_AGE_DAYS").is_err());
        assert!(ConfigSpec::parse_duration_days("-1", "SESSION_MAX_AGE_DAYS").is_err());
    }

    #[test]
    fn test_parse_list_trims_and_drops_blanks() {
        assert_eq!(
            ConfigSpec::parse_list(" /a, /b ,, "),
            vec!["/a".to_string(), "/b".to_string()]
        );
    }

    #[test]
    fn test_validate_path() {
        assert!(ConfigSpec::validate_path("/pricing").is_ok());
        assert!(ConfigSpec::validate_path("pricing").is_err());
        assert!(ConfigSpec::validate_path("/pricing?x=1").is_err());
        assert!(ConfigSpec::validate_path_list("/a,/b").is_ok());
        assert!(ConfigSpec::validate_path_list("/a,b").is_err());
    }

    #[test]
    fn test_validate_host_address() {
        assert!(ConfigSpec::validate_host_address("0.0.0.0").is_ok());
        assert!(ConfigSpec::validate_host_address("[::1]").is_ok());
        assert!(ConfigSpec::validate_host_address("::1").is_err());
        assert!(ConfigSpec::validate_host_address("my host").is_err());
    }

    #[test]
    fn test_load_setting_with_source_env_override() {
        let spec = spec_with(&[("TEST_SETTING", "from-env")])
            .env_override("TEST_SETTING")
            .default_value("from-default");

        let value = spec.load_setting_with_source().unwrap();
        assert_eq!(value.value, "from-env");
        assert_eq!(
            value.source,
            ConfigValueSource::EnvironmentVariable {
                name: "TEST_SETTING".to_string()
            }
        );
    }

    #[test]
    fn test_load_setting_with_source_default() {
        let spec = spec_with(&[]).env_override("TEST_SETTING").default_value("fallback");

        let value = spec.load_setting_with_source().unwrap();
        assert_eq!(value.value, "fallback");
        assert_eq!(value.source, ConfigValueSource::Default);
    }

    #[test]
    fn test_load_setting_required_without_value_fails() {
        let spec = spec_with(&[]).env_override("MISSING_SETTING").required(true);

        match spec.load_setting_with_source() {
            Err(ApplicationError::MissingSetting { setting_name }) => {
                assert_eq!(setting_name, "MISSING_SETTING");
            }
            other => panic!("Expected MissingSetting, got {:?}", other),
        }
    }

    #[test]
    fn test_load_setting_with_source_validation() {
        let spec = spec_with(&[("PORT", "99999")])
            .env_override("PORT")
            .validator(|v| ConfigSpec::validate_port_range(v, 1, 65535));

        assert!(spec.load_setting_with_source().is_err());
    }
}
