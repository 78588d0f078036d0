//! Bitable writer configuration.

use super::FieldNames;
use crate::config::{invalid, parse_url, BitableSection, ConfigError};
use std::time::Duration;
use url::Url;

/// Default Feishu Open API base.
pub const DEFAULT_FEISHU_BASE_URL: &str = "https://open.feishu.cn";

/// Default timeout for Bitable requests.
pub const DEFAULT_BITABLE_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`BitableSink`](super::BitableSink).
#[derive(Clone)]
pub struct BitableConfig {
    /// Feishu app ID.
    app_id: String,
    /// Feishu app secret.
    app_secret: String,
    /// Bitable app token (the base the table lives in).
    app_token: String,
    /// Target table ID.
    table_id: String,
    /// Feishu Open API base.
    base_url: Url,
    /// Timeout for each request.
    timeout: Duration,
    /// Target column names.
    fields: FieldNames,
}

impl std::fmt::Debug for BitableConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitableConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("app_token", &self.app_token)
            .field("table_id", &self.table_id)
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("fields", &self.fields)
            .finish()
    }
}

impl BitableConfig {
    /// Creates a configuration with default base URL, timeout and columns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if a credential is empty or
    /// an identifier contains a path separator.
    pub fn new(
        app_id: String,
        app_secret: String,
        app_token: String,
        table_id: String,
    ) -> Result<Self, ConfigError> {
        for (field, value) in [
            ("feishu-app-id", &app_id),
            ("feishu-app-secret", &app_secret),
            ("bitable-app-token", &app_token),
            ("bitable-table-id", &table_id),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        for (field, value) in [("bitable-app-token", &app_token), ("bitable-table-id", &table_id)] {
            if value.contains('/') || value.contains('?') {
                return Err(invalid(field, "must not contain '/' or '?'"));
            }
        }

        Ok(Self {
            app_id,
            app_secret,
            app_token,
            table_id,
            base_url: parse_url("bitable.base-url", DEFAULT_FEISHU_BASE_URL)?,
            timeout: Duration::from_secs(DEFAULT_BITABLE_TIMEOUT_SECS),
            fields: FieldNames::default(),
        })
    }

    /// Applies the `[bitable]` table of a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for an invalid URL or a zero timeout.
    pub fn with_section(mut self, section: &BitableSection) -> Result<Self, ConfigError> {
        if let Some(base_url) = &section.base_url {
            self.base_url = parse_url("bitable.base-url", base_url)?;
        }
        if let Some(secs) = section.timeout_secs {
            if secs == 0 {
                return Err(invalid("bitable.timeout-secs", "must be greater than 0"));
            }
            self.timeout = Duration::from_secs(secs);
        }
        self.fields = section.fields.clone();
        Ok(self)
    }

    /// Sets the Feishu Open API base.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Returns the Feishu app ID.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the Feishu app secret.
    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }

    /// Returns the Bitable app token.
    pub fn app_token(&self) -> &str {
        &self.app_token
    }

    /// Returns the target table ID.
    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    /// Returns the Feishu Open API base.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the target column names.
    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BitableConfig {
        BitableConfig::new(
            "cli_app".to_string(),
            "secret".to_string(),
            "bascn123".to_string(),
            "tbl456".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.base_url().as_str(), "https://open.feishu.cn/");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.fields().rank, "排名");
    }

    #[test]
    fn test_empty_credential_rejected() {
        let result = BitableConfig::new(
            "cli_app".to_string(),
            " ".to_string(),
            "bascn123".to_string(),
            "tbl456".to_string(),
        );
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_table_id_with_separator_rejected() {
        let result = BitableConfig::new(
            "cli_app".to_string(),
            "secret".to_string(),
            "bascn123".to_string(),
            "tbl/../x".to_string(),
        );
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_with_section() {
        let section = BitableSection {
            base_url: Some("https://open.larksuite.com".to_string()),
            timeout_secs: Some(10),
            fields: FieldNames {
                forks: "Forks".to_string(),
                ..FieldNames::default()
            },
        };

        let config = config().with_section(&section).unwrap();

        assert_eq!(config.base_url().host_str(), Some("open.larksuite.com"));
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.fields().forks, "Forks");

        let debug = format!("{config:?}");
        assert!(!debug.contains("secret\""));
    }
}
