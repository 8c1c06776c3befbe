use crate::{env_required, ConfigError, FromEnv};

/// Configuration for the external action-history service
#[derive(Clone, Debug)]
pub struct HistoryConfig {
    /// Full URL the history service accepts action records on
    pub url: String,
}

impl HistoryConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl FromEnv for HistoryConfig {
    /// Requires HISTORY_SERVICE_URL to be set (no default)
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_required("HISTORY_SERVICE_URL")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_config_from_env_success() {
        temp_env::with_var(
            "HISTORY_SERVICE_URL",
            Some("http://history.local/actions"),
            || {
                let config = HistoryConfig::from_env();
                assert!(config.is_ok());
                assert_eq!(config.unwrap().url, "http://history.local/actions");
            },
        );
    }

    #[test]
    fn test_history_config_from_env_missing() {
        temp_env::with_var_unset("HISTORY_SERVICE_URL", || {
            let config = HistoryConfig::from_env();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("HISTORY_SERVICE_URL"));
        });
    }
}
