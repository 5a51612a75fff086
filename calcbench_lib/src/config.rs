//! Environment-driven client configuration.

use std::time::Duration;

use calcbench_api::{Credentials, DEFAULT_API_URL, DEFAULT_LOGON_URL};

use crate::error::CalcbenchError;

pub const API_URL_VAR: &str = "CALCBENCH_API_URL";
pub const LOGON_URL_VAR: &str = "CALCBENCH_LOGON_URL";
pub const TIMEOUT_VAR: &str = "CALCBENCH_TIMEOUT_SECS";
pub const USERNAME_VAR: &str = "CALCBENCH_USERNAME";
pub const PASSWORD_VAR: &str = "CALCBENCH_PASSWORD";

const DEFAULT_TIMEOUT_SECS: u64 = 20 * 60;

/// Where and how to reach the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub logon_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            logon_url: DEFAULT_LOGON_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Reads `CALCBENCH_API_URL`, `CALCBENCH_LOGON_URL` and
    /// `CALCBENCH_TIMEOUT_SECS`, falling back to the production defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: lookup(API_URL_VAR)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_url),
            logon_url: lookup(LOGON_URL_VAR)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.logon_url),
            timeout: lookup(TIMEOUT_VAR)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_logon_url(mut self, url: impl Into<String>) -> Self {
        self.logon_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Reads `CALCBENCH_USERNAME` and `CALCBENCH_PASSWORD`.
pub fn credentials_from_env() -> Result<Credentials, CalcbenchError> {
    credentials_from_lookup(|key| std::env::var(key).ok())
}

pub fn credentials_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, CalcbenchError> {
    let user = lookup(USERNAME_VAR)
        .filter(|v| !v.is_empty())
        .ok_or(CalcbenchError::MissingCredentials(USERNAME_VAR))?;
    let password = lookup(PASSWORD_VAR)
        .filter(|v| !v.is_empty())
        .ok_or(CalcbenchError::MissingCredentials(PASSWORD_VAR))?;
    Ok(Credentials::new(user, password))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(env(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_url, "https://www.calcbench.com/api");
        assert_eq!(config.timeout, Duration::from_secs(1200));
    }

    #[test]
    fn overrides_from_env() {
        let config = ClientConfig::from_lookup(env(&[
            (API_URL_VAR, "http://localhost:9000/api"),
            (TIMEOUT_VAR, "30"),
        ]));
        assert_eq!(config.api_url, "http://localhost:9000/api");
        assert_eq!(config.logon_url, DEFAULT_LOGON_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn bad_timeout_falls_back() {
        let config = ClientConfig::from_lookup(env(&[(TIMEOUT_VAR, "soon")]));
        assert_eq!(config.timeout, Duration::from_secs(1200));
    }

    #[test]
    fn credentials_present() {
        let creds = credentials_from_lookup(env(&[
            (USERNAME_VAR, "analyst@example.com"),
            (PASSWORD_VAR, "secret"),
        ]))
        .unwrap();
        assert_eq!(creds.user_name(), "analyst@example.com");
    }

    #[test]
    fn missing_password_is_reported() {
        let err = credentials_from_lookup(env(&[(USERNAME_VAR, "analyst@example.com")]))
            .unwrap_err();
        assert!(matches!(
            err,
            CalcbenchError::MissingCredentials("CALCBENCH_PASSWORD")
        ));
        assert!(err.to_string().contains("CALCBENCH_PASSWORD"));
    }
}
