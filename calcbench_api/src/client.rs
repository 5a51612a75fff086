//! HTTP client for the Calcbench JSON API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::{Error, Transport};

/// Base URL of the production API; endpoint names are appended to it.
pub const DEFAULT_API_URL: &str = "https://www.calcbench.com/api";

/// Form endpoint that exchanges an email/password for a session cookie.
pub const DEFAULT_LOGON_URL: &str = "https://www.calcbench.com/account/LogOnAjax";

const USER_AGENT: &str = concat!("calcbench_api_rust/", env!("CARGO_PKG_VERSION"));

/// Twenty minutes; large universe queries are slow to assemble server side.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 20);

/// Email and password used to open a session.
#[derive(Clone)]
pub struct Credentials {
    user_name: String,
    password: String,
}

impl Credentials {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP client for the Calcbench API.
///
/// Holds one `reqwest::Client` with a cookie store, so once [`Client::log_on`]
/// succeeds every later request rides on the same authenticated session.
/// The session ends when the client is [closed](Client::close) or dropped.
pub struct Client {
    http: reqwest::Client,
    /// Base URL for the API. Defaults to [`DEFAULT_API_URL`].
    base_api_url: String,
}

impl Client {
    /// Creates an unauthenticated client against a custom base URL. Used for
    /// testing with wiremock, and as the first step of [`Client::connect`].
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            http,
            base_api_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client and logs on. This is the usual entry point.
    pub async fn connect(
        base_url: &str,
        logon_url: &str,
        timeout: Duration,
        credentials: &Credentials,
    ) -> Result<Self, Error> {
        let client = Self::with_timeout(base_url, timeout)?;
        client.log_on(logon_url, credentials).await?;
        Ok(client)
    }

    /// Posts the logon form. The server answers with the literal body `true`
    /// on success and sets the session cookie.
    pub async fn log_on(&self, logon_url: &str, credentials: &Credentials) -> Result<(), Error> {
        tracing::debug!("logging on as {}", credentials.user_name);
        let resp = self
            .http
            .post(logon_url)
            .form(&[
                ("email", credentials.user_name.as_str()),
                ("password", credentials.password.as_str()),
                ("rememberMe", "true"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach logon endpoint: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read logon response: {}", e);
            Error::RequestFailed
        })?;
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
        if body.trim() != "true" {
            return Err(Error::InvalidCredentials);
        }
        Ok(())
    }

    /// Ends the session. Consumes the client so it cannot be used afterwards.
    pub fn close(self) {
        tracing::debug!("closing session for {}", self.base_api_url);
    }

    fn get_url(&self, endpoint: &str) -> Result<Url, Error> {
        Url::parse(format!("{}/{}", &self.base_api_url, endpoint).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })
    }

    async fn post<T, P>(&self, endpoint: &str, payload: &P) -> Result<T, Error>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let url = self.get_url(endpoint)?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            if let Ok(json) = serde_json::to_string(payload) {
                tracing::debug!("posting to {}, {}", url, json);
            }
        }
        let resp = self
            .http
            .post(url)
            .header("accept", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to post to {}: {}", endpoint, e);
                Error::RequestFailed
            })?;
        read_json(resp).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
        let url = self.get_url(endpoint)?;
        tracing::debug!("getting {}", url);
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get {}: {}", endpoint, e);
                Error::RequestFailed
            })?;
        read_json(resp).await
    }
}

impl Transport for Client {
    async fn post_json(&self, endpoint: &str, payload: &Value) -> Result<Value, Error> {
        self.post::<Value, Value>(endpoint, payload).await
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value, Error> {
        self.get::<Value>(endpoint).await
    }
}

/// Maps a non-success status to [`Error::HttpStatus`] and decodes the body.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(|e| {
        tracing::error!("Failed to read response body: {}", e);
        Error::RequestFailed
    })?;

    if !status.is_success() {
        let snippet = truncate_body(&body);
        tracing::error!("Request failed with status {}: {}", status, snippet);
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            body: snippet,
        });
    }

    serde_json::from_str::<T>(&body).map_err(|e| {
        let snippet = truncate_body(&body);
        tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
        Error::Parse(e)
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_body_unchanged() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_long_body() {
        let body = "x".repeat(2500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
        assert_eq!(out.len(), 2000 + "...[truncated]".len());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("a@example.com", "hunter2");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("a@example.com"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn endpoint_url_joins_cleanly() {
        let client = Client::with_base_url("https://example.com/api/").unwrap();
        assert_eq!(
            client.get_url("mappedData").unwrap().as_str(),
            "https://example.com/api/mappedData"
        );
    }
}
