//! Token-authenticated session against the storage service
//!
//! [`HttpSession::connect`] exchanges the login credentials for a bearer
//! token once; the session then serves every engine request as a blocking
//! GET carrying that token.

use crate::endpoint::{base_url, endpoint_url};
use crate::errors::{auth_error, status_error, transport_error, Result};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::Url;
use serde::Serialize;
use snapdiff_core::{ApiRequest, CancelToken, Transport};
use snapdiff_core_types::{RequestId, Sensitive};
use std::time::{Duration, Instant};

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Request timeout used unless overridden
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to open a session
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// `host` or `host:port`
    pub host: String,
    pub username: String,
    pub password: Sensitive<String>,
    /// Per-request timeout, connect included
    pub timeout: Duration,
    /// Accept self-signed or otherwise unverifiable certificates
    pub accept_invalid_certs: bool,
    base_url: Option<Url>,
}

impl ConnectionConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: Sensitive::new(password.into()),
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: true,
            base_url: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Use `url` as the API root instead of `https://{host}/api/v1`
    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// The API root requests are resolved against
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the host does not form a valid URL.
    pub fn base_url(&self) -> Result<Url> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => base_url(&self.host),
        }
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

/// An authenticated connection to one storage service
#[derive(Debug)]
pub struct HttpSession {
    client: Client,
    base: Url,
    token: Sensitive<String>,
    cancel: CancelToken,
}

impl HttpSession {
    /// Log in and open a session
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: the host does not form a valid URL
    /// - `Unauthorised`: the login was refused or returned an empty token
    /// - `Transport`, `Timeout`: the service could not be reached
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        let base = config.base_url()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| transport_error("connect", &e))?;

        let token = login(&client, &base, config)?;
        tracing::debug!(host = config.host.as_str(), "session established");

        Ok(Self {
            client,
            base,
            token,
            cancel: CancelToken::new(),
        })
    }

    /// Refuse further requests once `cancel` is tripped
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

fn login(client: &Client, base: &Url, config: &ConnectionConfig) -> Result<Sensitive<String>> {
    let url = endpoint_url(base, &ApiRequest::new("auth/token"))?;
    let body = LoginBody {
        username: &config.username,
        password: config.password.expose(),
    };

    let response = client
        .post(url)
        .json(&body)
        .send()
        .map_err(|e| transport_error("auth_token", &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(auth_error(&format!(
            "login as {:?} refused with status {}",
            config.username,
            status.as_u16()
        ))
        .with_status(status.as_u16()));
    }

    let text = response
        .text()
        .map_err(|e| transport_error("auth_token", &e))?;
    let token = text.trim();
    if token.is_empty() {
        return Err(auth_error("login returned an empty token"));
    }
    Ok(Sensitive::new(token.to_string()))
}

impl Transport for HttpSession {
    fn get(&self, request: &ApiRequest) -> snapdiff_core::Result<Vec<u8>> {
        self.cancel.check()?;

        let url = endpoint_url(&self.base, request)?;
        let request_id = RequestId::new();
        let started = Instant::now();

        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.token.expose()))
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .send()
            .map_err(|e| transport_error("http_get", &e).with_request_id(request_id.clone()))?;

        let status = response.status();
        tracing::debug!(
            method = "GET",
            url_path = url.path(),
            status = status.as_u16(),
            request_id = request_id.as_str(),
            duration_ms = started.elapsed().as_millis() as u64,
            "http request"
        );

        if !status.is_success() {
            return Err(status_error("http_get", status.as_u16(), url.path())
                .with_request_id(request_id));
        }

        let body = response
            .bytes()
            .map_err(|e| transport_error("http_get", &e).with_request_id(request_id))?;
        Ok(body.to_vec())
    }
}
