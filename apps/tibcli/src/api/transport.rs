//! Shared HTTP plumbing
//!
//! Every outbound call goes through [`HttpTransport::send`], which logs the
//! exchange and collects status, cookies and body into an [`HttpReply`].

use crate::config::Settings;
use crate::error::{CliError, CliResult};
use crate::logging::Logger;
use crate::models::StoredCookie;
use chrono::{DateTime, Utc};
use reqwest::{redirect, Client, RequestBuilder, StatusCode};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// TLS transport variant, chosen once at startup
///
/// Only calls to the accounts service honor [`TransportMode::InsecureDev`];
/// IDM and Domain Server certificates are always verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    /// Certificates verified against the system roots
    #[default]
    Standard,
    /// Certificate verification off; development deployments only
    InsecureDev,
}

impl TransportMode {
    /// A named deployment implies its self-signed development certificates
    pub fn for_deployment(deployment_name: &str) -> Self {
        if deployment_name.trim().is_empty() {
            TransportMode::Standard
        } else {
            TransportMode::InsecureDev
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Standard => "standard-transport",
            TransportMode::InsecureDev => "insecure-dev-transport",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "standard-transport" => Ok(TransportMode::Standard),
            "insecure-dev-transport" => Ok(TransportMode::InsecureDev),
            other => Err(CliError::Config(format!(
                "Unknown transport '{}': expected 'standard-transport' or 'insecure-dev-transport'",
                other
            ))),
        }
    }
}

/// Status, cookies and body of a completed exchange
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: StatusCode,
    pub cookies: Vec<StoredCookie>,
    pub body: String,
}

impl HttpReply {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// `404 Not Found` style status line
    pub fn status_line(&self) -> String {
        match self.status.canonical_reason() {
            Some(reason) => format!("{} {}", self.status.as_u16(), reason),
            None => self.status.as_u16().to_string(),
        }
    }

    /// Map a failed reply to an error by status class
    pub fn into_error(self) -> CliError {
        let message = if self.body.trim().is_empty() {
            self.status_line()
        } else {
            self.body.trim().to_string()
        };

        match self.status.as_u16() {
            401 | 403 => CliError::AuthenticationFailed(message),
            status if status >= 500 => {
                CliError::Server(format!("{}: {}", self.status_line(), message))
            }
            status => CliError::Api { status, message },
        }
    }
}

/// HTTP clients configured for the selected transport
pub struct HttpTransport {
    client: Client,
    no_redirect: Client,
    accounts: Client,
    mode: TransportMode,
    logger: Arc<Logger>,
}

impl HttpTransport {
    /// Build clients with keep-alive and compression disabled
    pub fn new(settings: &Settings, logger: Arc<Logger>) -> CliResult<Self> {
        let mode = settings.transport;
        let insecure_accounts = mode == TransportMode::InsecureDev;
        if insecure_accounts {
            logger.warn(
                "TLS certificate verification is disabled for the accounts service \
                 (insecure-dev-transport)",
            );
        }
        logger.debug(format!("Using {}", mode));

        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = build_client(timeout, redirect::Policy::default(), false)?;
        let no_redirect = build_client(timeout, redirect::Policy::none(), false)?;
        let accounts = build_client(timeout, redirect::Policy::default(), insecure_accounts)?;

        Ok(Self {
            client,
            no_redirect,
            accounts,
            mode,
            logger,
        })
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    /// Client for IDM and Domain Server calls
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Client for the accounts service; the only one affected by the mode
    pub fn accounts_client(&self) -> &Client {
        &self.accounts
    }

    /// Whether accounts-service certificates are verified
    pub fn verifies_accounts_certificates(&self) -> bool {
        self.mode != TransportMode::InsecureDev
    }

    /// Client that reports redirects instead of following them
    pub fn no_redirect_client(&self) -> &Client {
        &self.no_redirect
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Execute a request, logging it at debug/trace level
    pub async fn send(&self, builder: RequestBuilder) -> CliResult<HttpReply> {
        let (client, request) = builder.build_split();
        let request = request?;

        let method = request.method().to_string();
        let url = request.url().to_string();
        self.logger.debug_request(&method, &url);
        if self.logger.is_trace() {
            let headers = header_pairs(request.headers());
            let body = request
                .body()
                .and_then(|b| b.as_bytes())
                .map(|b| String::from_utf8_lossy(b).into_owned());
            self.logger
                .trace_request_body(&method, &url, headers, body.as_deref());
        }

        let started = Instant::now();
        let response = client.execute(request).await.map_err(|e| {
            self.logger.debug(format!("{} {} failed: {}", method, url, e));
            CliError::from(e)
        })?;
        let elapsed = started.elapsed().as_millis() as u64;

        let status = response.status();
        let headers = header_pairs(response.headers());
        let cookies: Vec<StoredCookie> = response.cookies().map(|c| stored_cookie(&c)).collect();
        let body = response.text().await?;

        let reason = status.canonical_reason().unwrap_or("unknown");
        self.logger.debug_response(status.as_u16(), reason, elapsed);
        self.logger
            .trace_response_body(status.as_u16(), reason, elapsed, headers, Some(&body));

        Ok(HttpReply {
            status,
            cookies,
            body,
        })
    }
}

fn build_client(
    timeout: Duration,
    policy: redirect::Policy,
    accept_invalid_certs: bool,
) -> CliResult<Client> {
    Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(0)
        .no_gzip()
        .redirect(policy)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(|e| CliError::Network(format!("Failed to create HTTP client: {e}")))
}

fn header_pairs(headers: &reqwest::header::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn stored_cookie(cookie: &reqwest::cookie::Cookie<'_>) -> StoredCookie {
    StoredCookie {
        name: cookie.name().to_string(),
        value: cookie.value().to_string(),
        path: cookie.path().unwrap_or_default().to_string(),
        domain: cookie.domain().unwrap_or_default().to_string(),
        expires: cookie.expires().map(DateTime::<Utc>::from),
    }
}

/// Base URL for a configured host; a bare `host:port` gets `https://`
pub fn base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}
