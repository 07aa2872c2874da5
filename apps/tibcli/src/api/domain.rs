//! Domain Server calls used by the session core

use crate::api::transport::{base_url, HttpTransport};
use crate::error::{CliError, CliResult};
use crate::models::{cookie_header, Sandbox, StoredCookie};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

pub const PLATFORM_VERSION_PATH: &str = "/platformapiversion";
pub const DEFAULT_SANDBOX_NAME: &str = "MyDefaultSandbox";
pub const SANDBOX_PATH: &str = "/domain/v1/sandboxes/";

/// Outcome of a successful sandbox probe
#[derive(Debug, Clone, Default)]
pub struct SandboxProbe {
    pub sandbox: Sandbox,
    /// Refreshed cookies from `Set-Cookie`, if any
    pub cookies: Vec<StoredCookie>,
}

/// Backend that owns sandboxes; also the platform version authority
#[async_trait]
pub trait DomainServer: Send + Sync {
    /// `major.minor.patch` reported by the platform
    async fn platform_api_version(&self, domain_url: &str) -> CliResult<String>;

    /// Fetch the default sandbox with the given session cookies
    async fn default_sandbox(
        &self,
        domain_url: &str,
        cookies: &[StoredCookie],
    ) -> CliResult<SandboxProbe>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ErrorBody {
    error_code: String,
    error_msg: String,
    error_detail: String,
}

pub struct DomainServerClient {
    transport: Arc<HttpTransport>,
}

impl DomainServerClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl DomainServer for DomainServerClient {
    async fn platform_api_version(&self, domain_url: &str) -> CliResult<String> {
        let url = format!("{}{}", base_url(domain_url), PLATFORM_VERSION_PATH);
        let builder = self.transport.no_redirect_client().get(url);
        let reply = self.transport.send(builder).await?;

        if !reply.is_ok() {
            return Err(CliError::Api {
                status: reply.status.as_u16(),
                message: format!("Server responded with {}", reply.status_line()),
            });
        }

        let version = reply.body.trim().to_string();
        self.transport
            .logger()
            .debug(format!("Platform api version: {}", version));
        Ok(version)
    }

    async fn default_sandbox(
        &self,
        domain_url: &str,
        cookies: &[StoredCookie],
    ) -> CliResult<SandboxProbe> {
        let url = format!(
            "{}{}{}",
            base_url(domain_url),
            SANDBOX_PATH,
            DEFAULT_SANDBOX_NAME
        );
        let builder = self
            .transport
            .client()
            .get(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::COOKIE, cookie_header(cookies));
        let reply = self.transport.send(builder).await?;

        if !reply.is_ok() {
            let status = reply.status.as_u16();
            let error: ErrorBody = serde_json::from_str(&reply.body).unwrap_or_default();
            let message = if error.error_msg.is_empty() {
                reply.body.trim().to_string()
            } else {
                error.error_msg.clone()
            };
            self.transport.logger().debug(format!(
                "Default sandbox probe failed: status {}, code '{}', message '{}', detail '{}'",
                status, error.error_code, message, error.error_detail
            ));

            if is_authorization_expired(status, &message) {
                return Err(CliError::SessionExpired(message));
            }
            return Err(reply.into_error());
        }

        let sandbox: Sandbox = serde_json::from_str(&reply.body)
            .map_err(|e| CliError::Protocol(format!("default sandbox response: {}", e)))?;

        Ok(SandboxProbe {
            sandbox,
            cookies: reply.cookies,
        })
    }
}

/// 419, or the backend's 599 wrapper around a 419
pub fn is_authorization_expired(status: u16, message: &str) -> bool {
    status == 419 || (status == 599 && message.contains("419"))
}
