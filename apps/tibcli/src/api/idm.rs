//! Identity-management login

use crate::api::transport::{base_url, HttpTransport};
use crate::error::{CliError, CliResult};
use crate::models::{IdmLoginRequest, IdmLoginResponse, StoredCookie};
use async_trait::async_trait;
use std::sync::Arc;

/// Path of the OAuth login endpoint under the IDM host
pub const IDM_LOGIN_PATH: &str = "/idm/v2/login-oauth";

/// Session returned by the IDM
#[derive(Debug, Clone, Default)]
pub struct IdmLogin {
    pub response: IdmLoginResponse,
    pub cookies: Vec<StoredCookie>,
}

/// Exchanges an access token for a platform session
#[async_trait]
pub trait IdentityManagement: Send + Sync {
    async fn login(&self, idm_url: &str, request: &IdmLoginRequest) -> CliResult<IdmLogin>;
}

pub struct IdmClient {
    transport: Arc<HttpTransport>,
}

impl IdmClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl IdentityManagement for IdmClient {
    async fn login(&self, idm_url: &str, request: &IdmLoginRequest) -> CliResult<IdmLogin> {
        let url = format!("{}{}", base_url(idm_url), IDM_LOGIN_PATH);
        let builder = self.transport.client().post(url).json(request);
        let reply = self.transport.send(builder).await?;

        if !reply.is_ok() {
            return Err(reply.into_error());
        }

        let response: IdmLoginResponse = serde_json::from_str(&reply.body)
            .map_err(|e| CliError::Protocol(format!("IDM login response: {}", e)))?;

        if reply.cookies.is_empty() {
            self.transport
                .logger()
                .debug("IDM login returned no session cookies");
        }

        Ok(IdmLogin {
            response,
            cookies: reply.cookies,
        })
    }
}
