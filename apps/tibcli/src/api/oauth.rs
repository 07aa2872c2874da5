//! Accounts-service OAuth2 client

use crate::api::transport::{HttpReply, HttpTransport};
use crate::error::{CliError, CliResult};
use crate::models::TokenResponse;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Password login, refresh and revoke against the accounts service
///
/// `token_url` is the accounts-service token endpoint; revocation posts to
/// `<token_url>/revoke`.
#[async_trait]
pub trait OAuth2: Send + Sync {
    /// `grant_type=password`
    async fn login(
        &self,
        token_url: &str,
        username: &str,
        password: &str,
        client_id: &str,
    ) -> CliResult<TokenResponse>;

    /// `grant_type=refresh_token`
    async fn renew(
        &self,
        token_url: &str,
        refresh_token: &str,
        client_id: &str,
        client_secret: &str,
    ) -> CliResult<TokenResponse>;

    /// Revoke an access token
    async fn logout(
        &self,
        token_url: &str,
        access_token: &str,
        client_id: &str,
        client_secret: &str,
    ) -> CliResult<TokenResponse>;
}

#[derive(Serialize)]
struct RevokeRequest<'a> {
    access_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// HTTP implementation of [`OAuth2`]
pub struct AccountsClient {
    transport: Arc<HttpTransport>,
}

impl AccountsClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    async fn post_form(&self, token_url: &str, form: &[(&str, &str)]) -> CliResult<TokenResponse> {
        if !self.transport.verifies_accounts_certificates() {
            self.transport
                .logger()
                .debug("Posting to the accounts service without certificate verification");
        }
        let request = self
            .transport
            .accounts_client()
            .post(token_url.trim_end_matches('/'))
            .form(form);
        let reply = self.transport.send(request).await?;
        parse_token_reply(reply)
    }
}

#[async_trait]
impl OAuth2 for AccountsClient {
    async fn login(
        &self,
        token_url: &str,
        username: &str,
        password: &str,
        client_id: &str,
    ) -> CliResult<TokenResponse> {
        self.post_form(
            token_url,
            &[
                ("grant_type", "password"),
                ("client_id", client_id),
                ("username", username),
                ("password", password),
            ],
        )
        .await
    }

    async fn renew(
        &self,
        token_url: &str,
        refresh_token: &str,
        client_id: &str,
        client_secret: &str,
    ) -> CliResult<TokenResponse> {
        self.post_form(
            token_url,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ],
        )
        .await
    }

    async fn logout(
        &self,
        token_url: &str,
        access_token: &str,
        client_id: &str,
        client_secret: &str,
    ) -> CliResult<TokenResponse> {
        let body = RevokeRequest {
            access_token,
            client_id,
            client_secret,
        };
        let url = format!("{}/revoke", token_url.trim_end_matches('/'));
        let request = self.transport.accounts_client().post(url).json(&body);
        let reply = self.transport.send(request).await?;
        parse_token_reply(reply)
    }
}

/// Interpret a token endpoint reply.
///
/// A 200 that parses is returned as-is, even when it carries an `error`.
pub fn parse_token_reply(reply: HttpReply) -> CliResult<TokenResponse> {
    match serde_json::from_str::<TokenResponse>(&reply.body) {
        Ok(parsed) if reply.is_ok() => Ok(parsed),
        Ok(parsed) => Err(CliError::AuthenticationFailed(
            parsed
                .error_description
                .or(parsed.error)
                .unwrap_or_else(|| reply.status_line()),
        )),
        Err(_) if !reply.is_ok() => Err(CliError::Api {
            status: reply.status.as_u16(),
            message: format!("{} {}", reply.status_line(), reply.body.trim()),
        }),
        Err(e) => Err(CliError::Protocol(format!("'{}': {}", reply.body, e))),
    }
}
