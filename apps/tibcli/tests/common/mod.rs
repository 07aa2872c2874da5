//! Shared fixtures for session lifecycle tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use tibcli::api::{HttpTransport, IDM_LOGIN_PATH, PLATFORM_VERSION_PATH};
use tibcli::config::{ConfigPaths, Placeholder, PlaceholderRegistry, Settings, CLI_VERSION};
use tibcli::credentials::SettingsStore;
use tibcli::error::CliResult;
use tibcli::interactive::CredentialPrompt;
use tibcli::logging::Logger;
use tibcli::session::{Services, SessionController};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BRANDED_USER: &str = "jack@example.com";
pub const CLIENT_ID: &str = "cli-client";
pub const TOKEN_PATH: &str = "/oauth/token";

/// Answers credential prompts from a script and counts how often it was asked
pub struct ScriptedPrompt {
    username: String,
    password: String,
    asked: AtomicUsize,
}

impl ScriptedPrompt {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            asked: AtomicUsize::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl CredentialPrompt for ScriptedPrompt {
    fn username(&self, _default: &str) -> CliResult<String> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.username.clone())
    }

    fn password(&self) -> CliResult<String> {
        Ok(self.password.clone())
    }
}

/// A mock platform plus an isolated settings directory
pub struct TestContext {
    pub server: MockServer,
    pub dir: TempDir,
    pub prompt: Arc<ScriptedPrompt>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            dir: TempDir::new().unwrap(),
            prompt: Arc::new(ScriptedPrompt::new("jill@example.com", "prompted-pw")),
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn paths(&self) -> ConfigPaths {
        ConfigPaths::in_dir(self.dir.path().join(".tibcli"))
    }

    pub fn store(&self) -> SettingsStore {
        SettingsStore::new(self.paths())
    }

    /// Every placeholder branded against the mock server
    pub fn registry(&self) -> PlaceholderRegistry {
        PlaceholderRegistry::branded()
            .with_value(Placeholder::Username, BRANDED_USER)
            .with_value(Placeholder::DomainServerHost, self.uri())
            .with_value(Placeholder::AccountsUrl, format!("{}{}", self.uri(), TOKEN_PATH))
            .with_value(Placeholder::AccountsClientId, CLIENT_ID)
            .with_value(Placeholder::IdmServerHost, self.uri())
            .with_value(Placeholder::TenantId, "TIBCO")
            .with_value(Placeholder::Region, "us-west-2")
            .with_value(Placeholder::DeploymentName, " ")
            .with_value(Placeholder::FtlEnabled, "false")
    }

    pub fn controller(&self) -> SessionController {
        self.controller_with(Settings::default())
    }

    pub fn controller_with(&self, settings: Settings) -> SessionController {
        let logger = Arc::new(Logger::silent());
        let transport = Arc::new(HttpTransport::new(&settings, logger.clone()).unwrap());
        let services = Services::http(transport).with_prompt(self.prompt.clone());
        SessionController::new(self.store(), self.registry(), settings, logger, services)
    }

    pub async fn mock_platform_version(&self, version: &str) {
        Mock::given(method("GET"))
            .and(path(PLATFORM_VERSION_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("{}\n", version)))
            .mount(&self.server)
            .await;
    }

    /// Platform version matching this client
    pub async fn mock_compatible_platform(&self) {
        self.mock_platform_version(CLI_VERSION).await;
    }

    pub fn idm_login_path(&self) -> &'static str {
        IDM_LOGIN_PATH
    }

    /// IDM login reply for `user` with a session cookie
    pub fn idm_reply(&self, user: &str, cookie_value: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header(
                "Set-Cookie",
                format!("JSESSIONID={}; Path=/", cookie_value).as_str(),
            )
            .set_body_json(json!({
                "firstName": "Jack",
                "lastName": "Smith",
                "userName": user,
                "userId": "u-1001",
                "orgName": "acme",
                "ts": 1700000000,
                "domainUrl": self.uri(),
                "orgDisplayName": "acme us-west-2",
                "orgList": [
                    {"name": "acme", "displayName": "acme us-west-2", "subscriptionId": "sub-1"}
                ],
                "subscriptionId": "sub-1"
            }))
    }

    pub fn token_reply(&self, access_token: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access_token,
            "token_type": "bearer",
            "refresh_token": "refresh-1",
            "expires_in": 3600
        }))
    }
}
