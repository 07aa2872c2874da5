//! Session lifecycle: is the user usably logged in, and if not, the least
//! re-authentication that gets them there.

use std::sync::Arc;

use crate::api::{
    AccountsClient, DomainServer, DomainServerClient, HttpTransport, IdentityManagement,
    IdmClient, OAuth2,
};
use crate::config::{Placeholder, PlaceholderRegistry, Settings, CLI_VERSION};
use crate::credentials::SettingsStore;
use crate::error::{CliError, CliResult};
use crate::interactive::{CredentialPrompt, TerminalPrompt};
use crate::logging::Logger;
use crate::models::{IdmLoginRequest, OrgHint, Profile, Session, Token};
use crate::output::print_message;
use crate::session::version::ensure_compatible;

/// Printed before prompting for credentials mid-command
pub const RELOGIN_NOTICE: &str = "User is not logged-in or session has expired.";

/// Remote collaborators and the credential source
#[derive(Clone)]
pub struct Services {
    pub oauth: Arc<dyn OAuth2>,
    pub idm: Arc<dyn IdentityManagement>,
    pub domain: Arc<dyn DomainServer>,
    pub prompt: Arc<dyn CredentialPrompt>,
}

impl Services {
    /// HTTP clients over one transport, prompting on the terminal
    pub fn http(transport: Arc<HttpTransport>) -> Self {
        Self {
            oauth: Arc::new(AccountsClient::new(transport.clone())),
            idm: Arc::new(IdmClient::new(transport.clone())),
            domain: Arc::new(DomainServerClient::new(transport)),
            prompt: Arc::new(TerminalPrompt),
        }
    }

    /// Same clients with a different credential source
    pub fn with_prompt(mut self, prompt: Arc<dyn CredentialPrompt>) -> Self {
        self.prompt = prompt;
        self
    }
}

/// The three persisted records, secrets revealed
#[derive(Debug, Clone, Default)]
pub struct LoadedSettings {
    pub profile: Profile,
    pub session: Session,
    pub token: Token,
}

/// Coordinates the accounts service, IDM and Domain Server with the
/// persisted profile, session and token.
///
/// Holds no state of its own between calls; every decision is made from
/// what is on disk.
pub struct SessionController {
    store: SettingsStore,
    registry: PlaceholderRegistry,
    settings: Settings,
    logger: Arc<Logger>,
    services: Services,
}

impl SessionController {
    pub fn new(
        store: SettingsStore,
        registry: PlaceholderRegistry,
        settings: Settings,
        logger: Arc<Logger>,
        services: Services,
    ) -> Self {
        Self {
            store,
            registry,
            settings,
            logger,
            services,
        }
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn prompt(&self) -> &dyn CredentialPrompt {
        self.services.prompt.as_ref()
    }

    // --- persisted records ---

    /// Load profile, session and token
    pub fn load_settings(&self) -> CliResult<LoadedSettings> {
        Ok(LoadedSettings {
            profile: self.store.load::<Profile>(false)?,
            session: self.store.load::<Session>(true)?,
            token: self.store.load::<Token>(true)?,
        })
    }

    /// Delete all three records
    pub fn reset_settings(&self) -> CliResult<()> {
        self.store.delete::<Profile>()?;
        self.delete_session_and_token()
    }

    pub fn delete_session_and_token(&self) -> CliResult<()> {
        self.store.delete::<Session>()?;
        self.store.delete::<Token>()
    }

    fn save_session(&self, session: &Session) -> CliResult<()> {
        self.store.save(session, true)
    }

    // --- resolved configuration ---

    /// Profile email, else the branded username
    pub fn resolve_user_email(&self, profile: &Profile) -> CliResult<String> {
        if !profile.user_email.is_empty() {
            return Ok(profile.user_email.clone());
        }
        self.registry.get(Placeholder::Username)
    }

    /// Profile IDM URL, else the branded IDM host
    pub fn resolve_idm_url(&self, profile: &Profile) -> CliResult<String> {
        if !profile.idm_connect_url.is_empty() {
            return Ok(profile.idm_connect_url.clone());
        }
        self.registry.get(Placeholder::IdmServerHost)
    }

    pub fn accounts_url(&self) -> CliResult<String> {
        self.registry.get(Placeholder::AccountsUrl)
    }

    pub fn client_id(&self) -> CliResult<String> {
        self.registry.get(Placeholder::AccountsClientId)
    }

    /// Session domain URL, else the branded Domain Server host
    pub fn domain_url(&self, session: &Session) -> CliResult<String> {
        if !session.domain_url.is_empty() {
            return Ok(session.domain_url.clone());
        }
        self.registry.get(Placeholder::DomainServerHost)
    }

    // --- lifecycle ---

    /// Compare the platform api version with this client's.
    ///
    /// Reading the domain URL loads the session, so an unreadable session
    /// file surfaces here as a corrupt-settings error.
    pub async fn check_platform_version(&self) -> CliResult<()> {
        let session = self.store.load::<Session>(true)?;
        let domain_url = self.domain_url(&session)?;
        let platform = self
            .services
            .domain
            .platform_api_version(&domain_url)
            .await?;
        self.logger.debug(format!(
            "platform api version '{}', tibcli version '{}'",
            platform, CLI_VERSION
        ));
        ensure_compatible(&platform)
    }

    /// Make sure the user holds a usable session, re-authenticating as little
    /// as possible. Returns the session in effect.
    ///
    /// With `allow_prompt` false, a missing or expired token is reported as
    /// [`CliError::NotAuthenticated`] instead of asking for credentials.
    pub async fn ensure_logged_in(&self, org: &OrgHint, allow_prompt: bool) -> CliResult<Session> {
        self.logger
            .verbose_with_context("session", "Validating tibcli version and login state");

        match self.check_platform_version().await {
            Ok(()) => {}
            Err(e) if e.is_structurally_invalid_session() => {
                self.logger.debug(format!(
                    "Session file is unreadable, discarding session and token: {}",
                    e
                ));
                self.delete_session_and_token()?;
            }
            Err(e @ CliError::IncompatibleVersion { .. }) => return Err(e),
            Err(e) => return Err(CliError::PlatformCheck(e.to_string())),
        }

        let mut loaded = self.load_settings()?;
        if loaded.profile.is_stale() {
            self.logger.verbose_with_context(
                "session",
                format!(
                    "Settings written by tibcli {} are discarded",
                    loaded.profile.version
                ),
            );
            self.reset_settings()?;
            loaded = self.load_settings()?;
        }

        let user_email = self.resolve_user_email(&loaded.profile)?;
        let idm_url = self.resolve_idm_url(&loaded.profile)?;

        let mut session = loaded.session;
        if self.probe_session(&mut session).await? {
            self.logger
                .verbose_with_context("session", "Session cookies are valid");
            return Ok(session);
        }
        self.logger
            .verbose_with_context("session", "Session cookies missing or expired");

        if loaded.token.is_valid() {
            self.logger.verbose_with_context(
                "session",
                "Refreshing the session with the still-valid access token",
            );
            let access_token = loaded.token.value().unwrap_or_default().to_string();
            return self
                .idm_login(&idm_url, &user_email, &access_token, org, false)
                .await;
        }

        if !allow_prompt {
            return Err(CliError::NotAuthenticated);
        }

        print_message(RELOGIN_NOTICE);
        let username = self.services.prompt.username(&user_email)?;
        let password = self.services.prompt.password()?;

        let token = self.ta_login(&username, &password).await?;
        let access_token = token.value().unwrap_or_default().to_string();
        self.idm_login(&idm_url, &username, &access_token, &OrgHint::none(), true)
            .await
    }

    /// Probe the Domain Server with the session cookies.
    ///
    /// Any probe failure counts as an invalid session. On success the default
    /// sandbox and any refreshed cookies are written back.
    pub async fn probe_session(&self, session: &mut Session) -> CliResult<bool> {
        if !session.has_cookies() {
            self.logger.debug("Cookies of session file are empty");
            return Ok(false);
        }

        let domain_url = self.domain_url(session)?;
        let probe = match self
            .services
            .domain
            .default_sandbox(&domain_url, &session.cookies)
            .await
        {
            Ok(probe) => probe,
            Err(CliError::SessionExpired(message)) => {
                self.logger.debug(format!(
                    "Session cookies were rejected as expired: {}",
                    message
                ));
                return Ok(false);
            }
            Err(e) => {
                self.logger
                    .debug(format!("Validating session cookies failed: {}", e));
                return Ok(false);
            }
        };

        session.set_default_sandbox(&probe.sandbox);
        if !probe.cookies.is_empty() {
            session.update_cookies(probe.cookies)?;
        }
        self.save_session(session)?;
        Ok(true)
    }

    /// Password login against the accounts service.
    ///
    /// The token is persisted unless `TIBCLI_DONT_PERSIST` is set; a failure
    /// to persist is only a warning.
    pub async fn ta_login(&self, username: &str, password: &str) -> CliResult<Token> {
        let token_url = self.accounts_url()?;
        let client_id = self.client_id()?;

        let response = self
            .services
            .oauth
            .login(&token_url, username, password, &client_id)
            .await?;

        let access_token = match response.access_token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                return Err(CliError::AuthenticationFailed(
                    response
                        .error_description
                        .or(response.error)
                        .unwrap_or_else(|| "no access token in response".to_string()),
                ))
            }
        };

        let token = Token::issued(access_token, response.expires_in.unwrap_or(0));

        if self.settings.dont_persist {
            self.logger.verbose(format!(
                "No OAuth token persisted since environment variable '{}' is set",
                crate::config::DONT_PERSIST_ENV
            ));
        } else if let Err(e) = self.store.save(&token, true) {
            self.logger
                .warn(format!("Couldn't persist the login token to disk: {}", e));
        } else {
            self.logger.debug("Persisted the login token to disk");
        }

        Ok(token)
    }

    /// Exchange an access token for a session and persist it with the profile
    pub async fn idm_login(
        &self,
        idm_url: &str,
        username: &str,
        access_token: &str,
        org: &OrgHint,
        login_flag: bool,
    ) -> CliResult<Session> {
        let request = IdmLoginRequest {
            user_name: username.to_string(),
            access_token: access_token.to_string(),
            account_name: org.account_name.clone(),
            region: org.region.clone(),
            login_flag,
        };

        let login = self.services.idm.login(idm_url, &request).await?;
        let session = Session::from_login(login.response, login.cookies);
        self.save_session(&session)?;

        let mut profile = self.store.load::<Profile>(false)?;
        profile.version = CLI_VERSION.to_string();
        profile.user_email = username.to_string();
        profile.idm_connect_url = idm_url.to_string();
        let (_, region) = session.org_and_region();
        if let Some(requested) = org.region.as_ref().filter(|r| !r.is_empty()) {
            profile.known_region = requested.clone();
        } else if !region.is_empty() {
            profile.known_region = region;
        }
        self.store.save(&profile, false)?;

        self.logger.verbose_with_context(
            "session",
            format!("Logged in to organization '{}'", session.org_name),
        );
        Ok(session)
    }

    /// Best-effort token revocation, then drop session and token.
    ///
    /// Returns false when there was nothing to log out of.
    pub async fn logout(&self) -> CliResult<bool> {
        let has_session = self.store.exists::<Session>();
        let has_token = self.store.exists::<Token>();
        if !has_session && !has_token {
            return Ok(false);
        }

        let token = match self.store.load::<Token>(true) {
            Ok(token) => token,
            Err(e) => {
                self.logger.debug(format!("Ignoring unreadable token: {}", e));
                Token::default()
            }
        };

        if let Some(access_token) = token.value() {
            if let Err(e) = self.revoke(access_token).await {
                self.logger
                    .warn(format!("Couldn't revoke the access token: {}", e));
            }
        }

        self.delete_session_and_token()?;
        Ok(true)
    }

    async fn revoke(&self, access_token: &str) -> CliResult<()> {
        let token_url = self.accounts_url()?;
        let client_id = self.client_id()?;
        self.services
            .oauth
            .logout(&token_url, access_token, &client_id, "")
            .await?;
        Ok(())
    }
}
