//! Integration tests for the session lifecycle
//!
//! Drives the session controller against a wiremock platform and a
//! temporary settings directory.

mod common;

use common::{TestContext, BRANDED_USER, CLIENT_ID, TOKEN_PATH};
use serde_json::json;
use tibcli::api::{DEFAULT_SANDBOX_NAME, SANDBOX_PATH};
use tibcli::commands::login::{self, LoginArgs};
use tibcli::config::Settings;
use tibcli::credentials::OBFUSCATION_PREFIX;
use tibcli::error::CliError;
use tibcli::models::{OrgHint, Profile, Session, StoredCookie, Token};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn sandbox_path() -> String {
    format!("{}{}", SANDBOX_PATH, DEFAULT_SANDBOX_NAME)
}

fn session_with_cookie(ctx: &TestContext, value: &str) -> Session {
    Session {
        cookies: vec![StoredCookie::new("JSESSIONID", value)],
        user_name: BRANDED_USER.to_string(),
        org_name: "acme".to_string(),
        org_display_name: "acme us-west-2".to_string(),
        domain_url: ctx.uri(),
        ..Session::default()
    }
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_fresh_login_with_username_and_password() {
    let ctx = TestContext::new().await;
    ctx.mock_compatible_platform().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_id=cli-client"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(ctx.token_reply("access-1"))
        .expect(1)
        .mount(&ctx.server)
        .await;

    Mock::given(method("POST"))
        .and(path(ctx.idm_login_path()))
        .and(body_partial_json(json!({
            "userName": "jill@example.com",
            "accessToken": "access-1",
            "loginFlag": true
        })))
        .respond_with(ctx.idm_reply("jill@example.com", "cookie-1"))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let controller = ctx.controller();
    let args = LoginArgs {
        username: Some("jill@example.com".to_string()),
        password: Some("s3cret".to_string()),
        org: None,
        region: None,
    };
    login::execute(args, &controller).await.unwrap();

    let store = ctx.store();
    assert!(store.exists::<Token>());
    assert!(store.exists::<Session>());

    let token: Token = store.load(true).unwrap();
    assert_eq!(token.value(), Some("access-1"));
    assert!(token.is_valid());

    let session: Session = store.load(true).unwrap();
    assert_eq!(session.user_name, "jill@example.com");
    assert_eq!(session.cookies.len(), 1);
    assert_eq!(session.cookies[0].value, "cookie-1");
    assert_eq!(session.org_and_region(), ("acme".to_string(), "us-west-2".to_string()));

    let profile: Profile = store.load(false).unwrap();
    assert_eq!(profile.user_email, "jill@example.com");
    assert_eq!(profile.idm_connect_url, ctx.uri());
    assert_eq!(profile.known_region, "us-west-2");
    assert_eq!(ctx.prompt.times_asked(), 0);
}

#[tokio::test]
async fn test_secrets_are_obfuscated_on_disk() {
    let ctx = TestContext::new().await;
    ctx.mock_compatible_platform().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ctx.token_reply("accesstoken"))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(ctx.idm_login_path()))
        .respond_with(ctx.idm_reply(BRANDED_USER, "sessioncookie"))
        .mount(&ctx.server)
        .await;

    let controller = ctx.controller();
    controller.ta_login(BRANDED_USER, "pw").await.unwrap();
    controller
        .idm_login(&ctx.uri(), BRANDED_USER, "accesstoken", &OrgHint::none(), true)
        .await
        .unwrap();

    let paths = ctx.paths();
    let token_raw = std::fs::read_to_string(&paths.token_file).unwrap();
    let session_raw = std::fs::read_to_string(&paths.session_file).unwrap();

    assert!(token_raw.contains(OBFUSCATION_PREFIX));
    assert!(!token_raw.contains("\"accesstoken\""));
    assert!(session_raw.contains(OBFUSCATION_PREFIX));
    assert!(!session_raw.contains("\"sessioncookie\""));
}

#[tokio::test]
async fn test_dont_persist_skips_token_file() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ctx.token_reply("access-1"))
        .mount(&ctx.server)
        .await;

    let settings = Settings {
        dont_persist: true,
        ..Settings::default()
    };
    let controller = ctx.controller_with(settings);
    let token = controller.ta_login(BRANDED_USER, "pw").await.unwrap();

    assert_eq!(token.value(), Some("access-1"));
    assert!(!ctx.store().exists::<Token>());
}

#[tokio::test]
async fn test_huge_token_lifetime_is_stored_without_expiry() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "long-lived",
            "expires_in": 9_000_000_000_000_000i64
        })))
        .mount(&ctx.server)
        .await;

    let token = ctx.controller().ta_login(BRANDED_USER, "pw").await.unwrap();
    assert_eq!(token.value(), Some("long-lived"));
    assert!(token.is_valid());

    let saved: Token = ctx.store().load(true).unwrap();
    assert!(saved.is_valid());
    assert!(saved.access_token.unwrap().expires.is_none());
}

#[tokio::test]
async fn test_rejected_password_is_authentication_failure() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Bad credentials"
        })))
        .mount(&ctx.server)
        .await;

    let err = ctx
        .controller()
        .ta_login(BRANDED_USER, "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::AuthenticationFailed(ref m) if m == "Bad credentials"));
    assert!(!ctx.store().exists::<Token>());
}

// =============================================================================
// ensure_logged_in
// =============================================================================

#[tokio::test]
async fn test_valid_token_refreshes_session_without_password() {
    let ctx = TestContext::new().await;
    ctx.mock_compatible_platform().await;

    let store = ctx.store();
    store.save(&Token::issued("still-valid", 3600), true).unwrap();

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ctx.token_reply("unused"))
        .expect(0)
        .mount(&ctx.server)
        .await;

    Mock::given(method("POST"))
        .and(path(ctx.idm_login_path()))
        .and(body_partial_json(json!({
            "userName": BRANDED_USER,
            "accessToken": "still-valid",
            "loginFlag": false
        })))
        .respond_with(ctx.idm_reply(BRANDED_USER, "cookie-2"))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let token_before = std::fs::read(&ctx.paths().token_file).unwrap();

    let session = ctx
        .controller()
        .ensure_logged_in(&OrgHint::none(), false)
        .await
        .unwrap();

    assert_eq!(session.cookies[0].value, "cookie-2");
    assert_eq!(ctx.prompt.times_asked(), 0);

    let saved: Session = store.load(true).unwrap();
    assert_eq!(saved.cookies.len(), 1);
    assert_eq!(saved.cookies[0].value, "cookie-2");
    assert_eq!(std::fs::read(&ctx.paths().token_file).unwrap(), token_before);
}

#[tokio::test]
async fn test_incompatible_platform_stops_before_login() {
    let ctx = TestContext::new().await;
    ctx.mock_platform_version("2.0.0").await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let err = ctx
        .controller()
        .ensure_logged_in(&OrgHint::none(), true)
        .await
        .unwrap_err();

    match err {
        CliError::IncompatibleVersion { platform, .. } => assert_eq!(platform, "2.0.0"),
        other => panic!("expected IncompatibleVersion, got {:?}", other),
    }
    assert_eq!(ctx.prompt.times_asked(), 0);
}

#[tokio::test]
async fn test_unreachable_platform_is_platform_check_error() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(tibcli::api::PLATFORM_VERSION_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ctx.server)
        .await;

    let err = ctx
        .controller()
        .ensure_logged_in(&OrgHint::none(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::PlatformCheck(_)));
}

#[tokio::test]
async fn test_valid_session_cookies_skip_login() {
    let ctx = TestContext::new().await;
    ctx.mock_compatible_platform().await;

    ctx.store()
        .save(&session_with_cookie(&ctx, "live-cookie"), true)
        .unwrap();

    Mock::given(method("GET"))
        .and(path(sandbox_path()))
        .and(header("cookie", "JSESSIONID=live-cookie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": DEFAULT_SANDBOX_NAME,
            "orgId": "org-42"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let session = ctx
        .controller()
        .ensure_logged_in(&OrgHint::none(), false)
        .await
        .unwrap();

    assert_eq!(session.default_sandbox_name, DEFAULT_SANDBOX_NAME);
    assert_eq!(session.default_sandbox_org_id, "org-42");

    let saved: Session = ctx.store().load(true).unwrap();
    assert_eq!(saved.default_sandbox_org_id, "org-42");
}

#[tokio::test]
async fn test_rotated_cookie_from_sandbox_reply_is_saved() {
    let ctx = TestContext::new().await;
    ctx.mock_compatible_platform().await;

    ctx.store()
        .save(&session_with_cookie(&ctx, "original"), true)
        .unwrap();

    Mock::given(method("GET"))
        .and(path(sandbox_path()))
        .and(header("cookie", "JSESSIONID=original"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "JSESSIONID=rotated")
                .set_body_json(json!({
                    "name": DEFAULT_SANDBOX_NAME,
                    "orgId": "org-42"
                })),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let session = ctx
        .controller()
        .ensure_logged_in(&OrgHint::none(), false)
        .await
        .unwrap();
    assert_eq!(session.cookies.len(), 1);
    assert_eq!(session.cookies[0].value, "rotated");

    let saved: Session = ctx.store().load(true).unwrap();
    assert_eq!(saved.cookies.len(), 1);
    assert_eq!(saved.cookies[0].value, "rotated");

    let raw = std::fs::read_to_string(&ctx.paths().session_file).unwrap();
    assert!(raw.contains(OBFUSCATION_PREFIX));
    assert!(!raw.contains("\"rotated\""));
}

#[tokio::test]
async fn test_expired_session_prompts_for_credentials() {
    let ctx = TestContext::new().await;
    ctx.mock_compatible_platform().await;

    ctx.store()
        .save(&session_with_cookie(&ctx, "stale-cookie"), true)
        .unwrap();

    Mock::given(method("GET"))
        .and(path(sandbox_path()))
        .respond_with(
            ResponseTemplate::new(419).set_body_json(json!({"errorMsg": "Authorization expired"})),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("password=prompted-pw"))
        .respond_with(ctx.token_reply("access-3"))
        .expect(1)
        .mount(&ctx.server)
        .await;

    Mock::given(method("POST"))
        .and(path(ctx.idm_login_path()))
        .and(body_partial_json(json!({
            "userName": "jill@example.com",
            "loginFlag": true
        })))
        .respond_with(ctx.idm_reply("jill@example.com", "fresh-cookie"))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let session = ctx
        .controller()
        .ensure_logged_in(&OrgHint::none(), true)
        .await
        .unwrap();

    assert_eq!(ctx.prompt.times_asked(), 1);
    assert_eq!(session.cookies[0].value, "fresh-cookie");
}

#[tokio::test]
async fn test_expired_session_without_prompt_is_not_authenticated() {
    let ctx = TestContext::new().await;
    ctx.mock_compatible_platform().await;

    ctx.store()
        .save(&session_with_cookie(&ctx, "stale-cookie"), true)
        .unwrap();

    Mock::given(method("GET"))
        .and(path(sandbox_path()))
        .respond_with(ResponseTemplate::new(599).set_body_json(json!({
            "errorMsg": "Upstream returned 419"
        })))
        .mount(&ctx.server)
        .await;

    let err = ctx
        .controller()
        .ensure_logged_in(&OrgHint::none(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::NotAuthenticated));
    assert_eq!(ctx.prompt.times_asked(), 0);
}

#[tokio::test]
async fn test_settings_from_other_version_are_discarded() {
    let ctx = TestContext::new().await;
    ctx.mock_compatible_platform().await;

    let store = ctx.store();
    let old_profile = Profile {
        version: "0.9.0".to_string(),
        user_email: "old@example.com".to_string(),
        ..Profile::default()
    };
    store.save(&old_profile, false).unwrap();
    store.save(&Token::issued("old-token", 3600), true).unwrap();

    let err = ctx
        .controller()
        .ensure_logged_in(&OrgHint::none(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::NotAuthenticated));
    assert!(!store.exists::<Profile>());
    assert!(!store.exists::<Token>());
    assert!(!store.exists::<Session>());
}

#[tokio::test]
async fn test_corrupt_session_file_is_discarded() {
    let ctx = TestContext::new().await;
    ctx.mock_compatible_platform().await;

    let paths = ctx.paths();
    std::fs::create_dir_all(&paths.config_dir).unwrap();
    std::fs::write(&paths.session_file, b"{not json").unwrap();
    ctx.store()
        .save(&Token::issued("some-token", 3600), true)
        .unwrap();

    let err = ctx
        .controller()
        .ensure_logged_in(&OrgHint::none(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::NotAuthenticated));
    assert!(!paths.session_file.exists());
    assert!(!paths.token_file.exists());
}

#[tokio::test]
async fn test_already_logged_in_user_is_not_logged_in_again() {
    let ctx = TestContext::new().await;
    ctx.mock_compatible_platform().await;

    ctx.store()
        .save(&session_with_cookie(&ctx, "live-cookie"), true)
        .unwrap();

    Mock::given(method("GET"))
        .and(path(sandbox_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": DEFAULT_SANDBOX_NAME,
            "orgId": "org-42"
        })))
        .mount(&ctx.server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let args = LoginArgs {
        username: None,
        password: Some("unused".to_string()),
        org: None,
        region: None,
    };
    login::execute(args, &ctx.controller()).await.unwrap();
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_revokes_and_clears_session() {
    let ctx = TestContext::new().await;

    let store = ctx.store();
    store.save(&Token::issued("to-revoke", 3600), true).unwrap();
    store.save(&session_with_cookie(&ctx, "c"), true).unwrap();

    Mock::given(method("POST"))
        .and(path(format!("{}/revoke", TOKEN_PATH)))
        .and(body_partial_json(json!({
            "access_token": "to-revoke",
            "client_id": CLIENT_ID
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let controller = ctx.controller();
    assert!(controller.logout().await.unwrap());
    assert!(!store.exists::<Token>());
    assert!(!store.exists::<Session>());

    assert!(!controller.logout().await.unwrap());
}

#[tokio::test]
async fn test_logout_survives_revoke_failure() {
    let ctx = TestContext::new().await;

    let store = ctx.store();
    store.save(&Token::issued("to-revoke", 3600), true).unwrap();

    Mock::given(method("POST"))
        .and(path(format!("{}/revoke", TOKEN_PATH)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.server)
        .await;

    assert!(ctx.controller().logout().await.unwrap());
    assert!(!store.exists::<Token>());
}
