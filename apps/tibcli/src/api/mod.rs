//! Clients for the accounts service, IDM and Domain Server

mod domain;
mod idm;
mod oauth;
mod transport;

pub use domain::{
    is_authorization_expired, DomainServer, DomainServerClient, SandboxProbe,
    DEFAULT_SANDBOX_NAME, PLATFORM_VERSION_PATH, SANDBOX_PATH,
};
pub use idm::{IdentityManagement, IdmClient, IdmLogin, IDM_LOGIN_PATH};
pub use oauth::{parse_token_reply, AccountsClient, OAuth2};
pub use transport::{base_url, HttpReply, HttpTransport, TransportMode};
