//! Data models for the tibcli CLI

mod cookie;
mod idm;
mod profile;
mod session;
mod token;

pub use cookie::{cookie_header, StoredCookie};
pub use idm::{IdmLoginRequest, IdmLoginResponse, OrgHint, Sandbox};
pub use profile::Profile;
pub use session::{OrgEntry, Session};
pub use token::{Token, TokenResponse, ACCESS_TOKEN_NAME};
