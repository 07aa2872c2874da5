//! Logout command - revoke the token and clear the session

use crate::error::CliResult;
use crate::output::{print_info, print_success};
use crate::session::SessionController;
use clap::Args;

/// Arguments for the logout command
#[derive(Args, Debug, Default)]
pub struct LogoutArgs {}

/// Execute the logout command
///
/// The profile is kept so the next login offers the same email.
pub async fn execute(_args: LogoutArgs, controller: &SessionController) -> CliResult<()> {
    if controller.logout().await? {
        print_success("Logged out successfully.");
    } else {
        print_info("You are not logged in.");
    }
    Ok(())
}
