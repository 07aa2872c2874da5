//! Whoami command - Display current identity

use crate::error::CliResult;
use crate::models::{OrgHint, Profile, Session};
use crate::output::{print_json, print_key_value};
use crate::session::SessionController;
use clap::Args;
use serde::Serialize;

/// Arguments for the whoami command
#[derive(Args, Debug, Default)]
pub struct WhoamiArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for whoami
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoamiOutput {
    pub name: String,
    pub email: String,
    pub user_id: String,
    pub organization: String,
    pub region: String,
    pub subscription_id: String,
    pub default_sandbox: String,
}

impl WhoamiOutput {
    pub fn new(session: &Session, profile: &Profile) -> Self {
        let (organization, region) = session.org_and_region();
        let email = if profile.user_email.is_empty() {
            session.user_name.clone()
        } else {
            profile.user_email.clone()
        };
        Self {
            name: session.display_name(),
            email,
            user_id: session.user_id.clone(),
            organization,
            region,
            subscription_id: session.subscription_id.clone(),
            default_sandbox: session.default_sandbox_name.clone(),
        }
    }
}

/// Execute the whoami command
pub async fn execute(args: WhoamiArgs, controller: &SessionController) -> CliResult<()> {
    let session = controller.ensure_logged_in(&OrgHint::none(), true).await?;
    let profile = controller.store().load::<Profile>(false)?;
    let output = WhoamiOutput::new(&session, &profile);

    if args.json {
        print_json(&output)?;
    } else {
        println!();
        print_key_value("Name", &output.name);
        print_key_value("Email", &output.email);
        print_key_value("User ID", &output.user_id);
        print_key_value("Organization", &output.organization);
        print_key_value("Region", &output.region);
        print_key_value("Subscription", &output.subscription_id);
        print_key_value("Sandbox", &output.default_sandbox);
        println!();
    }

    Ok(())
}
