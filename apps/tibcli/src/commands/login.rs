//! Login command - password login against the accounts service and IDM

use crate::error::{CliError, CliResult};
use crate::models::{OrgHint, Profile};
use crate::output::{print_message, print_success};
use crate::session::SessionController;
use clap::Args;

/// Printed when the requested login is already in effect
pub const ALREADY_LOGGED_IN: &str = "User is already logged in.";

/// Arguments for the login command
#[derive(Args, Debug, Default, Clone)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub username: Option<String>,

    /// Account password; prompted for when omitted
    #[arg(short, long)]
    pub password: Option<String>,

    /// Organization to log in to (requires --region)
    #[arg(short, long)]
    pub org: Option<String>,

    /// Region of the organization (requires --org)
    #[arg(short, long)]
    pub region: Option<String>,
}

impl LoginArgs {
    /// Flag pairing rules, checked before any network call
    pub fn validate(&self) -> CliResult<()> {
        if self.username.is_some() && self.password.is_none() {
            return Err(CliError::Validation(
                "Please provide password if username is specified.\n\n\
                 Example:\n  tibcli login -u yourname@example.com -p yourpassword"
                    .to_string(),
            ));
        }
        if self.org.is_some() != self.region.is_some() {
            return Err(CliError::Validation(
                "Please provide organization name with region info. \
                 Either organization name or region is missing."
                    .to_string(),
            ));
        }
        Ok(())
    }

    fn org_hint(&self) -> OrgHint {
        match (&self.org, &self.region) {
            (Some(org), Some(region)) => OrgHint::new(org.clone(), region.clone()),
            _ => OrgHint::none(),
        }
    }
}

/// Execute the login command
pub async fn execute(args: LoginArgs, controller: &SessionController) -> CliResult<()> {
    args.validate()?;

    let logger = controller.logger();
    let profile = controller.store().load::<Profile>(false)?;

    let user_email = controller.resolve_user_email(&profile).map_err(|e| {
        logger.debug(e.to_string());
        CliError::Config("Username is not set.".to_string())
    })?;
    controller.accounts_url().map_err(|e| {
        logger.debug(e.to_string());
        CliError::Config("Accounts URL is not set.".to_string())
    })?;
    let idm_url = controller.resolve_idm_url(&profile).map_err(|e| {
        logger.debug(e.to_string());
        CliError::Config("Identity-Management Server URL is not set.".to_string())
    })?;

    let input_user = match (&args.username, &args.password) {
        (Some(username), _) => username.clone(),
        (None, Some(_)) => user_email.clone(),
        (None, None) => controller.prompt().username(&user_email)?,
    };

    let hint = args.org_hint();

    match controller.ensure_logged_in(&hint, false).await {
        Ok(session) => {
            if input_user == user_email {
                let (current_org, current_region) = session.org_and_region();
                let same_org = match (&hint.account_name, &hint.region) {
                    (Some(org), Some(region)) => *org == current_org && *region == current_region,
                    _ => true,
                };
                if same_org {
                    print_message(ALREADY_LOGGED_IN);
                    return Ok(());
                }
            }
            logger.verbose_with_context("login", "Logging in with new credentials");
        }
        Err(CliError::NotAuthenticated) => {
            logger.verbose_with_context("login", "No usable session or token");
        }
        Err(e) => return Err(e),
    }

    let password = match args.password {
        Some(password) => password,
        None => controller.prompt().password()?,
    };

    let token = controller.ta_login(&input_user, &password).await?;
    let access_token = token.value().unwrap_or_default();
    let session = controller
        .idm_login(&idm_url, &input_user, access_token, &hint, true)
        .await?;

    let (org, region) = session.org_and_region();
    if org.is_empty() {
        print_success(&format!("Logged in as {}", input_user));
    } else if region.is_empty() {
        print_success(&format!("Logged in as {} ({})", input_user, org));
    } else {
        print_success(&format!("Logged in as {} ({}, {})", input_user, org, region));
    }
    Ok(())
}
