//! Sign-up and business-profile summaries for the `/auth` and `/profile`
//! routes.

use std::fmt;

use margin_core::{AccountError, BusinessProfile, UserAccount};

pub fn render_auth(
    out: &mut impl fmt::Write,
    outcome: Option<&Result<UserAccount, AccountError>>,
) -> fmt::Result {
    writeln!(out, "Create your KRA-Ready account")?;
    match outcome {
        None => writeln!(
            out,
            "Provide --name and --phone (at least 9 characters); --email is optional."
        ),
        Some(Ok(user)) => {
            writeln!(out, "Welcome, {}.", first_name(&user.name))?;
            writeln!(out, "Account id  {}", user.id)?;
            writeln!(out, "Phone       {}", user.phone)?;
            writeln!(out, "Email       {}", user.email.as_deref().unwrap_or("-"))
        }
        Some(Err(e)) => writeln!(out, "Cannot create account: {e}."),
    }
}

pub fn render_profile(
    out: &mut impl fmt::Write,
    user: &UserAccount,
    profile: Option<&Result<BusinessProfile, AccountError>>,
) -> fmt::Result {
    writeln!(out, "Hi {},", first_name(&user.name))?;
    writeln!(out, "Tell us about your business")?;
    writeln!(
        out,
        "This powers your tax impact metrics and eTIMS readiness score."
    )?;
    writeln!(out)?;
    match profile {
        None => writeln!(
            out,
            "Provide --business-name and --location to save your profile."
        ),
        Some(Ok(profile)) => {
            writeln!(out, "{profile}")?;
            writeln!(out)?;
            writeln!(out, "Profile saved. Open the dashboard with `kra-ready show /`.")
        }
        Some(Err(e)) => writeln!(out, "Cannot save profile: {e}."),
    }
}

fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}
