//! User commands - profile, credits and email

use anyhow::Result;
use verdent_client::VerdentClient;

use crate::output::{CreditsRow, OutputContext};

/// Show the full user profile
pub async fn info(client: &VerdentClient, ctx: &OutputContext) -> Result<()> {
    let info = client.fetch_user_info().await?;
    ctx.print_value(&serde_json::to_value(&info)?);
    Ok(())
}

/// Show the credit balance
pub async fn credits(client: &VerdentClient, ctx: &OutputContext) -> Result<()> {
    let credits = client.get_user_credits().await?;
    ctx.print_one(&CreditsRow {
        consumed: credits.consumed,
        free: credits.free,
        total: credits.total,
    });
    Ok(())
}

/// Show the account email
pub async fn email(client: &VerdentClient, ctx: &OutputContext) -> Result<()> {
    match client.get_user_email().await? {
        Some(email) => ctx.print_raw(&email),
        None => ctx.warn("Profile has no email"),
    }
    Ok(())
}
