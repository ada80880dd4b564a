//! Session commands - WebSocket parameters and token expiry

use anyhow::{Context, Result};
use verdent_client::{jwt, VerdentClient};

use crate::output::OutputContext;

/// Show the chat WebSocket URL and the headers to connect with
pub fn ws(client: &VerdentClient, ctx: &OutputContext) {
    let headers = client.websocket_headers();
    let mut pairs = vec![("url", client.websocket_url().to_string())];
    pairs.extend(headers.iter().map(|(name, value)| (name.as_str(), value.clone())));
    ctx.print_kv(&pairs);
}

/// Show when the configured session token expires
pub fn token_expiry(client: &VerdentClient, ctx: &OutputContext) -> Result<()> {
    let token = client.token().context("No token configured")?;
    let payload = jwt::parse_payload(&token)?;
    let expires = jwt::token_expiry(&token)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());

    ctx.print_kv(&[
        ("User", payload.user_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into())),
        ("Type", payload.token_type.unwrap_or_else(|| "-".into())),
        ("Expires", expires),
    ]);
    Ok(())
}
