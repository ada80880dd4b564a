//! Feedback command - submit feedback JSON

use anyhow::{Context, Result};
use verdent_client::VerdentClient;

use crate::output::OutputContext;

/// Submit feedback given as a JSON object, or plain text as `{"content": ...}`
pub async fn feedback(client: &VerdentClient, body: &str, ctx: &OutputContext) -> Result<()> {
    let payload = parse_feedback(body)?;

    let response = client
        .submit_feedback(&payload)
        .await
        .context("Failed to submit feedback")?;

    ctx.success("Feedback submitted");
    ctx.print_value(&response);
    Ok(())
}

fn parse_feedback(body: &str) -> Result<serde_json::Value> {
    if body.trim_start().starts_with('{') {
        serde_json::from_str(body).context("Failed to parse feedback as JSON")
    } else {
        Ok(serde_json::json!({ "content": body }))
    }
}
