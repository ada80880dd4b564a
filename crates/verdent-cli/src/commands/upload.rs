//! Upload command - send a local file to the user center

use std::path::Path;

use anyhow::{Context, Result};
use verdent_client::VerdentClient;

use crate::output::OutputContext;

/// Upload a file, named after its last path component
pub async fn upload(client: &VerdentClient, file: &Path, ctx: &OutputContext) -> Result<()> {
    let data = std::fs::read(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .context("File path has no usable file name")?;

    let response = client
        .upload_file(data, filename)
        .await
        .context("Upload failed")?;

    ctx.success(&format!("Uploaded {}", filename));
    ctx.print_value(&response);
    Ok(())
}
