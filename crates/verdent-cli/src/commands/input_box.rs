//! Input box command - fetch input box metadata

use anyhow::Result;
use verdent_client::VerdentClient;

use crate::output::OutputContext;

pub async fn input_box(client: &VerdentClient, version: &str, ctx: &OutputContext) -> Result<()> {
    let data = client.get_input_box_info(version).await?;
    ctx.print_value(&data);
    Ok(())
}
