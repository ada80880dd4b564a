//! Auth commands - PKCE parameters, code exchange and password login

use anyhow::{Context, Result};
use verdent_client::{PkceParams, VerdentClient};

use crate::output::{OutputContext, PkceRow};

/// Generate a fresh PKCE verifier/challenge pair
pub fn pkce(ctx: &OutputContext) {
    let params = PkceParams::generate();
    ctx.print_one(&PkceRow {
        state: params.state,
        code_verifier: params.code_verifier,
        code_challenge: params.code_challenge,
    });
}

/// Request an authorization code for the configured session
pub async fn auth_code(client: &VerdentClient, challenge: &str, ctx: &OutputContext) -> Result<()> {
    let code = client
        .request_auth_code(challenge)
        .await
        .context("Failed to request authorization code")?;
    ctx.print_raw(&code);
    Ok(())
}

/// Exchange an authorization code for a session token
pub async fn login(
    client: &VerdentClient,
    code: &str,
    verifier: &str,
    ctx: &OutputContext,
) -> Result<()> {
    let token = client.login(code, verifier).await.context("Login failed")?;
    ctx.print_raw(&token);
    Ok(())
}

/// Log in with email and password
pub async fn password_login(
    client: &VerdentClient,
    email: &str,
    password: &str,
    ctx: &OutputContext,
) -> Result<()> {
    let data = client
        .login_with_password(email, password)
        .await
        .context("Login failed")?;

    if data.need_bind_invite_code == Some(true) {
        ctx.warn("Account still needs an invite code");
    }
    ctx.print_raw(&data.token);
    Ok(())
}
