//! Verdent CLI - command-line access to the Verdent agent API
//!
//! Thin front end over `verdent-client` for login, account inspection,
//! uploads and feedback.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use verdent_client::{ClientConfig, VerdentClient};

use crate::config::{Config, ConnectionArgs};
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "verdent")]
#[command(author, version, about = "Verdent agent API CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Agent API host
    #[arg(long, env = "VERDENT_HOST")]
    host: Option<String>,

    /// Agent API port (443 uses https)
    #[arg(long, env = "VERDENT_PORT")]
    port: Option<u16>,

    /// Session token
    #[arg(short, long, env = "VERDENT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "VERDENT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a PKCE verifier and challenge
    Pkce,

    /// Request a PKCE authorization code for the current token
    AuthCode {
        /// Code challenge (from `verdent pkce`)
        #[arg(long)]
        challenge: String,
    },

    /// Exchange an authorization code for a session token
    Login {
        /// Authorization code
        #[arg(long)]
        code: String,

        /// PKCE code verifier
        #[arg(long)]
        verifier: String,
    },

    /// Log in with email and password
    PasswordLogin {
        #[arg(long)]
        email: String,

        #[arg(long, env = "VERDENT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the user profile
    Info,

    /// Show remaining credits
    Credits,

    /// Show the account email
    Email,

    /// Show input box metadata
    InputBox {
        /// Client version
        #[arg(long)]
        version: String,
    },

    /// Upload a file
    Upload {
        /// File to upload
        file: PathBuf,
    },

    /// Submit feedback (JSON object or plain text)
    Feedback {
        body: String,
    },

    /// Show WebSocket connection parameters
    Ws,

    /// Show when the session token expires
    TokenExpiry,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let client_config = config.merge_with_args(&ConnectionArgs {
        host: cli.host.as_deref(),
        port: cli.port,
        token: cli.token.as_deref(),
    });
    let format = cli
        .output
        .or_else(|| config.output.as_deref().and_then(OutputFormat::from_name))
        .unwrap_or_default();
    let no_color = cli.no_color || config.no_color.unwrap_or(false);

    // Create output context
    let ctx = OutputContext::new(format, no_color, cli.quiet);
    let client = create_client(client_config)?;

    // Execute command
    match &cli.command {
        Commands::Pkce => commands::pkce(&ctx),

        Commands::AuthCode { challenge } => {
            commands::auth_code(&client, challenge, &ctx).await?;
        }

        Commands::Login { code, verifier } => {
            commands::login(&client, code, verifier, &ctx).await?;
        }

        Commands::PasswordLogin { email, password } => {
            commands::password_login(&client, email, password, &ctx).await?;
        }

        Commands::Info => commands::info(&client, &ctx).await?,

        Commands::Credits => commands::credits(&client, &ctx).await?,

        Commands::Email => commands::email(&client, &ctx).await?,

        Commands::InputBox { version } => {
            commands::input_box(&client, version, &ctx).await?;
        }

        Commands::Upload { file } => commands::upload(&client, file, &ctx).await?,

        Commands::Feedback { body } => commands::feedback(&client, body, &ctx).await?,

        Commands::Ws => commands::ws(&client, &ctx),

        Commands::TokenExpiry => commands::token_expiry(&client, &ctx)?,
    }

    Ok(())
}

/// Create a Verdent client from the merged configuration
fn create_client(config: ClientConfig) -> Result<VerdentClient> {
    let client = VerdentClient::with_config(config).context("Failed to create Verdent client")?;
    debug!(
        base_url = client.base_url(),
        login_url = client.login_url(),
        has_token = client.token().is_some(),
        "Client configured"
    );
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_create_client_from_args() {
        let config = Config::default().merge_with_args(&ConnectionArgs {
            host: Some("x.test"),
            port: Some(8080),
            token: Some("t"),
        });
        let client = create_client(config).unwrap();
        assert_eq!(client.base_url(), "http://x.test:8080");
        assert_eq!(client.token().as_deref(), Some("t"));
    }

    #[test]
    fn test_parse_login() {
        let cli = Cli::parse_from([
            "verdent", "--port", "8080", "-o", "json", "login", "--code", "c", "--verifier", "v",
        ]);
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(matches!(
            cli.command,
            Commands::Login { ref code, ref verifier } if code == "c" && verifier == "v"
        ));
    }
}
