//! Verdent Client Library
//!
//! Provides a typed HTTP client for the Verdent agent service: PKCE login,
//! user profile and credits, file upload and feedback, plus the connection
//! parameters for the chat WebSocket.
//!
//! # Example
//!
//! ```rust,no_run
//! use verdent_client::{PkceParams, VerdentClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = VerdentClient::new()?;
//!
//!     // Exchange an authorization code obtained in the browser
//!     let pkce = PkceParams::generate();
//!     client.login("auth-code", &pkce.code_verifier).await?;
//!
//!     // Remaining balance is free minus consumed
//!     let credits = client.get_user_credits().await?;
//!     println!("{} credits left", credits.total);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```rust
//! use verdent_client::{ClientConfig, VerdentClient};
//!
//! let config = ClientConfig::builder().host("x.test").port(8080).build();
//! let client = VerdentClient::with_config(config).unwrap();
//! assert_eq!(client.base_url(), "http://x.test:8080");
//! assert_eq!(client.websocket_url(), "ws://x.test:8080/chat");
//! ```
//!
//! # Testing
//!
//! The `testing` module starts an axum router on a local port with a
//! client already configured for it:
//!
//! ```rust,ignore
//! use verdent_client::testing::TestServer;
//!
//! let server = TestServer::start(router).await?;
//! let info = server.client.fetch_user_info().await?;
//! ```

mod client;
pub mod config;
mod error;
pub mod jwt;
mod pkce;
pub mod testing;
mod types;

pub use client::{Transport, VerdentClient};
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError, Endpoints};
pub use error::{Result, VerdentClientError};
pub use pkce::PkceParams;
pub use types::*;
