//! Command implementations for verdent-cli

pub mod auth;
pub mod feedback;
pub mod input_box;
pub mod session;
pub mod upload;
pub mod user;

pub use auth::{auth_code, login, password_login, pkce};
pub use feedback::feedback;
pub use input_box::input_box;
pub use session::{token_expiry, ws};
pub use upload::upload;
pub use user::{credits, email, info};
