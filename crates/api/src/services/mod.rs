//! Service modules.

pub mod auth;
pub mod email;

pub use auth::AuthService;
pub use email::EmailService;
