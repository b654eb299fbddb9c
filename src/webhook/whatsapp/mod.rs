//! WhatsApp webhook integration module
//!
//! ## Submodules
//!
//! - [`schemas`] - Data structures of the incoming webhook envelope
//! - [`extractor`] - Field projections over a parsed envelope
//! - [`security`] - `X-Hub-Signature-256` verification
//! - [`handler`] - Greeting bot reacting to incoming messages
//! - [`routes`] - HTTP endpoint handlers for the callback url

pub mod extractor;
pub mod handler;
pub mod routes;
pub mod schemas;
pub mod security;

use crate::messenger::ImplMessageSender;

pub use routes::{receive, verify};
pub use schemas::WebhookPayload;

/// State of the callback routes, one per worker
pub struct AppState {
    pub sender: ImplMessageSender,
    /// Token configured in the Meta dashboard for the GET verification
    pub verify_token: String,
    /// Signatures are only checked when an app secret is configured
    pub app_secret: Option<String>,
}
