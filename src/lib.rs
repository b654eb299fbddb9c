//! # wa-cloud
//!
//! Client for the WhatsApp Cloud API.
//!
//! - [`messenger`] builds and sends outgoing messages, one operation per kind
//!   (text, template, media, location, contacts, interactive lists and reply
//!   buttons), plus media management and read receipts.
//! - [`webhook`] parses the envelopes WhatsApp posts to the callback url and
//!   projects the interesting fields out of them. It also ships the ntex
//!   handlers of a minimal callback server.

pub mod config;
pub mod consts;
pub mod errors;
pub mod messenger;
pub mod webhook;

pub use config::ClientConfig;
pub use errors::{EnvelopeError, HookError, SendError};
pub use messenger::{ApiResponse, MessageSender, OutgoingMessage, WhatsAppClient};
pub use webhook::whatsapp::WebhookPayload;
