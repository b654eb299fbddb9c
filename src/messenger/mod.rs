//! Message composer for the WhatsApp Cloud API
//!
//! ## Submodules
//!
//! - [`outgoing_schemas`] - Typed message bodies, one variant per message kind
//! - [`client`] - [`WhatsAppClient`], one send operation per message kind
//! - [`media`] - Media upload, deletion, url lookup and download

pub mod client;
pub mod media;
pub mod outgoing_schemas;

use crate::errors::SendError;
use async_trait::async_trait;

pub use client::WhatsAppClient;
pub use outgoing_schemas::{
    ApiResponse, ContactCard, ListButton, ListRow, ListSection, MediaRef, OutgoingMessage,
    RecipientId, RecipientType, ReplyButton, ReplyButtons,
};

/// Capability to deliver messages through the Cloud API.
///
/// Every call issues a single request and builds its own body and headers,
/// implementors hold no mutable state between calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Sends any pre-built message to `/{phone_number_id}/messages`
    async fn send(&self, message: &OutgoingMessage) -> Result<ApiResponse, SendError>;

    /// Marks an incoming message as read
    async fn mark_as_read(&self, message_id: &str) -> Result<ApiResponse, SendError>;
}

pub type ImplMessageSender = Box<dyn MessageSender>;
