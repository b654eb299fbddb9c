//! # Webhook Extractor
//!
//! Read-only projections over one [`WebhookPayload`].
//!
//! The `get_*` projections look at `entry[0].changes[0].value` only: a batch
//! with several entries or changes is answered from its first one. Callers
//! that need every change can walk [`WebhookPayload::values`],
//! [`WebhookPayload::messages`] and [`WebhookPayload::statuses`] instead.
//!
//! Only the unwrap of `entry[0].changes[0].value` can fail; an absent deeper
//! key (`messages`, `location`...) is answered with `Ok(None)`.

use super::schemas::{
    ChangeValue, Contact, InteractiveResponse, LocationMessage, MediaMessage, Message, Status,
    WebhookPayload,
};
use crate::{consts, errors::EnvelopeError};
use chrono::{DateTime, Utc};

impl WebhookPayload {
    pub fn from_slice(body: &[u8]) -> Result<Self, EnvelopeError> {
        serde_json::from_slice(body).map_err(EnvelopeError::Malformed)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, EnvelopeError> {
        serde_json::from_value(value).map_err(EnvelopeError::Malformed)
    }

    /// `entry[0].changes[0].value`
    pub fn preprocess(&self) -> Result<&ChangeValue, EnvelopeError> {
        let change = self
            .entry
            .first()
            .ok_or(EnvelopeError::MissingEntry)?
            .changes
            .first()
            .ok_or(EnvelopeError::MissingChange)?;

        change.value.as_ref().ok_or(EnvelopeError::MissingValue)
    }

    /// `entry[0].changes[0].field`, e.g. "messages"
    pub fn changed_field(&self) -> Result<&str, EnvelopeError> {
        self.entry
            .first()
            .ok_or(EnvelopeError::MissingEntry)?
            .changes
            .first()
            .ok_or(EnvelopeError::MissingChange)?
            .field
            .as_deref()
            .ok_or(EnvelopeError::MissingField)
    }

    /// Whether the first change carries received messages
    pub fn is_message(&self) -> Result<bool, EnvelopeError> {
        Ok(self.preprocess()?.messages.is_some())
    }

    /// Sender phone number, `contacts[0].wa_id`
    pub fn get_mobile(&self) -> Result<Option<&str>, EnvelopeError> {
        Ok(self
            .first_contact()?
            .and_then(|contact| contact.wa_id.as_deref()))
    }

    /// Sender display name, `contacts[0].profile.name`
    pub fn get_name(&self) -> Result<Option<&str>, EnvelopeError> {
        Ok(self
            .first_contact()?
            .and_then(|contact| contact.profile.as_ref())
            .and_then(|profile| profile.name.as_deref()))
    }

    /// Text body of a text message
    pub fn get_message(&self) -> Result<Option<&str>, EnvelopeError> {
        Ok(self
            .first_message()?
            .and_then(|message| message.text.as_ref())
            .and_then(|text| text.body.as_deref()))
    }

    pub fn get_message_id(&self) -> Result<Option<&str>, EnvelopeError> {
        Ok(self
            .first_message()?
            .and_then(|message| message.id.as_deref()))
    }

    /// Raw unix timestamp string of the message
    pub fn get_message_timestamp(&self) -> Result<Option<&str>, EnvelopeError> {
        Ok(self
            .first_message()?
            .and_then(|message| message.timestamp.as_deref()))
    }

    /// Message timestamp as a date, `None` when it is not a unix timestamp
    pub fn get_message_datetime(&self) -> Result<Option<DateTime<Utc>>, EnvelopeError> {
        Ok(self
            .get_message_timestamp()?
            .and_then(|timestamp| timestamp.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0)))
    }

    /// Message type discriminator: "text", "image", "interactive"...
    pub fn get_message_type(&self) -> Result<Option<&str>, EnvelopeError> {
        Ok(self
            .first_message()?
            .and_then(|message| message.msg_type.as_deref()))
    }

    pub fn get_interactive_response(&self) -> Result<Option<&InteractiveResponse>, EnvelopeError> {
        Ok(self
            .first_message()?
            .and_then(|message| message.interactive.as_ref()))
    }

    pub fn get_location(&self) -> Result<Option<&LocationMessage>, EnvelopeError> {
        Ok(self
            .first_message()?
            .and_then(|message| message.location.as_ref()))
    }

    pub fn get_image(&self) -> Result<Option<&MediaMessage>, EnvelopeError> {
        Ok(self.first_message()?.and_then(|message| message.image.as_ref()))
    }

    pub fn get_audio(&self) -> Result<Option<&MediaMessage>, EnvelopeError> {
        Ok(self.first_message()?.and_then(|message| message.audio.as_ref()))
    }

    pub fn get_video(&self) -> Result<Option<&MediaMessage>, EnvelopeError> {
        Ok(self.first_message()?.and_then(|message| message.video.as_ref()))
    }

    pub fn get_document(&self) -> Result<Option<&MediaMessage>, EnvelopeError> {
        Ok(self
            .first_message()?
            .and_then(|message| message.document.as_ref()))
    }

    /// Delivery status of a sent message: "sent", "delivered", "read", "failed"
    pub fn get_delivery(&self) -> Result<Option<&str>, EnvelopeError> {
        Ok(self
            .preprocess()?
            .statuses
            .as_ref()
            .and_then(|statuses| statuses.first())
            .and_then(|status| status.status.as_deref()))
    }

    /// Every `value` of every entry and change, in delivery order
    pub fn values(&self) -> impl Iterator<Item = &ChangeValue> {
        self.entry
            .iter()
            .flat_map(|entry| &entry.changes)
            .filter_map(|change| change.value.as_ref())
    }

    /// All received messages of the batch, from changes of the "messages" field
    pub fn messages(&self) -> Vec<&Message> {
        self.message_changes()
            .filter_map(|value| value.messages.as_ref())
            .flatten()
            .collect::<Vec<_>>()
    }

    /// All status updates of the batch, from changes of the "messages" field
    pub fn statuses(&self) -> Vec<&Status> {
        self.message_changes()
            .filter_map(|value| value.statuses.as_ref())
            .flatten()
            .collect::<Vec<_>>()
    }

    fn message_changes(&self) -> impl Iterator<Item = &ChangeValue> {
        self.entry
            .iter()
            .flat_map(|entry| &entry.changes)
            .filter(|change| change.field.as_deref() == Some(consts::MESSAGES_FIELD))
            .filter_map(|change| change.value.as_ref())
    }

    fn first_message(&self) -> Result<Option<&Message>, EnvelopeError> {
        Ok(self
            .preprocess()?
            .messages
            .as_ref()
            .and_then(|messages| messages.first()))
    }

    fn first_contact(&self) -> Result<Option<&Contact>, EnvelopeError> {
        Ok(self
            .preprocess()?
            .contacts
            .as_ref()
            .and_then(|contacts| contacts.first()))
    }
}
