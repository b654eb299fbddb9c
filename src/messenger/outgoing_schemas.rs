//! # Outgoing Message Schemas
//!
//! Typed bodies for the `/{phone_number_id}/messages` endpoint. Every message is
//! an [`OutgoingMessage`] envelope (`messaging_product`, `to`, optional
//! `recipient_type` and reply `context`) flattened together with one
//! [`MessageContent`] variant, which adds the `type` discriminator and the
//! kind-specific object.
//!
//! Invalid combinations are rejected when the value is built, before anything
//! reaches the network.

use crate::{consts, errors::SendError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Destination phone number in international format, digits only, no leading `+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecipientId(String);

impl RecipientId {
    pub fn parse(value: &str) -> Result<Self, SendError> {
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(SendError::InvalidRecipient(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RecipientId {
    type Err = SendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for RecipientId {
    type Error = SendError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    #[default]
    Individual,
    Group,
}

/// How a media object is addressed: an id returned by an upload, or a public link.
///
/// Serializes as `{"id": ..}` or `{"link": ..}`, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaRef {
    Id(String),
    Link(String),
}

impl MediaRef {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn link(link: impl Into<String>) -> Self {
        Self::Link(link.into())
    }

    /// Picks the addressing from an explicit flag, the string itself is never inspected.
    pub fn new(reference: impl Into<String>, link: bool) -> Self {
        if link {
            Self::Link(reference.into())
        } else {
            Self::Id(reference.into())
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link(_))
    }
}

/// Message envelope sent to the Cloud API
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMessage {
    /// Messaging product, always "whatsapp"
    messaging_product: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    recipient_type: Option<RecipientType>,
    /// Recipient's WhatsApp ID (phone number)
    to: RecipientId,
    /// Message being replied to
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<MessageContext>,
    #[serde(flatten)]
    content: MessageContent,
}

impl OutgoingMessage {
    fn new(to: RecipientId, recipient_type: Option<RecipientType>, content: MessageContent) -> Self {
        Self {
            messaging_product: consts::MESSAGING_PRODUCT,
            recipient_type,
            to,
            context: None,
            content,
        }
    }

    pub fn text(to: RecipientId, body: impl Into<String>, preview_url: bool) -> Self {
        Self::new(
            to,
            Some(RecipientType::Individual),
            MessageContent::Text {
                text: TextContent {
                    preview_url,
                    body: body.into(),
                },
            },
        )
    }

    /// Text message quoting `message_id`
    pub fn reply(
        to: RecipientId,
        message_id: impl Into<String>,
        body: impl Into<String>,
        preview_url: bool,
    ) -> Self {
        let mut message = Self::text(to, body, preview_url);
        message.context = Some(MessageContext {
            message_id: message_id.into(),
        });
        message
    }

    pub fn reaction(
        to: RecipientId,
        message_id: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Self {
        Self::new(
            to,
            Some(RecipientType::Individual),
            MessageContent::Reaction {
                reaction: ReactionContent {
                    message_id: message_id.into(),
                    emoji: emoji.into(),
                },
            },
        )
    }

    /// Template message, `components` defaults to `[]` and `lang` to `en_US`
    pub fn template(
        to: RecipientId,
        name: impl Into<String>,
        components: Option<Vec<serde_json::Value>>,
        lang: Option<&str>,
    ) -> Self {
        Self::new(
            to,
            None,
            MessageContent::Template {
                template: TemplateContent {
                    name: name.into(),
                    language: TemplateLanguage {
                        code: lang.unwrap_or(consts::DEFAULT_TEMPLATE_LANGUAGE).to_string(),
                    },
                    components: components.unwrap_or_default(),
                },
            },
        )
    }

    pub fn location(
        to: RecipientId,
        latitude: f64,
        longitude: f64,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self::new(
            to,
            None,
            MessageContent::Location {
                location: LocationContent {
                    latitude,
                    longitude,
                    name: name.into(),
                    address: address.into(),
                },
            },
        )
    }

    pub fn image(to: RecipientId, image: MediaRef, caption: Option<String>) -> Self {
        Self::new(
            to,
            Some(RecipientType::Individual),
            MessageContent::Image {
                image: MediaContent::new(image).caption(caption),
            },
        )
    }

    pub fn sticker(to: RecipientId, sticker: MediaRef) -> Self {
        Self::new(
            to,
            Some(RecipientType::Individual),
            MessageContent::Sticker {
                sticker: MediaContent::new(sticker),
            },
        )
    }

    pub fn audio(to: RecipientId, audio: MediaRef) -> Self {
        Self::new(
            to,
            None,
            MessageContent::Audio {
                audio: MediaContent::new(audio),
            },
        )
    }

    pub fn video(to: RecipientId, video: MediaRef, caption: Option<String>) -> Self {
        Self::new(
            to,
            None,
            MessageContent::Video {
                video: MediaContent::new(video).caption(caption),
            },
        )
    }

    pub fn document(
        to: RecipientId,
        document: MediaRef,
        caption: Option<String>,
        filename: Option<String>,
    ) -> Self {
        let mut content = MediaContent::new(document).caption(caption);
        content.filename = filename;

        Self::new(to, None, MessageContent::Document { document: content })
    }

    pub fn contacts(to: RecipientId, contacts: Vec<ContactCard>) -> Result<Self, SendError> {
        if contacts.is_empty() {
            return Err(SendError::InvalidMessage(
                "contacts message needs at least one contact".into(),
            ));
        }

        Ok(Self::new(to, None, MessageContent::Contacts { contacts }))
    }

    /// Interactive list message
    pub fn list(to: RecipientId, button: ListButton) -> Self {
        Self::new(
            to,
            None,
            MessageContent::Interactive {
                interactive: InteractiveContent::List(button),
            },
        )
    }

    /// Interactive reply buttons message
    pub fn reply_buttons(to: RecipientId, buttons: ReplyButtons) -> Self {
        Self::new(
            to,
            Some(RecipientType::Individual),
            MessageContent::Interactive {
                interactive: InteractiveContent::Button(buttons),
            },
        )
    }

    pub fn with_recipient_type(mut self, recipient_type: RecipientType) -> Self {
        self.recipient_type = Some(recipient_type);
        self
    }

    pub fn to(&self) -> &RecipientId {
        &self.to
    }

    pub fn recipient_type(&self) -> Option<RecipientType> {
        self.recipient_type
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    /// Wire name of the message kind
    pub fn kind(&self) -> &'static str {
        match self.content {
            MessageContent::Text { .. } => "text",
            MessageContent::Reaction { .. } => "reaction",
            MessageContent::Template { .. } => "template",
            MessageContent::Location { .. } => "location",
            MessageContent::Image { .. } => "image",
            MessageContent::Audio { .. } => "audio",
            MessageContent::Video { .. } => "video",
            MessageContent::Document { .. } => "document",
            MessageContent::Sticker { .. } => "sticker",
            MessageContent::Contacts { .. } => "contacts",
            MessageContent::Interactive { .. } => "interactive",
        }
    }
}

/// Kind-specific part of an [`OutgoingMessage`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    Reaction { reaction: ReactionContent },
    Template { template: TemplateContent },
    Location { location: LocationContent },
    Image { image: MediaContent },
    Audio { audio: MediaContent },
    Video { video: MediaContent },
    Document { document: MediaContent },
    Sticker { sticker: MediaContent },
    Contacts { contacts: Vec<ContactCard> },
    Interactive { interactive: InteractiveContent },
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageContext {
    pub message_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    pub preview_url: bool,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionContent {
    pub message_id: String,
    pub emoji: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateContent {
    pub name: String,
    pub language: TemplateLanguage,
    /// Passed through untouched, see the Cloud API template components reference
    pub components: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateLanguage {
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationContent {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub address: String,
}

/// Image, audio, video, document or sticker object
#[derive(Debug, Clone, Serialize)]
pub struct MediaContent {
    #[serde(flatten)]
    pub media: MediaRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl MediaContent {
    fn new(media: MediaRef) -> Self {
        Self {
            media,
            caption: None,
            filename: None,
        }
    }

    fn caption(mut self, caption: Option<String>) -> Self {
        self.caption = caption;
        self
    }
}

/// Interactive content, the variant gives the interactive `type`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractiveContent {
    List(ListButton),
    Button(ReplyButtons),
}

/// Interactive message header
#[derive(Debug, Clone, Serialize)]
pub struct InteractiveHeader {
    /// Header type, only "text" is built here
    #[serde(rename = "type")]
    pub header_type: String,
    pub text: String,
}

impl InteractiveHeader {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            header_type: "text".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InteractiveText {
    pub text: String,
}

/// Interactive list: a menu button opening one or more sections of rows
#[derive(Debug, Clone, Serialize)]
pub struct ListButton {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<InteractiveHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<InteractiveText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<InteractiveText>,
    pub action: ListAction,
}

impl ListButton {
    /// Creates a list message with the menu button label and its sections
    pub fn new(button: impl Into<String>, sections: Vec<ListSection>) -> Result<Self, SendError> {
        let button = button.into();

        if button.trim().is_empty() {
            return Err(SendError::InvalidMessage(
                "list message needs a button label".into(),
            ));
        }

        if sections.is_empty() || sections.iter().any(|s| s.rows.is_empty()) {
            return Err(SendError::InvalidMessage(
                "list message needs sections with at least one row".into(),
            ));
        }

        Ok(Self {
            header: None,
            body: None,
            footer: None,
            action: ListAction { button, sections },
        })
    }

    pub fn header(mut self, text: impl Into<String>) -> Self {
        self.header = Some(InteractiveHeader::text(text));
        self
    }

    pub fn body(mut self, text: impl Into<String>) -> Self {
        self.body = Some(InteractiveText { text: text.into() });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(InteractiveText { text: text.into() });
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListAction {
    /// Menu button label
    pub button: String,
    pub sections: Vec<ListSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub rows: Vec<ListRow>,
}

impl ListSection {
    pub fn new(title: Option<String>, rows: Vec<ListRow>) -> Self {
        Self { title, rows }
    }
}

/// Row of a list section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRow {
    /// Id echoed back in the `list_reply` of the webhook
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ListRow {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
        }
    }

    pub fn new_with_description(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: Some(description.into()),
        }
    }
}

/// Interactive reply buttons, at most three
#[derive(Debug, Clone, Serialize)]
pub struct ReplyButtons {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<InteractiveHeader>,
    pub body: InteractiveText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<InteractiveText>,
    pub action: ReplyAction,
}

impl ReplyButtons {
    pub fn new(body: impl Into<String>, buttons: Vec<ReplyButton>) -> Result<Self, SendError> {
        if buttons.is_empty() || buttons.len() > consts::MAX_REPLY_BUTTONS {
            return Err(SendError::InvalidMessage(format!(
                "reply buttons message needs 1 to {} buttons, got {}",
                consts::MAX_REPLY_BUTTONS,
                buttons.len()
            )));
        }

        for (i, button) in buttons.iter().enumerate() {
            if buttons[..i].iter().any(|b| b.reply.id == button.reply.id) {
                return Err(SendError::InvalidMessage(format!(
                    "duplicated reply button id: {}",
                    button.reply.id
                )));
            }
        }

        Ok(Self {
            header: None,
            body: InteractiveText { text: body.into() },
            footer: None,
            action: ReplyAction { buttons },
        })
    }

    pub fn header(mut self, text: impl Into<String>) -> Self {
        self.header = Some(InteractiveHeader::text(text));
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(InteractiveText { text: text.into() });
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyAction {
    pub buttons: Vec<ReplyButton>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyButton {
    /// Always "reply"
    #[serde(rename = "type")]
    pub button_type: String,
    pub reply: ReplyButtonContent,
}

impl ReplyButton {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            button_type: "reply".to_string(),
            reply: ReplyButtonContent {
                id: id.into(),
                title: title.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyButtonContent {
    pub id: String,
    pub title: String,
}

/// Contact card of a contacts message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactCard {
    pub name: ContactName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<ContactPhone>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<ContactEmail>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<ContactAddress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<ContactUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<ContactOrg>,
    /// YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

impl ContactCard {
    pub fn new(formatted_name: impl Into<String>) -> Self {
        Self {
            name: ContactName {
                formatted_name: formatted_name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn phone(mut self, phone: ContactPhone) -> Self {
        self.phones.push(phone);
        self
    }

    pub fn email(mut self, email: ContactEmail) -> Self {
        self.emails.push(email);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactName {
    pub formatted_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactPhone {
    pub phone: String,
    /// HOME, WORK...
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub phone_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wa_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactEmail {
    pub email: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactUrl {
    pub url: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub url_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactOrg {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Body marking an incoming message as read
#[derive(Debug, Clone, Serialize)]
pub struct ReadReceipt {
    messaging_product: &'static str,
    status: &'static str,
    pub message_id: String,
}

impl ReadReceipt {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            messaging_product: consts::MESSAGING_PRODUCT,
            status: "read",
            message_id: message_id.into(),
        }
    }
}

/// Answer of the Cloud API: HTTP status plus the decoded body.
///
/// Non-2xx answers are returned like any other, check [`is_success`](Self::is_success)
/// or use [`error_for_status`](Self::error_for_status).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    /// Decoded json, a json string when the body was not json, null when empty
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub(crate) fn from_raw(status: u16, raw: &str) -> Self {
        let body = if raw.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
        };

        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `messages[0].id` of a successful send
    pub fn message_id(&self) -> Option<&str> {
        self.body.pointer("/messages/0/id")?.as_str()
    }

    /// `error.message` of a failed call
    pub fn error_message(&self) -> Option<&str> {
        self.body.pointer("/error/message")?.as_str()
    }

    /// Turns a non-2xx answer into [`SendError::Api`]
    pub fn error_for_status(self) -> Result<Self, SendError> {
        if self.is_success() {
            return Ok(self);
        }

        Err(SendError::Api {
            status: self.status,
            body: self.body,
        })
    }
}
