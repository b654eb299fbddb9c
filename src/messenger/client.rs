//! # WhatsApp API Client
//!
//! [`WhatsAppClient`] sends one request per call to the Cloud API and hands
//! back the decoded answer together with its HTTP status. Non-2xx answers are
//! logged and returned, they never turn into errors here.

use super::{
    MessageSender,
    outgoing_schemas::{
        ApiResponse, ContactCard, ListButton, MediaRef, OutgoingMessage, ReadReceipt,
        RecipientId, ReplyButtons,
    },
};
use crate::{config::ClientConfig, errors::SendError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// WhatsApp Cloud API client
///
/// Cheap to clone, clones share the connection pool and the configuration.
#[derive(Clone, Debug)]
pub struct WhatsAppClient {
    /// HTTP client for making API requests
    pub(crate) client: reqwest::Client,
    pub(crate) config: Arc<ClientConfig>,
}

impl WhatsAppClient {
    pub fn new(config: ClientConfig) -> Result<Self, SendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a text message
    ///
    /// # Arguments
    /// * `message` - Message text
    /// * `recipient_id` - Phone number with country code, without `+`
    /// * `preview_url` - Whether WhatsApp renders a preview of the first url
    pub async fn send_message(
        &self,
        message: &str,
        recipient_id: &str,
        preview_url: bool,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        self.send(&OutgoingMessage::text(to, message, preview_url))
            .await
    }

    /// Replies to `message_id` with a text message
    pub async fn reply_to_message(
        &self,
        message_id: &str,
        recipient_id: &str,
        message: &str,
        preview_url: bool,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        self.send(&OutgoingMessage::reply(to, message_id, message, preview_url))
            .await
    }

    /// Reacts with `emoji` to the message `message_id`
    pub async fn send_reaction(
        &self,
        emoji: &str,
        message_id: &str,
        recipient_id: &str,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        self.send(&OutgoingMessage::reaction(to, message_id, emoji))
            .await
    }

    /// Sends a template message
    ///
    /// # Arguments
    /// * `template` - Template name registered in WhatsApp Manager
    /// * `recipient_id` - Phone number with country code, without `+`
    /// * `components` - Template components, `[]` when `None`
    /// * `lang` - Template language, `en_US` when `None`
    pub async fn send_template(
        &self,
        template: &str,
        recipient_id: &str,
        components: Option<Vec<serde_json::Value>>,
        lang: Option<&str>,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        self.send(&OutgoingMessage::template(to, template, components, lang))
            .await
    }

    pub async fn send_location(
        &self,
        lat: f64,
        long: f64,
        name: &str,
        address: &str,
        recipient_id: &str,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        self.send(&OutgoingMessage::location(to, lat, long, name, address))
            .await
    }

    /// Sends an image, addressed by uploaded media id or by link
    pub async fn send_image(
        &self,
        image: MediaRef,
        recipient_id: &str,
        caption: Option<&str>,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        self.send(&OutgoingMessage::image(to, image, caption.map(String::from)))
            .await
    }

    pub async fn send_sticker(
        &self,
        sticker: MediaRef,
        recipient_id: &str,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        self.send(&OutgoingMessage::sticker(to, sticker)).await
    }

    pub async fn send_audio(
        &self,
        audio: MediaRef,
        recipient_id: &str,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        self.send(&OutgoingMessage::audio(to, audio)).await
    }

    pub async fn send_video(
        &self,
        video: MediaRef,
        recipient_id: &str,
        caption: Option<&str>,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        self.send(&OutgoingMessage::video(to, video, caption.map(String::from)))
            .await
    }

    pub async fn send_document(
        &self,
        document: MediaRef,
        recipient_id: &str,
        caption: Option<&str>,
        filename: Option<&str>,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        let message = OutgoingMessage::document(
            to,
            document,
            caption.map(String::from),
            filename.map(String::from),
        );
        self.send(&message).await
    }

    pub async fn send_contacts(
        &self,
        contacts: Vec<ContactCard>,
        recipient_id: &str,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        self.send(&OutgoingMessage::contacts(to, contacts)?).await
    }

    /// Sends an interactive list message
    pub async fn send_button(
        &self,
        button: ListButton,
        recipient_id: &str,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        self.send(&OutgoingMessage::list(to, button)).await
    }

    /// Sends an interactive reply buttons message
    pub async fn send_reply_button(
        &self,
        button: ReplyButtons,
        recipient_id: &str,
    ) -> Result<ApiResponse, SendError> {
        let to = RecipientId::parse(recipient_id)?;
        self.send(&OutgoingMessage::reply_buttons(to, button))
            .await
    }

    /// Sends a caller-built json body as is.
    ///
    /// When `recipient_id` is given and `data` has no `to` key it is inserted,
    /// an existing `to` always wins.
    pub async fn send_custom_json(
        &self,
        mut data: serde_json::Value,
        recipient_id: Option<&str>,
    ) -> Result<ApiResponse, SendError> {
        let Some(object) = data.as_object_mut() else {
            return Err(SendError::InvalidMessage(
                "custom json must be an object".into(),
            ));
        };

        if let Some(recipient_id) = recipient_id {
            if object.contains_key("to") {
                info!(
                    "Recipient id defined in data ({}) and as parameter ({}), keeping data",
                    object["to"], recipient_id
                );
            } else {
                object.insert("to".into(), recipient_id.into());
            }
        }

        info!("Sending custom json to {:?}", recipient_id);
        let response = self
            .post_json(&self.config.messages_endpoint(), &data)
            .await?;
        log_outcome("custom json", &response);

        Ok(response)
    }

    /// POSTs a json body with the bearer token
    pub(crate) async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<ApiResponse, SendError> {
        let response = self
            .client
            .post(url)
            .header("Authorization", self.bearer())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        read_response(response).await
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.config.token())
    }
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn send(&self, message: &OutgoingMessage) -> Result<ApiResponse, SendError> {
        info!("Sending {} to {}", message.kind(), message.to());

        let response = self
            .post_json(&self.config.messages_endpoint(), message)
            .await?;
        log_outcome(message.kind(), &response);

        Ok(response)
    }

    async fn mark_as_read(&self, message_id: &str) -> Result<ApiResponse, SendError> {
        info!("Marking message {} as read", message_id);

        let response = self
            .post_json(&self.config.messages_endpoint(), &ReadReceipt::new(message_id))
            .await?;
        log_outcome("read receipt", &response);

        Ok(response)
    }
}

/// Decodes any answer, whatever its status
pub(crate) async fn read_response(response: reqwest::Response) -> Result<ApiResponse, SendError> {
    let status = response.status().as_u16();
    let raw = response.text().await?;

    Ok(ApiResponse::from_raw(status, &raw))
}

pub(crate) fn log_outcome(what: &str, response: &ApiResponse) {
    if response.is_success() {
        info!("{} accepted by the cloud api", what);
        return;
    }

    error!(
        "{} not accepted, status code: {}, response: {}",
        what, response.status, response.body
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messenger::outgoing_schemas::{ListRow, ListSection, ReplyButton};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RECIPIENT: &str = "255757294146";

    fn client_for(server: &MockServer) -> WhatsAppClient {
        WhatsAppClient::new(ClientConfig::new("test-token", "104000").with_base_url(server.uri()))
            .unwrap()
    }

    fn accepted() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "messaging_product": "whatsapp",
            "contacts": [{"input": RECIPIENT, "wa_id": RECIPIENT}],
            "messages": [{"id": "wamid.HBgM"}]
        }))
    }

    #[tokio::test]
    async fn test_send_location_body_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/104000/messages"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({
                "type": "location",
                "location": {
                    "latitude": 1.29,
                    "longitude": 103.85,
                    "name": "Singapore",
                    "address": "Singapore"
                },
                "to": RECIPIENT,
                "messaging_product": "whatsapp"
            })))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .send_location(1.29, 103.85, "Singapore", "Singapore", RECIPIENT)
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.message_id(), Some("wamid.HBgM"));
        assert_eq!(response.body["contacts"][0]["wa_id"], RECIPIENT);
    }

    #[tokio::test]
    async fn test_non_success_is_returned_not_raised() {
        let server = MockServer::start().await;
        let error_body = json!({
            "error": {"message": "Invalid OAuth access token.", "type": "OAuthException", "code": 190}
        });
        Mock::given(method("POST"))
            .and(path("/104000/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_json(error_body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .send_message("hello", RECIPIENT, true)
            .await
            .unwrap();

        assert_eq!(response.status, 401);
        assert_eq!(response.body, error_body);
        assert_eq!(response.error_message(), Some("Invalid OAuth access token."));
    }

    #[tokio::test]
    async fn test_transport_fault_is_an_error() {
        // nothing listens on port 1
        let client = WhatsAppClient::new(
            ClientConfig::new("test-token", "104000").with_base_url("http://127.0.0.1:1"),
        )
        .unwrap();

        let result = client.send_message("hello", RECIPIENT, false).await;

        assert!(matches!(result, Err(SendError::Transport(_))));
    }

    #[tokio::test]
    async fn test_invalid_recipient_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(accepted())
            .expect(0)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .send_message("hello", "+255757294146", false)
            .await;

        assert!(matches!(result, Err(SendError::InvalidRecipient(_))));
    }

    #[tokio::test]
    async fn test_send_image_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/104000/messages"))
            .and(body_json(json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": RECIPIENT,
                "type": "image",
                "image": {"id": "media-1", "caption": "look"}
            })))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .send_image(MediaRef::new("media-1", false), RECIPIENT, Some("look"))
            .await
            .unwrap();

        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_send_template_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/104000/messages"))
            .and(body_json(json!({
                "messaging_product": "whatsapp",
                "to": RECIPIENT,
                "type": "template",
                "template": {"name": "hello_world", "language": {"code": "en_US"}, "components": []}
            })))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .send_template("hello_world", RECIPIENT, None, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_button_and_reply_button() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/104000/messages"))
            .respond_with(accepted())
            .expect(2)
            .mount(&server)
            .await;
        let client = client_for(&server);

        let list = ListButton::new(
            "Button Testing",
            vec![ListSection::new(None, vec![ListRow::new("row 1", "Send Money")])],
        )
        .unwrap()
        .body("Body Testing");
        assert!(client.send_button(list, RECIPIENT).await.unwrap().is_success());

        let buttons = ReplyButtons::new("Continue?", vec![ReplyButton::new("y", "Yes")]).unwrap();
        assert!(
            client
                .send_reply_button(buttons, RECIPIENT)
                .await
                .unwrap()
                .is_success()
        );

        let requests = server.received_requests().await.unwrap();
        let bodies = requests
            .iter()
            .map(|r| serde_json::from_slice::<serde_json::Value>(&r.body).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(bodies[0]["interactive"]["type"], "list");
        assert_eq!(bodies[1]["interactive"]["type"], "button");
        assert_eq!(bodies[1]["recipient_type"], "individual");
    }

    #[tokio::test]
    async fn test_send_custom_json_injects_recipient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/104000/messages"))
            .and(body_json(json!({
                "messaging_product": "whatsapp",
                "type": "audio",
                "audio": {"id": "audio-1"},
                "to": "5511999999999"
            })))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .send_custom_json(
                json!({"messaging_product": "whatsapp", "type": "audio", "audio": {"id": "audio-1"}}),
                Some("5511999999999"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_custom_json_keeps_existing_recipient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"messaging_product": "whatsapp", "to": "111"})))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .send_custom_json(json!({"messaging_product": "whatsapp", "to": "111"}), Some("222"))
            .await
            .unwrap();

        let result = client_for(&server)
            .send_custom_json(json!(["not", "an", "object"]), None)
            .await;
        assert!(matches!(result, Err(SendError::InvalidMessage(_))));
    }

    #[tokio::test]
    async fn test_mark_as_read() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/104000/messages"))
            .and(body_json(json!({
                "messaging_product": "whatsapp",
                "status": "read",
                "message_id": "wamid.abc"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).mark_as_read("wamid.abc").await.unwrap();

        assert_eq!(response.body["success"], true);
    }
}
