//! # WhatsApp Webhook Handler
//!
//! Greeting bot behind the callback route: answers text messages with a
//! greeting and logs everything else it receives.

use super::schemas::WebhookPayload;
use crate::{
    consts,
    messenger::{MessageSender, OutgoingMessage, RecipientId},
};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Greeting sent back to a text message
pub fn greeting(name: &str) -> String {
    format!("Hi {name}, nice to connect with you")
}

/// Main webhook processor
///
/// Only the first change of the envelope is looked at, and only when its
/// field is "messages". A change with a sender carries a received message;
/// one without carries delivery statuses.
pub async fn process_webhook(payload: &WebhookPayload, sender: &dyn MessageSender) -> Result<()> {
    let changed_field = payload.changed_field()?;
    if changed_field != consts::MESSAGES_FIELD {
        info!("Ignoring webhook change of field {}", changed_field);
        return Ok(());
    }

    let Some(mobile) = payload.get_mobile()? else {
        match payload.get_delivery()? {
            Some(delivery) => info!("Message : {}", delivery),
            None => info!("No new message"),
        }
        return Ok(());
    };

    match payload.get_message_type()? {
        Some("text") => {
            let name = payload.get_name()?.unwrap_or(mobile);
            let message = payload.get_message()?.unwrap_or_default();
            info!("{} with this {} number sent {}", name, mobile, message);

            let to = RecipientId::parse(mobile)
                .with_context(|| format!("Sender {} is not a valid recipient", mobile))?;
            let response = sender
                .send(&OutgoingMessage::text(to, greeting(name), true))
                .await
                .context("Failed to send greeting")?;
            if !response.is_success() {
                warn!(
                    "Greeting to {} was rejected: {}",
                    mobile,
                    response.error_message().unwrap_or("unknown error")
                );
            }

            if let Some(message_id) = payload.get_message_id()? {
                sender
                    .mark_as_read(message_id)
                    .await
                    .context("Failed to mark message as read")?;
            }
        }
        Some("interactive") => match payload.get_interactive_response()? {
            Some(response) => info!("Interactive response from {}: {:?}", mobile, response),
            None => warn!("Interactive message from {} without a response", mobile),
        },
        Some("location") => {
            if let Some(location) = payload.get_location()? {
                info!(
                    "Location from {}: {:?}, {:?}",
                    mobile, location.latitude, location.longitude
                );
            }
        }
        Some(other) => info!("Unhandled {} message from {}", other, mobile),
        None => info!("No new message"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messenger::{ApiResponse, MockMessageSender};
    use crate::webhook::whatsapp::extractor::tests::{status_payload, text_payload};
    use serde_json::json;

    fn ok_response() -> ApiResponse {
        ApiResponse::from_raw(200, r#"{"messages":[{"id":"wamid.sent"}]}"#)
    }

    #[tokio::test]
    async fn test_text_message_is_greeted_and_read() {
        let payload = WebhookPayload::from_value(text_payload()).unwrap();
        let mut sender = MockMessageSender::new();

        sender
            .expect_send()
            .withf(|message| {
                let body = serde_json::to_value(message).unwrap();
                body["to"] == "16315551234"
                    && body["type"] == "text"
                    && body["text"]["body"] == "Hi Kerry Fisher, nice to connect with you"
                    && body["text"]["preview_url"] == true
            })
            .times(1)
            .returning(|_| Ok(ok_response()));
        sender
            .expect_mark_as_read()
            .withf(|message_id| message_id == "wamid.ABGGFlCGg0cvAgo-sJQh43L5Pe4W")
            .times(1)
            .returning(|_| Ok(ok_response()));

        process_webhook(&payload, &sender).await.unwrap();
    }

    #[tokio::test]
    async fn test_status_update_sends_nothing() {
        let payload = WebhookPayload::from_value(status_payload()).unwrap();
        let mut sender = MockMessageSender::new();
        sender.expect_send().times(0);
        sender.expect_mark_as_read().times(0);

        process_webhook(&payload, &sender).await.unwrap();
    }

    #[tokio::test]
    async fn test_interactive_reply_is_only_logged() {
        let mut raw = text_payload();
        raw["entry"][0]["changes"][0]["value"]["messages"][0] = json!({
            "from": "16315551234",
            "id": "wamid.id",
            "timestamp": "1603059201",
            "type": "interactive",
            "interactive": {"type": "button_reply", "button_reply": {"id": "b1", "title": "Yes"}}
        });
        let payload = WebhookPayload::from_value(raw).unwrap();
        let mut sender = MockMessageSender::new();
        sender.expect_send().times(0);

        process_webhook(&payload, &sender).await.unwrap();
    }

    #[tokio::test]
    async fn test_other_fields_are_ignored() {
        let mut raw = text_payload();
        raw["entry"][0]["changes"][0]["field"] = json!("account_update");
        let payload = WebhookPayload::from_value(raw).unwrap();
        let mut sender = MockMessageSender::new();
        sender.expect_send().times(0);

        process_webhook(&payload, &sender).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_envelope_is_an_error() {
        let payload = WebhookPayload::from_value(json!({"entry": []})).unwrap();
        let sender = MockMessageSender::new();

        assert!(process_webhook(&payload, &sender).await.is_err());
    }

    #[tokio::test]
    async fn test_rejected_greeting_still_marks_read() {
        let payload = WebhookPayload::from_value(text_payload()).unwrap();
        let mut sender = MockMessageSender::new();
        sender.expect_send().times(1).returning(|_| {
            Ok(ApiResponse::from_raw(
                400,
                r#"{"error":{"message":"Recipient not allowed"}}"#,
            ))
        });
        sender
            .expect_mark_as_read()
            .times(1)
            .returning(|_| Ok(ok_response()));

        process_webhook(&payload, &sender).await.unwrap();
    }
}
