//! WhatsApp webhook endpoint handlers
//!
//! The GET endpoint answers the verification handshake of the Meta dashboard,
//! the POST endpoint receives message and status events.

use super::{AppState, handler, schemas::WebhookPayload, security};
use crate::{consts, errors::HookError};
use ntex::{util::Bytes, web};
use serde::Deserialize;
use tracing::{error, warn};

/// Query parameters for webhook verification
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// Should be "subscribe" when sent
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// The verification token from WhatsApp
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    /// The challenge string to echo back
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Webhook verification endpoint (GET)
///
/// # Returns
/// - 200 with challenge string if verification succeeds
/// - 403 if verification fails or a parameter is missing
#[web::get("")]
pub async fn verify(
    query: web::types::Query<VerifyQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    if query
        .mode
        .as_deref()
        .is_some_and(|mode| mode != consts::SUBSCRIBE_MODE)
    {
        return Err(HookError::Unauthorized.into());
    }

    let (Some(verify_token), Some(challenge)) = (&query.verify_token, &query.challenge) else {
        return Err(HookError::Unauthorized.into());
    };

    if *verify_token != app_state.verify_token {
        return Err(HookError::Unauthorized.into());
    }

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(challenge.clone()))
}

/// Webhook receiver endpoint (POST)
///
/// The signature is checked against the raw body when an app secret is
/// configured. Processing failures are logged and the delivery is still
/// acknowledged, otherwise WhatsApp keeps retrying it.
#[web::post("")]
pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    if let Some(app_secret) = &app_state.app_secret {
        let Some(signature) = req
            .headers()
            .get(consts::SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
        else {
            warn!("Missing or unreadable {} header", consts::SIGNATURE_HEADER);
            return Err(HookError::Unauthorized.into());
        };

        if !security::verify_signature(signature, &body, app_secret) {
            return Err(HookError::Unauthorized.into());
        }
    }

    let payload = WebhookPayload::from_slice(&body)
        .map_err(|e| HookError::BadPayload(e.to_string()))?;

    if let Err(e) = handler::process_webhook(&payload, app_state.sender.as_ref()).await {
        error!("Failed to process webhook: {:#}", e);
    }

    Ok(web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "received"
    })))
}
