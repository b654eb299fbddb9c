//! Error types shared by the message composer, the webhook extractor and the
//! callback server.

use derive_more::{Display, Error};
use ntex::{http, web};
use tracing::error;

/// Failure of a send or media operation.
///
/// A non-2xx answer from the Cloud API is *not* an error: it is returned as an
/// [`ApiResponse`](crate::messenger::ApiResponse) and only becomes
/// [`SendError::Api`] when the caller asks for it with
/// [`error_for_status`](crate::messenger::ApiResponse::error_for_status).
#[derive(Debug, Display, Error)]
pub enum SendError {
    /// Connection refused, timeout, DNS failure...
    #[display("transport error: {_0}")]
    Transport(reqwest::Error),
    #[display("io error: {_0}")]
    Io(std::io::Error),
    #[display("invalid recipient id: {_0}")]
    InvalidRecipient(#[error(not(source))] String),
    #[display("invalid message: {_0}")]
    InvalidMessage(#[error(not(source))] String),
    #[display("cloud api answered with status {status}: {body}")]
    Api {
        status: u16,
        body: serde_json::Value,
    },
}

impl From<reqwest::Error> for SendError {
    fn from(e: reqwest::Error) -> Self {
        SendError::Transport(e)
    }
}

impl From<std::io::Error> for SendError {
    fn from(e: std::io::Error) -> Self {
        SendError::Io(e)
    }
}

/// The webhook envelope is shorter than `entry[0].changes[0].value`.
///
/// Absent deeper keys (`messages`, `location`...) are not errors, the
/// projections answer `None` for them.
#[derive(Debug, Display, Error)]
pub enum EnvelopeError {
    #[display("webhook payload is not valid json: {_0}")]
    Malformed(serde_json::Error),
    #[display("webhook payload has no entry")]
    MissingEntry,
    #[display("webhook entry has no changes")]
    MissingChange,
    #[display("webhook change has no value")]
    MissingValue,
    #[display("webhook change has no field")]
    MissingField,
}

/// Errors answered by the webhook callback routes.
#[derive(Debug, Display, Error)]
pub enum HookError {
    Unauthorized,
    BadPayload(#[error(not(source))] String),
}

impl web::error::WebResponseError for HookError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{:?}", self);

        let msg = match self {
            HookError::Unauthorized => "invalid verification".to_string(),
            HookError::BadPayload(msg) => format!("invalid payload: {msg}"),
        };

        web::HttpResponse::build(self.status_code())
            .set_header("content-type", "text/plain; charset=utf-8")
            .body(msg)
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            HookError::Unauthorized => http::StatusCode::FORBIDDEN,
            HookError::BadPayload(_) => http::StatusCode::BAD_REQUEST,
        }
    }
}
