//! Media endpoints of the Cloud API: upload, delete, url lookup and download.

use super::{
    client::{WhatsAppClient, log_outcome, read_response},
    outgoing_schemas::ApiResponse,
};
use crate::{consts, errors::SendError};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

impl WhatsAppClient {
    /// Uploads a local file, the mime type is guessed from its name.
    ///
    /// The media id to use in a [`MediaRef::Id`](super::MediaRef::Id) is the
    /// `id` field of the answer.
    pub async fn upload_media(&self, media: impl AsRef<Path>) -> Result<ApiResponse, SendError> {
        let media = media.as_ref();
        let file_bytes = tokio::fs::read(media).await?;
        let mime_type = mime_guess::from_path(media).first_or_octet_stream();
        let filename = media
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());

        self.upload_media_bytes(file_bytes, mime_type.essence_str(), &filename)
            .await
    }

    /// Uploads in-memory bytes as multipart form (`file`, `messaging_product`, `type`)
    ///
    /// # Arguments
    /// * `file_bytes` - The file content
    /// * `mime_type` - MIME type of the file (e.g., "application/pdf", "image/jpeg")
    /// * `filename` - Name of the file
    pub async fn upload_media_bytes(
        &self,
        file_bytes: Vec<u8>,
        mime_type: &str,
        filename: &str,
    ) -> Result<ApiResponse, SendError> {
        info!("Uploading media {} ({})", filename, mime_type);

        let file_part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|e| SendError::InvalidMessage(format!("invalid mime type {mime_type}: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("messaging_product", consts::MESSAGING_PRODUCT)
            .text("type", mime_type.to_string());

        let response = self
            .client
            .post(self.config.media_upload_endpoint())
            .header("Authorization", self.bearer())
            .multipart(form)
            .send()
            .await?;

        let response = read_response(response).await?;
        log_outcome("media upload", &response);

        Ok(response)
    }

    pub async fn delete_media(&self, media_id: &str) -> Result<ApiResponse, SendError> {
        info!("Deleting media {}", media_id);

        let response = self
            .client
            .delete(self.config.media_endpoint(media_id))
            .header("Authorization", self.bearer())
            .send()
            .await?;

        let response = read_response(response).await?;
        log_outcome("media deletion", &response);

        Ok(response)
    }

    /// Looks up the download url of an uploaded or received media.
    ///
    /// `None` when the answer is not a success or carries no `url`.
    pub async fn query_media_url(&self, media_id: &str) -> Result<Option<String>, SendError> {
        info!("Querying media url for {}", media_id);

        let response = self
            .client
            .get(self.config.media_endpoint(media_id))
            .header("Authorization", self.bearer())
            .send()
            .await?;

        let response = read_response(response).await?;
        log_outcome("media url query", &response);

        if !response.is_success() {
            return Ok(None);
        }

        Ok(response
            .body
            .get("url")
            .and_then(|url| url.as_str())
            .map(String::from))
    }

    /// Downloads a media url to `<file_path>.<extension>`.
    ///
    /// The extension is the subtype of `mime_type` without parameters, e.g.
    /// `audio/ogg; codecs=opus` gives `ogg`. `file_path` defaults to `temp`.
    /// Media urls require the bearer token, so they go through this client.
    pub async fn download_media(
        &self,
        media_url: &str,
        mime_type: &str,
        file_path: Option<&str>,
    ) -> Result<PathBuf, SendError> {
        let extension = extension_from_mime(mime_type)?;
        let save_file_here = PathBuf::from(format!(
            "{}.{}",
            file_path.unwrap_or(consts::DEFAULT_DOWNLOAD_FILE_PATH),
            extension
        ));

        let response = self
            .client
            .get(media_url)
            .header("Authorization", self.bearer())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let response = read_response(response).await?;
            warn!("Media download from {} failed with {}", media_url, status);
            return Err(SendError::Api {
                status: response.status,
                body: response.body,
            });
        }

        let content = response.bytes().await?;
        tokio::fs::write(&save_file_here, &content).await?;
        info!("Media downloaded to {}", save_file_here.display());

        Ok(save_file_here)
    }
}

/// Mime subtype without parameters, restricted to characters that cannot
/// leave the download directory
fn extension_from_mime(mime_type: &str) -> Result<&str, SendError> {
    mime_type
        .split_once('/')
        .map(|(_, subtype)| subtype.split(';').next().unwrap_or(subtype).trim())
        .filter(|extension| {
            !extension.is_empty()
                && !extension.contains("..")
                && extension
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        })
        .ok_or_else(|| SendError::InvalidMessage(format!("invalid mime type: {mime_type}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WhatsAppClient {
        WhatsAppClient::new(ClientConfig::new("test-token", "104000").with_base_url(server.uri()))
            .unwrap()
    }

    #[test]
    fn test_extension_from_mime() {
        assert_eq!(extension_from_mime("image/jpeg").unwrap(), "jpeg");
        assert_eq!(extension_from_mime("audio/ogg; codecs=opus").unwrap(), "ogg");
        assert!(extension_from_mime("garbage").is_err());
        assert!(extension_from_mime("image/").is_err());
        assert_eq!(extension_from_mime("image/svg+xml").unwrap(), "svg+xml");
        assert_eq!(
            extension_from_mime("application/vnd.ms-excel").unwrap(),
            "vnd.ms-excel"
        );
        assert!(extension_from_mime("image/../../x").is_err());
        assert!(extension_from_mime("image/..").is_err());
        assert!(extension_from_mime("image/a\\b").is_err());
        assert!(extension_from_mime("image/a b").is_err());
    }

    #[tokio::test]
    async fn test_download_media_rejects_traversal_mime() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("note");
        let url = format!("{}/attachments/42", server.uri());

        let result = client_for(&server)
            .download_media(&url, "image/../../escaped", target.to_str())
            .await;

        assert!(matches!(result, Err(SendError::InvalidMessage(_))));
    }

    #[tokio::test]
    async fn test_upload_media_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/104000/media"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "media-42"})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cat.png");
        tokio::fs::write(&file, b"not really a png").await.unwrap();

        let response = client_for(&server).upload_media(&file).await.unwrap();
        assert_eq!(response.body["id"], "media-42");

        let requests = server.received_requests().await.unwrap();
        let raw = String::from_utf8_lossy(&requests[0].body);
        assert!(raw.contains("name=\"messaging_product\""));
        assert!(raw.contains("name=\"type\""));
        assert!(raw.contains("image/png"));
        assert!(raw.contains("filename=\"cat.png\""));
        assert!(raw.contains("not really a png"));
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let server = MockServer::start().await;
        let result = client_for(&server)
            .upload_media("/definitely/not/here.jpg")
            .await;

        assert!(matches!(result, Err(SendError::Io(_))));
    }

    #[tokio::test]
    async fn test_delete_media() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/media-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).delete_media("media-42").await.unwrap();
        assert_eq!(response.body, json!({"success": true}));
    }

    #[tokio::test]
    async fn test_query_media_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messaging_product": "whatsapp",
                "url": "https://lookaside.fbsbx.com/whatsapp_business/attachments/?mid=42",
                "mime_type": "image/jpeg",
                "id": "media-42"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/unknown"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": {"code": 100}})))
            .mount(&server)
            .await;
        let client = client_for(&server);

        assert_eq!(
            client.query_media_url("media-42").await.unwrap().as_deref(),
            Some("https://lookaside.fbsbx.com/whatsapp_business/attachments/?mid=42")
        );
        assert_eq!(client.query_media_url("unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_download_media() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/attachments/42"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"voice note".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("note");
        let url = format!("{}/attachments/42", server.uri());

        let saved = client_for(&server)
            .download_media(&url, "audio/ogg; codecs=opus", target.to_str())
            .await
            .unwrap();

        assert_eq!(saved, dir.path().join("note.ogg"));
        assert_eq!(tokio::fs::read(&saved).await.unwrap(), b"voice note");
    }

    #[tokio::test]
    async fn test_download_media_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "forbidden"})))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("note");
        let url = format!("{}/attachments/42", server.uri());

        let result = client_for(&server)
            .download_media(&url, "image/jpeg", target.to_str())
            .await;

        assert!(matches!(result, Err(SendError::Api { status: 403, .. })));
        assert!(!dir.path().join("note.jpeg").exists());
    }
}
