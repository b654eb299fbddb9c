pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v21.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const MESSAGING_PRODUCT: &str = "whatsapp";
pub const DEFAULT_TEMPLATE_LANGUAGE: &str = "en_US";
pub const DEFAULT_DOWNLOAD_FILE_PATH: &str = "temp";

/// Cloud API limit on reply buttons per interactive message
pub const MAX_REPLY_BUTTONS: usize = 3;

pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";
pub const SUBSCRIBE_MODE: &str = "subscribe";
pub const MESSAGES_FIELD: &str = "messages";
