//! # WhatsApp callback server
//!
//! Answers the Meta verification handshake and greets whoever writes to the
//! configured business number.

mod logger;

use ntex::web;
use tracing::{info, warn};
use wa_cloud::{
    config,
    messenger::{ImplMessageSender, WhatsAppClient},
    webhook::{self, whatsapp::AppState},
};

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // Values in a local .env file do not override the environment
    dotenvy::dotenv().ok();

    let app_config = &*config::APP_CONFIG;
    logger::setup_simple_logger(app_config.is_prod())?;

    let client = WhatsAppClient::new(app_config.client_config())?;
    if app_config.whatsapp_app_secret.is_none() {
        warn!("WHATSAPP_APP_SECRET is not set, webhook signatures will not be checked");
    }

    let server_addr = (app_config.hook_host.as_str(), app_config.hook_port);
    info!(
        "Starting callback server on {}:{} ({})",
        server_addr.0,
        server_addr.1,
        app_config.env
    );

    web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .state(create_app_state(client.clone(), app_config))
            .configure(webhook::routes::whatsapp)
    })
    .bind(server_addr)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

/// Creates the state of one worker
fn create_app_state(client: WhatsAppClient, app_config: &config::AppConfig) -> AppState {
    let sender: ImplMessageSender = Box::new(client);

    AppState {
        sender,
        verify_token: app_config.whatsapp_verify_token.clone(),
        app_secret: app_config.whatsapp_app_secret.clone(),
    }
}
