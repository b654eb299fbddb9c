use ntex::web;

/// Configures the WhatsApp callback routes.
///
/// # Routes
/// - `GET /webhook` - Callback url verification
/// - `POST /webhook` - Event receiver
pub fn whatsapp(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhook").service((super::whatsapp::verify, super::whatsapp::receive)),
    );
}
