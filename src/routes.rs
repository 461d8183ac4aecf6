//! HTTP surface: the Twilio webhook and a health route.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde::Deserialize;

use crate::engine::{Engine, InboundMessage};

/// The fields Twilio posts to the webhook, form-encoded.
#[derive(Debug, Deserialize)]
pub struct TwilioWebhookForm {
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "ProfileName")]
    pub profile_name: Option<String>,
}

/// GET / — static confirmation the service is up.
async fn health() -> &'static str {
    "🚀 Suelen está rodando!"
}

/// POST /webhook/whatsapp
///
/// Acknowledges immediately and handles the message as a deferred task, so
/// the humanizing delay and the downstream calls never hold the webhook
/// request open. Every handled case is an empty 200; downstream failures
/// are logged inside the engine.
async fn whatsapp_webhook(
    State(engine): State<Arc<Engine>>,
    Form(form): Form<TwilioWebhookForm>,
) -> StatusCode {
    let msg = InboundMessage {
        text: form.body,
        sender_id: form.from,
        sender_display_name: form.profile_name,
    };

    tokio::spawn(async move {
        let outcome = engine.handle(msg).await;
        tracing::debug!(?outcome, "Webhook message handled");
    });

    StatusCode::OK
}

/// Build the service router.
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/webhook/whatsapp", post(whatsapp_webhook))
        .with_state(engine)
}
