use std::sync::Arc;

use studio_assist::audit::{LeadRecorder, SheetsRecorder};
use studio_assist::config::{Config, StateBackend};
use studio_assist::dispatch::{Dispatcher, TwilioDispatcher};
use studio_assist::engine::Engine;
use studio_assist::llm::{OpenAiGenerator, ResponseGenerator};
use studio_assist::routes::router;
use studio_assist::state::{MemoryStore, SheetStore, StateStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    eprintln!("📸 Studio Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.openai_model);
    eprintln!("   State backend: {:?}", config.state_backend);
    eprintln!("   Webhook: http://0.0.0.0:{}/webhook/whatsapp", config.port);

    // One HTTP client for all outbound calls, with the bounded timeout.
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    let store: Arc<dyn StateStore> = match config.state_backend {
        StateBackend::Memory => Arc::new(MemoryStore::new()),
        StateBackend::Sheet => Arc::new(SheetStore::new(
            http.clone(),
            config.sheets_spreadsheet_id.clone(),
            config.sheets_tab.clone(),
            config.sheets_access_token.clone(),
        )),
    };

    let generator: Arc<dyn ResponseGenerator> = Arc::new(OpenAiGenerator::new(
        http.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));

    let dispatcher: Arc<dyn Dispatcher> = Arc::new(TwilioDispatcher::new(
        http.clone(),
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
        &config.twilio_phone_number,
    ));

    let recorder: Arc<dyn LeadRecorder> = Arc::new(SheetsRecorder::new(
        http,
        config.sheets_spreadsheet_id.clone(),
        config.sheets_tab.clone(),
        config.sheets_access_token.clone(),
    ));

    let engine = Arc::new(Engine::new(
        store,
        generator,
        dispatcher,
        recorder,
        config.reply_delay_ms,
    ));

    let app = router(engine);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Webhook server started");
    axum::serve(listener, app).await?;

    Ok(())
}
