mod api;
mod config;
mod error;
mod models;
mod services;

use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;

use api::create_router;
use config::Config;
use services::{AIService, EstimationService, GeminiService};

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so RUST_LOG can live there too
    dotenv().ok();
    env_logger::init();

    log::info!("🚀 Starting Foodprint Estimator...");

    let config = Config::from_env()?;

    // Built once, shared read-only by every request
    let ai: Option<Arc<dyn AIService>> = match config.gemini_api_key.clone() {
        Some(api_key) => {
            let gemini = GeminiService::new(
                api_key,
                config.gemini_model.clone(),
                config.gemini_api_base.clone(),
                config.gemini_timeout,
            )?;
            log::info!("✅ Gemini service initialized with model: {}", config.gemini_model);
            Some(Arc::new(gemini) as Arc<dyn AIService>)
        }
        None => {
            log::error!("❌ GEMINI_API_KEY not set, every estimation will fail until it is configured");
            None
        }
    };

    let service = Arc::new(EstimationService::new(ai, config.gemini_model.clone()));
    let app = create_router(service, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("🌐 Server listening on {}", config.bind_addr);

    println!("\n🥗 Foodprint Estimator running");
    println!("🌐 Public URL: {}", config.backend_url);
    println!("   POST {}/estimate        {{\"dish\": \"Chicken Biryani\"}}", config.backend_url);
    println!("   POST {}/estimate/image  multipart field 'image'", config.backend_url);
    println!("   GET  {}/health", config.backend_url);
    println!("\n🛑 Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("🛑 Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("❌ Failed to listen for Ctrl+C: {}", e);
    }
}
