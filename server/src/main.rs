// server/src/main.rs

use actix_web::HttpServer;
use anyhow::Context;

use printshop::seed::seed_catalog;
use printshop_server::config::AppConfig;
use printshop_server::state::AppState;
use printshop_server::telemetry::init_tracing;
use printshop_server::web::build_app;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Reads `.env` too; LOG_FORMAT decides how the subscriber is built.
  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  init_tracing(app_config.log_format);

  tracing::info!(
    backend = %app_config.storage_backend,
    upload_dir = %app_config.upload_dir.display(),
    "Starting printshop server..."
  );

  tokio::fs::create_dir_all(&app_config.upload_dir)
    .await
    .with_context(|| format!("Failed to create upload directory {}", app_config.upload_dir.display()))?;

  let server_address = app_config.bind_address();
  let app_state = AppState::from_config(app_config)
    .await
    .context("Failed to initialize storage")?;
  tracing::info!("Storage backend ready.");

  if app_state.config.seed_db {
    let seeded = seed_catalog(app_state.store.as_ref())
      .await
      .context("Failed to seed the default catalog")?;
    if seeded {
      tracing::info!("Default catalog seeded.");
    } else {
      tracing::info!("Catalog already populated; seeding skipped.");
    }
  }

  tracing::info!("Attempting to bind server to {}...", server_address);
  HttpServer::new(move || build_app(app_state.clone()))
    .bind(&server_address)
    .with_context(|| format!("Failed to bind {}", server_address))?
    .run()
    .await?;

  tracing::info!("Server stopped.");
  Ok(())
}
