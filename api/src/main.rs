use std::sync::Arc;

use actix_web::{middleware::Logger, App, HttpServer};
use dotenvy::dotenv;
use tracing::{info, warn};

use tg_api::app::configure_app;
use tg_api::config::{ApiConfig, StoreBackend};
use tg_core::services::token::{CleanupJob, RotationService, TokenCodec};
use tg_core::stores::SessionStore;
use tg_infra::{MySqlSessionStore, RedisSessionStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env()?;
    info!(bind = %config.bind_address, backend = ?config.backend, "starting TokenGate API");

    if config.tokens.is_using_default_secrets() {
        warn!("running with development signing secrets; set ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET");
    }

    let store: Arc<dyn SessionStore> = match config.backend {
        StoreBackend::Redis => {
            let store = RedisSessionStore::connect(config.store.clone())
                .await
                .map_err(|e| anyhow::anyhow!("session store init failed: {}", e))?;
            Arc::new(store)
        }
        StoreBackend::MySql => {
            let store = MySqlSessionStore::connect(config.database.clone())
                .await
                .map_err(|e| anyhow::anyhow!("session store init failed: {}", e))?;

            // Only the durable backend needs sweeping; Redis entries expire
            // on their own.
            let job = Arc::new(CleanupJob::new(Arc::new(store.clone()), config.cleanup.clone()));
            job.start_background_task();

            Arc::new(store)
        }
    };

    let sessions = Arc::new(RotationService::new(
        store,
        TokenCodec::new(config.tokens.clone()),
    ));

    let bind_address = config.bind_address.clone();
    HttpServer::new(move || {
        let sessions = sessions.clone();
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| configure_app(cfg, sessions))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
