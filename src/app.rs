/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (DrinkRepo, AuthGate) → Router 組み立て
 * - Middleware の適用 (HTTP 共通 layer, CORS)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware::{cors, http},
    repos::{DrinkRepo, MemoryDrinkRepo, PgDrinkRepo, reset_with_sample},
    services::auth::build_auth_gate,
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG wins when set.
    // Ex: RUST_LOG=info,coffee_shop_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it gets noticed.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting coffee shop API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let drinks: Arc<dyn DrinkRepo> = match &config.database_url {
        Some(url) => Arc::new(
            PgDrinkRepo::connect(url)
                .await
                .context("failed to connect to the drinks database")?,
        ),
        None => {
            tracing::warn!("DATABASE_URL not set; drinks are kept in memory");
            Arc::new(MemoryDrinkRepo::new())
        }
    };

    if config.db_reset_on_start {
        let sample = reset_with_sample(drinks.as_ref())
            .await
            .context("failed to reset the drinks store")?;
        tracing::warn!(backend = drinks.backend_name(), sample_id = sample.id, "drinks store reset");
    }

    let auth = build_auth_gate(&config.auth)?;

    Ok(AppState::new(drinks, auth))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes().with_state(state);
    let router = http::apply(router);
    cors::apply(router, config)
}
