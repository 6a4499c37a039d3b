/*
 * Responsibility
 * - Load Config -> build dependencies -> assemble the Router
 * - Apply middleware (http / cors / security headers)
 * - Start axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    repos::subscription_repo::{PgSubscriptionStore, SubscriptionStore},
    services::{auth::build_session_decoder, i18n::Translator},
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG wins; otherwise a quiet default.
    // RUST_LOG=info,push_subscriptions=debug,tower_http=debug cargo run
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
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(?config, "starting push subscription API");

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to DATABASE_URL")?;

    let store = Arc::new(PgSubscriptionStore::new(pool));
    let sessions = build_session_decoder(config);
    let translator = Translator::new(config.locale);

    tracing::info!(
        store = store.backend_name(),
        locale = translator.locale().as_str(),
        verifies_signature = sessions.verifies_signature(),
        "application state ready"
    );

    Ok(AppState::new(store, sessions, translator, config.app_env))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config.app_env, &config.cors_allowed_origins);
    middleware::http::apply(router, config.into())
}
