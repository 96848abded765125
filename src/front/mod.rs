pub mod flash;
pub mod goals;
pub mod template;
pub mod transactions;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::services::ServeDir;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    p: SqlitePool,
    t: template::Template,
    currency: String,
}

/// Builds the application router, loading the templates from `config`.
pub fn app(p: SqlitePool, config: &Config) -> anyhow::Result<Router> {
    log::debug!("loading templates from {}", config.templates_dir.display());
    let t = template::Template::new(&config.templates_dir)?;

    Ok(Router::new()
        .route("/", get(transactions::index))
        .route("/add", post(transactions::add))
        .route(
            "/edit/:id",
            get(transactions::edit_form).post(transactions::edit),
        )
        .route("/delete/:id", get(transactions::delete))
        .route("/budget-goals", get(goals::list).post(goals::save))
        .route(
            "/budget-goals/edit/:id",
            get(goals::edit_form).post(goals::edit),
        )
        .route(
            "/budget-goals/delete/:id",
            get(goals::delete).post(goals::delete),
        )
        .nest_service("/public", ServeDir::new(&config.public_dir))
        .with_state(AppState {
            p,
            t,
            currency: config.currency.clone(),
        }))
}

/// Serves until Ctrl-C, then closes the pool.
pub async fn start_web_server(p: SqlitePool, config: &Config) -> anyhow::Result<()> {
    let app = app(p.clone(), config)?;

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("cannot listen on {}", config.listen_addr))?;
    log::info!("open website at http://{}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("shutting down");
    p.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("cannot listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }
}
