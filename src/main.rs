use axum::middleware::from_fn;
use dotenvy::dotenv;
use log::{info, warn};
use std::{net::SocketAddr, sync::Arc};

mod charts;
mod components;
mod config;
mod controllers;
mod errors;
mod htmx;
mod metrics;
mod middleware;
mod models;
mod routes;
mod sheets;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let cfg = config::Config::from_env();
    // A credentials problem is fatal; there is nothing useful to serve
    // without a client.
    let gateway = sheets::GoogleSheets::connect(&cfg).await?;

    // A failed probe is not: the overview shows a banner and the process
    // keeps serving, so a bad SHEET_ID can be fixed without a crash loop.
    let probe_error = match gateway.probe().await {
        Ok(()) => {
            info!("spreadsheet {} reachable", cfg.sheet_id);
            None
        }
        Err(err) => {
            warn!("spreadsheet probe failed: {err:#}");
            Some(format!("{err:#}"))
        }
    };

    let state = models::AppState {
        sheets: Arc::new(gateway),
        probe_error,
    };
    let app = routes::get_routes()
        .layer(from_fn(middleware::html_headers))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 8000));
    info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
