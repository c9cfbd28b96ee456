use crate::app::build_context;
use crate::config::load_settings;
use crate::responses::html_error_response;
use crate::router::handle;
use anyhow::Context;
use astra::Server;
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod auth;
mod config;
mod crm;
mod db;
mod domain;
mod errors;
mod intake;
mod responses;
mod router;
mod seed;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() -> anyhow::Result<()> {
    // 1️⃣ Settings and logging
    let settings = load_settings()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 2️⃣ Load the CRM state (sheet rows or the demo dataset)
    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;
    let workers = settings.max_workers;
    let ctx = build_context(settings)?;

    // 3️⃣ Start the server
    info!(%addr, workers, backend = ctx.sheet.as_deref().map(|s| s.name()).unwrap_or("none"), "starting server");
    let server = Server::bind(&addr).max_workers(workers);

    // 4️⃣ Serve requests, passing the context into the closure
    let result = server.serve(move |req, _info| match handle(req, &ctx) {
        Ok(resp) => resp,
        Err(err) => html_error_response(err),
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
        return Err(e).context("server failed");
    }

    info!("server shut down cleanly");
    Ok(())
}
