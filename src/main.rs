use actix_web::middleware::{NormalizePath, from_fn};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod middleware;
mod model;
mod models;
mod routes;
mod schema;
mod service;
mod utils;
mod views;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

use config::Config;
use db::{DatabaseTarget, Store};
use routes::ApiLimiter;

use crate::docs::ApiDoc;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    // Backend is decided here, once, and handed to the store
    let target = DatabaseTarget::resolve(config.database_url.as_deref());
    let store = Store::connect_lazy(&target, config.db_max_connections)
        .context("invalid database configuration")?;

    match schema::initialize(&store).await {
        Ok(report) => info!(
            seeded = report.seeded,
            unique_index = report.unique_index,
            "Database initialized"
        ),
        Err(e) => error!(error = %e, "Database initialization failed"),
    }

    let limiter = ApiLimiter::new(config.rate_api_per_min)?;
    let bind_addr = (config.host.clone(), config.port);
    info!(host = %bind_addr.0, port = bind_addr.1, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(middleware::ensure_schema))
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(store.clone()))
            .configure(|cfg| routes::configure(cfg, &limiter))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
