use crate::api::{attendance, pages};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, error::InternalError, middleware::Condition, web};
use anyhow::{Context, Result};
use serde_json::json;
use std::sync::Arc;

pub type LimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per peer IP limiter for the API scope.
#[derive(Clone)]
pub struct ApiLimiter {
    enabled: bool,
    config: Arc<LimiterConfig>,
}

impl ApiLimiter {
    /// `requests_per_min == 0` turns limiting off.
    pub fn new(requests_per_min: u32) -> Result<Self> {
        let per_min = requests_per_min.max(1);
        let config = GovernorConfigBuilder::default()
            .milliseconds_per_request((60_000 / per_min as u64).max(1))
            .burst_size(per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .context("invalid rate limiter settings")?;

        Ok(Self {
            enabled: requests_per_min > 0,
            config: Arc::new(config),
        })
    }

    fn middleware(&self) -> Condition<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
        Condition::new(self.enabled, Governor::new(&self.config))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, limiter: &ApiLimiter) {
    cfg.app_data(json_config()).app_data(path_config());

    // Pages
    cfg.route("/", web::get().to(pages::index))
        .route("/presensi", web::get().to(pages::presensi))
        .route("/dashboard", web::get().to(pages::dashboard));

    // JSON API
    cfg.service(
        web::scope("/api")
            .wrap(limiter.middleware())
            .service(web::resource("/checkin").route(web::post().to(attendance::check_in)))
            .service(web::resource("/checkout").route(web::post().to(attendance::check_out)))
            // /api/presensi/{employee_id}
            .service(
                web::resource("/presensi/{employee_id}")
                    .route(web::get().to(attendance::history)),
            )
            .service(
                web::resource("/dashboard/stats").route(web::get().to(attendance::dashboard_stats)),
            ),
    );

    cfg.default_service(web::to(not_found));
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "error": message })),
        )
        .into()
    })
}

// `/api/presensi/abc` is not a route, same as any other unknown path
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        InternalError::from_response(err, not_found_response()).into()
    })
}

fn not_found_response() -> HttpResponse {
    HttpResponse::NotFound().json(json!({"error": "Endpoint not found"}))
}

pub async fn not_found() -> HttpResponse {
    not_found_response()
}
