use std::{net::SocketAddr, time::Duration};

use axum::{
    body::Body,
    http::{Request, Response},
    middleware,
    routing::get,
    Json, Router,
};
use surrealdb::{
    engine::any::{self, Any},
    opt::auth::Root,
    Surreal,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::Span;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    routes::{
        admin_routes::AdminRoutes, chart_routes::ChartRoutes, track_routes::TrackRoutes,
        winner_routes::WinnerRoutes,
    },
    services::{blob_service::BlobService, email_service::Mailer},
};

pub use self::error::{Error, Result};

mod config;
mod controllers;
mod error;
mod helpers;
mod middlewares;
mod models;
mod routes;
mod services;
mod validators;

#[derive(Clone)]
pub struct AppState {
    pub db: Surreal<Any>,
    pub blobs: BlobService,
    pub mailer: Option<Mailer>,
    pub rate_limit_cache: moka::future::Cache<String, ()>,
    pub config: AppConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    tracing::info!("Starting SoundChart API...");

    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database at: {}", config.db_url);

    let db = any::connect(&config.db_url).await?;
    if let (Some(user), Some(password)) = (&config.db_user, &config.db_password) {
        db.signin(Root {
            username: user,
            password,
        })
        .await?;
    }
    db.use_ns(&config.db_ns).use_db(&config.db_name).await?;

    tracing::info!("Database connected successfully!");

    let blobs = BlobService::new(config.media_root.clone(), config.public_base_url.clone());
    blobs.ensure_layout().await?;

    let mailer = config.mail.clone().map(Mailer::new);
    if mailer.is_none() {
        tracing::info!("SMTP not configured, token emails disabled");
    }

    let app_state = AppState {
        db,
        blobs,
        mailer,
        rate_limit_cache: moka::future::Cache::builder()
            .time_to_live(Duration::from_secs(60))
            .max_capacity(100_000)
            .build(),
        config: config.clone(),
    };

    let public_routes = Router::new()
        .nest("/tracks", TrackRoutes::routes())
        .nest("/charts", ChartRoutes::routes())
        .nest("/winners", WinnerRoutes::routes())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::mw_rate_limit::rate_limit_middleware,
        ));

    let admin_routes = Router::new()
        .nest("/admin", AdminRoutes::routes())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::mw_admin::mw_admin,
        ));

    let routes_all = Router::new()
        .nest("/api", public_routes)
        .nest("/api", admin_routes)
        .route("/healthz", get(healthz))
        .nest_service("/media", ServeDir::new(&config.media_root))
        .with_state(app_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4();
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    tracing::info!("{} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
                    let status = response.status();
                    let latency_ms = latency.as_millis();

                    match status.as_u16() {
                        200..=299 => tracing::info!("{} ({}ms)", status, latency_ms),
                        400..=499 => tracing::warn!("{} ({}ms)", status, latency_ms),
                        500..=599 => tracing::error!("{} ({}ms)", status, latency_ms),
                        _ => tracing::info!("{} ({}ms)", status, latency_ms),
                    }
                }),
        )
        .layer(CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!("Listening on http://{}", config.bind_addr);

    axum::serve(
        listener,
        routes_all.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "soundchart_api=debug,tower_http=info,info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}
