use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Per-IP rate limiting for the public surface: a generous per-minute
/// ceiling that only stalls heavy vote/play spammers.
///
/// Counting rides on the moka cache's TTL: each request inserts a uniquely
/// keyed marker and the live markers per prefix are the window count.
pub async fn rate_limit_middleware(
    State(app_state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let identifier = format!("ip:{}", addr.ip());
    let request_id = uuid::Uuid::new_v4();

    const MAX_REQUESTS_PER_MINUTE: usize = 150;

    let minute_key = format!("rl:min:{}:{}", identifier, request_id);
    app_state.rate_limit_cache.insert(minute_key, ()).await;

    let minute_prefix = format!("rl:min:{}:", identifier);
    let minute_reqs = app_state
        .rate_limit_cache
        .iter()
        .filter(|(key, _)| key.starts_with(&minute_prefix))
        .count();

    if minute_reqs > MAX_REQUESTS_PER_MINUTE {
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(req).await)
}
