use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::{Error, Result};
use crate::AppState;

pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Gates the administrative surface behind a static shared secret compared
/// for exact equality. A missing or mismatched header is the same failure;
/// the response never hints which.
pub async fn mw_admin(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response> {
    let provided = req
        .headers()
        .get(ADMIN_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(Error::AdminAuthFail)?;

    if provided != app_state.config.admin_secret {
        return Err(Error::AdminAuthFail);
    }

    Ok(next.run(req).await)
}
