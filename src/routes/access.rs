use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{error::AppError, state::SharedState};

/// Reject requests whose declared origin (or referer, in strict mode) is not
/// on the configured allow-list.
///
/// Runs before validation and persistence; a rejection here answers 403
/// regardless of the payload.
pub async fn enforce_origin(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let origin = header_str(&request, header::ORIGIN);
    let referer = header_str(&request, header::REFERER);

    if let Err(violation) = state.access_policy().evaluate(origin, referer) {
        debug!(origin, referer, %violation, "request rejected by access policy");
        return Err(AppError::Forbidden(violation.to_string()));
    }

    Ok(next.run(request).await)
}

fn header_str(request: &Request, name: header::HeaderName) -> Option<&str> {
    request.headers().get(name).and_then(|value| value.to_str().ok())
}
