use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};

/// Verified caller identity, as issued by the upstream authentication
/// service.
///
/// The gateway never sees raw credentials: the auth proxy in front of it
/// verifies the token and forwards the subject as an opaque identifier in
/// the `x-user-id` header.
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub String);

pub async fn identity_middleware(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let user_id = req
        .headers()
        .get("x-user-id")
        .and_then(|header| header.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let identity = CallerIdentity(user_id.to_string());
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
