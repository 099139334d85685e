//! Redirect helpers shared by every form handler

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::application::session_gate::{SessionContext, SessionGate};
use crate::domain::repository::AuthStore;
use crate::error::AuthResult;

/// `302 Found` to `location`
pub fn found(location: &str) -> Response {
    found_with_cookie(location, None)
}

/// `302 Found` to `location`, optionally setting a cookie
pub fn found_with_cookie(location: &str, set_cookie: Option<String>) -> Response {
    let mut response = StatusCode::FOUND.into_response();
    let headers = response.headers_mut();

    match HeaderValue::from_str(location) {
        Ok(value) => {
            headers.insert(header::LOCATION, value);
        }
        Err(_) => {
            tracing::error!(location = %location, "Invalid redirect location");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    if let Some(cookie) = set_cookie {
        match platform::cookie::to_header_value(&cookie) {
            Some(value) => {
                headers.insert(header::SET_COOKIE, value);
            }
            None => tracing::error!("Invalid Set-Cookie value"),
        }
    }

    response
}

/// Store a flash notice and redirect. Sets a cookie when the notice
/// required a new anonymous session.
pub async fn flash_redirect<R>(
    gate: &SessionGate<R>,
    ctx: &SessionContext,
    notice: &str,
    location: &str,
) -> AuthResult<Response>
where
    R: AuthStore,
{
    let token = gate.set_flash(ctx, notice).await?;
    let cookie = token.map(|t| gate.session_cookie(&t));
    Ok(found_with_cookie(location, cookie))
}
