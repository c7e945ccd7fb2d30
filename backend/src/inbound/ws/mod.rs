//! WebSocket inbound adapter streaming viewport state to the map page.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list)
//! - start one viewport session per connection
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, warn};
use url::Url;

mod session;

pub mod messages;
pub mod state;

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }

    validate_origin(origin_header, &state.allowed_hosts)?;

    let (response, session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;
    let controller = state.controller();
    actix_web::rt::spawn(session::handle_ws_session(controller, session, messages));
    Ok(response)
}

fn validate_origin(origin_header: &HeaderValue, allowed_hosts: &[String]) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            error!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if is_allowed_origin(&origin, allowed_hosts) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

const LOCALHOST: &str = "localhost";

/// Returns true when a parsed Origin belongs to the allow-list.
///
/// HTTPS origins match a configured host or any of its subdomains. Plain HTTP
/// is accepted only from localhost with a non-zero explicit port.
fn is_allowed_origin(origin: &Url, allowed_hosts: &[String]) -> bool {
    let Some(host) = origin.host_str() else {
        return false;
    };

    match origin.scheme() {
        "http" if host == LOCALHOST => matches!(origin.port(), Some(port) if port != 0),
        "https" => allowed_hosts.iter().any(|allowed| {
            host == allowed
                || host
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header::HeaderValue};
    use rstest::{fixture, rstest};

    #[fixture]
    fn allowed() -> Vec<String> {
        vec!["dog-friendly-map.vercel.app".to_owned()]
    }

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).expect("valid header value")
    }

    #[rstest]
    #[case("http://localhost:3000")]
    #[case("https://dog-friendly-map.vercel.app")]
    #[case("https://preview.dog-friendly-map.vercel.app")]
    fn accepts_configured_origins(allowed: Vec<String>, #[case] origin: &str) {
        assert!(validate_origin(&header(origin), &allowed).is_ok());
    }

    #[rstest]
    #[case("http://localhost")]
    #[case("https://example.com")]
    #[case("https://evil-dog-friendly-map.vercel.app")]
    #[case("wss://dog-friendly-map.vercel.app")]
    fn rejects_disallowed_origins(allowed: Vec<String>, #[case] origin: &str) {
        let error = validate_origin(&header(origin), &allowed).expect_err("origin rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[rstest]
    fn rejects_non_utf8_origin_header(allowed: Vec<String>) {
        let header = HeaderValue::from_bytes(&[0x80]).expect("opaque header value");
        let error = validate_origin(&header, &allowed).expect_err("origin rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[rstest]
    fn rejects_unparsable_origin_header(allowed: Vec<String>) {
        let header = HeaderValue::from_static("not a url");
        let error = validate_origin(&header, &allowed).expect_err("origin rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[rstest]
    #[case("http://localhost:4000", true)]
    #[case("http://localhost:0", false)]
    #[case("https://dog-friendly-map.vercel.app.evil.com", false)]
    fn evaluates_allow_list(allowed: Vec<String>, #[case] origin: &str, #[case] expected: bool) {
        let parsed = Url::parse(origin).expect("url should parse");
        assert_eq!(is_allowed_origin(&parsed, &allowed), expected);
    }
}
