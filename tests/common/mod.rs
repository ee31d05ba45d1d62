#![allow(dead_code)]

// Shared helpers for integration tests.
//
// These helpers use `tower_cookies::Cookie` parsing/encoding to match what the layer emits in
// `Set-Cookie` and what browsers send back in `Cookie`.
use axum::{
    Extension, Router,
    body::Body,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use http::{HeaderMap, HeaderValue, Response, header};
use http_body_util::BodyExt as _;
use stateless_cookie_sessions::{
    HeaderCookies, SessionCodec, SessionManager, Transaction, TransactionLayer,
};
use time::Duration;
use tower_cookies::Cookie;

pub const EXPIRY: Duration = Duration::hours(1);

pub async fn body_string(body: Body) -> String {
    // Collect an Axum body into a UTF-8 string for assertions.
    let bytes = body
        .collect()
        .await
        .expect("body collects successfully")
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn routes<C>(manager: SessionManager<C>) -> Router
where
    C: SessionCodec + 'static,
{
    // Host-side routes: the session ID comes from the path, the transaction from the layer.
    Router::new()
        .route(
            "/{sid}/login",
            get(
                |State(manager): State<SessionManager<C>>,
                 Extension(tx): Extension<Transaction>,
                 Path(sid): Path<String>| async move {
                    let handle = manager.create(&tx, sid, EXPIRY);
                    handle.set("user", "alice");
                    handle.save().expect("session save succeeds");
                },
            ),
        )
        .route(
            "/{sid}/whoami",
            get(
                |State(manager): State<SessionManager<C>>,
                 Extension(tx): Extension<Transaction>,
                 Path(sid): Path<String>| async move {
                    match manager.update(&tx, sid, EXPIRY) {
                        Ok(Some(handle)) => (
                            StatusCode::OK,
                            handle.get("user").unwrap_or_else(|| "none".to_string()),
                        ),
                        Ok(None) => (StatusCode::OK, "no-session".to_string()),
                        Err(err) => (StatusCode::UNAUTHORIZED, err.to_string()),
                    }
                },
            ),
        )
        .route(
            "/{sid}/flush",
            get(
                |State(manager): State<SessionManager<C>>,
                 Extension(tx): Extension<Transaction>,
                 Path(sid): Path<String>| async move {
                    let handle = manager
                        .update(&tx, sid, EXPIRY)
                        .expect("session update succeeds")
                        .expect("session update returns a handle");
                    handle.flush().expect("session flush succeeds");
                },
            ),
        )
        .route(
            "/{sid}/logout",
            get(
                |State(manager): State<SessionManager<C>>,
                 Extension(tx): Extension<Transaction>,
                 Path(sid): Path<String>| async move {
                    manager.delete(&tx, &sid).expect("session delete succeeds");
                    format!("{}", manager.check(&tx, &sid))
                },
            ),
        )
        .with_state(manager)
        .layer(TransactionLayer::new())
}

pub fn get_session_cookie(res: &Response<Body>) -> Cookie<'static> {
    // Convenience: parse the session cookie from a response.
    get_session_cookie_from_headers(res.headers())
}

pub fn get_session_cookie_from_headers(headers: &HeaderMap) -> Cookie<'static> {
    // Parse the last `Set-Cookie` header into a `Cookie` structure.
    let set_cookie = headers
        .get_all(header::SET_COOKIE)
        .iter()
        .last()
        .expect("response includes set-cookie header");
    let set_cookie = set_cookie
        .to_str()
        .expect("set-cookie header is valid utf-8");
    Cookie::parse_encoded(set_cookie)
        .expect("set-cookie parses successfully")
        .into_owned()
}

pub fn cookie_header_value(cookie: &Cookie<'_>) -> String {
    // Encode a cookie for use in a `Cookie` request header, dropping response attributes.
    Cookie::new(cookie.name().to_string(), cookie.value().to_string())
        .encoded()
        .to_string()
}

pub fn tamper_cookie_value(cookie: &mut Cookie<'_>) {
    // Replace the last character of the value.
    let mut value = cookie.value().to_string();
    let last = value
        .pop()
        .expect("cookie value has at least one character");
    let replacement = if last == 'A' { 'B' } else { 'A' };
    value.push(replacement);
    cookie.set_value(value);
}

pub fn request_jar(cookie: Option<&Cookie<'_>>) -> HeaderCookies {
    // Build a jar as if a request arrived carrying `cookie`.
    let mut headers = HeaderMap::new();
    if let Some(cookie) = cookie {
        let value = HeaderValue::from_str(&cookie_header_value(cookie))
            .expect("cookie encodes to a header value");
        headers.insert(header::COOKIE, value);
    }
    HeaderCookies::from_headers(&headers)
}

pub fn written_cookie(jar: &HeaderCookies, name: &str) -> Option<Cookie<'static>> {
    // The last cookie written to the response under `name`.
    jar.delta().into_iter().find(|c| c.name() == name)
}
