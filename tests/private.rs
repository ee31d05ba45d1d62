#![cfg(feature = "private")]

mod common;

use axum::body::Body;
use http::{Request, header};
use time::Duration;
use tower::ServiceExt as _;

use stateless_cookie_sessions::{CookieSessionConfig, Key, SessionManager, Transaction};

#[tokio::test]
async fn private_cookie_roundtrips() {
    let config = CookieSessionConfig::default().with_secure(false);
    let app = common::routes(SessionManager::private(Key::generate(), config));

    let req = Request::builder()
        .uri("/abc/login")
        .body(Body::empty())
        .expect("request builds successfully");
    let res = app
        .clone()
        .oneshot(req)
        .await
        .expect("service call succeeds");
    let session_cookie = common::get_session_cookie(&res);

    let req = Request::builder()
        .uri("/abc/whoami")
        .header(header::COOKIE, common::cookie_header_value(&session_cookie))
        .body(Body::empty())
        .expect("request builds successfully");
    let res = app.oneshot(req).await.expect("service call succeeds");

    assert_eq!(common::body_string(res.into_body()).await, "alice");
}

#[test]
fn private_cookie_hides_values() {
    let manager = SessionManager::private(Key::generate(), CookieSessionConfig::default());
    let jar = common::request_jar(None);
    let handle = manager.create(&Transaction::from(jar.clone()), "abc", Duration::hours(1));
    handle.set("secret", "hunter2");
    handle.save().expect("session save succeeds");

    let cookie = common::written_cookie(&jar, "session").expect("save writes the session cookie");

    assert!(!cookie.value().contains("hunter2"));
    assert!(stateless_cookie_sessions::format::decode_payload(cookie.value()).is_err());
}
