#![cfg(feature = "dangerous-plaintext")]

mod common;

use std::collections::HashMap;

use time::Duration;
use tower_cookies::Cookie;

use stateless_cookie_sessions::{CookieSessionConfig, SessionManager, Transaction, format};

#[test]
fn plaintext_roundtrip() {
    let manager = SessionManager::dangerous_plaintext(CookieSessionConfig::default());
    let jar = common::request_jar(None);
    let handle = manager.create(&Transaction::from(jar.clone()), "abc", Duration::hours(1));
    handle.set("user", "alice");
    handle.save().expect("session save succeeds");
    let cookie = common::written_cookie(&jar, "session").expect("save writes the session cookie");

    let next = common::request_jar(Some(&cookie));
    let handle = manager
        .update(&Transaction::from(next), "abc", Duration::hours(1))
        .expect("session update succeeds")
        .expect("session update returns a handle");

    assert_eq!(handle.get("user").as_deref(), Some("alice"));
}

#[test]
fn plaintext_allows_tampering() {
    let manager = SessionManager::dangerous_plaintext(CookieSessionConfig::default());
    let jar = common::request_jar(None);
    let handle = manager.create(&Transaction::from(jar.clone()), "abc", Duration::hours(1));
    handle.set("user", "alice");
    handle.save().expect("session save succeeds");
    let cookie = common::written_cookie(&jar, "session").expect("save writes the session cookie");

    let payload = format::decode_payload(cookie.value()).expect("payload decodes successfully");
    let mut values: HashMap<String, String> = payload.values;
    values.insert("user".to_string(), "admin".to_string());
    let tampered = format::encode_payload(&payload.session_id, &values, payload.timestamp)
        .expect("payload encodes successfully");

    let next = common::request_jar(Some(&Cookie::new("session", tampered)));
    let handle = manager
        .update(&Transaction::from(next), "abc", Duration::hours(1))
        .expect("session update succeeds")
        .expect("session update returns a handle");

    assert_eq!(handle.get("user").as_deref(), Some("admin"));
}
