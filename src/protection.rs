use std::fmt::Debug;

#[cfg(any(feature = "signed", feature = "private"))]
use tower_cookies::{Cookie, cookie::CookieJar};

/// Seals a payload so that it cannot be altered (and, for some implementations, read) by the
/// client.
///
/// The session ID is passed as `name`. Implementations may or may not bind the sealed value to
/// it; [`SecureCookieCodec`](crate::SecureCookieCodec) carries the session ID inside the payload
/// and checks it after opening. Implement this trait to plug in a different hash or block
/// primitive.
pub trait CookieProtection: Debug + Clone + Send + Sync + 'static {
    fn seal(&self, name: &str, value: String) -> Option<String>;

    /// Returns `None` when the sealed value was not produced by `seal` for this `name`.
    fn open(&self, name: &str, sealed: &str) -> Option<String>;
}

#[cfg(feature = "dangerous-plaintext")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextCookie;

#[cfg(feature = "dangerous-plaintext")]
impl CookieProtection for PlaintextCookie {
    fn seal(&self, _name: &str, value: String) -> Option<String> {
        Some(value)
    }

    fn open(&self, _name: &str, sealed: &str) -> Option<String> {
        Some(sealed.to_string())
    }
}

/// HMAC-SHA256 over the value. Values are readable by the client.
#[cfg(feature = "signed")]
#[derive(Debug, Clone)]
pub struct SignedCookie {
    key: crate::Key,
}

#[cfg(feature = "signed")]
impl SignedCookie {
    pub fn new(key: crate::Key) -> Self {
        Self { key }
    }
}

#[cfg(feature = "signed")]
impl CookieProtection for SignedCookie {
    fn seal(&self, name: &str, value: String) -> Option<String> {
        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key)
            .add(Cookie::new(name.to_string(), value));
        jar.get(name).map(|cookie| cookie.value().to_string())
    }

    fn open(&self, name: &str, sealed: &str) -> Option<String> {
        let mut jar = CookieJar::new();
        jar.add_original(Cookie::new(name.to_string(), sealed.to_string()));
        jar.signed(&self.key)
            .get(name)
            .map(|cookie| cookie.value().to_string())
    }
}

/// AES-256-GCM with the name as associated data. Values are opaque to the client.
#[cfg(feature = "private")]
#[derive(Debug, Clone)]
pub struct PrivateCookie {
    key: crate::Key,
}

#[cfg(feature = "private")]
impl PrivateCookie {
    pub fn new(key: crate::Key) -> Self {
        Self { key }
    }
}

#[cfg(feature = "private")]
impl CookieProtection for PrivateCookie {
    fn seal(&self, name: &str, value: String) -> Option<String> {
        let mut jar = CookieJar::new();
        jar.private_mut(&self.key)
            .add(Cookie::new(name.to_string(), value));
        jar.get(name).map(|cookie| cookie.value().to_string())
    }

    fn open(&self, name: &str, sealed: &str) -> Option<String> {
        let mut jar = CookieJar::new();
        jar.add_original(Cookie::new(name.to_string(), sealed.to_string()));
        jar.private(&self.key)
            .get(name)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[cfg(feature = "signed")]
    #[test]
    fn signed_opens_what_it_sealed() {
        let protection = SignedCookie::new(crate::Key::generate());
        let sealed = protection
            .seal("abc", "payload".to_string())
            .expect("signed seal succeeds");

        assert!(sealed.ends_with("payload"));
        assert_eq!(protection.open("abc", &sealed).as_deref(), Some("payload"));

        let forged = sealed.replace("payload", "payloae");
        assert_eq!(protection.open("abc", &forged), None);
    }

    #[cfg(feature = "signed")]
    #[test]
    fn signed_rejects_other_key() {
        let sealed = SignedCookie::new(crate::Key::generate())
            .seal("abc", "payload".to_string())
            .expect("signed seal succeeds");

        assert_eq!(
            SignedCookie::new(crate::Key::generate()).open("abc", &sealed),
            None
        );
    }

    #[cfg(feature = "private")]
    #[test]
    fn private_hides_value_and_binds_name() {
        let protection = PrivateCookie::new(crate::Key::generate());
        let sealed = protection
            .seal("abc", "payload".to_string())
            .expect("private seal succeeds");

        assert!(!sealed.contains("payload"));
        assert_eq!(protection.open("abc", &sealed).as_deref(), Some("payload"));
        assert_eq!(protection.open("xyz", &sealed), None);
    }
}
