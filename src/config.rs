use std::borrow::Cow;

use time::{Duration, OffsetDateTime};
use tower_cookies::Cookie;

use crate::{
    SameSite,
    codec::{CodecLimits, DEFAULT_MAX_AGE, DEFAULT_MAX_LENGTH},
};

pub const DEFAULT_COOKIE_NAME: &str = "session";

/// Cookie attributes and codec limits shared by a manager and every handle it creates.
///
/// Session cookies are always `HttpOnly`.
///
/// | field        | default                       |
/// |--------------|-------------------------------|
/// | `name`       | [`DEFAULT_COOKIE_NAME`]       |
/// | `secure`     | `true`                        |
/// | `same_site`  | `Lax`                         |
/// | `path`       | `/`                           |
/// | `domain`     | none                          |
/// | `max_length` | codec default (4096 bytes)    |
/// | `max_age`    | codec default (30 days)       |
/// | `min_age`    | codec default (disabled)      |
#[derive(Debug, Clone)]
pub struct CookieSessionConfig {
    pub(crate) name: Cow<'static, str>,
    pub(crate) secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) path: Cow<'static, str>,
    pub(crate) domain: Option<Cow<'static, str>>,
    pub(crate) max_length: Option<usize>,
    pub(crate) max_age: Option<Duration>,
    pub(crate) min_age: Option<Duration>,
}

impl Default for CookieSessionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.into(),
            secure: true,
            same_site: SameSite::Lax,
            path: "/".into(),
            domain: None,
            max_length: None,
            max_age: None,
            min_age: None,
        }
    }
}

impl CookieSessionConfig {
    #[must_use]
    pub fn with_name<N: Into<Cow<'static, str>>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    #[must_use]
    pub fn with_path<P: Into<Cow<'static, str>>>(mut self, path: P) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_domain<D: Into<Cow<'static, str>>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn without_domain(mut self) -> Self {
        self.domain = None;
        self
    }

    /// Maximum length of an encoded cookie value. `0` disables the check.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Oldest token timestamp the codec accepts. `Duration::ZERO` disables the check.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Youngest token timestamp the codec accepts. `Duration::ZERO` disables the check.
    #[must_use]
    pub fn with_min_age(mut self, min_age: Duration) -> Self {
        self.min_age = Some(min_age);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec_limits(&self) -> CodecLimits {
        CodecLimits {
            max_length: self.max_length.unwrap_or(DEFAULT_MAX_LENGTH),
            max_age: self.max_age.unwrap_or(DEFAULT_MAX_AGE),
            min_age: self.min_age.unwrap_or(Duration::ZERO),
        }
    }

    pub(crate) fn build_cookie(&self, value: String, expiry: Duration) -> Cookie<'static> {
        let mut cookie = Cookie::build((self.name.clone(), value))
            .secure(self.secure)
            .http_only(true)
            .same_site(self.same_site)
            .path(self.path.clone())
            .build();

        self.apply_expiry(&mut cookie, expiry);
        if let Some(domain) = self.domain.clone() {
            cookie.set_domain(domain);
        }

        cookie
    }

    /// Re-issues a cookie read from the request with a fresh expiry. Request cookies carry no
    /// attributes, so the configured ones are applied to keep the browser from storing a second
    /// cookie under a different path.
    pub(crate) fn renew_cookie(&self, cookie: &Cookie<'_>, expiry: Duration) -> Cookie<'static> {
        self.build_cookie(cookie.value().to_string(), expiry)
    }

    pub(crate) fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((self.name.clone(), ""))
            .http_only(true)
            .path(self.path.clone())
            .build();
        if let Some(domain) = self.domain.clone() {
            cookie.set_domain(domain);
        }
        cookie.make_removal();
        cookie
    }

    /// `Expires` is left unset when now + expiry is past the representable date range; `Max-Age`
    /// alone then carries the lifetime.
    fn apply_expiry(&self, cookie: &mut Cookie<'static>, expiry: Duration) {
        let max_age = std::cmp::max(expiry, Duration::ZERO);
        cookie.set_max_age(max_age);
        if let Some(expires) = OffsetDateTime::now_utc().checked_add(max_age) {
            cookie.set_expires(expires);
        }
    }
}
