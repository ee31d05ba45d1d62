use std::{fmt, sync::Arc};

use http::{HeaderMap, HeaderValue, header};
use parking_lot::Mutex;
use tower_cookies::{Cookie, Cookies, cookie::CookieJar};

/// Read access to the cookies sent with the current request.
pub trait RequestCookies: Send + Sync + 'static {
    /// Returns the named cookie if the request carries a well-formed one. Cookies set while
    /// handling the request are not part of it.
    fn cookie(&self, name: &str) -> Option<Cookie<'static>>;
}

/// Write access to the `Set-Cookie` headers of the current response.
pub trait ResponseCookies: Send + Sync + 'static {
    fn set_cookie(&self, cookie: Cookie<'static>);

    /// Emits a removal cookie. Implementations backed by a jar should also forget the cookie so
    /// later reads in the same request no longer see it.
    fn remove_cookie(&self, cookie: Cookie<'static>) {
        self.set_cookie(cookie);
    }
}

fn parse_cookie_headers(headers: &HeaderMap) -> CookieJar {
    let mut jar = CookieJar::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        for cookie in Cookie::split_parse_encoded(value.to_string()).flatten() {
            jar.add_original(cookie);
        }
    }
    jar
}

/// The request side of a [`Cookies`] jar: the cookies the request arrived with, minus those
/// removed since.
#[derive(Clone)]
struct ManagedRequest {
    original: Arc<CookieJar>,
    cookies: Cookies,
}

impl RequestCookies for ManagedRequest {
    fn cookie(&self, name: &str) -> Option<Cookie<'static>> {
        let original = self.original.get(name)?;
        self.cookies.get(name).map(|_| original.clone())
    }
}

impl ResponseCookies for Cookies {
    fn set_cookie(&self, cookie: Cookie<'static>) {
        self.add(cookie);
    }

    fn remove_cookie(&self, cookie: Cookie<'static>) {
        self.remove(cookie);
    }
}

/// A cookie jar seeded from request headers that records the `Set-Cookie` delta.
///
/// Useful for hosts that do not run [`tower_cookies::CookieManager`].
#[derive(Debug, Clone, Default)]
pub struct HeaderCookies {
    original: Arc<CookieJar>,
    jar: Arc<Mutex<CookieJar>>,
}

impl HeaderCookies {
    /// Parses every `Cookie` header. Malformed pairs are skipped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let jar = parse_cookie_headers(headers);

        Self {
            original: Arc::new(jar.clone()),
            jar: Arc::new(Mutex::new(jar)),
        }
    }

    /// Cookies written or removed since the jar was created.
    pub fn delta(&self) -> Vec<Cookie<'static>> {
        self.jar.lock().delta().cloned().collect()
    }

    /// Appends one `Set-Cookie` header per cookie in the delta.
    pub fn write_headers(&self, headers: &mut HeaderMap) {
        for cookie in self.delta() {
            match HeaderValue::from_str(&cookie.encoded().to_string()) {
                Ok(value) => {
                    headers.append(header::SET_COOKIE, value);
                }
                Err(err) => {
                    tracing::warn!(err = %err, name = cookie.name(), "skipping unencodable cookie");
                }
            }
        }
    }
}

impl RequestCookies for HeaderCookies {
    fn cookie(&self, name: &str) -> Option<Cookie<'static>> {
        let original = self.original.get(name)?;
        self.jar.lock().get(name).map(|_| original.clone())
    }
}

impl ResponseCookies for HeaderCookies {
    fn set_cookie(&self, cookie: Cookie<'static>) {
        self.jar.lock().add(cookie);
    }

    fn remove_cookie(&self, cookie: Cookie<'static>) {
        self.jar.lock().remove(cookie);
    }
}

/// The request/response pair a manager operation runs against.
///
/// Either side may be missing. Operations that need a missing side resolve to a no-op rather than
/// an error.
#[derive(Clone, Default)]
pub struct Transaction {
    request: Option<Arc<dyn RequestCookies>>,
    response: Option<Arc<dyn ResponseCookies>>,
}

impl Transaction {
    /// A transaction with neither a request nor a response.
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_request<R: RequestCookies>(mut self, request: R) -> Self {
        self.request = Some(Arc::new(request));
        self
    }

    #[must_use]
    pub fn with_response<W: ResponseCookies>(mut self, response: W) -> Self {
        self.response = Some(Arc::new(response));
        self
    }

    pub fn request(&self) -> Option<&dyn RequestCookies> {
        self.request.as_deref()
    }

    pub fn response(&self) -> Option<&dyn ResponseCookies> {
        self.response.as_deref()
    }

    pub fn has_request(&self) -> bool {
        self.request.is_some()
    }

    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    /// Both sides backed by a [`Cookies`] jar, as inserted by
    /// [`TransactionLayer`](crate::TransactionLayer). `headers` are the request headers the jar
    /// was seeded from.
    pub fn from_cookies(cookies: Cookies, headers: &HeaderMap) -> Self {
        let request = ManagedRequest {
            original: Arc::new(parse_cookie_headers(headers)),
            cookies: cookies.clone(),
        };
        Self::default()
            .with_request(request)
            .with_response(cookies)
    }
}

impl From<HeaderCookies> for Transaction {
    fn from(cookies: HeaderCookies) -> Self {
        Self::default()
            .with_request(cookies.clone())
            .with_response(cookies)
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("request", &self.has_request())
            .field("response", &self.has_response())
            .finish()
    }
}
