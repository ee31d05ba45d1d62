use std::{collections::HashMap, fmt::Debug};

use time::{Duration, OffsetDateTime};

use crate::{
    error::{Error, Result},
    format,
    protection::CookieProtection,
};

pub const DEFAULT_MAX_LENGTH: usize = 4096;
pub const DEFAULT_MAX_AGE: Duration = Duration::days(30);

/// Turns a session's values into an opaque, tamper-evident token and back.
///
/// `session_id` is the authentication context: a token encoded for one session must not decode
/// for another.
pub trait SessionCodec: Debug + Send + Sync + 'static {
    fn encode(&self, session_id: &str, values: &HashMap<String, String>) -> Result<String>;

    fn decode(&self, session_id: &str, token: &str) -> Result<HashMap<String, String>>;
}

/// Limits enforced by [`SecureCookieCodec`] independently of the cookie's own expiry.
///
/// A zero value disables the corresponding check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecLimits {
    pub max_length: usize,
    pub max_age: Duration,
    pub min_age: Duration,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            max_age: DEFAULT_MAX_AGE,
            min_age: Duration::ZERO,
        }
    }
}

/// Codec that stamps the values with the session ID and the current time, serializes them with
/// [`format`] and seals the result with a [`CookieProtection`].
#[derive(Debug, Clone)]
pub struct SecureCookieCodec<P: CookieProtection> {
    protection: P,
    limits: CodecLimits,
}

impl<P: CookieProtection> SecureCookieCodec<P> {
    pub fn new(protection: P) -> Self {
        Self {
            protection,
            limits: CodecLimits::default(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: CodecLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> CodecLimits {
        self.limits
    }

    pub(crate) fn encode_at(
        &self,
        session_id: &str,
        values: &HashMap<String, String>,
        now: i64,
    ) -> Result<String> {
        let payload = format::encode_payload(session_id, values, now)?;
        let token = self
            .protection
            .seal(session_id, payload)
            .ok_or_else(|| Error::Encode("cookie protection failed to seal payload".into()))?;

        let max = self.limits.max_length;
        if max != 0 && token.len() > max {
            return Err(Error::Encode(format!(
                "Cookie value exceeds max length ({} > {})",
                token.len(),
                max
            )));
        }

        Ok(token)
    }

    pub(crate) fn decode_at(
        &self,
        session_id: &str,
        token: &str,
        now: i64,
    ) -> Result<HashMap<String, String>> {
        let max = self.limits.max_length;
        if max != 0 && token.len() > max {
            return Err(Error::TooLong {
                len: token.len(),
                max,
            });
        }

        let payload = self
            .protection
            .open(session_id, token)
            .ok_or(Error::Tampered)?;
        let payload = format::decode_payload(&payload)?;
        if payload.session_id != session_id {
            return Err(Error::Tampered);
        }

        let min_age = self.limits.min_age.whole_seconds();
        if min_age != 0 && payload.timestamp > now.saturating_sub(min_age) {
            return Err(Error::TooNew);
        }

        let max_age = self.limits.max_age.whole_seconds();
        if max_age != 0 && payload.timestamp < now.saturating_sub(max_age) {
            return Err(Error::Expired);
        }

        Ok(payload.values)
    }
}

impl<P: CookieProtection> SessionCodec for SecureCookieCodec<P> {
    fn encode(&self, session_id: &str, values: &HashMap<String, String>) -> Result<String> {
        self.encode_at(session_id, values, OffsetDateTime::now_utc().unix_timestamp())
    }

    fn decode(&self, session_id: &str, token: &str) -> Result<HashMap<String, String>> {
        self.decode_at(session_id, token, OffsetDateTime::now_utc().unix_timestamp())
    }
}
