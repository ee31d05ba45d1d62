use std::{collections::HashMap, sync::Arc};

use time::Duration;

use crate::{
    codec::{SecureCookieCodec, SessionCodec},
    config::CookieSessionConfig,
    error::Result,
    handle::{SessionHandle, Shared},
    transaction::Transaction,
};

/// Creates, renews and removes cookie-backed sessions.
///
/// The manager holds no per-session state: everything a session knows lives in the cookie. A
/// missing request, response or cookie is treated as "nothing to do" or "new session"; a cookie
/// that is present but fails to decode is an error.
#[derive(Debug)]
pub struct SessionManager<C: SessionCodec> {
    shared: Arc<Shared<C>>,
}

impl<C: SessionCodec> Clone for SessionManager<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

#[cfg(feature = "signed")]
impl SessionManager<SecureCookieCodec<crate::SignedCookie>> {
    /// Cookies are signed with `key`; clients can read but not modify them.
    pub fn signed(key: crate::Key, config: CookieSessionConfig) -> Self {
        let codec = SecureCookieCodec::new(crate::SignedCookie::new(key))
            .with_limits(config.codec_limits());
        Self::with_codec(codec, config)
    }
}

#[cfg(feature = "private")]
impl SessionManager<SecureCookieCodec<crate::PrivateCookie>> {
    /// Cookies are encrypted and authenticated with `key`.
    pub fn private(key: crate::Key, config: CookieSessionConfig) -> Self {
        let codec = SecureCookieCodec::new(crate::PrivateCookie::new(key))
            .with_limits(config.codec_limits());
        Self::with_codec(codec, config)
    }
}

#[cfg(feature = "dangerous-plaintext")]
impl SessionManager<SecureCookieCodec<crate::PlaintextCookie>> {
    /// Cookies carry the payload unprotected. Testing and debugging only.
    pub fn dangerous_plaintext(config: CookieSessionConfig) -> Self {
        let codec =
            SecureCookieCodec::new(crate::PlaintextCookie).with_limits(config.codec_limits());
        Self::with_codec(codec, config)
    }
}

impl<C: SessionCodec> SessionManager<C> {
    /// Uses `codec` as is. Limits in `config` only apply to codecs built by this crate's
    /// constructors.
    pub fn with_codec(codec: C, config: CookieSessionConfig) -> Self {
        Self {
            shared: Arc::new(Shared { codec, config }),
        }
    }

    pub fn config(&self) -> &CookieSessionConfig {
        &self.shared.config
    }

    pub fn codec(&self) -> &C {
        &self.shared.codec
    }

    /// Returns an empty session without looking at the request.
    pub fn create(
        &self,
        tx: &Transaction,
        session_id: impl Into<String>,
        expiry: Duration,
    ) -> SessionHandle<C> {
        SessionHandle::new(
            Arc::clone(&self.shared),
            tx.clone(),
            session_id.into(),
            expiry,
            HashMap::new(),
        )
    }

    /// Loads the session from the request cookie and renews its expiry.
    ///
    /// Returns `Ok(None)` when there is no request, or when a cookie is present but there is no
    /// response to renew it on. A missing cookie falls back to [`create`](Self::create).
    ///
    /// The renewed cookie is written before the value is decoded, so a cookie that fails to
    /// decode still has its expiry extended.
    ///
    /// # Errors
    ///
    /// Returns the codec's error when the cookie is present but cannot be decoded for
    /// `session_id`.
    pub fn update(
        &self,
        tx: &Transaction,
        session_id: impl Into<String>,
        expiry: Duration,
    ) -> Result<Option<SessionHandle<C>>> {
        let session_id = session_id.into();
        let config = &self.shared.config;

        let Some(request) = tx.request() else {
            tracing::debug!(%session_id, "no request available, skipping session update");
            return Ok(None);
        };

        let Some(cookie) = request.cookie(config.name()) else {
            return Ok(Some(self.create(tx, session_id, expiry)));
        };

        let Some(response) = tx.response() else {
            tracing::debug!(%session_id, "no response available, skipping session update");
            return Ok(None);
        };

        response.set_cookie(config.renew_cookie(&cookie, expiry));

        let values = match self.shared.codec.decode(&session_id, cookie.value()) {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(err = %err, %session_id, "cookie session decode failed");
                return Err(err);
            }
        };

        Ok(Some(SessionHandle::new(
            Arc::clone(&self.shared),
            tx.clone(),
            session_id,
            expiry,
            values,
        )))
    }

    /// Clears the session cookie. Deleting an absent session is a no-op.
    pub fn delete(&self, tx: &Transaction, session_id: &str) -> Result<()> {
        if !self.check(tx, session_id) {
            return Ok(());
        }

        let Some(response) = tx.response() else {
            tracing::debug!(%session_id, "no response available, skipping session delete");
            return Ok(());
        };

        response.remove_cookie(self.shared.config.removal_cookie());
        Ok(())
    }

    /// Whether the request carries a cookie with the configured name. The value is not verified.
    ///
    /// A cookie written by [`SessionHandle::save`] earlier in the same request does not count.
    pub fn check(&self, tx: &Transaction, _session_id: &str) -> bool {
        tx.request()
            .is_some_and(|request| request.cookie(self.shared.config.name()).is_some())
    }

    pub fn close(&self) -> Result<()> {
        Ok(())
    }
}
