//! Stateless cookie sessions.
//!
//! The whole session lives in a cookie: a [`SessionManager`] decodes it into a [`SessionHandle`]
//! at the start of a request, and [`SessionHandle::save`] encodes it into a fresh `Set-Cookie`
//! at the end. There is no server-side storage.
//!
//! The host decides the session ID and when to call [`SessionManager::create`],
//! [`SessionManager::update`], [`SessionManager::delete`] and [`SessionManager::check`]. Every
//! operation takes an explicit [`Transaction`] describing the request/response pair; the
//! [`TransactionLayer`] provides one per request for tower/axum services.
//!
//! A missing request, response or cookie is never an error. A cookie that is present but fails
//! to decode always is.
//!
//! # Security
//! The default codec signs cookies (`signed` feature) and binds each cookie to its session ID.
//! The `private` feature additionally encrypts them.
//!
//! The `dangerous-plaintext` feature enables an unprotected codec. This offers **no tamper
//! resistance** and should only be used for **testing and debugging**. Never enable or use this in
//! a real application: a client can trivially edit the cookie to escalate privileges and
//! impersonate other users (including staff/admin).

mod codec;
mod config;
mod error;
pub mod format;
mod handle;
pub mod layer;
mod manager;
mod protection;
mod transaction;

pub use tower_cookies::cookie::SameSite;

#[cfg(any(feature = "signed", feature = "private"))]
pub use tower_cookies::Key;

pub use crate::codec::{
    CodecLimits, DEFAULT_MAX_AGE, DEFAULT_MAX_LENGTH, SecureCookieCodec, SessionCodec,
};
pub use crate::config::{CookieSessionConfig, DEFAULT_COOKIE_NAME};
pub use crate::error::{Error, Result};
pub use crate::handle::{SessionHandle, SessionValues};
pub use crate::layer::TransactionLayer;
pub use crate::manager::SessionManager;
pub use crate::protection::CookieProtection;
pub use crate::transaction::{HeaderCookies, RequestCookies, ResponseCookies, Transaction};

#[cfg(feature = "signed")]
pub use crate::protection::SignedCookie;

#[cfg(feature = "private")]
pub use crate::protection::PrivateCookie;

#[cfg(feature = "dangerous-plaintext")]
pub use crate::protection::PlaintextCookie;
