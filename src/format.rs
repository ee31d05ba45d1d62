//! Helpers for encoding/decoding the session payload carried inside the cookie.
//!
//! This is primarily useful for testing and debugging. The payload is not authenticated on its
//! own; [`SecureCookieCodec`](crate::SecureCookieCodec) seals it before it reaches the wire.
//!
//! Note: the on-wire format is versioned, but it is still considered an implementation detail and
//! may evolve.

use std::collections::HashMap;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const VERSION: u8 = 1;

/// Decoded cookie payload: the owning session ID, the session values and the unix timestamp they
/// were encoded at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub session_id: String,
    pub timestamp: i64,
    pub values: HashMap<String, String>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    v: u8,
    sid: &'a str,
    ts: i64,
    values: &'a HashMap<String, String>,
}

#[derive(Deserialize)]
struct Envelope {
    v: u8,
    sid: String,
    ts: i64,
    #[serde(default)]
    values: Option<HashMap<String, String>>,
}

/// Encode session values into the unsealed payload string.
pub fn encode_payload(
    session_id: &str,
    values: &HashMap<String, String>,
    timestamp: i64,
) -> Result<String> {
    let envelope = EnvelopeRef {
        v: VERSION,
        sid: session_id,
        ts: timestamp,
        values,
    };

    let bytes = serde_json::to_vec(&envelope).map_err(|err| Error::Encode(err.to_string()))?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Decode an unsealed payload string. A payload without values decodes to an empty map.
pub fn decode_payload(value: &str) -> Result<Payload> {
    let bytes = URL_SAFE_NO_PAD
        .decode(value.as_bytes())
        .map_err(|err| Error::Decode(err.to_string()))?;

    let envelope: Envelope =
        serde_json::from_slice(&bytes).map_err(|err| Error::Decode(err.to_string()))?;

    if envelope.v != VERSION {
        return Err(Error::UnsupportedVersion(envelope.v));
    }

    Ok(Payload {
        session_id: envelope.sid,
        timestamp: envelope.ts,
        values: envelope.values.unwrap_or_default(),
    })
}
