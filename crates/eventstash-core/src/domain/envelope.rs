//! BlobEnvelope - ストアに保存される値
//!
//! A payload is stored either bare (`text/plain`) or wrapped together with the
//! subset of request headers worth replaying on read: `content-type` and every
//! `x-*` header. Everything else is dropped on purpose.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Header name -> value, as received (no case folding).
pub type Headers = BTreeMap<String, String>;

pub const CONTENT_TYPE: &str = "content-type";
pub const TEXT_PLAIN: &str = "text/plain";

/// Whether a request header survives into the stored envelope.
///
/// Exact match on `content-type`, or an `x-` prefix. Case-sensitive: the
/// transport hands headers over already lowercased.
pub fn is_preserved_header(name: &str) -> bool {
    name == CONTENT_TYPE || name.starts_with("x-")
}

/// Copy the preserved subset of `headers`, keys and values verbatim.
pub fn select_headers<'a, I>(headers: I) -> Headers
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    headers
        .into_iter()
        .filter(|(name, _)| is_preserved_header(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// The stored value.
///
/// Serialized untagged so a byte-oriented backend sees either a bare byte
/// sequence or a `{ "c": .., "h": .. }` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlobEnvelope {
    /// Payload plus its preserved headers.
    Wrapped {
        #[serde(rename = "c")]
        content: Bytes,
        #[serde(rename = "h")]
        headers: Headers,
    },

    /// Bare payload; implies `content-type: text/plain`.
    Raw(Bytes),
}

impl BlobEnvelope {
    /// Build the stored form of a write.
    ///
    /// Returns `Raw` only when the preserved `content-type` is exactly
    /// `text/plain`; any parameters (`; charset=..`) keep it wrapped.
    pub fn encode(payload: Bytes, request_headers: &Headers) -> Self {
        let headers = select_headers(request_headers);
        if headers.get(CONTENT_TYPE).map(String::as_str) == Some(TEXT_PLAIN) {
            Self::Raw(payload)
        } else {
            Self::Wrapped {
                content: payload,
                headers,
            }
        }
    }

    /// Split a stored value into response body and response headers.
    pub fn decode(self) -> (Bytes, Headers) {
        match self {
            Self::Wrapped { content, headers } => (content, headers),
            Self::Raw(bytes) => {
                let mut headers = Headers::new();
                headers.insert(CONTENT_TYPE.to_string(), TEXT_PLAIN.to_string());
                (bytes, headers)
            }
        }
    }
}
