//! Response envelope decoding.
//!
//! The backend answers most endpoints with a `{code, msg, data}` envelope,
//! but some deployments return a simplified `{success, message}` shape for
//! write acks, and a few raw payloads have been observed. Decoding is an
//! explicit ordered list of attempts rather than nested optional casts:
//! richest shape first, raw payload last. Only after every decoder has been
//! tried does a shape mismatch surface as [`RippleError::Decode`].

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::api::types::ReactionAck;
use crate::ripple::error::{Result, RippleError};

/// The envelope code the backend uses for success.
pub(crate) const CODE_OK: i64 = 0;

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SimpleEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn server_error<T>(code: i64, msg: Option<String>) -> Result<T> {
    Err(RippleError::Server {
        code,
        message: msg.unwrap_or_else(|| "request rejected".to_string()),
    })
}

/// Decodes a data-bearing response: `{code, msg, data}` first, raw payload
/// second.
pub(crate) fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T> {
    if let Ok(envelope) = serde_json::from_str::<Envelope<T>>(body) {
        if envelope.code != CODE_OK {
            return server_error(envelope.code, envelope.msg);
        }
        if let Some(data) = envelope.data {
            return Ok(data);
        }
        return Err(RippleError::Decode(
            "success envelope without data".to_string(),
        ));
    }

    serde_json::from_str::<T>(body)
        .map_err(|e| RippleError::Decode(format!("unrecognized response shape: {e}")))
}

/// Decodes a write-ack response: full envelope, then the simplified
/// `{success, message}` fallback, then a raw ack object.
pub(crate) fn decode_ack(body: &str) -> Result<ReactionAck> {
    if let Ok(envelope) = serde_json::from_str::<Envelope<ReactionAck>>(body) {
        if envelope.code != CODE_OK {
            return server_error(envelope.code, envelope.msg);
        }
        return Ok(envelope.data.unwrap_or_default());
    }

    if let Ok(simple) = serde_json::from_str::<SimpleEnvelope>(body) {
        if !simple.success {
            return server_error(-1, simple.message);
        }
        return Ok(ReactionAck::default());
    }

    serde_json::from_str::<ReactionAck>(body)
        .map_err(|e| RippleError::Decode(format!("unrecognized ack shape: {e}")))
}
