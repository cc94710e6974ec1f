//! JWT payload inspection
//!
//! The client never verifies signatures (it holds no key); it only reads the
//! `exp` claim to decide whether a stored token is still worth sending.
//! Every failure is treated as "expired".

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Claims the client cares about
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiration time (Unix timestamp, seconds)
    pub exp: Option<i64>,
    /// Issued at (Unix timestamp, seconds)
    pub iat: Option<i64>,
    /// Subject
    pub sub: Option<String>,
}

/// Reasons a token payload cannot be read
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token is empty")]
    Empty,

    #[error("Token has {0} segments, expected 3")]
    SegmentCount(usize),

    #[error("Payload length {0} cannot be base64")]
    PayloadLength(usize),

    #[error("Payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token has no exp claim")]
    MissingExp,
}

/// Pad a base64url segment with `=` up to a multiple of 4.
///
/// A remainder of 1 can never come from valid base64 and is rejected.
pub fn pad_base64(segment: &str) -> Result<String, TokenError> {
    match segment.len() % 4 {
        0 => Ok(segment.to_string()),
        1 => Err(TokenError::PayloadLength(segment.len())),
        rem => {
            let mut padded = String::with_capacity(segment.len() + 4 - rem);
            padded.push_str(segment);
            padded.extend(std::iter::repeat('=').take(4 - rem));
            Ok(padded)
        }
    }
}

/// Decode the second dot-delimited segment of `token`
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    if token.is_empty() {
        return Err(TokenError::Empty);
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::SegmentCount(segments.len()));
    }

    let payload = pad_base64(segments[1].trim_end_matches('='))?;
    let bytes = URL_SAFE.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Instant at which `token` expires
pub fn expires_at(token: &str) -> Result<DateTime<Utc>, TokenError> {
    let exp = decode_claims(token)?.exp.ok_or(TokenError::MissingExp)?;
    Ok(DateTime::from_timestamp(exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC))
}

/// Whether `token` is expired at `now`. Unreadable tokens count as expired.
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    let claims = match decode_claims(token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Treating unreadable token as expired: {}", e);
            return true;
        }
    };

    let Some(exp) = claims.exp else {
        debug!("Treating token without exp claim as expired");
        return true;
    };

    now.timestamp_millis() > exp.saturating_mul(1000)
}

/// Whether `token` is expired right now
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}
