//! Read-only inspection of Verdent session tokens
//!
//! Session tokens are HS256 JWTs. Only the payload is decoded; the
//! signature is not checked.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VerdentClientError};

/// Claims carried by a session token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtPayload {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub version: Option<i32>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Expiry, unix seconds
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub nbf: Option<i64>,
}

/// Decode the payload segment of `header.payload.signature`
pub fn parse_payload(token: &str) -> Result<JwtPayload> {
    let parts: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = parts.as_slice() else {
        return Err(VerdentClientError::InvalidToken(format!(
            "expected 3 segments, got {}",
            parts.len()
        )));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| VerdentClientError::InvalidToken(format!("bad base64: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| VerdentClientError::InvalidToken(format!("bad payload: {}", e)))
}

/// Expiry time of a session token, if it can be read
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    match parse_payload(token) {
        Ok(payload) => payload
            .exp
            .and_then(|exp| DateTime::from_timestamp(exp, 0)),
        Err(e) => {
            debug!("Could not read token expiry: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // {"user_id":42,"version":0,"token_type":"access","exp":1765709429,"iat":1763117429}
    const TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
        eyJ1c2VyX2lkIjo0MiwidmVyc2lvbiI6MCwidG9rZW5fdHlwZSI6ImFjY2VzcyIsImV4cCI6MTc2NTcwOTQyOSwiaWF0IjoxNzYzMTE3NDI5fQ.\
        c2lnbmF0dXJl";

    #[test]
    fn test_parse_payload() {
        let payload = parse_payload(TOKEN).unwrap();
        assert_eq!(payload.user_id, Some(42));
        assert_eq!(payload.token_type.as_deref(), Some("access"));
        assert_eq!(payload.exp, Some(1765709429));
        assert_eq!(payload.nbf, None);
    }

    #[test]
    fn test_token_expiry() {
        let expiry = token_expiry(TOKEN).unwrap();
        assert_eq!(expiry.to_rfc3339(), "2025-12-14T10:50:29+00:00");
    }

    #[test]
    fn test_wrong_segment_count() {
        let err = parse_payload("abc.def").unwrap_err();
        assert!(matches!(err, VerdentClientError::InvalidToken(_)));
        assert!(token_expiry("opaque-token").is_none());
    }

    #[test]
    fn test_bad_payload() {
        let err = parse_payload("a.!!!.c").unwrap_err();
        assert!(matches!(err, VerdentClientError::InvalidToken(_)));
    }
}
