//! Expiry claim extraction from bearer tokens.
//!
//! The backend issues JWTs; the client only reads the `exp` claim to decide
//! when to drop the session. The signature is not verified here - the server
//! is the authority on token validity, the client just fails closed early.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("malformed token: expected three dot-separated segments")]
    Malformed,

    #[error("invalid payload encoding")]
    InvalidPayload,

    #[error("missing claim: exp")]
    MissingExpiry,
}

/// Decode the payload claims of a compact JWT without verifying the signature.
pub fn decode_claims(token: &str) -> Result<JsonValue, TokenError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::InvalidPayload)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::InvalidPayload)
}

/// Extract the `exp` claim (seconds since epoch) from a bearer token.
pub fn decode_expiry(token: &str) -> Result<i64, TokenError> {
    decode_claims(token)?
        .get("exp")
        .and_then(JsonValue::as_i64)
        .ok_or(TokenError::MissingExpiry)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a structurally valid, unsigned JWT carrying only an `exp` claim.
    pub(crate) fn make_token(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp));
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn test_decode_expiry() {
        assert_eq!(decode_expiry(&make_token(1_700_000_000)).unwrap(), 1_700_000_000);
    }

    #[test]
    fn test_rejects_wrong_segment_count() {
        assert!(matches!(decode_expiry("onlyonesegment"), Err(TokenError::Malformed)));
        assert!(matches!(decode_expiry("two.segments"), Err(TokenError::Malformed)));
        assert!(matches!(
            decode_expiry("a.b.c.d"),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_rejects_garbage_payload() {
        assert!(matches!(
            decode_expiry("head.!!!not-base64!!!.sig"),
            Err(TokenError::InvalidPayload)
        ));
    }

    #[test]
    fn test_rejects_missing_exp() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"somebody"}"#);
        let token = format!("head.{}.sig", payload);
        assert!(matches!(decode_expiry(&token), Err(TokenError::MissingExpiry)));
    }
}
