//! Session token decoding.
//!
//! Responsibility:
//! - Turn the `auth_token` cookie (compact JWT) into a `SessionUser`
//! - Signature check only when a secret is configured (HS256)
//! - Report why a token was rejected (`SessionTokenError`)

use base64::Engine as _;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

// Errors returned while turning an `auth_token` cookie into a session user.
#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("token is not a compact JWS")]
    Malformed,
    #[error("token payload is not valid base64url")]
    PayloadEncoding(#[from] base64::DecodeError),
    #[error("token payload is not a JSON object")]
    PayloadNotObject,
    #[error("token payload is not valid JSON: {0}")]
    PayloadJson(#[from] serde_json::Error),
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("missing or empty 'user_id' claim")]
    MissingUserId,
}

/// Identity of the session owner as carried by the `user_id` claim.
///
/// Issuers put either a string or a number in that claim; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum UserIdClaim {
    Text(String),
    Number(serde_json::Number),
}

/// The part of the session token the handlers care about.
/// Every other claim is ignored.
#[derive(Debug, Clone, Deserialize)]
struct SessionClaims {
    #[serde(default)]
    user_id: Option<UserIdClaim>,
}

/// User decoded from a session token, valid for the current request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: UserId,
}

impl TryFrom<SessionClaims> for SessionUser {
    type Error = SessionTokenError;

    fn try_from(claims: SessionClaims) -> Result<Self, Self::Error> {
        let raw = match claims.user_id.ok_or(SessionTokenError::MissingUserId)? {
            UserIdClaim::Text(s) => s,
            UserIdClaim::Number(n) => n.to_string(),
        };

        // Blank ids are rejected; anything else is passed through unchanged.
        if raw.trim().is_empty() {
            return Err(SessionTokenError::MissingUserId);
        }

        Ok(Self {
            user_id: UserId::new(raw),
        })
    }
}

#[derive(Clone)]
enum Mode {
    // Claims are read straight from the payload segment.
    Unverified,
    Hs256 {
        decoding_key: DecodingKey,
        validation: Validation,
    },
}

/// Decodes `auth_token` cookies into a `SessionUser`.
///
/// - Without a secret the signature is NOT checked; the token is only parsed.
/// - With a secret the token must be a valid HS256 JWS.
/// - `exp` is never enforced: the cookie lifetime is the session lifetime.
#[derive(Clone)]
pub struct SessionDecoder {
    mode: Mode,
}

impl fmt::Debug for SessionDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("SessionDecoder")
            .field("verifies_signature", &self.verifies_signature())
            .finish()
    }
}

impl SessionDecoder {
    pub fn unverified() -> Self {
        Self {
            mode: Mode::Unverified,
        }
    }

    pub fn hs256(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            mode: Mode::Hs256 {
                decoding_key: DecodingKey::from_secret(secret),
                validation,
            },
        }
    }

    pub fn verifies_signature(&self) -> bool {
        matches!(self.mode, Mode::Hs256 { .. })
    }

    pub fn decode(&self, token: &str) -> Result<SessionUser, SessionTokenError> {
        let claims = match &self.mode {
            Mode::Unverified => decode_payload(token)?,
            Mode::Hs256 {
                decoding_key,
                validation,
            } => jsonwebtoken::decode::<SessionClaims>(token, decoding_key, validation)?.claims,
        };

        SessionUser::try_from(claims)
    }
}

fn decode_payload(token: &str) -> Result<SessionClaims, SessionTokenError> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(SessionTokenError::Malformed);
    };

    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(payload)?;

    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    if !value.is_object() {
        return Err(SessionTokenError::PayloadNotObject);
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::Engine as _;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    /// Builds an unsigned-looking compact token around `claims`.
    pub(crate) fn token_for(claims: serde_json::Value) -> String {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = engine.encode(claims.to_string());
        format!("{header}.{payload}.c2lnbmF0dXJl")
    }

    fn signed(claims: serde_json::Value, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn unverified_reads_string_user_id() {
        let user = SessionDecoder::unverified()
            .decode(&token_for(json!({"user_id": "u-42", "name": "ada"})))
            .unwrap();
        assert_eq!(user.user_id.as_str(), "u-42");
    }

    #[test]
    fn unverified_reads_numeric_user_id() {
        let user = SessionDecoder::unverified()
            .decode(&token_for(json!({"user_id": 42})))
            .unwrap();
        assert_eq!(user.user_id, UserId::new("42"));
    }

    #[test]
    fn unverified_ignores_expiry() {
        let user = SessionDecoder::unverified()
            .decode(&token_for(json!({"user_id": "7", "exp": 1})))
            .unwrap();
        assert_eq!(user.user_id.to_string(), "7");
    }

    #[test]
    fn missing_or_blank_user_id_is_rejected() {
        let decoder = SessionDecoder::unverified();
        assert!(matches!(
            decoder.decode(&token_for(json!({"sub": "x"}))),
            Err(SessionTokenError::MissingUserId)
        ));
        assert!(matches!(
            decoder.decode(&token_for(json!({"user_id": "  "}))),
            Err(SessionTokenError::MissingUserId)
        ));
        assert!(matches!(
            decoder.decode(&token_for(json!({"user_id": null}))),
            Err(SessionTokenError::MissingUserId)
        ));
    }

    #[test]
    fn user_id_is_passed_through_untrimmed() {
        let user = SessionDecoder::unverified()
            .decode(&token_for(json!({"user_id": " u1 "})))
            .unwrap();
        assert_eq!(user.user_id.as_str(), " u1 ");
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let decoder = SessionDecoder::unverified();
        assert!(matches!(
            decoder.decode("not-a-jwt"),
            Err(SessionTokenError::Malformed)
        ));
        assert!(matches!(
            decoder.decode("a.b.c.d"),
            Err(SessionTokenError::Malformed)
        ));
        assert!(matches!(
            decoder.decode("a.!!!.c"),
            Err(SessionTokenError::PayloadEncoding(_))
        ));
        assert!(matches!(
            decoder.decode(&token_for(json!(["user_id"]))),
            Err(SessionTokenError::PayloadNotObject)
        ));
    }

    #[test]
    fn hs256_accepts_a_correctly_signed_token() {
        let decoder = SessionDecoder::hs256(b"top-secret");
        assert!(decoder.verifies_signature());

        let user = decoder
            .decode(&signed(json!({"user_id": "u-1"}), b"top-secret"))
            .unwrap();
        assert_eq!(user.user_id.as_str(), "u-1");
    }

    #[test]
    fn hs256_rejects_wrong_secret_and_unsigned_tokens() {
        let decoder = SessionDecoder::hs256(b"top-secret");
        assert!(matches!(
            decoder.decode(&signed(json!({"user_id": "u-1"}), b"other")),
            Err(SessionTokenError::Jwt(_))
        ));
        assert!(decoder.decode(&token_for(json!({"user_id": "u-1"}))).is_err());
    }
}
