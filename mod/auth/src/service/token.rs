//! Session Codec — issue/verify of signed, time-limited session tokens.
//!
//! Tokens are self-contained HS256 JWTs. There is no server-side session
//! table: a token stays valid until its expiry, and "logout" can only
//! clear the client-held cookie. The short TTL bounds that window.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use crate::model::{Claims, Role};
use crate::service::AuthError;

/// Why a credential was rejected.
///
/// Rejection is a normal, expected outcome of verification — never a
/// panic, never an escaping error. `Missing` is only produced by the
/// verifier chain (no credential presented at all); `verify` itself
/// returns one of the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("missing credentials")]
    Missing,

    #[error("bad signature")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("malformed token")]
    Malformed,
}

/// Encodes and verifies session tokens with a process-wide secret.
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionCodec {
    pub fn new(secret: &str) -> Self {
        // Zero leeway: a token is expired the second its exp passes.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a signed token for an identity with `exp = now + ttl`.
    ///
    /// Pure over its inputs plus the secret and the clock.
    pub fn issue(
        &self,
        sub: &str,
        email: &str,
        role: Role,
        ttl_secs: i64,
    ) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            email: email.to_string(),
            role,
            iat: now,
            exp: now + ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token encode failed: {}", e)))
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, Rejected> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(match e.kind() {
                ErrorKind::InvalidSignature => Rejected::BadSignature,
                ErrorKind::ExpiredSignature => Rejected::Expired,
                _ => Rejected::Malformed,
            }),
        }
    }
}
