//! Credential verifiers — the two authentication schemes behind one trait.
//!
//! The guard tries verifiers in a fixed priority order and accepts the
//! first that validates: the gateway's own signed session cookie first,
//! then a third-party provider-issued token. Either is sufficient to
//! reach the `Authenticated` state.

use std::collections::HashMap;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::Deserialize;

use crate::model::{Claims, Role};
use crate::service::token::{Rejected, SessionCodec};

/// One authentication scheme. Implementations inspect the request
/// cookies and either produce uniform [`Claims`] or a [`Rejected`]
/// reason.
pub trait CredentialVerifier: Send + Sync {
    /// Short scheme name for logging.
    fn scheme(&self) -> &'static str;

    /// Verify credentials present in the request cookies.
    fn verify(&self, cookies: &HashMap<String, String>) -> Result<Claims, Rejected>;
}

/// Verifies the gateway's own signed session cookie.
pub struct SessionCookieVerifier {
    codec: Arc<SessionCodec>,
    cookie_name: String,
}

impl SessionCookieVerifier {
    pub fn new(codec: Arc<SessionCodec>, cookie_name: &str) -> Self {
        Self {
            codec,
            cookie_name: cookie_name.to_string(),
        }
    }
}

impl CredentialVerifier for SessionCookieVerifier {
    fn scheme(&self) -> &'static str {
        "session-cookie"
    }

    fn verify(&self, cookies: &HashMap<String, String>) -> Result<Claims, Rejected> {
        let token = cookies.get(&self.cookie_name).ok_or(Rejected::Missing)?;
        self.codec.verify(token)
    }
}

/// Claims shape of a provider-issued token. Providers assert identity
/// only; the mapped role is always USER.
#[derive(Debug, Deserialize)]
struct ProviderClaims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Verifies a third-party provider-issued token cookie against the
/// provider's shared secret.
pub struct ProviderTokenVerifier {
    decoding: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl ProviderTokenVerifier {
    pub fn new(provider_secret: &str, cookie_name: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            decoding: DecodingKey::from_secret(provider_secret.as_bytes()),
            validation,
            cookie_name: cookie_name.to_string(),
        }
    }
}

impl CredentialVerifier for ProviderTokenVerifier {
    fn scheme(&self) -> &'static str {
        "provider-token"
    }

    fn verify(&self, cookies: &HashMap<String, String>) -> Result<Claims, Rejected> {
        let token = cookies.get(&self.cookie_name).ok_or(Rejected::Missing)?;

        match decode::<ProviderClaims>(token, &self.decoding, &self.validation) {
            Ok(data) => Ok(Claims {
                sub: data.claims.sub,
                email: data.claims.email,
                role: Role::User,
                iat: data.claims.iat,
                exp: data.claims.exp,
            }),
            Err(e) => Err(match e.kind() {
                ErrorKind::InvalidSignature => Rejected::BadSignature,
                ErrorKind::ExpiredSignature => Rejected::Expired,
                _ => Rejected::Malformed,
            }),
        }
    }
}
