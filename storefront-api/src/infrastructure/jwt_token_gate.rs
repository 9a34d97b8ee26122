//! HS256 bearer tokens backed by `jsonwebtoken`.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application_service::{AuthError, TokenGate};
use crate::config::JwtConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub iat: usize,
    pub exp: usize,
}

pub struct JwtTokenGate {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    /// `None` when the configured lifetime does not fit a `TimeDelta`.
    expiry: Option<chrono::TimeDelta>,
}

impl JwtTokenGate {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);

        Self {
            encoding_key: EncodingKey::from_secret(config.key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.key.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            expiry: chrono::TimeDelta::try_minutes(config.expiry_minutes),
        }
    }
}

impl TokenGate for JwtTokenGate {
    fn issue(&self, subject: &str) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let expires_at = self
            .expiry
            .and_then(|expiry| now.checked_add_signed(expiry))
            .ok_or_else(|| {
                tracing::error!(%subject, "token expiry is out of range");
                AuthError::Issuance("token expiry is out of range".to_string())
            })?;
        let claims = Claims {
            sub: subject.to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(%subject, error = %e, "token signing failed");
            AuthError::Issuance(e.to_string())
        })
    }

    fn verify(&self, token: &str) -> Result<String, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                tracing::warn!(error = %e, "bearer token rejected");
                AuthError::InvalidToken(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            key: "test-signing-key-with-enough-length".into(),
            issuer: "storefront-api".into(),
            audience: "storefront-clients".into(),
            expiry_minutes: 60,
        }
    }

    #[test]
    fn issued_token_verifies_to_subject() {
        let gate = JwtTokenGate::new(&config());
        let token = gate.issue("string").unwrap();
        assert_eq!(gate.verify(&token).unwrap(), "string");
    }

    #[test]
    fn each_token_carries_a_fresh_jti() {
        let gate = JwtTokenGate::new(&config());
        assert_ne!(gate.issue("a").unwrap(), gate.issue("a").unwrap());
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let other = JwtTokenGate::new(&JwtConfig {
            key: "a-completely-different-signing-key".into(),
            ..config()
        });
        let token = other.issue("string").unwrap();

        let gate = JwtTokenGate::new(&config());
        assert!(matches!(gate.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn token_for_other_audience_is_rejected() {
        let other = JwtTokenGate::new(&JwtConfig {
            audience: "someone-else".into(),
            ..config()
        });
        let token = other.issue("string").unwrap();

        let gate = JwtTokenGate::new(&config());
        assert!(gate.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = JwtTokenGate::new(&JwtConfig {
            expiry_minutes: -10,
            ..config()
        });
        let token = expired.issue("string").unwrap();
        assert!(expired.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let gate = JwtTokenGate::new(&config());
        assert!(gate.verify("not.a.jwt").is_err());
    }

    #[test]
    fn oversized_expiry_fails_issuance_instead_of_panicking() {
        for expiry_minutes in [1_000_000_000_000, i64::MAX] {
            let gate = JwtTokenGate::new(&JwtConfig {
                expiry_minutes,
                ..config()
            });
            assert!(matches!(gate.issue("string"), Err(AuthError::Issuance(_))));
        }
    }
}
