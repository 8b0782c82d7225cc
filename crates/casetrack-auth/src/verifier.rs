//! Bearer token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};

use casetrack_core::AccessTokenClaims;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Validates access tokens issued by the external identity provider.
///
/// Signature, issuer, audience, and expiry are all enforced here; role
/// checks happen later against the extracted claims.
#[derive(Debug)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Creates a verifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` when no key material is
    /// configured or the RSA PEM cannot be parsed.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let (decoding_key, algorithm) = match (&config.hs256_secret, &config.rsa_public_key_pem) {
            (Some(secret), None) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
            (None, Some(pem)) => (
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AuthError::configuration(format!("Invalid RSA public key: {e}")))?,
                Algorithm::RS256,
            ),
            (Some(_), Some(_)) => {
                return Err(AuthError::configuration(
                    "hs256_secret and rsa_public_key_pem are mutually exclusive",
                ));
            }
            (None, None) => {
                return Err(AuthError::configuration(
                    "No token validation key configured",
                ));
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Decodes and validates a bearer token, returning its claims.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, AuthError> {
        let data = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::invalid_token(e.to_string()),
            })?;

        Ok(data.claims)
    }
}
