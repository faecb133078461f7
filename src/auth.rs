//! Bearer-token verification.
//!
//! The verifier inspects the `Authorization` header, checks the token's
//! HS256 signature and expiry against the shared secret, and produces an
//! [`IdentityClaim`] for the request. Every failure path — header absent,
//! not `Bearer`-shaped, bad signature, expired, malformed payload — rejects
//! the request; there is no log-and-continue path.
//!
//! Verification is a pure function of the token and the key built at
//! startup: no I/O, no shared mutable state, safe under arbitrary
//! concurrency.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// The payload embedded in a credential by the issuing authority.
///
/// The gateway only verifies tokens, never mints them.
#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    /// Subject identifier.
    pub sub: String,
    /// Display name.
    pub name: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: u64,
}

/// Verified identity attributes, attached to a request after successful
/// token verification.
///
/// Lives for one request; never persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdentityClaim {
    pub subject_id: String,
    pub display_name: String,
}

/// Why verification failed.
///
/// The distinction exists for logging only — callers must collapse both
/// variants into one user-visible 401 so the response never acts as an
/// oracle for what exactly was wrong with the credential.
#[derive(Debug, Eq, PartialEq)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header on the request.
    Missing,
    /// Bad signature, expired, or malformed payload.
    Invalid,
}

/// Verifies bearer credentials against the shared secret.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Builds the decoding key and validation rules once, at startup.
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verifies the `Authorization` header value of a request.
    ///
    /// # Errors
    ///
    /// [`AuthError::Missing`] when the header is absent or not of the form
    /// `Bearer <token>`; [`AuthError::Invalid`] when the token fails
    /// signature, expiry, or payload checks.
    pub fn verify(&self, authorization: Option<&str>) -> Result<IdentityClaim, AuthError> {
        let token = authorization
            .and_then(|h| h.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Missing)?;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::Invalid)?;

        Ok(IdentityClaim {
            subject_id: data.claims.sub,
            display_name: data.claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &str = "test-secret";

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_secs()
    }

    fn mint(secret: &str, exp: u64) -> String {
        let claims = Claims { sub: "42".to_owned(), name: "alice".to_owned(), exp };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .expect("encode")
    }

    #[test]
    fn missing_header_is_rejected() {
        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(verifier.verify(None), Err(AuthError::Missing));
    }

    #[test]
    fn non_bearer_header_is_rejected() {
        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(
            verifier.verify(Some("Basic dXNlcjpwYXNz")),
            Err(AuthError::Missing)
        );
        assert_eq!(verifier.verify(Some("Bearer ")), Err(AuthError::Missing));
    }

    #[test]
    fn valid_token_yields_embedded_payload() {
        let verifier = TokenVerifier::new(SECRET);
        let header = format!("Bearer {}", mint(SECRET, now() + 3600));
        let claim = verifier.verify(Some(&header)).expect("valid token");
        assert_eq!(claim.subject_id, "42");
        assert_eq!(claim.display_name, "alice");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let verifier = TokenVerifier::new(SECRET);
        let header = format!("Bearer {}", mint("other-secret", now() + 3600));
        assert_eq!(verifier.verify(Some(&header)), Err(AuthError::Invalid));
    }

    #[test]
    fn expired_token_is_rejected() {
        let verifier = TokenVerifier::new(SECRET);
        // Past the default validation leeway.
        let header = format!("Bearer {}", mint(SECRET, now().saturating_sub(600)));
        assert_eq!(verifier.verify(Some(&header)), Err(AuthError::Invalid));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let verifier = TokenVerifier::new(SECRET);
        let mut token = mint(SECRET, now() + 3600);
        token.truncate(token.len() - 4);
        let header = format!("Bearer {token}");
        assert_eq!(verifier.verify(Some(&header)), Err(AuthError::Invalid));
    }
}
