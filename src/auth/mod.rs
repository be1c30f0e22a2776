//! Authentication module for session token verification.
//!
//! The server never issues sessions; it verifies bearer JWTs minted by the
//! institution's identity provider and derives the caller's roles from
//! their claims.

mod extractor;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::models::{Principal, Role, SessionClaims};

pub use extractor::SessionAuth;

/// Verifier for identity-provider session tokens.
///
/// # Security
/// - The HMAC secret is wrapped in `SecretString`; `Debug` prints
///   `[REDACTED]` and memory is zeroized on drop
/// - Issuer and expiry are validated on every request
#[derive(Clone)]
pub struct SessionVerifier {
    secret: SecretString,
    issuer: String,
}

impl SessionVerifier {
    /// Create a verifier for the given secret and expected issuer.
    pub fn new(secret: SecretString, issuer: String) -> Self {
        Self { secret, issuer }
    }

    /// Verify a bearer token and derive the caller's principal.
    pub fn verify(&self, token: &str) -> Result<Principal, String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());

        let data = jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
            .map_err(|e| format!("Invalid session token: {}", e))?;

        let claims = data.claims;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| "Invalid session token: malformed subject".to_string())?;

        let roles: Vec<Role> = claims
            .roles
            .iter()
            .filter_map(|r| Role::parse(r))
            .collect();

        if roles.is_empty() {
            return Err("Session token carries no recognized roles".to_string());
        }

        Ok(Principal {
            user_id,
            email: claims.email,
            display_name: claims.name,
            roles,
        })
    }
}

impl std::fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionVerifier([REDACTED], issuer={})", self.issuer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(secret: &str, iss: &str, roles: Vec<&str>, exp_offset: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: Uuid::new_v4().to_string(),
            iss: iss.to_string(),
            exp: (now + exp_offset) as usize,
            iat: now as usize,
            email: "user@example.edu".to_string(),
            name: "Test User".to_string(),
            roles: roles.into_iter().map(String::from).collect(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn verifier(secret: &str) -> SessionVerifier {
        SessionVerifier::new(SecretString::from(secret.to_string()), "sso".to_string())
    }

    #[test]
    fn test_valid_token_yields_principal() {
        let v = verifier("secret");
        let principal = v
            .verify(&token("secret", "sso", vec!["student"], 3600))
            .unwrap();
        assert!(principal.is_student());
        assert!(!principal.is_coordinator());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let v = verifier("secret");
        assert!(v.verify(&token("other", "sso", vec!["student"], 3600)).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let v = verifier("secret");
        assert!(
            v.verify(&token("secret", "elsewhere", vec!["student"], 3600))
                .is_err()
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let v = verifier("secret");
        assert!(
            v.verify(&token("secret", "sso", vec!["student"], -3600))
                .is_err()
        );
    }

    #[test]
    fn test_unknown_roles_only_rejected() {
        let v = verifier("secret");
        assert!(v.verify(&token("secret", "sso", vec!["dean"], 3600)).is_err());
    }
}
