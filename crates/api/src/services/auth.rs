//! Auth gate: bearer credential issuing and verification.
//!
//! The API consumes the auth gate as an interface: a bearer credential maps
//! to a user id plus a role. Credentials are HMAC-SHA256-signed tokens of the
//! form `v1.<user_id>.<role>.<expires_at>.<signature>`; login and signup
//! flows live outside this service. The CLI `token` command mints credentials
//! for operations and testing.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

use copper_lily_core::{UserId, UserRole};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_VERSION: &str = "v1";

/// Errors from credential verification.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token doesn't have the expected `v1.user.role.exp.sig` shape.
    #[error("malformed token")]
    Malformed,

    /// Signature doesn't match the payload.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token was valid once but its expiry has passed.
    #[error("token expired")]
    Expired,
}

impl AuthError {
    /// Message safe to show to API clients.
    #[must_use]
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::Expired => "Credential expired",
            Self::Malformed | Self::InvalidSignature => "Invalid credential",
        }
    }
}

/// The verified identity behind a bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub role: UserRole,
}

/// Issues and verifies bearer credentials.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: SecretString,
}

impl TokenVerifier {
    /// Create a verifier over a signing secret.
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Mint a credential for a user that expires after `ttl`.
    #[must_use]
    pub fn issue(&self, user_id: UserId, role: UserRole, ttl: Duration) -> String {
        let expires_at = (Utc::now() + ttl).timestamp();
        let payload = format!("{TOKEN_VERSION}.{user_id}.{role}.{expires_at}");
        let signature = hex::encode(self.sign(&payload));
        format!("{payload}.{signature}")
    }

    /// Verify a credential and return the identity it carries.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Malformed` for anything that isn't a five-part
    /// `v1` token, `AuthError::InvalidSignature` when the HMAC check fails
    /// (constant-time), and `AuthError::Expired` past the expiry.
    pub fn verify(&self, token: &str) -> Result<AuthContext, AuthError> {
        let parts: Vec<&str> = token.split('.').collect();
        let [version, user_id, role, expires_at, signature] = parts.as_slice() else {
            return Err(AuthError::Malformed);
        };
        if *version != TOKEN_VERSION {
            return Err(AuthError::Malformed);
        }

        let payload = format!("{version}.{user_id}.{role}.{expires_at}");
        let signature = hex::decode(signature).map_err(|_| AuthError::InvalidSignature)?;
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        let expires_at: i64 = expires_at.parse().map_err(|_| AuthError::Malformed)?;
        if Utc::now().timestamp() > expires_at {
            return Err(AuthError::Expired);
        }

        let user_id: i32 = user_id.parse().map_err(|_| AuthError::Malformed)?;
        let role: UserRole = role.parse().map_err(|_| AuthError::Malformed)?;

        Ok(AuthContext {
            user_id: UserId::new(user_id),
            role,
        })
    }

    fn sign(&self, payload: &str) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC can take key of any size")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(SecretString::from("kR8!vm2Qx9#Lp4@Wc7$Tz0&Jh5^Bn3*D"))
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let v = verifier();
        let token = v.issue(UserId::new(42), UserRole::User, Duration::hours(1));
        let ctx = v.verify(&token).expect("valid token");
        assert_eq!(ctx.user_id, UserId::new(42));
        assert_eq!(ctx.role, UserRole::User);
    }

    #[test]
    fn test_admin_role_survives_round_trip() {
        let v = verifier();
        let token = v.issue(UserId::new(1), UserRole::Admin, Duration::hours(1));
        let ctx = v.verify(&token).expect("valid token");
        assert!(ctx.role.is_admin());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let v = verifier();
        let token = v.issue(UserId::new(1), UserRole::User, Duration::hours(-1));
        assert!(matches!(v.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn test_tampered_role_is_rejected() {
        let v = verifier();
        let token = v.issue(UserId::new(1), UserRole::User, Duration::hours(1));
        let forged = token.replace(".user.", ".admin.");
        assert!(matches!(
            v.verify(&forged),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = verifier().issue(UserId::new(1), UserRole::User, Duration::hours(1));
        let other = TokenVerifier::new(SecretString::from("mZ6$qt1Wd8&Ke3@Xs5^Vy9!Gp2#Fn7*A"));
        assert!(matches!(
            other.verify(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            verifier().verify("not-a-token"),
            Err(AuthError::Malformed)
        ));
    }
}
