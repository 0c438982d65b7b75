//! Signed session credentials (HS256 JWT).

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Opaque identifier taken from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectIdentity(String);

impl SubjectIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject identifier, carried through verbatim
    sub: String,
    /// Issued-at unix seconds
    iat: i64,
    /// Expiration unix seconds
    exp: i64,
}

/// A freshly issued credential.
#[derive(Debug, Clone)]
pub struct SignedCredential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies credentials under one process-wide secret.
///
/// Verification is a pure function of the token, the secret and the clock.
#[derive(Clone)]
pub struct IdentityVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl IdentityVerifier {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, subject: &SubjectIdentity) -> Result<SignedCredential, AuthError> {
        self.issue_at(subject, Utc::now())
    }

    fn issue_at(
        &self,
        subject: &SubjectIdentity,
        now: DateTime<Utc>,
    ) -> Result<SignedCredential, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Signing("Credential expiry out of range".to_string()))?;
        let claims = Claims {
            sub: subject.as_str().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))?;
        Ok(SignedCredential { token, expires_at })
    }

    /// Any failure (bad signature, malformed token, expiry) is `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<SubjectIdentity, AuthError> {
        let validation = Validation::default();
        match jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(SubjectIdentity(data.claims.sub)),
            Err(e) => {
                tracing::debug!("Rejected session credential: {}", e);
                Err(AuthError::InvalidToken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier(secret: &str) -> IdentityVerifier {
        IdentityVerifier::new(secret, Duration::hours(24))
    }

    #[test]
    fn test_issue_then_verify() {
        let v = verifier("secret");
        let subject = SubjectIdentity::new("1");
        let credential = v.issue(&subject).unwrap();
        assert_eq!(v.verify(&credential.token), Ok(subject));
    }

    #[test]
    fn test_expiry_window() {
        let v = verifier("secret");
        let now = Utc::now();
        let credential = v.issue_at(&SubjectIdentity::new("1"), now).unwrap();
        assert_eq!(credential.expires_at - now, Duration::hours(24));
    }

    #[test]
    fn test_oversized_ttl_is_signing_error() {
        let v = IdentityVerifier::new("secret", Duration::milliseconds(i64::MAX));
        assert!(matches!(
            v.issue(&SubjectIdentity::new("1")),
            Err(AuthError::Signing(_))
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let credential = verifier("one").issue(&SubjectIdentity::new("1")).unwrap();
        assert_eq!(
            verifier("two").verify(&credential.token),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_expired_rejected() {
        let v = verifier("secret");
        let issued = Utc::now() - Duration::days(2);
        let credential = v.issue_at(&SubjectIdentity::new("1"), issued).unwrap();
        assert_eq!(v.verify(&credential.token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_garbage_rejected() {
        let v = verifier("secret");
        assert_eq!(v.verify(""), Err(AuthError::InvalidToken));
        assert_eq!(v.verify("not.a.jwt"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_subject_passed_through_verbatim() {
        let v = verifier("secret");
        let subject = SubjectIdentity::new("no-such-user");
        let credential = v.issue(&subject).unwrap();
        assert_eq!(v.verify(&credential.token).unwrap().as_str(), "no-such-user");
    }
}
