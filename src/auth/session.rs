//! Session gate: credential in, subject identifier out.

use std::sync::Arc;

use super::account::CredentialStore;
use super::identity::{IdentityVerifier, SignedCredential, SubjectIdentity};
use super::AuthError;

/// Somewhere a credential may or may not be present (cookie, header, ...).
pub trait CredentialSource {
    fn credential(&self) -> Option<String>;
}

impl CredentialSource for Option<String> {
    fn credential(&self) -> Option<String> {
        self.clone()
    }
}

impl CredentialSource for &str {
    fn credential(&self) -> Option<String> {
        Some(self.to_string())
    }
}

#[derive(Clone)]
pub struct SessionGate {
    verifier: IdentityVerifier,
    accounts: Arc<dyn CredentialStore>,
}

impl SessionGate {
    pub fn new(verifier: IdentityVerifier, accounts: Arc<dyn CredentialStore>) -> Self {
        Self { verifier, accounts }
    }

    pub fn verifier(&self) -> &IdentityVerifier {
        &self.verifier
    }

    /// Resolve the caller's subject. Authenticated means authorized for its own collection.
    pub fn authorize<S: CredentialSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<SubjectIdentity, AuthError> {
        let token = source
            .credential()
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::Unauthenticated)?;
        self.verifier.verify(token.trim())
    }

    pub fn login(&self, username: &str, password: &str) -> Result<SignedCredential, AuthError> {
        let subject = self
            .accounts
            .authenticate(username.trim(), password)
            .ok_or(AuthError::InvalidCredentials)?;
        let credential = self.verifier.issue(&subject)?;
        tracing::info!(subject = %subject, "Issued session credential");
        Ok(credential)
    }

    /// Nothing is recorded server-side; the caller discards its credential.
    pub fn logout(&self) {
        tracing::debug!("Session logout requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticAccount;
    use chrono::Duration;

    fn gate(secret: &str) -> SessionGate {
        SessionGate::new(
            IdentityVerifier::new(secret, Duration::hours(24)),
            Arc::new(StaticAccount {
                username: "admin".to_string(),
                password: "password123".to_string(),
                subject: SubjectIdentity::new("1"),
            }),
        )
    }

    #[test]
    fn test_no_credential() {
        let gate = gate("secret");
        assert_eq!(gate.authorize(&None::<String>), Err(AuthError::Unauthenticated));
        assert_eq!(
            gate.authorize(&Some(String::new())),
            Err(AuthError::Unauthenticated)
        );
    }

    #[test]
    fn test_login_then_authorize() {
        let gate = gate("secret");
        let credential = gate.login("admin", "password123").unwrap();
        assert_eq!(
            gate.authorize(&credential.token.as_str()),
            Ok(SubjectIdentity::new("1"))
        );
    }

    #[test]
    fn test_login_rejects_bad_password() {
        let gate = gate("secret");
        assert!(matches!(
            gate.login("admin", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_foreign_credential_rejected() {
        let credential = gate("other").login("admin", "password123").unwrap();
        assert_eq!(
            gate("secret").authorize(&Some(credential.token)),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_logout_is_stateless() {
        let gate = gate("secret");
        let credential = gate.login("admin", "password123").unwrap();
        gate.logout();
        gate.logout();
        assert!(gate.authorize(&Some(credential.token)).is_ok());
    }
}
