//! Credential store consulted at login.

use super::identity::SubjectIdentity;

/// Checks a username/password pair and names the subject it belongs to.
pub trait CredentialStore: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> Option<SubjectIdentity>;
}

/// A single configured account.
#[derive(Debug, Clone)]
pub struct StaticAccount {
    pub username: String,
    pub password: String,
    pub subject: SubjectIdentity,
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();
    if a_bytes.len() != b_bytes.len() {
        return false;
    }
    a_bytes
        .iter()
        .zip(b_bytes)
        .fold(0u8, |diff, (x, y)| diff | (x ^ y))
        == 0
}

impl CredentialStore for StaticAccount {
    fn authenticate(&self, username: &str, password: &str) -> Option<SubjectIdentity> {
        // Both comparisons always run.
        let user_ok = constant_time_eq(username, &self.username);
        let pass_ok = !self.password.is_empty() && constant_time_eq(password, &self.password);
        (user_ok && pass_ok).then(|| self.subject.clone())
    }
}
