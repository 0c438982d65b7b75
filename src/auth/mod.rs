//! Session authentication.
//!
//! - `identity`: signs and verifies JWT session credentials
//! - `account`: the credential store checked at login
//! - `session`: the gate that turns an inbound credential into a subject
//!
//! # Security notes
//! - Logout is stateless. A credential issued before logout stays valid until
//!   it expires; there is no server-side revocation list.
//! - There is one tier of access: an authenticated subject may read and write
//!   its own task collection and nothing else.

pub mod account;
pub mod identity;
pub mod session;

pub use account::{CredentialStore, StaticAccount};
pub use identity::{IdentityVerifier, SignedCredential, SubjectIdentity};
pub use session::{CredentialSource, SessionGate};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid or expired session")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Failed to sign session credential: {0}")]
    Signing(String),
}
