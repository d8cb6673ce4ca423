//! Credential verification with brute-force lockout tracking.

pub mod verifier;

pub use verifier::CredentialVerifier;
