//! Live credential verification.

mod http_verifier;

pub use http_verifier::HttpKeyVerifier;
