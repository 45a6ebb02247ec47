//! Error types for the m-of-n key exchange

use thiserror::Error;

/// Result type alias for key exchange operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running the key exchange
#[derive(Debug, Error)]
pub enum Error {
    /// Threshold/party count combination cannot form an m-of-n scheme
    #[error("Invalid parameters: threshold {threshold} of {parties} parties")]
    InvalidParameters { threshold: usize, parties: usize },

    /// Invalid party configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid party ID
    #[error("Invalid party ID: {0}")]
    InvalidPartyId(usize),

    /// Cryptographic operation failed
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Restored keys disagree with the ground truth
    #[error("Verification failed: {0}")]
    VerificationFailed(String),
}
