//! # m-of-n Core
//!
//! Simulation of a round-based m-of-n multisig key exchange over secp256k1.
//!
//! Each of the n participants generates a keypair. The participants then run
//! `n - m` exchange rounds; in each round every participant multiplies the
//! keys it learns from the others by its own secret. Afterwards any m
//! participants hold, between them, every distinct key needed to rebuild the
//! shared spend key, while m - 1 participants do not.
//!
//! This crate provides:
//! - Participant keys and derived-key sets
//! - The staged exchange round
//! - Spend key aggregation and subset restoration
//! - Verification of every m-subset against the full aggregate
//!
//! ## Example
//!
//! ```rust,ignore
//! use mn_core::{protocol, Parallelism, ThresholdConfig};
//!
//! let config = ThresholdConfig::new(2, 3)?;
//! let run = protocol::run(&config, &mut rand::rngs::OsRng, Parallelism::Auto)?;
//! assert!(run.is_verified());
//! ```

pub mod aggregate;
pub mod combinations;
pub mod curve;
pub mod error;
pub mod exchange;
pub mod keys;
pub mod participant;
pub mod protocol;
pub mod restore;

pub use aggregate::{aggregate, Aggregate, SpendKey};
pub use combinations::{binomial, combinations, Combinations};
pub use error::{Error, Result};
pub use keys::{DerivedKey, DerivedKeySet, Keypair};
pub use participant::{Participant, ParticipantStore};
pub use protocol::{run, run_with_keypairs, ProtocolRun, RunReport, ThresholdConfig};
pub use restore::{restore, verify, Parallelism, Restoration, Verification};

/// Index of a participant, `0..n`
pub type PartyId = usize;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

