//! End-to-end protocol run
//!
//! Generates the participants, runs `parties - threshold` exchange rounds,
//! aggregates the ground-truth spend key and verifies every subset.

use crate::aggregate::{aggregate, Aggregate, SpendKey};
use crate::curve;
use crate::exchange::run_rounds;
use crate::keys::Keypair;
use crate::participant::ParticipantStore;
use crate::restore::{verify, Parallelism, Restoration, Verification};
use crate::{Error, PartyId, Result};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Validated m-of-n parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdConfig {
    /// Participants needed to restore the spend key (m)
    threshold: usize,
    /// Total number of participants (n)
    parties: usize,
}

impl ThresholdConfig {
    /// Create a new configuration, requiring `1 <= threshold <= parties`
    pub fn new(threshold: usize, parties: usize) -> Result<Self> {
        if parties == 0 || threshold == 0 || threshold > parties {
            return Err(Error::InvalidParameters { threshold, parties });
        }
        Ok(Self { threshold, parties })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Number of exchange rounds
    pub fn rounds(&self) -> usize {
        self.parties - self.threshold
    }
}

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct ProtocolRun {
    pub config: ThresholdConfig,
    pub store: ParticipantStore,
    pub aggregate: Aggregate,
    pub verification: Verification,
}

/// Run the protocol with freshly generated keypairs
pub fn run<R: CryptoRng + RngCore>(
    config: &ThresholdConfig,
    rng: &mut R,
    parallelism: Parallelism,
) -> Result<ProtocolRun> {
    let store = ParticipantStore::initialize(config.parties, rng);
    execute(config, store, parallelism)
}

/// Run the protocol with fixed keypairs, one per participant
pub fn run_with_keypairs(
    config: &ThresholdConfig,
    keypairs: Vec<Keypair>,
    parallelism: Parallelism,
) -> Result<ProtocolRun> {
    if keypairs.len() != config.parties {
        return Err(Error::InvalidConfig(format!(
            "Expected {} keypairs, got {}",
            config.parties,
            keypairs.len()
        )));
    }
    execute(config, ParticipantStore::from_keypairs(keypairs), parallelism)
}

#[instrument(skip(store))]
fn execute(
    config: &ThresholdConfig,
    mut store: ParticipantStore,
    parallelism: Parallelism,
) -> Result<ProtocolRun> {
    info!(
        threshold = config.threshold,
        n_parties = config.parties,
        rounds = config.rounds(),
        "Starting key exchange"
    );

    run_rounds(&mut store, config.rounds())?;

    let aggregate = aggregate(&store);
    info!(
        unique_keys = aggregate.unique_keys,
        spend_key = aggregate.spend_key.public_hex(),
        "Spend key aggregated"
    );

    let verification = verify(&store, config.threshold, parallelism)?;

    Ok(ProtocolRun {
        config: *config,
        store,
        aggregate,
        verification,
    })
}

impl ProtocolRun {
    /// Every threshold subset restores the key, no smaller subset does, and
    /// the tracked secret matches the key
    pub fn is_verified(&self) -> bool {
        self.verification.all_match()
            && self.verification.below_threshold_fails()
            && self.aggregate.spend_key == self.verification.ground_truth
            && self.aggregate.spend_key.is_consistent()
    }

    /// Fail with [`Error::VerificationFailed`] unless [`Self::is_verified`]
    pub fn ensure_verified(&self) -> Result<()> {
        if let Some(bad) = self.verification.mismatches().next() {
            return Err(Error::VerificationFailed(format!(
                "subset {:?} restored a different spend key",
                bad.indices
            )));
        }
        if !self.verification.below_threshold_fails() {
            return Err(Error::VerificationFailed(format!(
                "{} subsets of size {} restored the spend key",
                self.verification.insufficient_matches,
                self.config.threshold - 1
            )));
        }
        if !self.is_verified() {
            return Err(Error::VerificationFailed(
                "spend key does not match its tracked secret".into(),
            ));
        }
        Ok(())
    }

    /// Hex-encoded summary of the run
    pub fn report(&self) -> RunReport {
        RunReport {
            threshold: self.config.threshold,
            parties: self.config.parties,
            rounds: self.config.rounds(),
            participants: self
                .store
                .iter()
                .map(|p| ParticipantReport {
                    id: p.id(),
                    secret: curve::scalar_hex(p.keypair().secret()),
                    public: curve::point_hex(p.keypair().public()),
                    derived_keys: p.derived().len(),
                })
                .collect(),
            contributors: self
                .aggregate
                .contributors
                .iter()
                .map(|&(id, unique_keys)| ContributorReport { id, unique_keys })
                .collect(),
            unique_keys: self.aggregate.unique_keys,
            spend_key: SpendKeyReport::from(&self.aggregate.spend_key),
            restorations: self
                .verification
                .restorations
                .iter()
                .map(RestorationReport::from)
                .collect(),
            insufficient_checked: self.verification.insufficient_checked,
            insufficient_matches: self.verification.insufficient_matches,
            verified: self.is_verified(),
        }
    }
}

/// Serializable summary of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub threshold: usize,
    pub parties: usize,
    pub rounds: usize,
    pub participants: Vec<ParticipantReport>,
    pub contributors: Vec<ContributorReport>,
    pub unique_keys: usize,
    pub spend_key: SpendKeyReport,
    pub restorations: Vec<RestorationReport>,
    pub insufficient_checked: usize,
    pub insufficient_matches: usize,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantReport {
    pub id: PartyId,
    pub secret: String,
    pub public: String,
    pub derived_keys: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorReport {
    pub id: PartyId,
    pub unique_keys: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendKeyReport {
    pub public: String,
    /// Public key bytes read as a scalar, kept for display compatibility
    pub display_secret: String,
    pub secret: String,
    pub consistent: bool,
}

impl From<&SpendKey> for SpendKeyReport {
    fn from(key: &SpendKey) -> Self {
        Self {
            public: key.public_hex(),
            display_secret: key.display_secret_hex(),
            secret: key.secret_hex(),
            consistent: key.is_consistent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestorationReport {
    pub indices: Vec<PartyId>,
    pub spend_key: SpendKeyReport,
    pub matches: bool,
}

impl From<&Restoration> for RestorationReport {
    fn from(restoration: &Restoration) -> Self {
        Self {
            indices: restoration.indices.clone(),
            spend_key: SpendKeyReport::from(&restoration.key),
            matches: restoration.matches,
        }
    }
}
