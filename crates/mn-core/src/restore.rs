//! Spend key restoration from participant subsets
//!
//! Verification restores the spend key from every subset of threshold size
//! and compares it with the key aggregated from all participants. Subsets one
//! smaller than the threshold are checked too: none of them may reach the
//! full key.

use crate::aggregate::{aggregate, SpendKey};
use crate::combinations::combinations;
use crate::participant::ParticipantStore;
use crate::{Error, PartyId, Result};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "multi-thread")]
use rayon::prelude::*;

/// Key restored from one subset
#[derive(Debug, Clone)]
pub struct Restoration {
    /// Participants in the subset, increasing
    pub indices: Vec<PartyId>,
    /// The restored key
    pub key: SpendKey,
    /// Whether `key` equals the ground truth
    pub matches: bool,
}

/// Outcome of checking every subset against the ground truth
#[derive(Debug, Clone)]
pub struct Verification {
    /// Key aggregated from all participants
    pub ground_truth: SpendKey,
    /// One entry per threshold-sized subset, in enumeration order
    pub restorations: Vec<Restoration>,
    /// Number of subsets one below the threshold that were checked
    pub insufficient_checked: usize,
    /// Of those, how many reproduced the ground truth
    pub insufficient_matches: usize,
}

impl Verification {
    /// Every threshold-sized subset restored the ground truth
    pub fn all_match(&self) -> bool {
        self.restorations.iter().all(|r| r.matches)
    }

    /// No subset below the threshold restored the ground truth
    pub fn below_threshold_fails(&self) -> bool {
        self.insufficient_matches == 0
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &Restoration> {
        self.restorations.iter().filter(|r| !r.matches)
    }
}

/// Whether subset work may be spread over the rayon pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Use rayon when the `multi-thread` feature is enabled
    #[default]
    Auto,
    /// Restore subsets on the calling thread
    Sequential,
}

/// Restore the spend key from the participants in `indices`
pub fn restore(store: &ParticipantStore, indices: &[PartyId]) -> Result<SpendKey> {
    let mut seen = BTreeSet::new();
    let mut members = Vec::with_capacity(indices.len());

    for &id in indices {
        if !seen.insert(id) {
            return Err(Error::InvalidConfig(format!(
                "Participant {} listed twice in subset",
                id
            )));
        }
        members.push(store.get(id)?);
    }

    Ok(aggregate(members).spend_key)
}

/// Restore from every `threshold`-subset and compare with the full aggregate
#[instrument(skip(store), fields(n_parties = store.len()))]
pub fn verify(
    store: &ParticipantStore,
    threshold: usize,
    parallelism: Parallelism,
) -> Result<Verification> {
    if threshold == 0 || threshold > store.len() {
        return Err(Error::InvalidParameters {
            threshold,
            parties: store.len(),
        });
    }

    let ground_truth = aggregate(store).spend_key;

    let restorations = restore_all(store, threshold, parallelism)?
        .into_iter()
        .map(|(indices, key)| Restoration {
            matches: key == ground_truth,
            indices,
            key,
        })
        .collect::<Vec<_>>();

    let insufficient = restore_all(store, threshold - 1, parallelism)?;
    let insufficient_matches = insufficient
        .iter()
        .filter(|(_, key)| *key == ground_truth)
        .count();

    let verification = Verification {
        ground_truth,
        restorations,
        insufficient_checked: insufficient.len(),
        insufficient_matches,
    };

    for restoration in verification.mismatches() {
        warn!(indices = ?restoration.indices, "Subset failed to restore the spend key");
    }
    if !verification.below_threshold_fails() {
        warn!(
            count = verification.insufficient_matches,
            "Subsets below the threshold restored the spend key"
        );
    }

    info!(
        threshold,
        subsets = verification.restorations.len(),
        all_match = verification.all_match(),
        "Verification completed"
    );

    Ok(verification)
}

/// Restore every `size`-subset, keeping enumeration order
fn restore_all(
    store: &ParticipantStore,
    size: usize,
    parallelism: Parallelism,
) -> Result<Vec<(Vec<PartyId>, SpendKey)>> {
    let subsets = combinations(store.len(), size);
    debug!(size, ?parallelism, "Restoring subsets");

    let restore_one = |indices: Vec<PartyId>| -> Result<(Vec<PartyId>, SpendKey)> {
        let key = restore(store, &indices)?;
        Ok((indices, key))
    };

    match parallelism {
        #[cfg(feature = "multi-thread")]
        Parallelism::Auto => subsets
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(restore_one)
            .collect(),
        _ => subsets.map(restore_one).collect(),
    }
}
