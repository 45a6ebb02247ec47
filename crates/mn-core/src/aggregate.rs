//! Spend key aggregation
//!
//! The spend key is the sum of every distinct derived key held by a group of
//! participants. Duplicates are detected on the canonical point encoding.

use crate::curve;
use crate::keys::DerivedKeySet;
use crate::participant::Participant;
use crate::PartyId;
use k256::{ProjectivePoint, Scalar};
use std::fmt;

/// Aggregated spend key
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SpendKey {
    /// Sum of the distinct derived public keys
    pub public: ProjectivePoint,
    /// `public`'s bytes read as a scalar; a display value, not a secret key
    pub display_secret: Scalar,
    /// Sum of the discrete logs of the distinct derived keys
    pub secret: Scalar,
}

impl SpendKey {
    fn from_keys(keys: &DerivedKeySet) -> Self {
        let (public, secret) = keys.iter().fold(
            (curve::identity(), Scalar::ZERO),
            |(public, secret), (_, key)| (curve::point_add(&public, key.point()), secret + key.witness()),
        );

        Self {
            public,
            display_secret: curve::reinterpret_as_scalar(&public),
            secret,
        }
    }

    /// Check that `secret` really is the discrete log of `public`
    pub fn is_consistent(&self) -> bool {
        ProjectivePoint::GENERATOR * self.secret == self.public
    }

    pub fn public_hex(&self) -> String {
        curve::point_hex(&self.public)
    }

    pub fn display_secret_hex(&self) -> String {
        curve::scalar_hex(&self.display_secret)
    }

    pub fn secret_hex(&self) -> String {
        curve::scalar_hex(&self.secret)
    }
}

impl fmt::Debug for SpendKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpendKey")
            .field("public", &self.public_hex())
            .finish_non_exhaustive()
    }
}

/// Result of aggregating a group of participants
#[derive(Debug, Clone)]
pub struct Aggregate {
    /// The aggregated key
    pub spend_key: SpendKey,
    /// Number of distinct keys summed
    pub unique_keys: usize,
    /// Participants that were first to contribute at least one key, with the
    /// number of such keys, in participant order
    pub contributors: Vec<(PartyId, usize)>,
}

/// Aggregate the derived keys of `participants`
pub fn aggregate<'a, I>(participants: I) -> Aggregate
where
    I: IntoIterator<Item = &'a Participant>,
{
    let mut unique = DerivedKeySet::new();
    let mut contributors = Vec::new();

    for participant in participants {
        let fresh = participant
            .derived()
            .iter()
            .filter(|(_, key)| unique.insert(**key))
            .count();
        if fresh > 0 {
            contributors.push((participant.id(), fresh));
        }
    }

    Aggregate {
        spend_key: SpendKey::from_keys(&unique),
        unique_keys: unique.len(),
        contributors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Keypair;
    use crate::participant::ParticipantStore;
    use rand::rngs::OsRng;

    #[test]
    fn test_aggregate_without_rounds_sums_public_keys() {
        let store = ParticipantStore::initialize(3, &mut OsRng);
        let result = aggregate(&store);

        let expected = store
            .iter()
            .fold(ProjectivePoint::IDENTITY, |acc, p| acc + p.keypair().public());
        assert_eq!(result.spend_key.public, expected);
        assert_eq!(result.unique_keys, 3);
        assert_eq!(result.contributors, vec![(0, 1), (1, 1), (2, 1)]);
        assert!(result.spend_key.is_consistent());
    }

    #[test]
    fn test_duplicates_counted_once() {
        let keypair = Keypair::generate(&mut OsRng);
        let store = ParticipantStore::from_keypairs(vec![keypair.clone(), keypair.clone()]);
        let result = aggregate(&store);

        assert_eq!(result.unique_keys, 1);
        assert_eq!(result.spend_key.public, *keypair.public());
        // the second participant brought nothing new
        assert_eq!(result.contributors, vec![(0, 1)]);
    }

    #[test]
    fn test_empty_group_is_identity() {
        let result = aggregate(std::iter::empty());
        assert_eq!(result.spend_key.public, ProjectivePoint::IDENTITY);
        assert_eq!(result.spend_key.secret, Scalar::ZERO);
        assert!(result.contributors.is_empty());
    }
}
