//! Keypairs and derived-key sets

use crate::curve::{self, PointBytes};
use crate::{Error, Result};
use k256::{NonZeroScalar, ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Long-term keypair of a participant
#[derive(Clone)]
pub struct Keypair {
    public: ProjectivePoint,
    secret: Scalar,
}

impl Keypair {
    /// Generate a fresh keypair
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        let secret = *NonZeroScalar::random(rng);
        Self {
            public: ProjectivePoint::GENERATOR * secret,
            secret,
        }
    }

    /// Build a keypair from a fixed secret
    pub fn from_secret(secret: Scalar) -> Result<Self> {
        if bool::from(secret.is_zero()) {
            return Err(Error::Crypto("Secret scalar must be non-zero".into()));
        }
        Ok(Self {
            public: ProjectivePoint::GENERATOR * secret,
            secret,
        })
    }

    pub fn public(&self) -> &ProjectivePoint {
        &self.public
    }

    pub fn secret(&self) -> &Scalar {
        &self.secret
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public", &curve::point_hex(&self.public))
            .finish_non_exhaustive()
    }
}

/// A public key accumulated during the exchange.
///
/// `witness` is the discrete log of `point`. Only the simulation knows it;
/// the exchange never reads it, it just carries it along so aggregates can be
/// checked against their real secret.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DerivedKey {
    point: ProjectivePoint,
    witness: Scalar,
}

impl DerivedKey {
    pub(crate) fn from_keypair(keypair: &Keypair) -> Self {
        Self {
            point: keypair.public,
            witness: keypair.secret,
        }
    }

    /// Apply one more secret to this key
    pub fn apply(&self, secret: &Scalar) -> Self {
        Self {
            point: curve::scalar_multiply(secret, &self.point),
            witness: self.witness * secret,
        }
    }

    pub fn point(&self) -> &ProjectivePoint {
        &self.point
    }

    pub fn witness(&self) -> &Scalar {
        &self.witness
    }

    pub fn encoded(&self) -> PointBytes {
        curve::encode_point(&self.point)
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DerivedKey")
            .field(&curve::point_hex(&self.point))
            .finish()
    }
}

/// Set of derived keys keyed by their canonical encoding
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DerivedKeySet {
    keys: BTreeMap<PointBytes, DerivedKey>,
}

impl DerivedKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key, returning `false` if an equal point was already present
    pub fn insert(&mut self, key: DerivedKey) -> bool {
        match self.keys.entry(key.encoded()) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(key);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn contains(&self, encoded: &PointBytes) -> bool {
        self.keys.contains_key(encoded)
    }

    pub fn remove(&mut self, encoded: &PointBytes) -> Option<DerivedKey> {
        self.keys.remove(encoded)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in encoding order
    pub fn iter(&self) -> impl Iterator<Item = (&PointBytes, &DerivedKey)> {
        self.keys.iter()
    }

    pub fn points(&self) -> impl Iterator<Item = &ProjectivePoint> {
        self.keys.values().map(DerivedKey::point)
    }
}

impl FromIterator<DerivedKey> for DerivedKeySet {
    fn from_iter<I: IntoIterator<Item = DerivedKey>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl Extend<DerivedKey> for DerivedKeySet {
    fn extend<I: IntoIterator<Item = DerivedKey>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
