//! Participants and the store holding them

use crate::keys::{DerivedKey, DerivedKeySet, Keypair};
use crate::{Error, PartyId, Result};
use rand_core::{CryptoRng, RngCore};
use tracing::debug;

/// One protocol participant
#[derive(Debug, Clone)]
pub struct Participant {
    id: PartyId,
    keypair: Keypair,
    derived: DerivedKeySet,
}

impl Participant {
    fn new(id: PartyId, keypair: Keypair) -> Self {
        let derived = std::iter::once(DerivedKey::from_keypair(&keypair)).collect();
        Self {
            id,
            keypair,
            derived,
        }
    }

    pub fn id(&self) -> PartyId {
        self.id
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// Keys accumulated so far
    pub fn derived(&self) -> &DerivedKeySet {
        &self.derived
    }
}

/// All participants of a run, indexed by [`PartyId`]
#[derive(Debug, Clone)]
pub struct ParticipantStore {
    participants: Vec<Participant>,
}

impl ParticipantStore {
    /// Create `n` participants with fresh keypairs
    pub fn initialize<R: CryptoRng + RngCore>(n: usize, rng: &mut R) -> Self {
        let keypairs = (0..n).map(|_| Keypair::generate(&mut *rng)).collect();
        Self::from_keypairs(keypairs)
    }

    /// Create participants from fixed keypairs, in order
    pub fn from_keypairs(keypairs: Vec<Keypair>) -> Self {
        let participants: Vec<_> = keypairs
            .into_iter()
            .enumerate()
            .map(|(id, keypair)| Participant::new(id, keypair))
            .collect();
        debug!(n_parties = participants.len(), "Participant store initialized");
        Self { participants }
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, id: PartyId) -> Result<&Participant> {
        self.participants.get(id).ok_or(Error::InvalidPartyId(id))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Participant> {
        self.participants.iter()
    }

    /// Replace every participant's derived-key set at once.
    ///
    /// `next[i]` becomes participant `i`'s set.
    pub(crate) fn commit_round(&mut self, next: Vec<DerivedKeySet>) -> Result<()> {
        if next.len() != self.participants.len() {
            return Err(Error::InvalidConfig(format!(
                "Round produced {} key sets for {} participants",
                next.len(),
                self.participants.len()
            )));
        }

        for (participant, derived) in self.participants.iter_mut().zip(next) {
            participant.derived = derived;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ParticipantStore {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
