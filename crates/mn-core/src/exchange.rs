//! Key exchange rounds
//!
//! In every round each participant receives the derived keys of all other
//! participants, drops the ones it already holds and multiplies the rest by
//! its own secret. The new sets replace the old ones.
//!
//! All next-round sets are computed from the committed state of the previous
//! round and swapped in together, so the order in which participants are
//! processed cannot leak into the result.

use crate::keys::DerivedKeySet;
use crate::participant::ParticipantStore;
use crate::Result;
use tracing::{debug, instrument};

/// Run one exchange round over all participants
#[instrument(skip(store), fields(n_parties = store.len()))]
pub fn exchange_round(store: &mut ParticipantStore) -> Result<()> {
    let next = next_key_sets(store);
    store.commit_round(next)
}

/// Run `rounds` exchange rounds back to back
pub fn run_rounds(store: &mut ParticipantStore, rounds: usize) -> Result<()> {
    for round in 1..=rounds {
        exchange_round(store)?;

        let sizes: Vec<usize> = store.iter().map(|p| p.derived().len()).collect();
        debug!(round, ?sizes, "Exchange round committed");
    }
    Ok(())
}

/// Compute every participant's next key set from the current state
fn next_key_sets(store: &ParticipantStore) -> Vec<DerivedKeySet> {
    let mut incoming = vec![DerivedKeySet::new(); store.len()];

    for sender in store {
        for (receiver, inbox) in incoming.iter_mut().enumerate() {
            if receiver == sender.id() {
                continue;
            }
            inbox.extend(sender.derived().iter().map(|(_, key)| *key));
        }
    }

    store
        .iter()
        .zip(incoming)
        .map(|(participant, mut inbox)| {
            for (encoded, _) in participant.derived().iter() {
                inbox.remove(encoded);
            }

            let secret = participant.keypair().secret();
            inbox
                .iter()
                .map(|(_, key)| key.apply(secret))
                .collect::<DerivedKeySet>()
        })
        .collect()
}
