//! Full protocol runs over fixed and seeded keys

use k256::{ProjectivePoint, Scalar};
use mn_core::{
    aggregate, binomial, restore, run, run_with_keypairs, Error, Keypair, Parallelism,
    ThresholdConfig,
};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn fixed_keypairs(n: u64) -> Vec<Keypair> {
    (0..n)
        .map(|i| Keypair::from_secret(Scalar::from(1000 + 17 * i)).unwrap())
        .collect()
}

#[test]
fn test_two_of_three_restores_pairwise_sum() {
    let config = ThresholdConfig::new(2, 3).unwrap();
    let run = run_with_keypairs(&config, fixed_keypairs(3), Parallelism::Sequential).unwrap();

    assert!(run.is_verified());
    run.ensure_verified().unwrap();

    // the spend key is b0·b1·G + b0·b2·G + b1·b2·G
    let b: Vec<Scalar> = (0..3u64).map(|i| Scalar::from(1000 + 17 * i)).collect();
    let expected = ProjectivePoint::GENERATOR * (b[0] * b[1] + b[0] * b[2] + b[1] * b[2]);
    assert_eq!(run.aggregate.spend_key.public, expected);

    let subsets: Vec<_> = run
        .verification
        .restorations
        .iter()
        .map(|r| r.indices.clone())
        .collect();
    assert_eq!(subsets, vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
    for restoration in &run.verification.restorations {
        assert_eq!(restoration.key, run.aggregate.spend_key);
    }
}

#[test]
fn test_every_threshold_subset_matches() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    for (m, n) in [(1, 1), (1, 3), (2, 4), (3, 4), (2, 5), (3, 5), (4, 6)] {
        let config = ThresholdConfig::new(m, n).unwrap();
        let run = run(&config, &mut rng, Parallelism::Auto).unwrap();

        assert_eq!(
            run.verification.restorations.len(),
            binomial(n, m).unwrap(),
            "{} of {}",
            m,
            n
        );
        assert!(run.verification.all_match(), "{} of {}", m, n);
        assert!(run.verification.ground_truth.is_consistent());
        assert!(run.is_verified(), "{} of {}", m, n);
    }
}

#[test]
fn test_below_threshold_subsets_fail() {
    let config = ThresholdConfig::new(3, 5).unwrap();
    let run = run_with_keypairs(&config, fixed_keypairs(5), Parallelism::Sequential).unwrap();

    assert_eq!(run.verification.insufficient_checked, 10);
    assert_eq!(run.verification.insufficient_matches, 0);

    let partial = restore(&run.store, &[1, 4]).unwrap();
    assert_ne!(partial, run.aggregate.spend_key);
}

#[test]
fn test_threshold_equals_parties() {
    let config = ThresholdConfig::new(3, 3).unwrap();
    let keypairs = fixed_keypairs(3);
    let originals: Vec<_> = keypairs.iter().map(|k| *k.public()).collect();

    let run = run_with_keypairs(&config, keypairs, Parallelism::Sequential).unwrap();

    assert_eq!(run.config.rounds(), 0);
    for (participant, original) in run.store.iter().zip(&originals) {
        assert_eq!(participant.derived().len(), 1);
        assert_eq!(participant.derived().points().next(), Some(original));
    }

    let sum = originals
        .iter()
        .fold(ProjectivePoint::IDENTITY, |acc, point| acc + point);
    assert_eq!(run.verification.restorations.len(), 1);
    assert_eq!(run.verification.restorations[0].indices, vec![0, 1, 2]);
    assert_eq!(run.verification.restorations[0].key.public, sum);
    assert!(run.is_verified());
}

#[test]
fn test_fixed_keys_are_deterministic() {
    let config = ThresholdConfig::new(2, 4).unwrap();
    let first = run_with_keypairs(&config, fixed_keypairs(4), Parallelism::Auto).unwrap();
    let second = run_with_keypairs(&config, fixed_keypairs(4), Parallelism::Sequential).unwrap();

    assert_eq!(first.report(), second.report());
}

#[test]
fn test_seeded_runs_are_deterministic() {
    let config = ThresholdConfig::new(2, 3).unwrap();
    let first = run(&config, &mut ChaCha20Rng::seed_from_u64(42), Parallelism::Auto).unwrap();
    let second = run(&config, &mut ChaCha20Rng::seed_from_u64(42), Parallelism::Auto).unwrap();
    let other = run(&config, &mut ChaCha20Rng::seed_from_u64(43), Parallelism::Auto).unwrap();

    assert_eq!(first.report(), second.report());
    assert_ne!(first.report().spend_key, other.report().spend_key);
}

#[test]
fn test_contributors_and_report() {
    let config = ThresholdConfig::new(2, 3).unwrap();
    let run = run_with_keypairs(&config, fixed_keypairs(3), Parallelism::Sequential).unwrap();
    let report = run.report();

    // participant 0 brings b0·B1 and b0·B2, participant 1 brings b1·B2,
    // participant 2 only holds keys already seen
    assert_eq!(run.aggregate.contributors, vec![(0, 2), (1, 1)]);
    assert_eq!(report.unique_keys, 3);
    assert_eq!(report.rounds, 1);
    assert_eq!(report.participants.len(), 3);
    assert!(report.participants.iter().all(|p| p.derived_keys == 2));
    assert!(report.spend_key.consistent);
    assert!(report.verified);

    let json = serde_json::to_string(&report).unwrap();
    let parsed: mn_core::RunReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_full_aggregate_is_ground_truth() {
    let config = ThresholdConfig::new(2, 4).unwrap();
    let run = run_with_keypairs(&config, fixed_keypairs(4), Parallelism::Sequential).unwrap();
    assert_eq!(aggregate(&run.store).spend_key, run.verification.ground_truth);
}

#[test]
fn test_invalid_parameters() {
    for (m, n) in [(0, 2), (3, 2), (0, 0)] {
        assert!(matches!(
            ThresholdConfig::new(m, n),
            Err(Error::InvalidParameters { .. })
        ));
    }
}
