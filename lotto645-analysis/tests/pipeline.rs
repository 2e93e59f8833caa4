use rand::SeedableRng;
use rand::rngs::StdRng;

use lotto645_analysis::config::{AdmissionPolicy, GeneratorConfig};
use lotto645_analysis::frequency::{number_frequencies, sum_frequencies};
use lotto645_analysis::prize::classify;
use lotto645_analysis::sampler::{generate, generate_with_config};
use lotto645_analysis::weights::compute_weights;
use lotto645_db::corpus::{Corpus, build_corpus, make_test_draws};
use lotto645_db::models::{Candidate, DrawRecord, PrizeTier};

fn record(draw_number: u32, main: &[u8], bonus: u8) -> DrawRecord {
    DrawRecord {
        draw_number,
        main_numbers: main.to_vec(),
        bonus,
    }
}

#[test]
fn test_three_draw_scenario() {
    let corpus = build_corpus(vec![
        record(1, &[1, 2, 3, 4, 5, 6], 7),
        record(2, &[1, 2, 3, 4, 5, 7], 6),
        record(3, &[10, 11, 12, 13, 14, 15], 16),
    ])
    .unwrap();

    let candidate = Candidate::new(&[1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(classify(&candidate, &corpus).counts(), [1, 1, 0, 0, 0]);

    let shuffled = Candidate::new(&[6, 4, 2, 5, 3, 1]).unwrap();
    assert_eq!(classify(&shuffled, &corpus), classify(&candidate, &corpus));
}

#[test]
fn test_bad_rows_do_not_abort_pipeline() {
    let report = Corpus::load(vec![
        record(1, &[1, 2, 3, 4, 5, 6], 7),
        record(2, &[1, 2, 3, 4, 5, 60], 7),
        record(3, &[8, 9, 10, 11, 12, 13], 9),
        record(4, &[20, 21, 22, 23, 24, 25], 26),
    ])
    .unwrap();
    assert_eq!(report.corpus.count(), 2);
    assert_eq!(report.rejected.len(), 2);

    let freq = number_frequencies(&report.corpus, false);
    assert_eq!(freq.total(), 12);
    let weights = compute_weights(&freq).unwrap();
    assert!(weights.get(1) < weights.get(45));
}

#[test]
fn test_full_pipeline_generates_admissible_candidates() {
    let corpus = Corpus::from_draws(make_test_draws(300)).unwrap().corpus;
    let freq = number_frequencies(&corpus, false);
    let weights = compute_weights(&freq).unwrap();
    let sums = sum_frequencies(&corpus);
    let policy = AdmissionPolicy {
        sum_threshold: 1,
        tier5_min: 1,
        tier5_max: None,
        ..AdmissionPolicy::default()
    };

    let mut rng = StdRng::seed_from_u64(20240101);
    let report = generate(&weights, &corpus, &sums, 3, &policy, 50_000, &mut rng).unwrap();

    assert!(report.attempts_used <= 50_000);
    assert_eq!(report.satisfied, report.candidates.len() == 3);
    for candidate in &report.candidates {
        let numbers = candidate.numbers();
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        assert!(numbers.iter().all(|&n| (1..=45).contains(&n)));
        let tally = classify(candidate, &corpus);
        assert_eq!(tally.get(PrizeTier::First), 0);
        assert_eq!(tally.get(PrizeTier::Second), 0);
        assert!(tally.get(PrizeTier::Fifth) >= 1);
        assert!(sums.get(candidate.sum()) >= 1);
    }
}

#[test]
fn test_generate_with_config_reports_exhaustion() {
    let corpus = Corpus::from_draws(make_test_draws(10)).unwrap().corpus;
    let config = GeneratorConfig {
        target_count: 2,
        attempt_factor: 50,
        include_bonus: true,
        policy: AdmissionPolicy {
            tier5_min: 1_000,
            ..AdmissionPolicy::default()
        },
    };
    let report = generate_with_config(&config, &corpus, &mut StdRng::seed_from_u64(9)).unwrap();
    assert!(!report.satisfied);
    assert_eq!(report.attempts_used, 100);
    assert_eq!(report.shortfall(), 2);
}
