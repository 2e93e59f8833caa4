use chrono::Datelike;
use rand::Rng;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use lotto645_db::corpus::Corpus;
use lotto645_db::models::{Candidate, NumbersError, PICK_COUNT, PrizeTier};

use crate::config::{AdmissionPolicy, GeneratorConfig};
use crate::frequency::{SumFrequencyTable, number_frequencies, sum_frequencies};
use crate::prize::classify;
use crate::weights::{WeightError, WeightVector, compute_weights};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Weights(#[from] WeightError),
    #[error("échantillonnage pondéré impossible : {0}")]
    Sampling(#[from] rand::distr::weighted::Error),
    #[error("grille générée invalide : {0}")]
    Candidate(#[from] NumbersError),
}

/// Seed déterministe basé sur la date du jour (YYYYMMDD).
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    today.year() as u64 * 10_000 + today.month() as u64 * 100 + today.day() as u64
}

/// Tire 6 numéros distincts : à chaque étape le numéro est choisi
/// proportionnellement au poids restant, puis retiré.
pub fn sample_candidate<R: Rng + ?Sized>(
    weights: &WeightVector,
    rng: &mut R,
) -> Result<Candidate, GenerateError> {
    let mut available: Vec<(u8, f64)> = weights.iter().collect();
    let mut selected = Vec::with_capacity(PICK_COUNT);

    for _ in 0..PICK_COUNT {
        let remaining: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
        let dist = WeightedIndex::new(&remaining)?;
        let (number, _) = available.remove(dist.sample(rng));
        selected.push(number);
    }

    Ok(Candidate::new(&selected)?)
}

/// Motifs de rejet, pour le diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RejectionStats {
    pub by_sum: usize,
    pub by_tier1: usize,
    pub by_tier2: usize,
    pub by_tier5: usize,
}

impl RejectionStats {
    pub fn total(&self) -> usize {
        self.by_sum + self.by_tier1 + self.by_tier2 + self.by_tier5
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub candidates: Vec<Candidate>,
    pub requested: usize,
    pub attempts_used: usize,
    pub satisfied: bool,
    pub rejections: RejectionStats,
}

impl GenerationReport {
    /// Grilles manquantes quand le budget d'essais est épuisé.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.candidates.len())
    }
}

/// Échantillonnage par rejet : chaque essai tire une grille pondérée puis
/// l'écarte si sa somme est trop rare ou si son historique de gains sort de
/// la politique. S'arrête à `target_count` grilles ou après `max_attempts` essais.
pub fn generate<R: Rng + ?Sized>(
    weights: &WeightVector,
    corpus: &Corpus,
    sums: &SumFrequencyTable,
    target_count: usize,
    policy: &AdmissionPolicy,
    max_attempts: usize,
    rng: &mut R,
) -> Result<GenerationReport, GenerateError> {
    let mut candidates = Vec::with_capacity(target_count);
    let mut rejections = RejectionStats::default();
    let mut attempts = 0usize;

    while candidates.len() < target_count && attempts < max_attempts {
        attempts += 1;
        let candidate = sample_candidate(weights, rng)?;

        if !policy.admits_sum(sums.get(candidate.sum())) {
            rejections.by_sum += 1;
            continue;
        }

        let tally = classify(&candidate, corpus);
        match policy.rejection(&tally) {
            Some(PrizeTier::First) => rejections.by_tier1 += 1,
            Some(PrizeTier::Second) => rejections.by_tier2 += 1,
            Some(_) => rejections.by_tier5 += 1,
            None => {
                debug!(attempt = attempts, candidate = %candidate, ?tally, "grille retenue");
                candidates.push(candidate);
            }
        }
    }

    let report = GenerationReport {
        satisfied: candidates.len() >= target_count,
        candidates,
        requested: target_count,
        attempts_used: attempts,
        rejections,
    };

    if report.satisfied {
        debug!(attempts, ?rejections, "génération terminée");
    } else {
        warn!(
            generated = report.candidates.len(),
            requested = target_count,
            attempts,
            "budget d'essais épuisé avant d'atteindre l'objectif"
        );
    }
    Ok(report)
}

/// Enchaîne fréquences, poids et génération à partir d'une configuration.
pub fn generate_with_config<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    corpus: &Corpus,
    rng: &mut R,
) -> Result<GenerationReport, GenerateError> {
    let freq = number_frequencies(corpus, config.include_bonus);
    let weights = compute_weights(&freq)?;
    let sums = sum_frequencies(corpus);
    generate(
        &weights,
        corpus,
        &sums,
        config.target_count,
        &config.policy,
        config.max_attempts(),
        rng,
    )
}
