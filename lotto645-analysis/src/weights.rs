use thiserror::Error;
use tracing::debug;

use lotto645_db::models::POOL_SIZE;

use crate::frequency::NumberFrequencyTable;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightError {
    #[error("normalisation des poids impossible (somme = {total})")]
    Degenerate { total: f64 },
}

/// Probabilité de tirage de chaque numéro, indexée par numéro - 1. Somme = 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    weights: [f64; POOL_SIZE],
}

impl WeightVector {
    pub fn uniform() -> Self {
        Self {
            weights: [1.0 / POOL_SIZE as f64; POOL_SIZE],
        }
    }

    pub fn get(&self, number: u8) -> f64 {
        match number {
            1..=45 => self.weights[(number - 1) as usize],
            _ => 0.0,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.weights
            .iter()
            .enumerate()
            .map(|(i, &w)| ((i + 1) as u8, w))
    }
}

/// Pondération inverse de la fréquence : plafond gonflé de la moitié de l'écart
/// max - min, puis poids brut = plafond - fréquence, normalisé.
///
/// Le numéro le plus fréquent garde un poids brut de (max - min) / 2 > 0.
/// Si toutes les fréquences sont égales la distribution est uniforme.
pub fn compute_weights(table: &NumberFrequencyTable) -> Result<WeightVector, WeightError> {
    let max_freq = table.max() as f64;
    let min_freq = table.min() as f64;

    if table.max() == table.min() {
        debug!(frequency = table.max(), "fréquences identiques, poids uniformes");
        return Ok(WeightVector::uniform());
    }

    let adjusted_max = max_freq + (max_freq - min_freq) / 2.0;

    let mut raw = [0.0f64; POOL_SIZE];
    for (slot, &count) in raw.iter_mut().zip(table.counts()) {
        *slot = adjusted_max - count as f64;
    }

    let total: f64 = raw.iter().sum();
    if !total.is_finite() || total <= 0.0 || raw.iter().any(|&w| w <= 0.0) {
        return Err(WeightError::Degenerate { total });
    }

    let mut weights = [0.0f64; POOL_SIZE];
    for (w, r) in weights.iter_mut().zip(raw) {
        *w = r / total;
    }

    debug!(max_freq, min_freq, adjusted_max, "poids calculés");
    Ok(WeightVector { weights })
}
