use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use lotto645_db::corpus::Corpus;
use lotto645_db::models::POOL_SIZE;

/// Apparitions de chaque numéro 1..=45, indexées par numéro - 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFrequencyTable {
    counts: [u32; POOL_SIZE],
}

impl NumberFrequencyTable {
    pub fn from_counts(counts: [u32; POOL_SIZE]) -> Self {
        Self { counts }
    }

    pub fn get(&self, number: u8) -> u32 {
        match number {
            1..=45 => self.counts[(number - 1) as usize],
            _ => 0,
        }
    }

    pub fn counts(&self) -> &[u32; POOL_SIZE] {
        &self.counts
    }

    /// (numéro, apparitions) pour les 45 numéros, y compris ceux jamais tirés.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| ((i + 1) as u8, c))
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn min(&self) -> u32 {
        self.counts.iter().copied().min().unwrap_or(0)
    }
}

/// Nombre de tirages par somme des 6 numéros principaux. Seules les sommes
/// réellement observées sont présentes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SumFrequencyTable {
    counts: BTreeMap<u32, u32>,
}

impl SumFrequencyTable {
    pub fn get(&self, sum: u32) -> u32 {
        self.counts.get(&sum).copied().unwrap_or(0)
    }

    pub fn contains(&self, sum: u32) -> bool {
        self.counts.contains_key(&sum)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

impl FromIterator<u32> for SumFrequencyTable {
    fn from_iter<I: IntoIterator<Item = u32>>(sums: I) -> Self {
        let mut counts = BTreeMap::new();
        for sum in sums {
            *counts.entry(sum).or_insert(0) += 1;
        }
        Self { counts }
    }
}

/// Compte les apparitions de chaque numéro. Le bonus n'est compté que si
/// `include_bonus` est vrai (par défaut les appelants passent `false`).
pub fn number_frequencies(corpus: &Corpus, include_bonus: bool) -> NumberFrequencyTable {
    let mut counts = [0u32; POOL_SIZE];

    for draw in corpus.all_draws() {
        for &n in draw.main_numbers() {
            counts[(n - 1) as usize] += 1;
        }
        if include_bonus {
            counts[(draw.bonus() - 1) as usize] += 1;
        }
    }

    debug!(draws = corpus.count(), include_bonus, "fréquences des numéros calculées");
    NumberFrequencyTable { counts }
}

pub fn sum_frequencies(corpus: &Corpus) -> SumFrequencyTable {
    let table: SumFrequencyTable = corpus.all_draws().map(|d| d.sum()).collect();
    debug!(distinct_sums = table.len(), "fréquences des sommes calculées");
    table
}

/// Sommes triées par nombre d'apparitions décroissant, puis par somme croissante.
pub fn ranked_sums(table: &SumFrequencyTable) -> Vec<(u32, u32)> {
    let mut ranked: Vec<(u32, u32)> = table.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}
