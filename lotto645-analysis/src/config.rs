use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lotto645_db::models::{PrizeTally, PrizeTier};

/// Seuils qu'une grille générée doit respecter pour être retenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionPolicy {
    /// Nombre minimal de tirages historiques ayant la même somme.
    pub sum_threshold: u32,
    pub max_tier1: u32,
    pub max_tier2: u32,
    pub tier5_min: u32,
    /// `None` : pas de borne haute.
    pub tier5_max: Option<u32>,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            sum_threshold: 11,
            max_tier1: 0,
            max_tier2: 0,
            tier5_min: 15,
            tier5_max: Some(25),
        }
    }
}

impl AdmissionPolicy {
    pub fn admits_sum(&self, occurrences: u32) -> bool {
        occurrences >= self.sum_threshold
    }

    pub fn admits_tally(&self, tally: &PrizeTally) -> bool {
        self.rejection(tally).is_none()
    }

    /// Première règle violée par le décompte, le cas échéant.
    pub fn rejection(&self, tally: &PrizeTally) -> Option<PrizeTier> {
        if tally.get(PrizeTier::First) > self.max_tier1 {
            return Some(PrizeTier::First);
        }
        if tally.get(PrizeTier::Second) > self.max_tier2 {
            return Some(PrizeTier::Second);
        }
        let fifth = tally.get(PrizeTier::Fifth);
        if fifth < self.tier5_min || self.tier5_max.is_some_and(|max| fifth > max) {
            return Some(PrizeTier::Fifth);
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub target_count: usize,
    /// Essais autorisés par grille demandée.
    pub attempt_factor: usize,
    /// Compter aussi le numéro bonus dans les fréquences.
    pub include_bonus: bool,
    pub policy: AdmissionPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            target_count: 5,
            attempt_factor: 200,
            include_bonus: false,
            policy: AdmissionPolicy::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn max_attempts(&self) -> usize {
        self.target_count.saturating_mul(self.attempt_factor)
    }
}

pub fn save_policy(policy: &AdmissionPolicy, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(policy)?;
    std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}

pub fn load_policy(path: &Path) -> Result<AdmissionPolicy> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let policy: AdmissionPolicy = serde_json::from_str(&json)
        .with_context(|| format!("Politique invalide dans {:?}", path))?;
    Ok(policy)
}
