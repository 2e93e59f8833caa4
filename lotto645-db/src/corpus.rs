use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::models::{Draw, DrawError, DrawRecord};

/// Historique des tirages, indexé par numéro de tirage. Immuable après chargement.
#[derive(Debug, Clone)]
pub struct Corpus {
    draws: BTreeMap<u32, Draw>,
}

/// Résultat d'un chargement : le corpus et les tirages écartés.
#[derive(Debug)]
pub struct LoadReport {
    pub corpus: Corpus,
    pub rejected: Vec<DrawError>,
}

impl Corpus {
    /// Valide chaque enregistrement ; un tirage invalide ou en double est écarté
    /// sans interrompre le chargement. Échoue seulement si rien ne reste.
    pub fn load<I>(records: I) -> Result<LoadReport, DrawError>
    where
        I: IntoIterator<Item = DrawRecord>,
    {
        Self::collect(records.into_iter().map(Draw::try_from))
    }

    /// Même chose pour des tirages déjà validés (seuls les doublons sont écartés).
    pub fn from_draws<I>(draws: I) -> Result<LoadReport, DrawError>
    where
        I: IntoIterator<Item = Draw>,
    {
        Self::collect(draws.into_iter().map(Ok))
    }

    fn collect<I>(results: I) -> Result<LoadReport, DrawError>
    where
        I: Iterator<Item = Result<Draw, DrawError>>,
    {
        let mut draws = BTreeMap::new();
        let mut rejected = Vec::new();

        for result in results {
            match result {
                Ok(draw) => {
                    let key = draw.draw_number();
                    if draws.contains_key(&key) {
                        warn!(draw_number = key, "tirage en double ignoré");
                        rejected.push(DrawError::DuplicateDrawNumber(key));
                    } else {
                        draws.insert(key, draw);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "tirage rejeté");
                    rejected.push(e);
                }
            }
        }

        if draws.is_empty() {
            return Err(DrawError::EmptyCorpus {
                rejected: rejected.len(),
            });
        }

        info!(draws = draws.len(), rejected = rejected.len(), "corpus chargé");
        Ok(LoadReport {
            corpus: Corpus { draws },
            rejected,
        })
    }

    /// Tirages par numéro croissant.
    pub fn all_draws(&self) -> impl ExactSizeIterator<Item = &Draw> + Clone + '_ {
        self.draws.values()
    }

    pub fn count(&self) -> usize {
        self.draws.len()
    }

    pub fn get(&self, draw_number: u32) -> Option<&Draw> {
        self.draws.get(&draw_number)
    }

    pub fn latest(&self) -> Option<&Draw> {
        self.draws.values().next_back()
    }
}

/// Construit un corpus en ne gardant que les tirages valides.
pub fn build_corpus<I>(records: I) -> Result<Corpus, DrawError>
where
    I: IntoIterator<Item = DrawRecord>,
{
    Corpus::load(records).map(|report| report.corpus)
}

/// Tirages synthétiques valides et distincts, pour les tests.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .filter_map(|i| {
            let base = ((i * 7) % 39) as u8;
            let main: Vec<u8> = (1..=6).map(|k| base + k).collect();
            Draw::new(i as u32 + 1, &main, base + 7).ok()
        })
        .collect()
}
