use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use lotto645_db::corpus::Corpus;
use lotto645_db::models::{Candidate, Draw, PrizeTally, PrizeTier};

use crate::frequency::SumFrequencyTable;

/// Rang obtenu par une grille face à un seul tirage.
pub fn tier_for(candidate: &Candidate, draw: &Draw) -> Option<PrizeTier> {
    match candidate.matches(draw) {
        6 => Some(PrizeTier::First),
        5 if candidate.contains(draw.bonus()) => Some(PrizeTier::Second),
        5 => Some(PrizeTier::Third),
        4 => Some(PrizeTier::Fourth),
        3 => Some(PrizeTier::Fifth),
        _ => None,
    }
}

/// Compare la grille à chaque tirage historique et compte les rangs atteints.
pub fn classify(candidate: &Candidate, corpus: &Corpus) -> PrizeTally {
    tally_against(candidate, corpus.all_draws())
}

fn tally_against<'a, I>(candidate: &Candidate, draws: I) -> PrizeTally
where
    I: IntoIterator<Item = &'a Draw>,
{
    let mut tally = PrizeTally::default();
    for draw in draws {
        if let Some(tier) = tier_for(candidate, draw) {
            tally.record(tier);
        }
    }
    tally
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub candidate: Candidate,
    pub tally: PrizeTally,
    pub sum: u32,
    pub sum_occurrences: u32,
}

/// Historique d'une grille : rangs obtenus et fréquence de sa somme.
pub fn check(candidate: &Candidate, corpus: &Corpus, sums: &SumFrequencyTable) -> CheckReport {
    let sum = candidate.sum();
    CheckReport {
        candidate: *candidate,
        tally: classify(candidate, corpus),
        sum,
        sum_occurrences: sums.get(sum),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverlapBand {
    From10,
    From15,
    From20,
    From25,
    Over30,
}

impl OverlapBand {
    pub const ALL: [OverlapBand; 5] = [
        OverlapBand::From10,
        OverlapBand::From15,
        OverlapBand::From20,
        OverlapBand::From25,
        OverlapBand::Over30,
    ];

    /// Tranche d'un compteur ; en dessous de 10 il n'y a pas de tranche.
    pub fn from_count(count: u32) -> Option<Self> {
        match count {
            31.. => Some(OverlapBand::Over30),
            25..=30 => Some(OverlapBand::From25),
            20..=24 => Some(OverlapBand::From20),
            15..=19 => Some(OverlapBand::From15),
            10..=14 => Some(OverlapBand::From10),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            OverlapBand::From10 => 0,
            OverlapBand::From15 => 1,
            OverlapBand::From20 => 2,
            OverlapBand::From25 => 3,
            OverlapBand::Over30 => 4,
        }
    }
}

impl std::fmt::Display for OverlapBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlapBand::From10 => write!(f, "10-14"),
            OverlapBand::From15 => write!(f, "15-19"),
            OverlapBand::From20 => write!(f, "20-24"),
            OverlapBand::From25 => write!(f, "25-30"),
            OverlapBand::Over30 => write!(f, "> 30"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BandHistogram {
    counts: [u32; 5],
}

impl BandHistogram {
    fn add(&mut self, count: u32) {
        if let Some(band) = OverlapBand::from_count(count) {
            self.counts[band.index()] += 1;
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.counts.iter_mut().zip(other.counts) {
            *a += b;
        }
        self
    }

    pub fn get(&self, band: OverlapBand) -> u32 {
        self.counts[band.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (OverlapBand, u32)> + '_ {
        OverlapBand::ALL.into_iter().map(|b| (b, self.get(b)))
    }
}

/// Répartition, sur l'ensemble des tirages, du nombre de 4e et 5e rangs que
/// chaque tirage obtiendrait contre tous les autres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrossComparison {
    pub fourth: BandHistogram,
    pub fifth: BandHistogram,
}

pub fn cross_compare(corpus: &Corpus) -> CrossComparison {
    let draws: Vec<&Draw> = corpus.all_draws().collect();

    let result = draws
        .par_iter()
        .map(|src| {
            let candidate = Candidate::from(*src);
            let others = draws
                .iter()
                .copied()
                .filter(|d| d.draw_number() != src.draw_number());
            let tally = tally_against(&candidate, others);

            let mut cmp = CrossComparison::default();
            cmp.fourth.add(tally.get(PrizeTier::Fourth));
            cmp.fifth.add(tally.get(PrizeTier::Fifth));
            cmp
        })
        .reduce(CrossComparison::default, |a, b| CrossComparison {
            fourth: a.fourth.merge(b.fourth),
            fifth: a.fifth.merge(b.fifth),
        });

    debug!(draws = draws.len(), "comparaison croisée terminée");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotto645_db::corpus::make_test_draws;
    use lotto645_db::models::PICK_COUNT;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    fn draw(n: u32, main: &[u8], bonus: u8) -> Draw {
        Draw::new(n, main, bonus).unwrap()
    }

    fn corpus_of(draws: Vec<Draw>) -> Corpus {
        Corpus::from_draws(draws).unwrap().corpus
    }

    fn candidate(numbers: &[u8]) -> Candidate {
        Candidate::new(numbers).unwrap()
    }

    #[test]
    fn test_exact_match_single_draw() {
        let corpus = corpus_of(vec![draw(1, &[3, 8, 19, 27, 33, 41], 12)]);
        let tally = classify(&candidate(&[41, 33, 27, 19, 8, 3]), &corpus);
        assert_eq!(tally.counts(), [1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_five_plus_bonus_is_second() {
        let d = draw(1, &[1, 2, 3, 4, 5, 6], 7);
        assert_eq!(tier_for(&candidate(&[1, 2, 3, 4, 5, 7]), &d), Some(PrizeTier::Second));
        assert_eq!(tier_for(&candidate(&[1, 2, 3, 4, 5, 8]), &d), Some(PrizeTier::Third));
    }

    #[test]
    fn test_lower_tiers() {
        let d = draw(1, &[1, 2, 3, 4, 5, 6], 7);
        assert_eq!(tier_for(&candidate(&[1, 2, 3, 4, 40, 41]), &d), Some(PrizeTier::Fourth));
        assert_eq!(tier_for(&candidate(&[1, 2, 3, 39, 40, 41]), &d), Some(PrizeTier::Fifth));
        assert_eq!(tier_for(&candidate(&[1, 2, 7, 39, 40, 41]), &d), None);
        assert_eq!(tier_for(&candidate(&[40, 41, 42, 43, 44, 45]), &d), None);
    }

    #[test]
    fn test_bonus_does_not_count_below_five() {
        let d = draw(1, &[1, 2, 3, 4, 5, 6], 7);
        assert_eq!(tier_for(&candidate(&[1, 2, 3, 4, 7, 45]), &d), Some(PrizeTier::Fourth));
    }

    #[test]
    fn test_check_report() {
        let corpus = corpus_of(vec![
            draw(1, &[1, 2, 3, 4, 5, 6], 7),
            draw(2, &[1, 2, 3, 4, 5, 7], 6),
        ]);
        let sums = crate::frequency::sum_frequencies(&corpus);
        let report = check(&candidate(&[6, 5, 4, 3, 2, 1]), &corpus, &sums);
        assert_eq!(report.sum, 21);
        assert_eq!(report.sum_occurrences, 1);
        assert_eq!(report.tally.counts(), [1, 1, 0, 0, 0]);
        assert_eq!(report.candidate.numbers(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(OverlapBand::from_count(9), None);
        assert_eq!(OverlapBand::from_count(10), Some(OverlapBand::From10));
        assert_eq!(OverlapBand::from_count(19), Some(OverlapBand::From15));
        assert_eq!(OverlapBand::from_count(25), Some(OverlapBand::From25));
        assert_eq!(OverlapBand::from_count(30), Some(OverlapBand::From25));
        assert_eq!(OverlapBand::from_count(31), Some(OverlapBand::Over30));
    }

    #[test]
    fn test_cross_compare_excludes_self() {
        let corpus = corpus_of(vec![
            draw(1, &[1, 2, 3, 4, 5, 6], 7),
            draw(2, &[1, 2, 3, 4, 5, 6], 8),
        ]);
        let cmp = cross_compare(&corpus);
        // Aucun tirage n'atteint 10 occurrences de 4e ou 5e rang.
        assert_eq!(cmp, CrossComparison::default());
    }

    #[test]
    fn test_cross_compare_buckets_fifth_tier() {
        // Le tirage 1 partage exactement 3 numéros avec chacun des 12 autres.
        let mut draws = vec![draw(1, &[1, 2, 3, 4, 5, 6], 45)];
        for i in 0..12u8 {
            let base = 10 + i * 2;
            draws.push(draw(i as u32 + 2, &[1, 2, 3, base, base + 1, 44], 43));
        }
        let cmp = cross_compare(&corpus_of(draws));
        // Tirage 1 : 12 cinquièmes rangs. Les autres se partagent 4 numéros
        // entre eux (1, 2, 3, 44) : 11 quatrièmes rangs chacun.
        assert_eq!(cmp.fifth.get(OverlapBand::From10), 1);
        assert_eq!(cmp.fourth.get(OverlapBand::From10), 12);
    }

    #[derive(Debug, Clone)]
    struct Perm(Vec<u8>);

    impl Arbitrary for Perm {
        fn arbitrary(g: &mut Gen) -> Self {
            let mut numbers: Vec<u8> = Vec::with_capacity(PICK_COUNT);
            while numbers.len() < PICK_COUNT {
                let n = u8::arbitrary(g) % 45 + 1;
                if !numbers.contains(&n) {
                    numbers.push(n);
                }
            }
            Perm(numbers)
        }
    }

    #[quickcheck]
    fn prop_classify_ignores_order(p: Perm) -> bool {
        let corpus = corpus_of(make_test_draws(60));
        let forward = Candidate::new(&p.0).unwrap();
        let mut reversed = p.0.clone();
        reversed.reverse();
        let backward = Candidate::new(&reversed).unwrap();
        classify(&forward, &corpus) == classify(&backward, &corpus)
    }
}
