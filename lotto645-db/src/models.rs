use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numéros possibles : 1 à 45.
pub const POOL_SIZE: usize = 45;
/// Numéros principaux par tirage.
pub const PICK_COUNT: usize = 6;
/// Plus petite somme possible (1+2+3+4+5+6).
pub const MIN_SUM: u32 = 21;
/// Plus grande somme possible (40+41+42+43+44+45).
pub const MAX_SUM: u32 = 270;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumbersError {
    #[error("{found} numéros fournis (6 attendus)")]
    WrongCount { found: usize },
    #[error("numéro {number} hors limites (1-45)")]
    OutOfRange { number: u8 },
    #[error("numéro en double : {number}")]
    Duplicate { number: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("numéro de tirage invalide : 0")]
    ZeroDrawNumber,
    #[error("tirage {draw_number} : {source}")]
    InvalidNumbers {
        draw_number: u32,
        #[source]
        source: NumbersError,
    },
    #[error("tirage {draw_number} : bonus {bonus} hors limites (1-45)")]
    BonusOutOfRange { draw_number: u32, bonus: u8 },
    #[error("tirage {draw_number} : bonus {bonus} déjà parmi les numéros principaux")]
    BonusCollision { draw_number: u32, bonus: u8 },
    #[error("tirage {0} en double")]
    DuplicateDrawNumber(u32),
    #[error("aucun tirage exploitable ({rejected} rejetés)")]
    EmptyCorpus { rejected: usize },
}

/// Vérifie un ensemble de 6 numéros distincts dans 1..=45 et le renvoie trié.
pub fn validate_numbers(numbers: &[u8]) -> Result<[u8; PICK_COUNT], NumbersError> {
    if numbers.len() != PICK_COUNT {
        return Err(NumbersError::WrongCount { found: numbers.len() });
    }
    let mut sorted = [0u8; PICK_COUNT];
    sorted.copy_from_slice(numbers);
    sorted.sort_unstable();

    for &n in &sorted {
        if !in_pool(n) {
            return Err(NumbersError::OutOfRange { number: n });
        }
    }
    for pair in sorted.windows(2) {
        if pair[0] == pair[1] {
            return Err(NumbersError::Duplicate { number: pair[0] });
        }
    }
    Ok(sorted)
}

pub fn in_pool(n: u8) -> bool {
    n >= 1 && n as usize <= POOL_SIZE
}

/// Tirage brut tel que livré par l'import, avant validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub draw_number: u32,
    pub main_numbers: Vec<u8>,
    pub bonus: u8,
}

/// Tirage historique validé. Les numéros principaux sont stockés triés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draw {
    draw_number: u32,
    main_numbers: [u8; PICK_COUNT],
    bonus: u8,
}

impl Draw {
    pub fn new(draw_number: u32, main_numbers: &[u8], bonus: u8) -> Result<Self, DrawError> {
        if draw_number == 0 {
            return Err(DrawError::ZeroDrawNumber);
        }
        let main_numbers = validate_numbers(main_numbers)
            .map_err(|source| DrawError::InvalidNumbers { draw_number, source })?;
        if !in_pool(bonus) {
            return Err(DrawError::BonusOutOfRange { draw_number, bonus });
        }
        if main_numbers.contains(&bonus) {
            return Err(DrawError::BonusCollision { draw_number, bonus });
        }
        Ok(Self {
            draw_number,
            main_numbers,
            bonus,
        })
    }

    pub fn draw_number(&self) -> u32 {
        self.draw_number
    }

    pub fn main_numbers(&self) -> &[u8; PICK_COUNT] {
        &self.main_numbers
    }

    pub fn bonus(&self) -> u8 {
        self.bonus
    }

    pub fn sum(&self) -> u32 {
        self.main_numbers.iter().map(|&n| n as u32).sum()
    }
}

impl TryFrom<DrawRecord> for Draw {
    type Error = DrawError;

    fn try_from(record: DrawRecord) -> Result<Self, Self::Error> {
        Draw::new(record.draw_number, &record.main_numbers, record.bonus)
    }
}

/// Grille de 6 numéros, générée ou saisie, triée par ordre croissant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate([u8; PICK_COUNT]);

impl Candidate {
    pub fn new(numbers: &[u8]) -> Result<Self, NumbersError> {
        validate_numbers(numbers).map(Self)
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.0
    }

    pub fn contains(&self, n: u8) -> bool {
        self.0.binary_search(&n).is_ok()
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }

    /// Nombre de numéros principaux du tirage présents dans la grille.
    pub fn matches(&self, draw: &Draw) -> usize {
        draw.main_numbers().iter().filter(|&&n| self.contains(n)).count()
    }
}

impl From<&Draw> for Candidate {
    fn from(draw: &Draw) -> Self {
        Self(draw.main_numbers)
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| format!("{:2}", n)).collect();
        write!(f, "{}", parts.join(" - "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrizeTier {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
}

impl PrizeTier {
    pub const ALL: [PrizeTier; 5] = [
        PrizeTier::First,
        PrizeTier::Second,
        PrizeTier::Third,
        PrizeTier::Fourth,
        PrizeTier::Fifth,
    ];

    /// Rang officiel, de 1 (jackpot) à 5.
    pub fn rank(&self) -> usize {
        match self {
            PrizeTier::First => 1,
            PrizeTier::Second => 2,
            PrizeTier::Third => 3,
            PrizeTier::Fourth => 4,
            PrizeTier::Fifth => 5,
        }
    }
}

impl std::fmt::Display for PrizeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrizeTier::First => write!(f, "1er rang"),
            other => write!(f, "{}e rang", other.rank()),
        }
    }
}

/// Nombre de tirages historiques tombant dans chaque rang.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeTally {
    counts: [u32; 5],
}

impl PrizeTally {
    pub fn from_counts(counts: [u32; 5]) -> Self {
        Self { counts }
    }

    pub fn record(&mut self, tier: PrizeTier) {
        self.counts[tier.rank() - 1] += 1;
    }

    pub fn get(&self, tier: PrizeTier) -> u32 {
        self.counts[tier.rank() - 1]
    }

    pub fn counts(&self) -> [u32; 5] {
        self.counts
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_numbers_sorts() {
        assert_eq!(validate_numbers(&[45, 3, 22, 1, 17, 9]).unwrap(), [1, 3, 9, 17, 22, 45]);
    }

    #[test]
    fn test_validate_numbers_out_of_range() {
        assert_eq!(
            validate_numbers(&[0, 2, 3, 4, 5, 6]),
            Err(NumbersError::OutOfRange { number: 0 })
        );
        assert_eq!(
            validate_numbers(&[1, 2, 3, 4, 5, 46]),
            Err(NumbersError::OutOfRange { number: 46 })
        );
    }

    #[test]
    fn test_validate_numbers_duplicate() {
        assert_eq!(
            validate_numbers(&[1, 2, 2, 4, 5, 6]),
            Err(NumbersError::Duplicate { number: 2 })
        );
    }

    #[test]
    fn test_validate_numbers_wrong_count() {
        assert_eq!(
            validate_numbers(&[1, 2, 3, 4, 5]),
            Err(NumbersError::WrongCount { found: 5 })
        );
    }

    #[test]
    fn test_draw_bonus_collision() {
        let err = Draw::new(7, &[1, 2, 3, 4, 5, 6], 6).unwrap_err();
        assert_eq!(err, DrawError::BonusCollision { draw_number: 7, bonus: 6 });
    }

    #[test]
    fn test_draw_bonus_out_of_range() {
        assert!(matches!(
            Draw::new(7, &[1, 2, 3, 4, 5, 6], 46),
            Err(DrawError::BonusOutOfRange { .. })
        ));
    }

    #[test]
    fn test_draw_zero_number() {
        assert_eq!(Draw::new(0, &[1, 2, 3, 4, 5, 6], 7), Err(DrawError::ZeroDrawNumber));
    }

    #[test]
    fn test_draw_sum_and_sorting() {
        let draw = Draw::new(1, &[6, 5, 4, 3, 2, 1], 7).unwrap();
        assert_eq!(draw.main_numbers(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(draw.sum(), MIN_SUM);
    }

    #[test]
    fn test_candidate_matches() {
        let draw = Draw::new(1, &[1, 2, 3, 4, 5, 6], 7).unwrap();
        let candidate = Candidate::new(&[1, 2, 3, 40, 41, 7]).unwrap();
        assert_eq!(candidate.matches(&draw), 3);
        assert!(candidate.contains(7));
        assert!(!candidate.contains(6));
    }

    #[test]
    fn test_candidate_display() {
        let candidate = Candidate::new(&[10, 2, 33, 4, 45, 16]).unwrap();
        assert_eq!(candidate.to_string(), " 2 -  4 - 10 - 16 - 33 - 45");
    }

    #[test]
    fn test_tally_record() {
        let mut tally = PrizeTally::default();
        tally.record(PrizeTier::Second);
        tally.record(PrizeTier::Fifth);
        tally.record(PrizeTier::Fifth);
        assert_eq!(tally.counts(), [0, 1, 0, 0, 2]);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_draw_record_serde() {
        let json = r#"{"draw_number":12,"main_numbers":[1,2,3,4,5,6],"bonus":7}"#;
        let record: DrawRecord = serde_json::from_str(json).unwrap();
        let draw = Draw::try_from(record).unwrap();
        assert_eq!(draw.draw_number(), 12);
        assert_eq!(draw.bonus(), 7);
    }
}
