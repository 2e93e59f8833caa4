use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use lotto645_db::models::DrawRecord;

/// Ne garde que les chiffres ASCII : "5,678원" → 5678. Sans chiffre → 0.
/// Un nombre négatif ou trop grand donne `None`.
pub fn parse_int(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.starts_with('-') {
        return None;
    }
    s.chars()
        .filter_map(|c| c.to_digit(10))
        .try_fold(0u64, |acc, d| acc.checked_mul(10)?.checked_add(d as u64))
}

fn parse_record(record: &csv::StringRecord) -> Result<DrawRecord> {
    let get = |idx: usize| -> Result<u64> {
        let cell = record
            .get(idx)
            .with_context(|| format!("Champ manquant à l'index {}", idx))?;
        parse_int(cell).with_context(|| format!("Nombre invalide '{}' (index {})", cell, idx))
    };
    let get_u8 = |idx: usize| -> Result<u8> {
        let v = get(idx)?;
        u8::try_from(v).with_context(|| format!("Numéro {} trop grand (index {})", v, idx))
    };

    let draw_number = u32::try_from(get(0)?).context("Numéro de tirage trop grand")?;
    let main_numbers = (1..=6).map(get_u8).collect::<Result<Vec<u8>>>()?;
    let bonus = get_u8(7)?;

    Ok(DrawRecord {
        draw_number,
        main_numbers,
        bonus,
    })
}

fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|cell| !cell.chars().any(|c| c.is_ascii_digit()))
}

pub struct ImportResult {
    pub records: Vec<DrawRecord>,
    pub total_records: u32,
    pub errors: u32,
}

/// Lit `tirage;n1;...;n6;bonus` (en-tête optionnel). Une ligne illisible est
/// comptée en erreur et ignorée ; la validation des numéros est laissée au corpus.
pub fn import_csv(path: &Path, delimiter: u8) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let mut result = ImportResult {
        records: Vec::new(),
        total_records: 0,
        errors: 0,
    };

    for (line, record_result) in reader.records().enumerate() {
        match record_result {
            Ok(record) if line == 0 && is_header(&record) => continue,
            Ok(record) => {
                result.total_records += 1;
                match parse_record(&record) {
                    Ok(draw) => result.records.push(draw),
                    Err(e) => {
                        warn!(line = line + 1, "ligne ignorée : {:#}", e);
                        result.errors += 1;
                    }
                }
            }
            Err(e) => {
                result.total_records += 1;
                warn!(line = line + 1, "lecture impossible : {}", e);
                result.errors += 1;
            }
        }
    }

    Ok(result)
}
