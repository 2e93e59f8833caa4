use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use textplots::Plot;

use lotto645_analysis::frequency::{NumberFrequencyTable, SumFrequencyTable};
use lotto645_analysis::prize::{CheckReport, CrossComparison};
use lotto645_analysis::sampler::GenerationReport;
use lotto645_analysis::weights::WeightVector;
use lotto645_db::corpus::LoadReport;
use lotto645_db::models::{MAX_SUM, MIN_SUM, POOL_SIZE, PrizeTally, PrizeTier};

use crate::import::ImportResult;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn tally_cells(tally: &PrizeTally) -> Vec<String> {
    PrizeTier::ALL.iter().map(|&t| tally.get(t).to_string()).collect()
}

pub fn display_load_summary(import: &ImportResult, load: &LoadReport) {
    println!("Total de {} tirages chargés", load.corpus.count());
    if import.errors > 0 || !load.rejected.is_empty() {
        println!(
            "  Lignes illisibles : {}   Tirages rejetés : {}",
            import.errors,
            load.rejected.len()
        );
    }
    if let Some(latest) = load.corpus.latest() {
        println!("  Dernier tirage    : n°{}", latest.draw_number());
    }
    println!("--------------------------");
}

pub fn display_frequencies(freq: &NumberFrequencyTable, weights: &WeightVector, include_bonus: bool) {
    let scope = if include_bonus { "numéros principaux + bonus" } else { "numéros principaux" };
    println!("\n📊 Fréquences ({scope})\n");

    let uniform = 1.0 / POOL_SIZE as f64;
    let mut rows: Vec<(u8, u32, f64)> = freq.iter().map(|(n, c)| (n, c, weights.get(n))).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut table = new_table(vec!["Numéro", "Apparitions", "Poids"]);
    for (n, count, w) in rows {
        let color = if w < uniform { Color::Red } else { Color::Green };
        table.add_row(vec![
            Cell::new(format!("{:2}", n)),
            Cell::new(count),
            Cell::new(format!("{:.4}", w)).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_sums(ranked: &[(u32, u32)], table: &SumFrequencyTable, top: usize) {
    println!("\n➕ Sommes les plus fréquentes ({} sommes distinctes)\n", table.len());

    let mut t = new_table(vec!["Somme", "Tirages"]);
    for (sum, count) in ranked.iter().take(top) {
        t.add_row(vec![sum.to_string(), count.to_string()]);
    }
    println!("{t}");

    let points: Vec<(f32, f32)> = table.iter().map(|(s, c)| (s as f32, c as f32)).collect();
    if points.is_empty() {
        return;
    }
    println!("\n== Répartition des sommes ==\n");
    textplots::Chart::new(160, 40, MIN_SUM as f32, MAX_SUM as f32)
        .lineplot(&textplots::Shape::Bars(&points))
        .display();
}

pub fn display_check(report: &CheckReport) {
    println!("\nComparaison avec tous les tirages");
    println!("Ma grille : {}", report.candidate);

    let mut table = new_table(vec!["1er", "2e", "3e", "4e", "5e"]);
    table.add_row(tally_cells(&report.tally));
    println!("{table}");

    println!("Somme {} : {} tirages", report.sum, report.sum_occurrences);
    println!("--------------------------");
}

pub fn display_cross(cmp: &CrossComparison) {
    println!("\n🔁 Chaque tirage comparé à tous les autres\n");

    let mut table = new_table(vec!["Occurrences", "Tirages (5e rang)", "Tirages (4e rang)"]);
    for ((band, fifth), (_, fourth)) in cmp.fifth.iter().zip(cmp.fourth.iter()) {
        table.add_row(vec![band.to_string(), fifth.to_string(), fourth.to_string()]);
    }
    println!("{table}");
}

pub fn display_generation(report: &GenerationReport, checks: &[CheckReport]) {
    println!("\n🎲 Grilles générées\n");

    let mut table = new_table(vec!["#", "Numéros", "Somme", "Tirages (somme)", "1er", "2e", "3e", "4e", "5e"]);
    for (i, check) in checks.iter().enumerate() {
        let mut row = vec![
            (i + 1).to_string(),
            check.candidate.to_string(),
            check.sum.to_string(),
            check.sum_occurrences.to_string(),
        ];
        row.extend(tally_cells(&check.tally));
        table.add_row(row);
    }
    println!("{table}");

    println!(
        "\n{} / {} grilles en {} essais",
        report.candidates.len(),
        report.requested,
        report.attempts_used
    );
    if !report.satisfied {
        println!(
            "⚠ Budget d'essais épuisé : {} grille(s) manquante(s). Assouplissez la politique ou augmentez --attempt-factor.",
            report.shortfall()
        );
    }
    let r = &report.rejections;
    println!(
        "Rejets : somme {}, 1er rang {}, 2e rang {}, 5e rang hors bande {}",
        r.by_sum, r.by_tier1, r.by_tier2, r.by_tier5
    );
}
