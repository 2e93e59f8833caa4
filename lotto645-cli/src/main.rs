mod display;
mod import;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use lotto645_analysis::config::{AdmissionPolicy, GeneratorConfig, load_policy, save_policy};
use lotto645_analysis::frequency::{number_frequencies, ranked_sums, sum_frequencies};
use lotto645_analysis::prize::{check, cross_compare};
use lotto645_analysis::sampler::{date_seed, generate_with_config};
use lotto645_analysis::weights::compute_weights;
use lotto645_db::corpus::{Corpus, LoadReport};
use lotto645_db::models::Candidate;

use crate::display::{
    display_check, display_cross, display_frequencies, display_generation, display_load_summary,
    display_sums,
};

#[derive(Parser)]
#[command(name = "lotto645", about = "Analyse statistique des tirages Lotto 6/45")]
struct Cli {
    /// Fichier CSV des tirages (tirage, 6 numéros, bonus)
    #[arg(short, long, global = true, default_value = "data/lotto645.csv")]
    file: PathBuf,

    /// Séparateur de colonnes du CSV
    #[arg(long, global = true, default_value = ";")]
    delimiter: char,

    /// Journalisation détaillée (équivalent à RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fréquence et poids de chaque numéro
    Stats {
        /// Compter aussi le numéro bonus
        #[arg(long)]
        include_bonus: bool,
    },

    /// Sommes des 6 numéros classées par fréquence
    Sums {
        /// Nombre de sommes à afficher
        #[arg(short, long, default_value = "20")]
        top: usize,
    },

    /// Comparer une grille avec tous les tirages historiques
    Check {
        /// 6 numéros distincts (1-45)
        #[arg(num_args = 6, required = true)]
        numbers: Vec<u8>,
    },

    /// Comparer chaque tirage historique avec tous les autres
    Cross,

    /// Générer des grilles filtrées par les statistiques historiques
    Generate(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Nombre de grilles à générer
    #[arg(short, long, default_value = "5")]
    count: usize,

    /// Essais autorisés par grille demandée
    #[arg(long, default_value = "200")]
    attempt_factor: usize,

    /// Seed pour la reproductibilité (défaut: date du jour YYYYMMDD)
    #[arg(long)]
    seed: Option<u64>,

    /// Compter aussi le numéro bonus dans les fréquences
    #[arg(long)]
    include_bonus: bool,

    /// Politique d'admission (JSON) servant de base
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Apparitions minimales de la somme dans l'historique
    #[arg(long)]
    sum_threshold: Option<u32>,

    /// Nombre minimal de 5e rangs historiques
    #[arg(long)]
    tier5_min: Option<u32>,

    /// Nombre maximal de 5e rangs historiques
    #[arg(long, conflicts_with = "no_tier5_max")]
    tier5_max: Option<u32>,

    /// Supprimer la borne haute des 5e rangs
    #[arg(long)]
    no_tier5_max: bool,

    /// Enregistrer la politique effective dans ce fichier
    #[arg(long)]
    save_policy: Option<PathBuf>,
}

impl GenerateArgs {
    fn admission_policy(&self) -> Result<AdmissionPolicy> {
        let mut policy = match &self.policy {
            Some(path) => load_policy(path)?,
            None => AdmissionPolicy::default(),
        };
        if let Some(v) = self.sum_threshold {
            policy.sum_threshold = v;
        }
        if let Some(v) = self.tier5_min {
            policy.tier5_min = v;
        }
        if self.tier5_max.is_some() {
            policy.tier5_max = self.tier5_max;
        }
        if self.no_tier5_max {
            policy.tier5_max = None;
        }
        Ok(policy)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let delimiter = u8::try_from(cli.delimiter).context("Le séparateur doit être un caractère ASCII")?;
    let corpus = load_corpus(&cli.file, delimiter)?;

    match cli.command {
        Command::Stats { include_bonus } => cmd_stats(&corpus, include_bonus),
        Command::Sums { top } => cmd_sums(&corpus, top),
        Command::Check { numbers } => cmd_check(&corpus, &numbers),
        Command::Cross => cmd_cross(&corpus),
        Command::Generate(args) => cmd_generate(&corpus, &args),
    }
}

fn load_corpus(path: &Path, delimiter: u8) -> Result<Corpus> {
    let import = import::import_csv(path, delimiter)?;
    let load: LoadReport = Corpus::load(import.records.iter().cloned())
        .with_context(|| format!("Aucun tirage exploitable dans {:?}", path))?;
    display_load_summary(&import, &load);
    Ok(load.corpus)
}

fn cmd_stats(corpus: &Corpus, include_bonus: bool) -> Result<()> {
    let freq = number_frequencies(corpus, include_bonus);
    let weights = compute_weights(&freq)?;
    display_frequencies(&freq, &weights, include_bonus);
    Ok(())
}

fn cmd_sums(corpus: &Corpus, top: usize) -> Result<()> {
    let sums = sum_frequencies(corpus);
    display_sums(&ranked_sums(&sums), &sums, top);
    Ok(())
}

fn cmd_check(corpus: &Corpus, numbers: &[u8]) -> Result<()> {
    let candidate = Candidate::new(numbers).context("Grille invalide (6 numéros distincts de 1 à 45)")?;
    let sums = sum_frequencies(corpus);
    display_check(&check(&candidate, corpus, &sums));
    Ok(())
}

fn cmd_cross(corpus: &Corpus) -> Result<()> {
    let pb = spinner(format!("Comparaison croisée de {} tirages...", corpus.count()))?;
    let cmp = cross_compare(corpus);
    pb.finish_and_clear();
    display_cross(&cmp);
    Ok(())
}

fn cmd_generate(corpus: &Corpus, args: &GenerateArgs) -> Result<()> {
    let policy = args.admission_policy()?;
    if let Some(path) = &args.save_policy {
        save_policy(&policy, path)?;
        println!("Politique enregistrée dans : {}", path.display());
    }

    let config = GeneratorConfig {
        target_count: args.count,
        attempt_factor: args.attempt_factor,
        include_bonus: args.include_bonus,
        policy,
    };
    let seed = args.seed.unwrap_or_else(date_seed);
    info!(seed, max_attempts = config.max_attempts(), "génération");

    let mut rng = StdRng::seed_from_u64(seed);
    let pb = spinner(format!(
        "Recherche de {} grilles (au plus {} essais, seed {})...",
        config.target_count,
        config.max_attempts(),
        seed
    ))?;
    let report = generate_with_config(&config, corpus, &mut rng);
    pb.finish_and_clear();
    let report = report?;

    let sums = sum_frequencies(corpus);
    let checks: Vec<_> = report
        .candidates
        .iter()
        .map(|c| check(c, corpus, &sums))
        .collect();
    display_generation(&report, &checks);
    Ok(())
}

fn spinner(message: String) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
