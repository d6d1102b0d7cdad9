//! Command-line reject-reason analyzer.
//!
//! Usage:
//!     shinra analyze reasons.txt
//!     pbpaste | shinra analyze --format json
//!     shinra analyze --examples --verbose
//!     shinra score "vehicle color msimatch" "vehicle color mismatch"
//!     shinra catalog --catalog tuned.json

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shinra_catalog::PhraseCatalog;
use serde::Serialize;
use shinra_classify::{Classifier, ClassifierConfig, MatchTrace};
use shinra_explain::{analyze_text, render_report, ReasonReport, EXAMPLE_REASONS};
use shinra_features::{normalize_reason, similarity, BigramMode};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shinra")]
#[command(about = "Classify vehicle-registration reject reasons by document")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze reject reasons, one per line
    Analyze {
        /// Input file (reads stdin when omitted or "-")
        input: Option<PathBuf>,

        /// Analyze the built-in sample reasons instead of an input
        #[arg(long, conflicts_with = "input")]
        examples: bool,

        #[command(flatten)]
        tuning: Tuning,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,

        /// Show the phrase that matched each category
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print sample reject reasons
    Examples,

    /// Print the bigram similarity of two strings
    Score {
        left: String,
        right: String,

        /// Count repeated bigrams
        #[arg(long)]
        multiset: bool,
    },

    /// Print the active phrase catalog as JSON
    Catalog {
        /// Catalog JSON file (built-in catalog when omitted)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct Tuning {
    /// Catalog JSON file (built-in catalog when omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Similarity threshold
    #[arg(short, long, default_value = "0.6")]
    threshold: f32,

    /// Count repeated bigrams when scoring
    #[arg(long)]
    multiset: bool,
}

impl Tuning {
    fn config(&self) -> Result<ClassifierConfig> {
        let config = ClassifierConfig::default()
            .with_threshold(self.threshold)?
            .with_bigram_mode(bigram_mode(self.multiset));
        Ok(config)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shinra=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            examples,
            tuning,
            format,
            verbose,
        } => {
            let text = if examples {
                EXAMPLE_REASONS.join("\n")
            } else {
                read_input(input.as_ref())?
            };
            run_analyze(&text, &tuning, format, verbose)?;
        }
        Commands::Examples => {
            for reason in EXAMPLE_REASONS {
                println!("{}", reason);
            }
        }
        Commands::Score {
            left,
            right,
            multiset,
        } => {
            let score = similarity(
                &normalize_reason(&left),
                &normalize_reason(&right),
                bigram_mode(multiset),
            );
            println!("{:.4}", score);
        }
        Commands::Catalog { catalog } => {
            let catalog = load_catalog(catalog.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
    }

    Ok(())
}

fn run_analyze(text: &str, tuning: &Tuning, format: Format, verbose: bool) -> Result<()> {
    let catalog = load_catalog(tuning.catalog.as_ref())?;
    let config = tuning.config()?;
    tracing::debug!(
        phrases = catalog.len(),
        threshold = config.threshold,
        "Classifier ready"
    );
    let classifier = Classifier::new(&catalog, config);
    let report = analyze_text(&classifier, text);

    let matches = verbose.then(|| collect_matches(&classifier, &report));

    match format {
        Format::Json => println!("{}", render_json(&report, matches.as_deref())?),
        Format::Text => {
            print!("{}", render_report(&report));
            if let Some(matches) = &matches {
                println!("---");
                for entry in matches {
                    for trace in &entry.traces {
                        println!(
                            "{} -> {} via '{}' (score {:.2}{})",
                            entry.reason,
                            trace.category.label(),
                            trace.phrase,
                            trace.score,
                            if trace.substring { ", substring" } else { "" }
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

/// Phrases that implicated each category of one reason.
#[derive(Serialize)]
struct ReasonMatches<'a> {
    reason: &'a str,
    traces: Vec<MatchTrace>,
}

fn collect_matches<'r>(
    classifier: &Classifier<'_>,
    report: &'r ReasonReport,
) -> Vec<ReasonMatches<'r>> {
    report
        .entries()
        .iter()
        .map(|entry| ReasonMatches {
            reason: &entry.reason,
            traces: classifier.explain_match(&entry.reason),
        })
        .collect()
}

fn render_json(report: &ReasonReport, matches: Option<&[ReasonMatches<'_>]>) -> Result<String> {
    #[derive(Serialize)]
    struct Output<'a> {
        #[serde(flatten)]
        report: &'a ReasonReport,
        #[serde(skip_serializing_if = "Option::is_none")]
        matches: Option<&'a [ReasonMatches<'a>]>,
    }

    Ok(serde_json::to_string_pretty(&Output { report, matches })?)
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn load_catalog(path: Option<&PathBuf>) -> Result<PhraseCatalog> {
    match path {
        Some(path) => PhraseCatalog::from_path(path)
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Ok(PhraseCatalog::builtin().clone()),
    }
}

fn bigram_mode(multiset: bool) -> BigramMode {
    if multiset {
        BigramMode::Multiset
    } else {
        BigramMode::Unique
    }
}
