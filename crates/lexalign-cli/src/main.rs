mod display;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use lexalign_core::{
    Document, Extractor, Language, NoRefinement, ReportOptions, StatusThresholds, generate_report,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lexalign",
    version,
    about = "Cross-language factual consistency checks for parallel legal texts"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract and normalize entities from text
    Extract {
        /// Text to analyse; multiple arguments are joined with spaces
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Compare paragraph-aligned documents across languages
    Compare {
        /// Documents as LANG=PATH; the first two are the compared pair
        #[arg(required = true, num_args = 2.., value_parser = parse_document_arg)]
        documents: Vec<(Language, PathBuf)>,

        /// Write the JSON report here
        #[arg(long, env = "LEXALIGN_REPORT_PATH")]
        out: Option<PathBuf>,

        /// Minimum similarity for green status
        #[arg(long, env = "LEXALIGN_GREEN_THRESHOLD", default_value_t = 0.8)]
        green: f64,

        /// Minimum similarity for yellow status
        #[arg(long, env = "LEXALIGN_YELLOW_THRESHOLD", default_value_t = 0.4)]
        yellow: f64,
    },
}

fn parse_document_arg(arg: &str) -> Result<(Language, PathBuf), String> {
    let (lang, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected LANG=PATH, got '{arg}'"))?;
    let lang: Language = lang.parse().map_err(|e| format!("{e}"))?;
    if path.is_empty() {
        return Err(format!("missing path for {lang}"));
    }
    Ok((lang, PathBuf::from(path)))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("lexalign v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Extract { text } => cmd_extract(&text.join(" ")),
        Command::Compare {
            documents,
            out,
            green,
            yellow,
        } => cmd_compare(&documents, out, StatusThresholds { green, yellow }),
    }
}

fn cmd_extract(text: &str) -> anyhow::Result<()> {
    let extractor = Extractor::shared();
    let matches = extractor.extract_matches(text);
    tracing::info!(matches = matches.len(), "extracted");

    display::print_matches(&matches);
    let entities = extractor.extract(text);
    println!("{}", serde_json::to_string_pretty(&entities)?);
    Ok(())
}

fn cmd_compare(
    documents: &[(Language, PathBuf)],
    out: Option<PathBuf>,
    thresholds: StatusThresholds,
) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&thresholds.yellow)
        || !(0.0..=1.0).contains(&thresholds.green)
        || thresholds.yellow > thresholds.green
    {
        bail!(
            "thresholds must satisfy 0 <= yellow <= green <= 1 (got yellow={}, green={})",
            thresholds.yellow,
            thresholds.green
        );
    }

    let docs = documents
        .iter()
        .map(|(lang, path)| {
            lexalign_store::load_document(path, *lang)
                .with_context(|| format!("loading {lang} document from {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<Document>>>()?;

    let report = generate_report(&docs, &ReportOptions { thresholds }, &NoRefinement)
        .context("generating report")?;

    display::print_mismatches(&report);
    display::print_summary(&report);

    if let Some(path) = out {
        lexalign_store::save_report(&report, &path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}
