//! bookmerge - consolidate editions of the same work in a book feed
//!
//! ```bash
//! # Merge editions in a JSON record list
//! bookmerge dedupe books.json --output merged.json
//!
//! # Same, as an HTML page
//! bookmerge dedupe books.json --to html --output books.html
//!
//! # Render a saved feed dump as an HTML page
//! bookmerge render feed.txt --format feed --output books.html
//!
//! # Explain why two records did (or did not) merge
//! bookmerge classify books.json 0 3
//! ```

mod commands;

use std::path::PathBuf;

use bookmerge_core::ExportFormat;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bookmerge")]
#[command(author, version, about = "Detect and merge editions of the same work in a book feed")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to <config dir>/bookmerge/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every pair decision
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Consolidate editions and write the merged records
    Dedupe(DedupeArgs),

    /// Consolidate, select for display and write an HTML page
    Render(RenderArgs),

    /// Show how two input records are classified
    Classify(ClassifyArgs),
}

/// Shape of the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// JSON array of book records
    Json,
    /// Plain-text object dump of the book feed
    Feed,
}

#[derive(clap::Args)]
pub struct DedupeArgs {
    /// Input file, or `-` for stdin
    pub input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = InputFormat::Json)]
    pub format: InputFormat,

    /// Output format: json (every merged record) or html (display listing)
    #[arg(long, default_value_t = ExportFormat::Json)]
    pub to: ExportFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct RenderArgs {
    /// Input file, or `-` for stdin
    pub input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = InputFormat::Json)]
    pub format: InputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List every record as given, without merging editions
    #[arg(long)]
    pub no_dedupe: bool,
}

#[derive(clap::Args)]
pub struct ClassifyArgs {
    /// Input file, or `-` for stdin
    pub input: PathBuf,

    /// Position of the first record
    pub first: usize,

    /// Position of the second record
    pub second: usize,

    #[arg(short, long, value_enum, default_value_t = InputFormat::Json)]
    pub format: InputFormat,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Dedupe(args) => commands::dedupe(&args, &config),
        Commands::Render(args) => commands::render(&args, &config),
        Commands::Classify(args) => commands::classify(&args, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_output_format() {
        let cli = Cli::try_parse_from(["bookmerge", "dedupe", "books.json", "--to", "html"]).unwrap();
        let Commands::Dedupe(args) = cli.command else {
            panic!("expected dedupe");
        };
        assert_eq!(args.to, ExportFormat::Html);

        let cli = Cli::try_parse_from(["bookmerge", "dedupe", "books.json"]).unwrap();
        let Commands::Dedupe(args) = cli.command else {
            panic!("expected dedupe");
        };
        assert_eq!(args.to, ExportFormat::Json);
    }

    #[test]
    fn test_dedupe_rejects_unknown_output_format() {
        assert!(Cli::try_parse_from(["bookmerge", "dedupe", "books.json", "--to", "pdf"]).is_err());
    }
}
