use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use survey_codebook::ingestion::{DocumentOptions, ObserverOptions, TableOptions, TracingObserver};
use survey_codebook::pipeline::{build_codebook, decode_table};
use survey_codebook::processing::{DecodePlan, SentinelSet};

const DEFAULT_DOCUMENT: &str = "data/37202-0003-Codebook-waves_MULTI.pdf";
const DEFAULT_CODEBOOK: &str = "data/codebook.json";

#[derive(Parser, Debug)]
#[command(
    name = "survey-codebook",
    version,
    about = "Extract a survey codebook and decode survey tables"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse the codebook document and save variable definitions as JSON (default).
    Extract(ExtractArgs),
    /// Decode categorical columns and clean continuous ones in a survey table.
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Codebook document (.pdf needs the `pdf` feature; .txt is pdftotext output).
    #[arg(long, default_value = DEFAULT_DOCUMENT)]
    document: PathBuf,

    /// Where to write the codebook JSON.
    #[arg(long, default_value = DEFAULT_CODEBOOK)]
    output: PathBuf,
}

impl Default for ExtractArgs {
    fn default() -> Self {
        Self {
            document: PathBuf::from(DEFAULT_DOCUMENT),
            output: PathBuf::from(DEFAULT_CODEBOOK),
        }
    }
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Codebook JSON written by `extract`.
    #[arg(long, default_value = DEFAULT_CODEBOOK)]
    codebook: PathBuf,

    /// Tab-separated survey table.
    #[arg(long)]
    table: PathBuf,

    /// Where to write the decoded table.
    #[arg(long)]
    out: PathBuf,

    /// Columns to decode (comma-separated). Defaults to every categorical variable in the table.
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Sentinel cleaning as COLUMN=CODE[,CODE...], e.g. AG2=98,99. Repeatable.
    #[arg(long = "clean", value_parser = parse_clean_arg)]
    clean: Vec<(String, SentinelSet)>,
}

fn parse_clean_arg(s: &str) -> Result<(String, SentinelSet), String> {
    let (column, codes) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=CODES, got '{s}'"))?;
    let sentinels: SentinelSet = codes.parse().map_err(|e| format!("{e}"))?;
    Ok((column.trim().to_string(), sentinels))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,survey_codebook={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn observe() -> ObserverOptions {
    ObserverOptions {
        observer: Some(std::sync::Arc::new(TracingObserver)),
        ..Default::default()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Command::Extract(ExtractArgs::default())) {
        Command::Extract(args) => run_extract(args),
        Command::Decode(args) => run_decode(args),
    }
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let options = DocumentOptions {
        observe: observe(),
        ..Default::default()
    };
    let codebook = build_codebook(&args.document, &args.output, &options)
        .with_context(|| format!("failed to build codebook from {}", args.document.display()))?;
    println!("Parsed {} variables. Saved to {}", codebook.len(), args.output.display());
    Ok(())
}

fn run_decode(args: DecodeArgs) -> Result<()> {
    let plan = if args.columns.is_empty() && args.clean.is_empty() {
        None
    } else {
        let plan = args.columns.iter().fold(DecodePlan::new(), |plan, c| plan.decode(c.as_str()));
        Some(
            args.clean
                .into_iter()
                .fold(plan, |plan, (column, sentinels)| plan.clean(column, sentinels)),
        )
    };

    let options = TableOptions {
        observe: observe(),
        ..Default::default()
    };
    let report = decode_table(&args.codebook, &args.table, &args.out, plan, &options)
        .with_context(|| format!("failed to decode {}", args.table.display()))?;

    let newly_missing: usize = report.columns.iter().map(|c| c.newly_missing()).sum();
    println!(
        "Processed {} column steps ({} values set missing). Saved to {}",
        report.columns.len(),
        newly_missing,
        args.out.display()
    );
    Ok(())
}
