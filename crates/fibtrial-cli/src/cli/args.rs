use clap::{Parser, Subcommand, ValueEnum};
use fibtrial_core::model::Parity;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fibtrial",
    version,
    about = "Register a candidate, store a Fibonacci evaluation dataset and report on it"
)]
pub struct Cli {
    /// SQLite database file (overrides config and FIBTRIAL_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// YAML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// tracing filter, e.g. info or fibtrial_core=debug (overrides FIBTRIAL_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register a candidate and run the full pipeline
    Run(RunArgs),
    /// Print aggregates for a candidate
    Summary(SummaryArgs),
    /// List stored results
    List(ListArgs),
    /// List registered candidates
    Candidates(FormatArgs),
    /// Delete a candidate and all of its results
    Delete(DeleteArgs),
    /// Remove results above a value threshold, across all candidates
    Prune(PruneArgs),
    /// Write stored results to a JSON file
    Export(ExportArgs),
    /// Show row counts and schema version of the database
    Stats(FormatArgs),
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParityArg {
    Even,
    Odd,
}

impl From<ParityArg> for Parity {
    fn from(p: ParityArg) -> Self {
        match p {
            ParityArg::Even => Parity::Even,
            ParityArg::Odd => Parity::Odd,
        }
    }
}

#[derive(clap::Args, Clone, Debug)]
pub struct FormatArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Clone, Debug)]
pub struct RunArgs {
    /// Candidate name
    #[arg(long)]
    pub name: String,

    /// Number of Fibonacci values to generate (1..=93)
    #[arg(long)]
    pub count: Option<i64>,

    /// After saving, remove results above this threshold for ALL candidates in the
    /// database, not only this run's (default 5000 when given without a value)
    #[arg(long, num_args = 0..=1)]
    pub prune_above: Option<Option<u64>>,

    /// Number of largest values listed in the report
    #[arg(long)]
    pub top: Option<u32>,

    /// Write the candidate's results to this JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Write the Markdown report to this path instead of report.md
    #[arg(long, conflicts_with = "no_report")]
    pub report: Option<PathBuf>,

    /// Skip writing the Markdown report
    #[arg(long)]
    pub no_report: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Clone, Debug)]
pub struct SummaryArgs {
    #[arg(long)]
    pub candidate: i64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub candidate: Option<i64>,

    #[arg(long, value_enum)]
    pub parity: Option<ParityArg>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Clone, Debug)]
pub struct DeleteArgs {
    #[arg(long)]
    pub candidate: i64,
}

#[derive(clap::Args, Clone, Debug)]
pub struct PruneArgs {
    #[arg(long, default_value_t = fibtrial_core::config::DEFAULT_PRUNE_THRESHOLD)]
    pub above: u64,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ExportArgs {
    #[arg(long)]
    pub out: PathBuf,

    /// Only export this candidate's results
    #[arg(long)]
    pub candidate: Option<i64>,
}
