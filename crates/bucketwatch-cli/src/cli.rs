use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bucketwatch",
    about = "Reconcile an object namespace by periodic listing",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Poll a directory and report added and removed objects
    Watch(WatchArgs),
    /// List a directory once, page by page
    List(ListArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Directory to treat as the object namespace
    pub root: PathBuf,
    #[arg(long)]
    pub prefix: Option<String>,
    #[arg(long)]
    pub interval_secs: Option<u64>,
    #[arg(long)]
    pub page_size: Option<usize>,
    #[arg(long)]
    pub batch_size: Option<usize>,
    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Directory to treat as the object namespace
    pub root: PathBuf,
    #[arg(long)]
    pub prefix: Option<String>,
    #[arg(long)]
    pub page_size: Option<usize>,
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}
