use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "dataset-scope")]
#[command(about = "Summarize CSV datasets and tally function-call rows", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize every CSV file in the dataset directory
    Scan(ScanArgs),
    /// Summarize a single CSV file
    Inspect {
        /// Path to the CSV file
        file: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Resolve the download path of a dataset file
    Locate {
        /// File name inside the dataset directory
        filename: String,
        /// Dataset directory (overrides configuration)
        #[arg(long)]
        dir: Option<String>,
    },
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Dataset directory (overrides configuration)
    #[arg(long)]
    pub dir: Option<String>,
    /// Summarize files in parallel
    #[arg(long)]
    pub parallel: bool,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
