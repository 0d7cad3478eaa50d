use crate::config::LogFormat;
use crate::record::Category;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Incremental symbol lookup over javadoc search indexes", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Overrides the configured log format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the lookup tools over MCP on stdio
    Serve {
        /// Index files or javadoc directories to load at startup
        #[arg(short, long)]
        index: Vec<PathBuf>,
        #[arg(long)]
        debounce_ms: Option<u64>,
        #[arg(long)]
        max_results: Option<usize>,
    },
    /// Run a single query and print the ranked results
    Query {
        query: String,
        #[arg(short, long)]
        index: Vec<PathBuf>,
        #[arg(short, long, value_enum)]
        category: Option<Category>,
        #[arg(short = 'n', long, default_value = "25")]
        limit: usize,
        /// Print the result payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print per-category symbol counts
    Stats {
        #[arg(short, long)]
        index: Vec<PathBuf>,
    },
}
