//! GedGraph CLI - Genealogy charts from GEDCOM files
//!
//! This is the main entry point for users interacting with GedGraph.
//! It provides commands for pedigree, descendant and relationship charts.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod chart;
mod commands;
mod config;

use config::GedgraphConfig;

#[derive(Parser)]
#[command(name = "gedgraph")]
#[command(author = "GedGraph Contributors")]
#[command(version)]
#[command(about = "Generate genealogical charts from GEDCOM files", long_about = None)]
#[command(after_help = "Examples:
  gedgraph pedigree family.ged @I10@ -o pedigree.dot
  gedgraph pedigree family.ged @I10@ -g 5 -o pedigree.dot
  gedgraph relationship family.ged @I10@ @I20@ -o relationship.dot")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to .gedgraph.json in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a pedigree chart for an individual
    Pedigree {
        /// Path to GEDCOM file
        gedcom: PathBuf,

        /// Individual ID (e.g. @I10@)
        individual: String,

        /// Number of generations [default: 4]
        #[arg(short, long)]
        generations: Option<usize>,

        /// Output DOT file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate a descendant chart for an individual
    Descendants {
        /// Path to GEDCOM file
        gedcom: PathBuf,

        /// Individual ID (e.g. @I10@)
        individual: String,

        /// Number of generations [default: 3]
        #[arg(short, long)]
        generations: Option<usize>,

        /// Output DOT file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate a relationship chart between two individuals
    Relationship {
        /// Path to GEDCOM file
        gedcom: PathBuf,

        /// First individual ID
        individual1: String,

        /// Second individual ID
        individual2: String,

        /// Maximum search depth [default: 50]
        #[arg(short = 'd', long)]
        max_depth: Option<usize>,

        /// Output DOT file path
        #[arg(short, long)]
        output: PathBuf,

        /// Print the ranked paths as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show record counts for a GEDCOM file
    Info {
        /// Path to GEDCOM file
        gedcom: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();

    let result = match GedgraphConfig::resolve(cli.config.as_deref(), Path::new(".")) {
        Ok(config) => run(cli.command, &config),
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &GedgraphConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Pedigree {
            gedcom,
            individual,
            generations,
            output,
        } => commands::pedigree(
            &gedcom,
            &individual,
            generations.unwrap_or(config.generations),
            &output,
        ),
        Commands::Descendants {
            gedcom,
            individual,
            generations,
            output,
        } => commands::descendants(
            &gedcom,
            &individual,
            generations.unwrap_or(config.descendant_generations),
            &output,
        ),
        Commands::Relationship {
            gedcom,
            individual1,
            individual2,
            max_depth,
            output,
            json,
        } => commands::relationship(
            &gedcom,
            &individual1,
            &individual2,
            max_depth.unwrap_or(config.max_depth),
            &output,
            json,
        ),
        Commands::Info { gedcom } => commands::info(&gedcom),
    }
}
