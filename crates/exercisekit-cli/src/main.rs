//! exercisekit CLI — developer tooling for exercise question sets.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "exercisekit", version, about = "Interactive exercise engine tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize and decode every question, printing warnings
    Validate {
        /// Path to a question-set JSON file or directory
        #[arg(long)]
        questions: PathBuf,
    },

    /// Print the debug overlay for each question
    Inspect {
        /// Path to a question-set JSON file
        #[arg(long)]
        questions: PathBuf,

        /// Only inspect the question with this ID
        #[arg(long)]
        id: Option<String>,

        /// Show the overlay even in production
        #[arg(long)]
        debug: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Replay a submission's responses through the widgets
    Grade {
        /// Path to a question-set JSON file
        #[arg(long)]
        questions: PathBuf,

        /// Path to a submission JSON file
        #[arg(long)]
        submission: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and example question set
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("exercisekit=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Inspect {
            questions,
            id,
            debug,
            config,
        } => commands::inspect::execute(questions, id, debug, config),
        Commands::Grade {
            questions,
            submission,
            json,
            config,
        } => commands::grade::execute(questions, submission, json, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
