//! quizmark CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizmark", version, about = "Quiz answer grading and attempt reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade an answer sheet against a quiz
    Grade {
        /// Path to the .toml or .json quiz
        #[arg(long)]
        quiz: PathBuf,

        /// Path to the JSON answer sheet
        #[arg(long)]
        answers: PathBuf,

        /// Passing grade (0-100), overrides the quiz and config
        #[arg(long)]
        passing_grade: Option<f64>,

        /// Output format: text, json, markdown
        #[arg(long)]
        format: Option<String>,

        /// Directory to write the attempt report and submission to
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the attempt report to the configured output directory
        #[arg(long)]
        save: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate quiz files
    Validate {
        /// Path to quiz file or directory
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Show each question with its answer key
    Show {
        /// Path to the quiz file
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Compare two attempt reports
    Compare {
        /// Earlier attempt report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Later attempt report JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if any question lost marks
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config and example quiz
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizmark=info".parse().unwrap())
                .add_directive("quizmark_core=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            quiz,
            answers,
            passing_grade,
            format,
            output,
            save,
            config,
        } => {
            commands::grade::execute(quiz, answers, passing_grade, format, output, save, config)
                .await
        }
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::Show { quiz } => commands::show::execute(quiz),
        Commands::Compare {
            baseline,
            current,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, fail_on_regression, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
