//! The `quizmark grade` command.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;

use quizmark_core::config::load_config_from;
use quizmark_core::evaluator::Correctness;
use quizmark_core::format::{format_answer, format_correct_answers};
use quizmark_core::model::{AnswerSheet, Quiz};
use quizmark_core::parser;
use quizmark_core::report::AttemptReport;
use quizmark_core::session::QuizSession;
use quizmark_core::traits::{JsonFileSink, MemorySink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => anyhow::bail!("unknown format: {other} (expected text, json or markdown)"),
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    quiz_path: PathBuf,
    answers_path: PathBuf,
    passing_grade: Option<f64>,
    format: Option<String>,
    output: Option<PathBuf>,
    save: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let quiz = parser::parse_quiz(&quiz_path)?;
    let answers = parser::parse_answers(&answers_path)?;
    for w in parser::validate_answers(&quiz, &answers) {
        eprintln!("Warning: {}", w.message);
    }

    let passing_grade = passing_grade
        .or(config.default_passing_grade)
        .unwrap_or(quiz.passing_grade);
    anyhow::ensure!(
        (0.0..=100.0).contains(&passing_grade),
        "passing grade must be between 0 and 100"
    );
    let format: OutputFormat = format
        .as_deref()
        .unwrap_or(&config.default_format)
        .parse()?;
    let output = if save || output.is_some() {
        Some(output.unwrap_or_else(|| config.output_dir.clone()))
    } else {
        None
    };

    tracing::debug!(
        quiz_id = %quiz.id,
        passing_grade,
        format = ?format,
        "grading {}",
        answers_path.display()
    );

    let mut session = QuizSession::new(quiz).with_passing_grade(passing_grade);
    session.start_attempt()?;
    let report = match &output {
        Some(dir) => {
            let sink = JsonFileSink::new(dir.join("submissions.jsonl"));
            session.submit(&answers, &sink).await?
        }
        None => session.submit(&answers, &MemorySink::new()).await?,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Markdown => println!("{}", report.to_markdown()),
        OutputFormat::Text => print_breakdown(session.quiz(), &answers, &report),
    }

    if let Some(dir) = output {
        let timestamp = report.attempt_date.format("%Y-%m-%dT%H%M%S");
        let short_id = &report.id.to_string()[..8];
        let path = dir.join(format!("attempt-{timestamp}-{short_id}.json"));
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_breakdown(quiz: &Quiz, answers: &AnswerSheet, report: &AttemptReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Question",
        "Type",
        "Answer",
        "Correct answer",
        "Result",
        "Marks",
    ]);

    for (question, outcome) in quiz.questions.iter().zip(&report.summary.outcomes) {
        let result = match outcome.correctness {
            Correctness::Correct => "correct",
            Correctness::Incorrect => "incorrect",
            Correctness::Pending => "pending review",
        };
        table.add_row(vec![
            Cell::new(&question.id),
            Cell::new(question.question_type),
            Cell::new(format_answer(answers.get(&question.id), question.question_type)),
            Cell::new(format_correct_answers(
                question.correct_answers(),
                question.question_type,
            )),
            Cell::new(result),
            Cell::new(format!("{:.2} / {:.2}", outcome.earned_marks, outcome.max_marks)),
        ]);
    }

    println!("{table}");

    let summary = &report.summary;
    let counts = summary.classify().counts();
    println!(
        "\nScore: {:.2} / {:.2} ({:.1}%), {} (passing grade {:.1}%)",
        summary.score,
        summary.total_score,
        summary.percentage,
        if summary.passed { "PASSED" } else { "FAILED" },
        report.passing_grade
    );
    println!(
        "{} correct, {} incorrect, {} pending review",
        counts.correct, counts.incorrect, counts.pending
    );
}
