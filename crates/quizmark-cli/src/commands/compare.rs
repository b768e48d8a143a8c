//! The `quizmark compare` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmark_core::report::AttemptReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = AttemptReport::load_json(&baseline_path)?;
    let current = AttemptReport::load_json(&current_path)?;

    if baseline.quiz_id != current.quiz_id {
        eprintln!(
            "Warning: comparing attempts of different quizzes ({} vs {})",
            baseline.quiz_id, current.quiz_id
        );
    }

    let report = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            // text format
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged ({:+.2} marks)",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged,
                report.score_delta
            );

            if !report.regressions.is_empty() {
                println!("\nRegressions:");
                for r in &report.regressions {
                    println!(
                        "  {} {:.2} -> {:.2} ({:+.2})",
                        r.question_id, r.baseline_marks, r.current_marks, r.delta
                    );
                }
            }

            if !report.improvements.is_empty() {
                println!("\nImprovements:");
                for i in &report.improvements {
                    println!(
                        "  {} {:.2} -> {:.2} ({:+.2})",
                        i.question_id, i.baseline_marks, i.current_marks, i.delta
                    );
                }
            }

            if report.new_questions > 0 {
                println!("\n{} new question(s)", report.new_questions);
            }
            if report.removed_questions > 0 {
                println!("{} removed question(s)", report.removed_questions);
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
