//! Attempt reports with JSON persistence and attempt-to-attempt comparison.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::evaluator::Correctness;
use crate::model::Quiz;
use crate::scoring::ScoreSummary;

/// The graded result of one quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    /// Unique report identifier.
    pub id: Uuid,
    pub quiz_id: String,
    /// 1-based attempt number.
    pub attempt_number: u32,
    /// When the attempt was submitted.
    pub attempt_date: DateTime<Utc>,
    pub passing_grade: f64,
    pub summary: ScoreSummary,
}

/// Payload of the "submit quiz attempt" mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSubmission {
    pub quiz_id: String,
    pub score: f64,
    /// Serialized as ISO-8601.
    pub attempt_date: DateTime<Utc>,
}

impl AttemptReport {
    pub fn new(quiz: &Quiz, passing_grade: f64, attempt_number: u32, summary: ScoreSummary) -> Self {
        Self {
            id: Uuid::new_v4(),
            quiz_id: quiz.id.clone(),
            attempt_number,
            attempt_date: Utc::now(),
            passing_grade,
            summary,
        }
    }

    pub fn submission(&self) -> AttemptSubmission {
        AttemptSubmission {
            quiz_id: self.quiz_id.clone(),
            score: self.summary.score,
            attempt_date: self.attempt_date,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AttemptReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the attempt breakdown as markdown.
    pub fn to_markdown(&self) -> String {
        let summary = &self.summary;
        let counts = summary.classify().counts();
        let mut md = String::new();

        md.push_str(&format!(
            "## Quiz `{}` (attempt {})\n\n",
            self.quiz_id, self.attempt_number
        ));
        md.push_str(&format!(
            "**Score:** {:.2} / {:.2} ({:.1}%), {} at passing grade {:.1}%\n\n",
            summary.score,
            summary.total_score,
            summary.percentage,
            if summary.passed { "passed" } else { "failed" },
            self.passing_grade
        ));
        md.push_str(&format!(
            "{} correct, {} incorrect, {} pending review\n\n",
            counts.correct, counts.incorrect, counts.pending
        ));

        md.push_str("| Question | Type | Result | Marks |\n");
        md.push_str("|----------|------|--------|-------|\n");
        for o in &summary.outcomes {
            md.push_str(&format!(
                "| {} | {} | {} | {:.2} / {:.2} |\n",
                o.question_id,
                o.question_type,
                correctness_label(o.correctness),
                o.earned_marks,
                o.max_marks
            ));
        }

        md
    }

    /// Compare this attempt against an earlier one of the same quiz.
    pub fn compare(&self, baseline: &AttemptReport) -> AttemptComparison {
        let marks = |report: &AttemptReport| -> HashMap<String, f64> {
            report
                .summary
                .outcomes
                .iter()
                .map(|o| (o.question_id.clone(), o.earned_marks))
                .collect()
        };
        let baseline_marks = marks(baseline);
        let current_marks = marks(self);

        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_questions = 0usize;

        // Walk in question order so the listing is stable.
        for outcome in &self.summary.outcomes {
            let current = outcome.earned_marks;
            let Some(&previous) = baseline_marks.get(&outcome.question_id) else {
                new_questions += 1;
                continue;
            };
            let change = MarkChange {
                question_id: outcome.question_id.clone(),
                baseline_marks: previous,
                current_marks: current,
                delta: current - previous,
            };
            if change.delta < 0.0 {
                regressions.push(change);
            } else if change.delta > 0.0 {
                improvements.push(change);
            } else {
                unchanged += 1;
            }
        }

        let removed_questions = baseline_marks
            .keys()
            .filter(|k| !current_marks.contains_key(*k))
            .count();

        AttemptComparison {
            quiz_id: self.quiz_id.clone(),
            baseline_attempt: baseline.attempt_number,
            current_attempt: self.attempt_number,
            score_delta: self.summary.score - baseline.summary.score,
            percentage_delta: self.summary.percentage - baseline.summary.percentage,
            regressions,
            improvements,
            unchanged,
            new_questions,
            removed_questions,
        }
    }
}

fn correctness_label(correctness: Correctness) -> &'static str {
    match correctness {
        Correctness::Correct => "correct",
        Correctness::Incorrect => "incorrect",
        Correctness::Pending => "pending",
    }
}

/// Result of comparing two attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptComparison {
    pub quiz_id: String,
    pub baseline_attempt: u32,
    pub current_attempt: u32,
    pub score_delta: f64,
    pub percentage_delta: f64,
    /// Questions that earned fewer marks than before.
    pub regressions: Vec<MarkChange>,
    /// Questions that earned more marks than before.
    pub improvements: Vec<MarkChange>,
    pub unchanged: usize,
    /// Questions in current but not baseline.
    pub new_questions: usize,
    /// Questions in baseline but not current.
    pub removed_questions: usize,
}

/// Change in earned marks for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkChange {
    pub question_id: String,
    pub baseline_marks: f64,
    pub current_marks: f64,
    pub delta: f64,
}

impl AttemptComparison {
    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** attempt {} vs {}: {:+.2} marks ({:+.1}%), {} regressions, {} improvements, {} unchanged\n\n",
            self.current_attempt,
            self.baseline_attempt,
            self.score_delta,
            self.percentage_delta,
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged
        ));

        for (heading, changes) in [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {heading}\n\n"));
            md.push_str("| Question | Baseline | Current | Delta |\n");
            md.push_str("|----------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {:+.2} |\n",
                    c.question_id, c.baseline_marks, c.current_marks, c.delta
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if any question lost marks.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
