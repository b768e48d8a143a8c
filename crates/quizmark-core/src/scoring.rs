//! Aggregate scoring of a whole attempt.

use serde::{Deserialize, Serialize};

use crate::evaluator::{evaluate, Correctness};
use crate::model::{AnswerSheet, Question, QuestionType};

/// Evaluation of one question within an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub question_type: QuestionType,
    pub correctness: Correctness,
    pub earned_marks: f64,
    pub max_marks: f64,
}

/// Score of an attempt and its per-question breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Sum of earned marks.
    pub score: f64,
    /// Sum of question marks.
    pub total_score: f64,
    /// `score / total_score * 100`, or 0 when nothing can be scored.
    pub percentage: f64,
    pub passed: bool,
    /// Outcomes in question order.
    pub outcomes: Vec<QuestionOutcome>,
}

impl ScoreSummary {
    pub fn classify(&self) -> Classification {
        classify(&self.outcomes)
    }
}

/// Score every question of an attempt against `passing_grade` (0–100).
///
/// Manual-grading questions are evaluated too and contribute nothing until
/// graded. Answers for ids that are not in `questions` are ignored.
pub fn score(questions: &[Question], answers: &AnswerSheet, passing_grade: f64) -> ScoreSummary {
    let mut outcomes = Vec::with_capacity(questions.len());
    let mut score = 0.0;
    let mut total_score = 0.0;

    for question in questions {
        let evaluation = evaluate(question, answers.get(&question.id));
        let max_marks = question.max_marks();
        score += evaluation.earned_marks;
        total_score += max_marks;
        outcomes.push(QuestionOutcome {
            question_id: question.id.clone(),
            question_type: question.question_type,
            correctness: evaluation.correctness,
            earned_marks: evaluation.earned_marks,
            max_marks,
        });
    }

    let percentage = if total_score > 0.0 {
        score / total_score * 100.0
    } else {
        0.0
    };
    let passed = percentage >= passing_grade;

    tracing::debug!(
        questions = questions.len(),
        score,
        total_score,
        percentage,
        passed,
        "scored attempt"
    );

    ScoreSummary {
        score,
        total_score,
        percentage,
        passed,
        outcomes,
    }
}

/// Question ids grouped by verdict, each group in question order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub correct: Vec<String>,
    pub incorrect: Vec<String>,
    pub pending: Vec<String>,
}

/// Counts per verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationCounts {
    pub correct: usize,
    pub incorrect: usize,
    pub pending: usize,
}

impl Classification {
    pub fn counts(&self) -> ClassificationCounts {
        ClassificationCounts {
            correct: self.correct.len(),
            incorrect: self.incorrect.len(),
            pending: self.pending.len(),
        }
    }
}

pub fn classify(outcomes: &[QuestionOutcome]) -> Classification {
    let mut classification = Classification::default();
    for outcome in outcomes {
        let bucket = match outcome.correctness {
            Correctness::Correct => &mut classification.correct,
            Correctness::Incorrect => &mut classification.incorrect,
            Correctness::Pending => &mut classification.pending,
        };
        bucket.push(outcome.question_id.clone());
    }
    classification
}
