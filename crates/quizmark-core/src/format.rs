//! Display helpers for answers and answer keys.

use crate::evaluator::{fill_in_tokens, matrix_expected};
use crate::model::{Answer, QuestionType};

/// Shown for an unanswered question.
pub const NO_ANSWER: &str = "No answer";

/// Shown as the answer key of a manual-grading question.
pub const PENDING_REVIEW: &str = "Pending manual grading";

/// Render a learner's answer for display.
pub fn format_answer(answer: Option<&Answer>, question_type: QuestionType) -> String {
    match answer {
        None => NO_ANSWER.to_string(),
        Some(Answer::Text(text)) => text.clone(),
        Some(Answer::List(items)) => items.join(list_separator(question_type)),
    }
}

/// Render a question's correct answers for display.
pub fn format_correct_answers(correct: Option<&[String]>, question_type: QuestionType) -> String {
    let Some(correct) = correct else {
        return if question_type.is_manual() {
            PENDING_REVIEW.to_string()
        } else {
            String::new()
        };
    };

    match question_type {
        QuestionType::FillInTheBlanks => fill_in_tokens(correct).join(" "),
        QuestionType::MatrixSorting => correct
            .iter()
            .map(|entry| matrix_expected(entry).unwrap_or(entry))
            .collect::<Vec<_>>()
            .join(", "),
        _ => correct.join(", "),
    }
}

fn list_separator(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::FillInTheBlanks => " ",
        _ => ", ",
    }
}
