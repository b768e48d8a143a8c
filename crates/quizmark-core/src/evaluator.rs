//! Per-question answer evaluation.
//!
//! `evaluate` never fails: unanswered and unconfigured questions earn nothing,
//! and manual-grading types stay pending until a human grades them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Answer, Question, QuestionType, BLANK_MARKER};

/// Tri-state verdict for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correctness {
    /// Fully correct.
    Correct,
    /// Wrong, partially wrong, or unanswered.
    Incorrect,
    /// Needs a human grader.
    Pending,
}

impl Correctness {
    pub fn is_correct(&self) -> bool {
        matches!(self, Correctness::Correct)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Correctness::Pending)
    }
}

/// Result of evaluating one answer against one question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub correctness: Correctness,
    /// Credit earned, between 0 and the question's mark.
    pub earned_marks: f64,
}

impl Evaluation {
    fn incorrect() -> Self {
        Self {
            correctness: Correctness::Incorrect,
            earned_marks: 0.0,
        }
    }

    fn pending() -> Self {
        Self {
            correctness: Correctness::Pending,
            earned_marks: 0.0,
        }
    }

    fn all_or_nothing(correct: bool, mark: f64) -> Self {
        if correct {
            Self {
                correctness: Correctness::Correct,
                earned_marks: mark,
            }
        } else {
            Self::incorrect()
        }
    }

    /// Credit proportional to `matched / total`; correct only when all match.
    fn proportional(matched: usize, total: usize, mark: f64) -> Self {
        if total == 0 {
            return Self::incorrect();
        }
        let correctness = if matched == total {
            Correctness::Correct
        } else {
            Correctness::Incorrect
        };
        Self {
            correctness,
            earned_marks: mark * matched as f64 / total as f64,
        }
    }
}

/// Evaluate a learner's answer (`None` = unanswered) to a question.
pub fn evaluate(question: &Question, answer: Option<&Answer>) -> Evaluation {
    let evaluation = evaluate_inner(question, answer);
    tracing::trace!(
        question_id = %question.id,
        question_type = %question.question_type,
        correctness = ?evaluation.correctness,
        earned_marks = evaluation.earned_marks,
        "evaluated question"
    );
    evaluation
}

fn evaluate_inner(question: &Question, answer: Option<&Answer>) -> Evaluation {
    let Some(answer) = answer else {
        return Evaluation::incorrect();
    };
    if question.question_type.is_manual() {
        return Evaluation::pending();
    }
    let Some(correct) = question.correct_answers() else {
        return Evaluation::incorrect();
    };

    let mark = question.max_marks();
    match question.question_type {
        QuestionType::TrueFalse | QuestionType::SingleChoice => {
            let matched = match (answer.as_text(), correct.first()) {
                (Some(given), Some(expected)) => given == expected,
                _ => false,
            };
            Evaluation::all_or_nothing(matched, mark)
        }
        QuestionType::MultipleChoice => evaluate_multiple_choice(correct, answer, mark),
        QuestionType::FillInTheBlanks => {
            let tokens = fill_in_tokens(correct);
            let given = answer.items();
            let matched = tokens
                .iter()
                .enumerate()
                .filter(|(i, token)| given.get(*i).is_some_and(|g| loosely_equal(g, token)))
                .count();
            Evaluation::proportional(matched, tokens.len(), mark)
        }
        QuestionType::Sorting => {
            let given = answer.items();
            let matched = correct
                .iter()
                .enumerate()
                .filter(|(i, expected)| given.get(*i) == Some(&expected.as_str()))
                .count();
            Evaluation::proportional(matched, correct.len(), mark)
        }
        QuestionType::MatrixSorting => {
            let given = answer.items();
            let matched = correct
                .iter()
                .enumerate()
                .filter(|(i, entry)| match (matrix_expected(entry), given.get(*i)) {
                    (Some(expected), Some(g)) => loosely_equal(g, expected),
                    _ => false,
                })
                .count();
            Evaluation::proportional(matched, correct.len(), mark)
        }
        QuestionType::FreeChoice | QuestionType::Essay | QuestionType::Assessment => {
            Evaluation::pending()
        }
    }
}

/// Any wrong selection forfeits the question; otherwise credit is the share
/// of correct options picked.
fn evaluate_multiple_choice(correct: &[String], answer: &Answer, mark: f64) -> Evaluation {
    let correct_set: HashSet<&str> = correct.iter().map(String::as_str).collect();
    let selected: HashSet<&str> = answer.items().into_iter().collect();

    let correct_count = selected.iter().filter(|s| correct_set.contains(*s)).count();
    let incorrect_count = selected.len() - correct_count;

    if incorrect_count > 0 {
        return Evaluation::incorrect();
    }
    Evaluation::proportional(correct_count, correct_set.len(), mark)
}

fn loosely_equal(given: &str, expected: &str) -> bool {
    given.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Tokens of a fill-in-the-blanks answer key (`"a|b|c"` → `["a", "b", "c"]`).
pub fn fill_in_tokens(correct: &[String]) -> Vec<&str> {
    correct
        .first()
        .map(|key| key.split('|').collect())
        .unwrap_or_default()
}

/// The expected (column B) value of a matrix entry `"columnA:columnB"`.
pub fn matrix_expected(entry: &str) -> Option<&str> {
    entry.split_once(':').map(|(_, b)| b)
}

/// Number of blanks marked in a fill-in-the-blanks description.
pub fn blank_count(description: &str) -> usize {
    description.matches(BLANK_MARKER).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionSettings;

    fn question(question_type: QuestionType, mark: f64, correct: Option<Vec<&str>>) -> Question {
        Question {
            id: "q".into(),
            question_type,
            title: String::new(),
            description: String::new(),
            mark,
            settings: QuestionSettings {
                correct_answers: correct.map(|c| c.into_iter().map(String::from).collect()),
                ..Default::default()
            },
        }
    }

    fn marks(q: &Question, answer: impl Into<Answer>) -> f64 {
        evaluate(q, Some(&answer.into())).earned_marks
    }

    #[test]
    fn unanswered_is_incorrect_for_every_type() {
        for t in QuestionType::ALL {
            let q = question(t, 5.0, Some(vec!["x"]));
            let eval = evaluate(&q, None);
            assert_eq!(eval.correctness, Correctness::Incorrect, "{t}");
            assert_eq!(eval.earned_marks, 0.0, "{t}");
        }
    }

    #[test]
    fn exact_match_types_award_full_mark() {
        let tf = question(QuestionType::TrueFalse, 3.0, Some(vec!["true"]));
        let eval = evaluate(&tf, Some(&"true".into()));
        assert_eq!(eval.correctness, Correctness::Correct);
        assert_eq!(eval.earned_marks, 3.0);
        assert_eq!(marks(&tf, "false"), 0.0);

        let sc = question(QuestionType::SingleChoice, 2.0, Some(vec!["Madrid"]));
        assert_eq!(marks(&sc, "Madrid"), 2.0);
    }

    #[test]
    fn exact_match_is_case_sensitive() {
        let sc = question(QuestionType::SingleChoice, 2.0, Some(vec!["Madrid"]));
        let eval = evaluate(&sc, Some(&"madrid".into()));
        assert_eq!(eval.correctness, Correctness::Incorrect);
        assert_eq!(eval.earned_marks, 0.0);
    }

    #[test]
    fn list_answer_to_scalar_type_never_matches() {
        let sc = question(QuestionType::SingleChoice, 2.0, Some(vec!["Madrid"]));
        assert_eq!(marks(&sc, vec!["Madrid"]), 0.0);
    }

    #[test]
    fn multiple_choice_zero_incorrect_gate() {
        let q = question(QuestionType::MultipleChoice, 10.0, Some(vec!["A", "B"]));

        let partial = evaluate(&q, Some(&vec!["A"].into()));
        assert_eq!(partial.earned_marks, 5.0);
        assert_eq!(partial.correctness, Correctness::Incorrect);

        let full = evaluate(&q, Some(&vec!["A", "B"].into()));
        assert_eq!(full.earned_marks, 10.0);
        assert_eq!(full.correctness, Correctness::Correct);

        let wrong = evaluate(&q, Some(&vec!["A", "C"].into()));
        assert_eq!(wrong.earned_marks, 0.0);
        assert_eq!(wrong.correctness, Correctness::Incorrect);
    }

    #[test]
    fn multiple_choice_ignores_duplicate_selections() {
        let q = question(QuestionType::MultipleChoice, 10.0, Some(vec!["A", "B"]));
        assert_eq!(marks(&q, vec!["A", "A"]), 5.0);
    }

    #[test]
    fn multiple_choice_accepts_single_text_selection() {
        let q = question(QuestionType::MultipleChoice, 10.0, Some(vec!["A", "B"]));
        assert_eq!(marks(&q, "B"), 5.0);
    }

    #[test]
    fn fill_in_the_blanks_tokenization() {
        let q = question(
            QuestionType::FillInTheBlanks,
            9.0,
            Some(vec!["Manzana|Perro|Gato"]),
        );
        let full = evaluate(&q, Some(&vec!["manzana", "perro", "gato"].into()));
        assert_eq!(full.earned_marks, 9.0);
        assert_eq!(full.correctness, Correctness::Correct);

        let partial = evaluate(&q, Some(&vec!["Manzana", "Pez", "Gato"].into()));
        assert_eq!(partial.earned_marks, 6.0);
        assert_eq!(partial.correctness, Correctness::Incorrect);
    }

    #[test]
    fn fill_in_the_blanks_trims_and_counts_missing_blanks() {
        let q = question(
            QuestionType::FillInTheBlanks,
            9.0,
            Some(vec!["Manzana|Perro|Gato"]),
        );
        assert_eq!(marks(&q, vec!["  MANZANA ", "perro"]), 6.0);
    }

    #[test]
    fn sorting_positional_match() {
        let q = question(QuestionType::Sorting, 6.0, Some(vec!["Do", "You", "Like"]));
        assert_eq!(marks(&q, vec!["Do", "You", "Like"]), 6.0);
        assert_eq!(marks(&q, vec!["You", "Do", "Like"]), 2.0);
        assert_eq!(marks(&q, vec!["do", "you", "like"]), 0.0);
    }

    #[test]
    fn matrix_sorting_compares_column_b() {
        let q = question(
            QuestionType::MatrixSorting,
            4.0,
            Some(vec!["Dog:Perro", "Cat:Gato"]),
        );
        let eval = evaluate(&q, Some(&vec!["perro", "gato"].into()));
        assert_eq!(eval.earned_marks, 4.0);
        assert_eq!(eval.correctness, Correctness::Correct);
        assert_eq!(marks(&q, vec!["gato", "perro"]), 0.0);
        assert_eq!(marks(&q, vec!["Perro", "Pez"]), 2.0);
    }

    #[test]
    fn matrix_entry_without_separator_never_matches() {
        let q = question(QuestionType::MatrixSorting, 4.0, Some(vec!["Perro", "Cat:Gato"]));
        assert_eq!(marks(&q, vec!["Perro", "Gato"]), 2.0);
    }

    #[test]
    fn manual_types_stay_pending() {
        for t in [
            QuestionType::FreeChoice,
            QuestionType::Essay,
            QuestionType::Assessment,
        ] {
            let q = question(t, 5.0, None);
            let eval = evaluate(&q, Some(&"A long and thoughtful answer".into()));
            assert_eq!(eval.correctness, Correctness::Pending);
            assert_eq!(eval.earned_marks, 0.0);

            let configured = question(t, 5.0, Some(vec!["anything"]));
            let eval = evaluate(&configured, Some(&"anything".into()));
            assert_eq!(eval.correctness, Correctness::Pending);
        }
    }

    #[test]
    fn unconfigured_question_is_incorrect() {
        let q = question(QuestionType::SingleChoice, 5.0, None);
        let eval = evaluate(&q, Some(&"A".into()));
        assert_eq!(eval.correctness, Correctness::Incorrect);
        assert_eq!(eval.earned_marks, 0.0);
    }

    #[test]
    fn empty_correct_answers_earn_nothing() {
        for t in [
            QuestionType::TrueFalse,
            QuestionType::MultipleChoice,
            QuestionType::Sorting,
            QuestionType::MatrixSorting,
            QuestionType::FillInTheBlanks,
        ] {
            let q = question(t, 5.0, Some(vec![]));
            let eval = evaluate(&q, Some(&vec!["a"].into()));
            assert_eq!(eval.correctness, Correctness::Incorrect, "{t}");
            assert_eq!(eval.earned_marks, 0.0, "{t}");
        }
    }

    #[test]
    fn negative_mark_is_clamped() {
        let q = question(QuestionType::TrueFalse, -3.0, Some(vec!["true"]));
        let eval = evaluate(&q, Some(&"true".into()));
        assert_eq!(eval.correctness, Correctness::Correct);
        assert_eq!(eval.earned_marks, 0.0);
    }

    #[test]
    fn helpers() {
        assert_eq!(
            fill_in_tokens(&["a|b|c".to_string()]),
            vec!["a", "b", "c"]
        );
        assert!(fill_in_tokens(&[]).is_empty());
        assert_eq!(matrix_expected("Dog:Perro"), Some("Perro"));
        assert_eq!(matrix_expected("Time:12:30"), Some("12:30"));
        assert_eq!(matrix_expected("Perro"), None);
        assert_eq!(blank_count("I eat {dash} with my {dash}."), 2);
    }
}
