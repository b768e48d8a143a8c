//! Quiz and answer-sheet loading.
//!
//! Quizzes are authored as TOML files or exported as JSON in the GraphQL
//! shape; answer sheets are JSON objects keyed by question id.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::evaluator::{blank_count, fill_in_tokens};
use crate::model::{AnswerSheet, MatrixMatch, Question, QuestionSettings, QuestionType, Quiz};

/// Intermediate TOML structure for parsing quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizHeader {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    passing_grade: f64,
    #[serde(default)]
    max_attempts: Option<u32>,
    #[serde(default)]
    time_limit_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(rename = "type")]
    question_type: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    mark: f64,
    #[serde(default)]
    settings: Option<TomlSettings>,
}

#[derive(Debug, Deserialize)]
struct TomlSettings {
    #[serde(default)]
    correct_answers: Option<Vec<String>>,
    #[serde(default)]
    sortable_items: Vec<String>,
    #[serde(default)]
    matrix_matches: Vec<TomlMatrixMatch>,
    #[serde(default)]
    show_question_mark: bool,
}

#[derive(Debug, Deserialize)]
struct TomlMatrixMatch {
    column_a: String,
    column_b: String,
}

/// Parse a quiz file, TOML or JSON by extension.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        parse_quiz_json_str(&content, path)
    } else {
        parse_quiz_str(&content, path)
    }
}

/// Parse a TOML string into a `Quiz` (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let question_type: QuestionType = q
                .question_type
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question '{}': {}", q.id, e))?;

            let settings = match q.settings {
                Some(s) => QuestionSettings {
                    correct_answers: s.correct_answers,
                    sortable_items: s.sortable_items,
                    matrix_matches: s
                        .matrix_matches
                        .into_iter()
                        .map(|m| MatrixMatch {
                            column_a: m.column_a,
                            column_b: m.column_b,
                        })
                        .collect(),
                    show_question_mark: s.show_question_mark,
                },
                None => QuestionSettings::default(),
            };

            Ok(Question {
                id: q.id,
                question_type,
                title: q.title,
                description: q.description,
                mark: q.mark,
                settings,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Quiz {
        id: parsed.quiz.id,
        title: parsed.quiz.title,
        description: parsed.quiz.description,
        passing_grade: parsed.quiz.passing_grade,
        max_attempts: parsed.quiz.max_attempts,
        time_limit_secs: parsed.quiz.time_limit_secs,
        questions,
    })
}

/// Parse a quiz exported as JSON in the GraphQL (camelCase) shape.
pub fn parse_quiz_json_str(content: &str, source_path: &Path) -> Result<Quiz> {
    serde_json::from_str(content)
        .with_context(|| format!("failed to parse quiz JSON: {}", source_path.display()))
}

/// Recursively load all `.toml` and `.json` quiz files from a directory.
///
/// Answer sheets (`*-answers.json`) found alongside quizzes are skipped.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if is_quiz_file(&path) {
            match parse_quiz(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

fn is_quiz_file(path: &Path) -> bool {
    let is_answer_sheet = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.ends_with("-answers"));
    let has_quiz_extension = path
        .extension()
        .is_some_and(|ext| ext == "toml" || ext == "json");
    has_quiz_extension && !is_answer_sheet
}

/// Load an answer sheet from a JSON file.
pub fn parse_answers(path: &Path) -> Result<AnswerSheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    parse_answers_str(&content, path)
}

pub fn parse_answers_str(content: &str, source_path: &Path) -> Result<AnswerSheet> {
    serde_json::from_str(content)
        .with_context(|| format!("failed to parse answers JSON: {}", source_path.display()))
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn quiz(message: impl Into<String>) -> Self {
        Self {
            question_id: None,
            message: message.into(),
        }
    }

    fn question(question: &Question, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(question.id.clone()),
            message: message.into(),
        }
    }
}

/// Validate a quiz for authoring mistakes that make questions ungradable.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if !(0.0..=100.0).contains(&quiz.passing_grade) {
        warnings.push(ValidationWarning::quiz(format!(
            "passing_grade {} is outside 0-100",
            quiz.passing_grade
        )));
    }
    if quiz.max_attempts == Some(0) {
        warnings.push(ValidationWarning::quiz(
            "max_attempts is 0, the quiz can never be taken",
        ));
    }

    let mut seen_ids = HashSet::new();
    for question in &quiz.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning::question(
                question,
                format!("duplicate question ID: {}", question.id),
            ));
        }
        if question.mark < 0.0 {
            warnings.push(ValidationWarning::question(
                question,
                format!("negative mark {} is treated as 0", question.mark),
            ));
        }
        validate_answer_key(question, &mut warnings);
    }

    warnings
}

fn validate_answer_key(question: &Question, warnings: &mut Vec<ValidationWarning>) {
    let question_type = question.question_type;
    let Some(correct) = question.correct_answers() else {
        if !question_type.is_manual() {
            warnings.push(ValidationWarning::question(
                question,
                format!("{question_type} question has no correct answers and will never score"),
            ));
        }
        return;
    };

    if question_type.is_manual() {
        warnings.push(ValidationWarning::question(
            question,
            format!("correct answers on a {question_type} question are ignored"),
        ));
        return;
    }
    if correct.is_empty() {
        warnings.push(ValidationWarning::question(
            question,
            "correct answers list is empty",
        ));
        return;
    }

    let items = &question.settings.sortable_items;
    match question_type {
        QuestionType::TrueFalse | QuestionType::SingleChoice => {
            if correct.len() > 1 {
                warnings.push(ValidationWarning::question(
                    question,
                    format!("{question_type} question has {} correct answers, only the first is used", correct.len()),
                ));
            }
            if question_type == QuestionType::TrueFalse
                && !matches!(correct[0].as_str(), "true" | "false")
            {
                warnings.push(ValidationWarning::question(
                    question,
                    format!("true/false answer must be \"true\" or \"false\", got \"{}\"", correct[0]),
                ));
            }
            if question_type == QuestionType::SingleChoice {
                warn_unknown_options(question, &correct[..1], items, warnings);
            }
        }
        QuestionType::MultipleChoice => warn_unknown_options(question, correct, items, warnings),
        QuestionType::FillInTheBlanks => {
            let tokens = fill_in_tokens(correct).len();
            let blanks = blank_count(&question.description);
            if tokens != blanks {
                warnings.push(ValidationWarning::question(
                    question,
                    format!("answer key has {tokens} token(s) but description has {blanks} blank(s)"),
                ));
            }
        }
        QuestionType::Sorting => {
            if !items.is_empty() && !is_permutation(correct, items) {
                warnings.push(ValidationWarning::question(
                    question,
                    "correct order is not a permutation of the sortable items",
                ));
            }
        }
        QuestionType::MatrixSorting => {
            for entry in correct.iter().filter(|e| !e.contains(':')) {
                warnings.push(ValidationWarning::question(
                    question,
                    format!("matrix entry \"{entry}\" is missing the ':' separator"),
                ));
            }
        }
        QuestionType::FreeChoice | QuestionType::Essay | QuestionType::Assessment => {}
    }
}

fn warn_unknown_options(
    question: &Question,
    correct: &[String],
    items: &[String],
    warnings: &mut Vec<ValidationWarning>,
) {
    if items.is_empty() {
        return;
    }
    for answer in correct.iter().filter(|a| !items.contains(a)) {
        warnings.push(ValidationWarning::question(
            question,
            format!("correct answer \"{answer}\" is not one of the options"),
        ));
    }
}

fn is_permutation(a: &[String], b: &[String]) -> bool {
    let mut a: Vec<&String> = a.iter().collect();
    let mut b: Vec<&String> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}

/// Warn about answers that do not belong to any question of the quiz.
pub fn validate_answers(quiz: &Quiz, answers: &AnswerSheet) -> Vec<ValidationWarning> {
    let mut unknown: Vec<&str> = answers
        .question_ids()
        .filter(|id| quiz.question(id).is_none())
        .collect();
    unknown.sort_unstable();
    unknown
        .into_iter()
        .map(|id| ValidationWarning {
            question_id: Some(id.to_string()),
            message: format!("answer for unknown question: {id}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Answer;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[quiz]
id = "spanish-1"
title = "Spanish basics"
passing_grade = 70
max_attempts = 3
time_limit_secs = 600

[[questions]]
id = "tf"
type = "true_false"
title = "Perro means dog"
mark = 1

[questions.settings]
correct_answers = ["true"]

[[questions]]
id = "blanks"
type = "FillInTheBlanks"
description = "I eat an {dash}, my {dash} and my {dash} watch."
mark = 9

[questions.settings]
correct_answers = ["Manzana|Perro|Gato"]

[[questions]]
id = "matrix"
type = "matrix_sorting"
mark = 4

[questions.settings]
correct_answers = ["Dog:Perro", "Cat:Gato"]
matrix_matches = [
    { column_a = "Dog", column_b = "Perro" },
    { column_a = "Cat", column_b = "Gato" },
]

[[questions]]
id = "essay"
type = "essay"
mark = 5
"#;

    #[test]
    fn parse_valid_toml() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("quiz.toml")).unwrap();
        assert_eq!(quiz.id, "spanish-1");
        assert_eq!(quiz.passing_grade, 70.0);
        assert_eq!(quiz.max_attempts, Some(3));
        assert_eq!(quiz.time_limit_secs, Some(600));
        assert_eq!(quiz.questions.len(), 4);
        assert_eq!(quiz.questions[0].question_type, QuestionType::TrueFalse);
        assert_eq!(quiz.questions[2].settings.matrix_matches.len(), 2);
        assert_eq!(quiz.questions[2].settings.matrix_matches[1].column_b, "Gato");
        assert!(quiz.questions[3].correct_answers().is_none());
        assert_eq!(quiz.total_marks(), 19.0);
    }

    #[test]
    fn valid_quiz_has_no_warnings() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("quiz.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[quiz]
id = "minimal"

[[questions]]
id = "q1"
type = "sorting"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap();
        assert_eq!(quiz.passing_grade, 0.0);
        assert!(quiz.max_attempts.is_none());
        assert_eq!(quiz.questions[0].mark, 0.0);
        assert!(quiz.questions[0].settings.sortable_items.is_empty());
    }

    #[test]
    fn parse_unknown_question_type() {
        let toml = r#"
[quiz]
id = "bad"

[[questions]]
id = "q1"
type = "crossword"
"#;
        let err = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("crossword"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        let result = parse_quiz_str(bad, &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn parse_graphql_json() {
        let json = r#"{
            "id": "js-quiz",
            "passingGrade": 60,
            "maxAttempts": 2,
            "questions": [
                {"id": "q1", "type": "SingleChoice", "mark": 2,
                 "settings": {"correctAnswers": ["b"], "sortableItems": ["a", "b"]}}
            ]
        }"#;
        let quiz = parse_quiz_json_str(json, &PathBuf::from("quiz.json")).unwrap();
        assert_eq!(quiz.passing_grade, 60.0);
        assert_eq!(quiz.max_attempts, Some(2));
        assert_eq!(quiz.questions[0].question_type, QuestionType::SingleChoice);
    }

    #[test]
    fn validate_duplicate_ids_and_missing_keys() {
        let toml = r#"
[quiz]
id = "dupes"
passing_grade = 120

[[questions]]
id = "same"
type = "single_choice"

[[questions]]
id = "same"
type = "essay"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("never score")));
        assert!(warnings.iter().any(|w| w.message.contains("outside 0-100")));
    }

    #[test]
    fn validate_answer_key_shapes() {
        let toml = r#"
[quiz]
id = "shapes"

[[questions]]
id = "tf"
type = "true_false"
[questions.settings]
correct_answers = ["yes"]

[[questions]]
id = "mc"
type = "multiple_choice"
[questions.settings]
correct_answers = ["A", "Z"]
sortable_items = ["A", "B", "C"]

[[questions]]
id = "blanks"
type = "fill_in_the_blanks"
description = "One {dash} only"
[questions.settings]
correct_answers = ["a|b"]

[[questions]]
id = "sort"
type = "sorting"
[questions.settings]
correct_answers = ["1", "2"]
sortable_items = ["1", "3"]

[[questions]]
id = "matrix"
type = "matrix_sorting"
[questions.settings]
correct_answers = ["Dog-Perro"]
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        let for_question = |id: &str| {
            warnings
                .iter()
                .filter(|w| w.question_id.as_deref() == Some(id))
                .count()
        };
        assert_eq!(for_question("tf"), 1);
        assert_eq!(for_question("mc"), 1);
        assert_eq!(for_question("blanks"), 1);
        assert_eq!(for_question("sort"), 1);
        assert_eq!(for_question("matrix"), 1);
    }

    #[test]
    fn parse_answers_and_flag_unknown_ids() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("quiz.toml")).unwrap();
        let json = r#"{"tf": "true", "blanks": ["manzana", "perro", "gato"], "essay": null, "q99": "x"}"#;
        let answers = parse_answers_str(json, &PathBuf::from("answers.json")).unwrap();
        assert_eq!(answers.get("tf"), Some(&Answer::Text("true".into())));
        assert!(answers.get("essay").is_none());

        let warnings = validate_answers(&quiz, &answers);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].question_id.as_deref(), Some("q99"));
    }

    #[test]
    fn load_directory_skips_answer_sheets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quiz.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("quiz-answers.json"), r#"{"tf": "true"}"#).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not toml }{").unwrap();

        let quizzes = load_quiz_directory(dir.path()).unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].id, "spanish-1");
    }
}
