//! Core data model types for quizmark.
//!
//! These mirror the quiz/question shapes delivered by the platform's GraphQL
//! layer: a quiz holds typed questions, each with its grading settings, and a
//! learner submits one answer per question id.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marker token in a fill-in-the-blanks description that stands for one blank.
pub const BLANK_MARKER: &str = "{dash}";

/// A quiz: an ordered question set plus the grading policy around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    /// Unique identifier for this quiz.
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Minimum percentage (0–100) needed to pass.
    #[serde(default)]
    pub passing_grade: f64,
    /// Attempt ceiling (None = unlimited).
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// Time allowed per attempt, in seconds.
    #[serde(default)]
    pub time_limit_secs: Option<u64>,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Sum of the marks of all questions.
    pub fn total_marks(&self) -> f64 {
        self.questions.iter().map(Question::max_marks).sum()
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// A single quiz question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Identifier, stable across attempts.
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Display title (HTML).
    #[serde(default)]
    pub title: String,
    /// Display body (HTML). Fill-in-the-blanks questions mark each blank with
    /// [`BLANK_MARKER`].
    #[serde(default)]
    pub description: String,
    /// Point value of the question.
    #[serde(default)]
    pub mark: f64,
    #[serde(default)]
    pub settings: QuestionSettings,
}

impl Question {
    /// The mark this question can award, never negative.
    pub fn max_marks(&self) -> f64 {
        self.mark.max(0.0)
    }

    /// Configured correct answers, if any.
    pub fn correct_answers(&self) -> Option<&[String]> {
        self.settings.correct_answers.as_deref()
    }
}

/// Grading and display settings of a question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSettings {
    /// Correct answers; the shape depends on the question type.
    #[serde(default)]
    pub correct_answers: Option<Vec<String>>,
    /// The options or items presented to the learner.
    #[serde(default)]
    pub sortable_items: Vec<String>,
    /// Column pairs shown by matrix sorting questions.
    #[serde(default)]
    pub matrix_matches: Vec<MatrixMatch>,
    #[serde(default)]
    pub show_question_mark: bool,
}

/// One row of a matrix sorting question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixMatch {
    pub column_a: String,
    pub column_b: String,
}

/// Supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    TrueFalse,
    SingleChoice,
    MultipleChoice,
    FillInTheBlanks,
    Sorting,
    MatrixSorting,
    FreeChoice,
    Essay,
    Assessment,
}

impl QuestionType {
    pub const ALL: [QuestionType; 9] = [
        QuestionType::TrueFalse,
        QuestionType::SingleChoice,
        QuestionType::MultipleChoice,
        QuestionType::FillInTheBlanks,
        QuestionType::Sorting,
        QuestionType::MatrixSorting,
        QuestionType::FreeChoice,
        QuestionType::Essay,
        QuestionType::Assessment,
    ];

    /// Returns `true` for types that need a human grader.
    pub fn is_manual(&self) -> bool {
        matches!(
            self,
            QuestionType::FreeChoice | QuestionType::Essay | QuestionType::Assessment
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionType::TrueFalse => "TrueFalse",
            QuestionType::SingleChoice => "SingleChoice",
            QuestionType::MultipleChoice => "MultipleChoice",
            QuestionType::FillInTheBlanks => "FillInTheBlanks",
            QuestionType::Sorting => "Sorting",
            QuestionType::MatrixSorting => "MatrixSorting",
            QuestionType::FreeChoice => "FreeChoice",
            QuestionType::Essay => "Essay",
            QuestionType::Assessment => "Assessment",
        };
        f.write_str(name)
    }
}

impl FromStr for QuestionType {
    type Err = String;

    /// Accepts `TrueFalse`, `true_false`, `TRUE_FALSE` and `true-false` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "truefalse" => Ok(QuestionType::TrueFalse),
            "singlechoice" => Ok(QuestionType::SingleChoice),
            "multiplechoice" => Ok(QuestionType::MultipleChoice),
            "fillintheblanks" => Ok(QuestionType::FillInTheBlanks),
            "sorting" => Ok(QuestionType::Sorting),
            "matrixsorting" => Ok(QuestionType::MatrixSorting),
            "freechoice" => Ok(QuestionType::FreeChoice),
            "essay" => Ok(QuestionType::Essay),
            "assessment" => Ok(QuestionType::Assessment),
            _ => Err(format!("unknown question type: {s}")),
        }
    }
}

impl Serialize for QuestionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QuestionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A learner's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// A single value (true/false, a chosen option, free text).
    Text(String),
    /// An ordered sequence (sorting, blanks, matrix) or a set of options.
    List(Vec<String>),
}

impl Answer {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(s) => Some(s),
            Answer::List(_) => None,
        }
    }

    /// The answer viewed as a sequence. A single value reads as one item.
    pub fn items(&self) -> Vec<&str> {
        match self {
            Answer::Text(s) => vec![s.as_str()],
            Answer::List(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::Text(s.to_string())
    }
}

impl From<Vec<&str>> for Answer {
    fn from(items: Vec<&str>) -> Self {
        Answer::List(items.into_iter().map(String::from).collect())
    }
}

/// Submitted answers keyed by question id.
///
/// Explicit `null` entries are dropped when deserializing, so they read the
/// same as a missing key: unanswered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "HashMap<String, Option<Answer>>",
    into = "HashMap<String, Answer>"
)]
pub struct AnswerSheet {
    answers: HashMap<String, Answer>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question_id: impl Into<String>, answer: impl Into<Answer>) {
        self.answers.insert(question_id.into(), answer.into());
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Question ids that have an answer, in no particular order.
    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.answers.keys().map(String::as_str)
    }
}

impl From<HashMap<String, Option<Answer>>> for AnswerSheet {
    fn from(raw: HashMap<String, Option<Answer>>) -> Self {
        let answers = raw
            .into_iter()
            .filter_map(|(id, answer)| answer.map(|a| (id, a)))
            .collect();
        Self { answers }
    }
}

impl From<AnswerSheet> for HashMap<String, Answer> {
    fn from(sheet: AnswerSheet) -> Self {
        sheet.answers
    }
}
