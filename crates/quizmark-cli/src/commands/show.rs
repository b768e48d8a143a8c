//! The `quizmark show` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmark_core::evaluator::blank_count;
use quizmark_core::format::format_correct_answers;
use quizmark_core::model::QuestionType;
use quizmark_core::parser;

pub fn execute(quiz_path: PathBuf) -> Result<()> {
    let quiz = parser::parse_quiz(&quiz_path)?;

    println!("{} [{}]", quiz.title, quiz.id);
    let mut policy = format!("Passing grade: {:.1}%", quiz.passing_grade);
    if let Some(max) = quiz.max_attempts {
        policy.push_str(&format!(", max attempts: {max}"));
    }
    if let Some(secs) = quiz.time_limit_secs {
        policy.push_str(&format!(", time limit: {secs}s"));
    }
    println!("{policy}\n");

    for (i, q) in quiz.questions.iter().enumerate() {
        println!(
            "{}. [{}] {} ({} marks) {}",
            i + 1,
            q.id,
            q.question_type,
            q.max_marks(),
            q.title
        );
        if q.question_type == QuestionType::FillInTheBlanks {
            println!("   Blanks: {}", blank_count(&q.description));
        }
        if !q.settings.sortable_items.is_empty() {
            println!("   Options: {}", q.settings.sortable_items.join(", "));
        }
        println!(
            "   Answer key: {}",
            format_correct_answers(q.correct_answers(), q.question_type)
        );
    }

    Ok(())
}
