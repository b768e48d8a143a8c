use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizmark_core::evaluator::evaluate;
use quizmark_core::model::{Answer, AnswerSheet, Question, QuestionSettings, QuestionType};
use quizmark_core::scoring::score;

fn make_question(id: &str, question_type: QuestionType, correct: &[&str]) -> Question {
    Question {
        id: id.into(),
        question_type,
        title: String::new(),
        description: String::new(),
        mark: 10.0,
        settings: QuestionSettings {
            correct_answers: Some(correct.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        },
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    group.bench_function("multiple_choice", |b| {
        let q = make_question("mc", QuestionType::MultipleChoice, &["A", "B", "C", "D"]);
        let answer = Answer::from(vec!["A", "C", "D"]);
        b.iter(|| evaluate(black_box(&q), black_box(Some(&answer))))
    });

    group.bench_function("fill_in_the_blanks", |b| {
        let q = make_question(
            "blanks",
            QuestionType::FillInTheBlanks,
            &["Manzana|Perro|Gato|Casa|Arbol"],
        );
        let answer = Answer::from(vec!["manzana", "perro", "pez", "casa", "arbol"]);
        b.iter(|| evaluate(black_box(&q), black_box(Some(&answer))))
    });

    group.bench_function("matrix_sorting", |b| {
        let q = make_question(
            "matrix",
            QuestionType::MatrixSorting,
            &["Dog:Perro", "Cat:Gato", "House:Casa"],
        );
        let answer = Answer::from(vec!["perro", "gato", "casa"]);
        b.iter(|| evaluate(black_box(&q), black_box(Some(&answer))))
    });

    group.finish();
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");

    let questions: Vec<Question> = (0..100)
        .map(|i| make_question(&format!("q{i}"), QuestionType::Sorting, &["a", "b", "c", "d"]))
        .collect();
    let mut answers = AnswerSheet::new();
    for q in &questions {
        answers.insert(q.id.clone(), vec!["a", "c", "b", "d"]);
    }

    group.bench_function("100_sorting_questions", |b| {
        b.iter(|| score(black_box(&questions), black_box(&answers), black_box(70.0)))
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_score);
criterion_main!(benches);
