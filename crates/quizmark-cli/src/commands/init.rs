//! The `quizmark init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizmark.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("quizzes")?;
    write_if_missing(Path::new("quizzes/example.toml"), EXAMPLE_QUIZ)?;
    write_if_missing(Path::new("quizzes/example-answers.json"), EXAMPLE_ANSWERS)?;

    println!("\nNext steps:");
    println!("  1. Run: quizmark validate --quiz quizzes/example.toml");
    println!("  2. Run: quizmark grade --quiz quizzes/example.toml --answers quizzes/example-answers.json");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizmark configuration

# Overrides each quiz's own passing grade (0-100).
# default_passing_grade = 70

output_dir = "./quizmark-results"
default_format = "text"
"#;

const EXAMPLE_QUIZ: &str = r#"[quiz]
id = "spanish-basics"
title = "Spanish Basics"
description = "Vocabulary warm-up"
passing_grade = 70
max_attempts = 3
time_limit_secs = 900

[[questions]]
id = "perro"
type = "true_false"
title = "\"Perro\" means dog"
mark = 1

[questions.settings]
correct_answers = ["true"]

[[questions]]
id = "capital"
type = "single_choice"
title = "Capital of Spain"
mark = 2

[questions.settings]
correct_answers = ["Madrid"]
sortable_items = ["Lisbon", "Madrid", "Rome"]

[[questions]]
id = "fruits"
type = "multiple_choice"
title = "Pick the fruits"
mark = 10

[questions.settings]
correct_answers = ["Apple", "Pear"]
sortable_items = ["Apple", "Dog", "Pear"]

[[questions]]
id = "blanks"
type = "fill_in_the_blanks"
title = "Translate the words"
description = "Apple is {dash}, dog is {dash}, cat is {dash}."
mark = 9

[questions.settings]
correct_answers = ["Manzana|Perro|Gato"]

[[questions]]
id = "order"
type = "sorting"
title = "Put the words in order"
mark = 6

[questions.settings]
correct_answers = ["Do", "You", "Like"]
sortable_items = ["Like", "Do", "You"]

[[questions]]
id = "matrix"
type = "matrix_sorting"
title = "Match the animals"
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
title = "Describe your pet in Spanish"
mark = 5
"#;

const EXAMPLE_ANSWERS: &str = r#"{
  "perro": "true",
  "capital": "Madrid",
  "fruits": ["Apple"],
  "blanks": ["manzana", "Pez", "gato"],
  "order": ["You", "Do", "Like"],
  "matrix": ["perro", "gato"],
  "essay": "Mi perro se llama Toby."
}
"#;
