//! quizmark-core — Quiz answer evaluation and scoring.
//!
//! This crate defines the question/answer data model, the per-question
//! evaluator, the aggregate scorer, and the attempt reports and session
//! controller built on top of them.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod model;
pub mod parser;
pub mod reorder;
pub mod report;
pub mod scoring;
pub mod session;
pub mod traits;
