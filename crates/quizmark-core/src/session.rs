//! Quiz-taking session: attempt ceiling and per-attempt countdown.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::SessionError;
use crate::model::{AnswerSheet, Quiz};
use crate::report::AttemptReport;
use crate::scoring::score;
use crate::traits::AttemptSink;

/// How often the countdown publishes the remaining time.
const TICK: Duration = Duration::from_secs(1);

/// A cancellable countdown running as its own tokio task.
///
/// Dropping the countdown cancels it.
#[derive(Debug)]
pub struct Countdown {
    remaining: watch::Receiver<Duration>,
    task: JoinHandle<()>,
}

impl Countdown {
    /// Start counting down. Must be called inside a tokio runtime.
    pub fn start(duration: Duration) -> Self {
        let (tx, rx) = watch::channel(duration);
        let deadline = Instant::now() + duration;

        let task = tokio::spawn(async move {
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if tx.send(remaining).is_err() || remaining.is_zero() {
                    break;
                }
                tokio::time::sleep(remaining.min(TICK)).await;
            }
        });

        Self {
            remaining: rx,
            task,
        }
    }

    /// Time left as of the last tick.
    pub fn remaining(&self) -> Duration {
        *self.remaining.borrow()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Wait until time runs out. Returns `false` if the countdown was
    /// cancelled first.
    pub async fn expired(&self) -> bool {
        let mut rx = self.subscribe();
        let expired = rx.wait_for(|r| r.is_zero()).await.is_ok();
        expired
    }

    /// A receiver updated on every tick. It closes once the countdown stops.
    pub fn subscribe(&self) -> watch::Receiver<Duration> {
        self.remaining.clone()
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Debug)]
struct ActiveAttempt {
    number: u32,
    started_at: DateTime<Utc>,
    countdown: Option<Countdown>,
}

/// One learner taking one quiz, possibly over several attempts.
#[derive(Debug)]
pub struct QuizSession {
    quiz: Quiz,
    passing_grade: f64,
    attempts_taken: u32,
    active: Option<ActiveAttempt>,
}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Self {
        let passing_grade = quiz.passing_grade;
        Self {
            quiz,
            passing_grade,
            attempts_taken: 0,
            active: None,
        }
    }

    /// Override the quiz's own passing grade.
    pub fn with_passing_grade(mut self, passing_grade: f64) -> Self {
        self.passing_grade = passing_grade;
        self
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn attempts_taken(&self) -> u32 {
        self.attempts_taken
    }

    /// Attempts left, or `None` when the quiz has no ceiling.
    pub fn attempts_remaining(&self) -> Option<u32> {
        self.quiz
            .max_attempts
            .map(|max| max.saturating_sub(self.attempts_taken))
    }

    /// Countdown of the open attempt, if the quiz is timed.
    pub fn countdown(&self) -> Option<&Countdown> {
        self.active.as_ref().and_then(|a| a.countdown.as_ref())
    }

    /// Open a new attempt and return its 1-based number.
    ///
    /// Timed quizzes start their countdown here, which requires a tokio
    /// runtime.
    pub fn start_attempt(&mut self) -> Result<u32, SessionError> {
        if let Some(active) = &self.active {
            return Err(SessionError::AttemptInProgress(active.number));
        }
        if let Some(max) = self.quiz.max_attempts {
            if self.attempts_taken >= max {
                return Err(SessionError::AttemptsExhausted { max });
            }
        }

        let number = self.attempts_taken + 1;
        let countdown = self
            .quiz
            .time_limit_secs
            .map(|secs| Countdown::start(Duration::from_secs(secs)));
        tracing::info!(quiz_id = %self.quiz.id, attempt = number, timed = countdown.is_some(), "attempt started");

        self.active = Some(ActiveAttempt {
            number,
            started_at: Utc::now(),
            countdown,
        });
        Ok(number)
    }

    /// Score the open attempt and hand the result to `sink`. The attempt is
    /// closed and counted only once the sink accepts it; on failure it stays
    /// open so the caller can submit again.
    ///
    /// An attempt whose countdown already ran out is still scored with the
    /// answers given so far.
    pub async fn submit(
        &mut self,
        answers: &AnswerSheet,
        sink: &dyn AttemptSink,
    ) -> Result<AttemptReport> {
        let active = self.active.as_ref().ok_or(SessionError::NoActiveAttempt)?;
        let number = active.number;
        let started_at = active.started_at;

        if active.countdown.as_ref().is_some_and(Countdown::is_expired) {
            tracing::info!(quiz_id = %self.quiz.id, attempt = number, "time limit reached, submitting answers given");
        }

        let summary = score(&self.quiz.questions, answers, self.passing_grade);
        let report = AttemptReport::new(&self.quiz, self.passing_grade, number, summary);

        sink.submit(&report.submission())
            .await
            .with_context(|| format!("failed to submit attempt via {} sink", sink.name()))?;

        if let Some(countdown) = self.active.take().and_then(|a| a.countdown) {
            countdown.cancel();
        }
        self.attempts_taken += 1;

        tracing::info!(
            quiz_id = %self.quiz.id,
            attempt = number,
            score = report.summary.score,
            passed = report.summary.passed,
            elapsed_secs = (report.attempt_date - started_at).num_seconds(),
            "attempt submitted"
        );

        Ok(report)
    }
}
