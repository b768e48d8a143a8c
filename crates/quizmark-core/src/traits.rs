//! Attempt submission seam.
//!
//! The backend's "submit quiz attempt" mutation sits behind [`AttemptSink`];
//! the session controller hands it each scored attempt.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::report::AttemptSubmission;

/// Receiver of scored attempts.
#[async_trait]
pub trait AttemptSink: Send + Sync {
    /// Human-readable sink name (e.g. "jsonl").
    fn name(&self) -> &str;

    /// Deliver one scored attempt.
    async fn submit(&self, submission: &AttemptSubmission) -> Result<()>;
}

/// Keeps submissions in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    submissions: Mutex<Vec<AttemptSubmission>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submissions received so far, oldest first.
    pub fn submissions(&self) -> Vec<AttemptSubmission> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AttemptSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn submit(&self, submission: &AttemptSubmission) -> Result<()> {
        self.submissions
            .lock()
            .map_err(|_| anyhow::anyhow!("submission store poisoned"))?
            .push(submission.clone());
        Ok(())
    }
}

/// Appends each submission as one JSON line to a file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AttemptSink for JsonFileSink {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn submit(&self, submission: &AttemptSubmission) -> Result<()> {
        let mut line = serde_json::to_string(submission).context("failed to serialize submission")?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("failed to append to {}", self.path.display()))?;
        file.flush().await?;

        tracing::debug!(path = %self.path.display(), quiz_id = %submission.quiz_id, "submission written");
        Ok(())
    }
}
