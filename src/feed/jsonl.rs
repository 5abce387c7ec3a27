//! JSON-lines bar file reader
//!
//! Streams one [`Bar`] per line from a file on disk. Blank lines and lines
//! starting with `#` are skipped; malformed lines are logged and dropped so
//! a single bad record does not end a replay.

use super::{Bar, BarFeed};
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Bar feed backed by a JSON-lines file
#[derive(Debug, Clone)]
pub struct JsonlBarFeed {
    path: PathBuf,
    capacity: usize,
}

impl JsonlBarFeed {
    /// Create a feed reading from `path` with a default channel capacity
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, 1024)
    }

    /// Create a feed with an explicit channel capacity
    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
        }
    }
}

/// Parse one input line
///
/// Returns `Ok(None)` for lines that carry no bar (blank or comment).
pub fn parse_bar_line(line: &str) -> Result<Option<Bar>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

#[async_trait]
impl BarFeed for JsonlBarFeed {
    async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<Bar>> {
        let file = File::open(&self.path)
            .await
            .with_context(|| format!("Failed to open bar file {}", self.path.display()))?;

        let (tx, rx) = mpsc::channel(self.capacity);
        let path = self.path.clone();

        tokio::spawn(async move {
            let mut lines = BufReader::new(file).lines();
            let mut line_no = 0usize;
            let mut sent = 0u64;

            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Bar file read failed");
                        break;
                    }
                };
                line_no += 1;

                match parse_bar_line(&line) {
                    Ok(Some(bar)) => {
                        if tx.send(bar).await.is_err() {
                            tracing::debug!("Bar receiver dropped, stopping reader");
                            break;
                        }
                        sent += 1;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(line = line_no, error = %e, "Skipping malformed bar");
                    }
                }
            }

            tracing::debug!(path = %path.display(), bars = sent, "Bar file exhausted");
        });

        Ok(rx)
    }
}
