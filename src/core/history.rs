//! Append-only record of executed commands

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

#[async_trait]
pub trait LogSink: Send + Sync {
    async fn append(&self, line: &str) -> Result<()>;
}

/// Appends lines to a file, creating it when missing.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogSink for FileSink {
    async fn append(&self, line: &str) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open log file: {}", self.path.display()))?;

        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to write log file: {}", self.path.display()))?;
        file.flush().await?;

        debug!(path = %self.path.display(), "Appended log entry");
        Ok(())
    }
}

/// Keeps appended lines in memory.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lines(&self) -> Vec<String> {
        self.lines.lock().await.clone()
    }
}

#[async_trait]
impl LogSink for MemorySink {
    async fn append(&self, line: &str) -> Result<()> {
        self.lines.lock().await.push(line.to_string());
        Ok(())
    }
}

pub fn format_entry<Tz: TimeZone>(timestamp: &DateTime<Tz>, command: &str) -> String
where
    Tz::Offset: Display,
{
    format!(
        "{}: Executed command: {}\n",
        timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
        command
    )
}

pub struct ExecutionLogger {
    sink: Arc<dyn LogSink>,
}

impl ExecutionLogger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub fn to_file<P: AsRef<Path>>(path: P) -> Self {
        Self::new(Arc::new(FileSink::new(path)))
    }

    pub async fn log_command(&self, command: &str) -> Result<()> {
        let line = format_entry(&Local::now(), command);
        self.sink.append(&line).await
    }
}
