// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status transcript shown to the invoking member while an archive runs.

use stowage_core::ReplySurface;
use tracing::warn;

/// Ordered, append-only list of status lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressLog {
    lines: Vec<String>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Newline-joined transcript.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Pushes status lines and mirrors the transcript onto the deferred reply.
///
/// A failed edit is logged and otherwise ignored: the archive keeps going
/// even if the member can no longer see its progress.
pub struct Progress<'a> {
    log: ProgressLog,
    surface: &'a dyn ReplySurface,
}

impl<'a> Progress<'a> {
    /// Starts a transcript with `heading` as its first line. Nothing is sent yet.
    pub fn new(surface: &'a dyn ReplySurface, heading: impl Into<String>) -> Self {
        let mut log = ProgressLog::new();
        log.push(heading);
        Self { log, surface }
    }

    /// Appends a line and publishes the transcript.
    pub async fn record(&mut self, line: impl Into<String>) {
        self.log.push(line);
        self.flush().await;
    }

    /// Appends a line without publishing.
    pub fn note(&mut self, line: impl Into<String>) {
        self.log.push(line);
    }

    /// Publishes the transcript as it stands.
    pub async fn flush(&self) {
        if let Err(e) = self.surface.edit(&self.log.render()).await {
            warn!(error = %e, lines = self.log.len(), "failed to update progress reply");
        }
    }

    pub fn log(&self) -> &ProgressLog {
        &self.log
    }
}
