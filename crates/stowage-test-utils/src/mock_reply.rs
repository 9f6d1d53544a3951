// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock reply surface for deterministic testing.
//!
//! `MockReply` implements `ReplySurface` and captures every interaction in
//! order for assertion in tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use stowage_core::{ReplySurface, StowageError};
use tokio::sync::Mutex;

/// One call made on a [`MockReply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyEvent {
    Responded { content: String, ephemeral: bool },
    Deferred,
    Edited(String),
}

/// A mock reply surface for testing.
#[derive(Default)]
pub struct MockReply {
    events: Mutex<Vec<ReplyEvent>>,
    fail_edits: AtomicBool,
}

impl MockReply {
    /// Create a reply surface with no recorded events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `edit` fail. Events are still recorded.
    pub fn fail_edits(&self) {
        self.fail_edits.store(true, Ordering::SeqCst);
    }

    /// All recorded events in order.
    pub async fn events(&self) -> Vec<ReplyEvent> {
        self.events.lock().await.clone()
    }

    /// Contents passed to `edit`, in order.
    pub async fn edits(&self) -> Vec<String> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|e| match e {
                ReplyEvent::Edited(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// The text currently visible to the user: the last edit or response.
    pub async fn visible_content(&self) -> Option<String> {
        self.events.lock().await.iter().rev().find_map(|e| match e {
            ReplyEvent::Edited(text) => Some(text.clone()),
            ReplyEvent::Responded { content, .. } => Some(content.clone()),
            ReplyEvent::Deferred => None,
        })
    }

    /// Whether `defer` was called.
    pub async fn was_deferred(&self) -> bool {
        self.events.lock().await.contains(&ReplyEvent::Deferred)
    }
}

#[async_trait]
impl ReplySurface for MockReply {
    async fn respond(&self, content: &str, ephemeral: bool) -> Result<(), StowageError> {
        self.events.lock().await.push(ReplyEvent::Responded {
            content: content.to_string(),
            ephemeral,
        });
        Ok(())
    }

    async fn defer(&self) -> Result<(), StowageError> {
        self.events.lock().await.push(ReplyEvent::Deferred);
        Ok(())
    }

    async fn edit(&self, content: &str) -> Result<(), StowageError> {
        self.events
            .lock()
            .await
            .push(ReplyEvent::Edited(content.to_string()));
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(StowageError::Platform {
                message: "edit rejected by mock reply".into(),
                source: None,
            });
        }
        Ok(())
    }
}
