// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply surface for a command invocation.

use async_trait::async_trait;

use crate::error::StowageError;

/// The editable reply attached to one command invocation.
///
/// A command either answers once with [`respond`](ReplySurface::respond), or
/// calls [`defer`](ReplySurface::defer) and then overwrites the deferred
/// reply any number of times with [`edit`](ReplySurface::edit).
#[async_trait]
pub trait ReplySurface: Send + Sync {
    /// Sends the initial reply. Ephemeral replies are visible to the invoker only.
    async fn respond(&self, content: &str, ephemeral: bool) -> Result<(), StowageError>;

    /// Acknowledges the invocation, showing a "thinking" placeholder.
    async fn defer(&self) -> Result<(), StowageError>;

    /// Replaces the content of the deferred reply.
    async fn edit(&self, content: &str) -> Result<(), StowageError>;
}
