// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash command trait.

use async_trait::async_trait;
use serenity::all::Permissions;

use crate::error::StowageError;
use crate::traits::guild::GuildApi;
use crate::traits::reply::ReplySurface;
use crate::types::Invocation;

/// A slash command handler.
///
/// Handlers report user-facing outcomes through `reply` and return `Err` only
/// for failures the dispatcher should answer with a generic error message.
#[async_trait]
pub trait Command: Send + Sync {
    /// Returns the command's unique name (used for lookup and registration).
    fn name(&self) -> &str;

    /// Returns the description shown in the platform's command picker.
    fn description(&self) -> &str;

    /// Permissions a member needs for the command to be visible by default.
    fn default_member_permissions(&self) -> Option<Permissions> {
        None
    }

    /// Runs the command.
    async fn execute(
        &self,
        invocation: &Invocation,
        guild: &dyn GuildApi,
        reply: &dyn ReplySurface,
    ) -> Result<(), StowageError>;
}
