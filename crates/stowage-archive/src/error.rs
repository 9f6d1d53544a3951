// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fatal archive errors and their user-facing messages.

use serenity::all::{ChannelId, ChannelType};
use stowage_core::StowageError;
use thiserror::Error;

use crate::Stage;

/// A condition that stops the archive workflow.
///
/// Per-entity failures (one permission check, one overwrite) are not errors;
/// they are recorded in the stage reports instead.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The invoking member lacks `ADMINISTRATOR`.
    #[error("invoking member is not an administrator")]
    NotAdministrator,

    /// The target channel is not text, voice, forum, or announcement.
    #[error("channel kind {kind:?} cannot be archived")]
    UnsupportedChannel { kind: ChannelType },

    /// Another invocation is already archiving this channel.
    #[error("channel {channel_id} is already being archived")]
    AlreadyRunning { channel_id: ChannelId },

    /// The member roster could not be fetched.
    #[error("failed to fetch guild members: {source}")]
    RosterUnavailable { source: StowageError },

    /// The guild's role table is not available from the cache.
    #[error("guild roles unavailable: {source}")]
    ScopeUnavailable { source: StowageError },

    /// The guild's channel list is not available from the cache.
    #[error("guild channels unavailable: {source}")]
    ChannelsUnavailable { source: StowageError },

    /// The archive category could not be created.
    #[error("archive category `{name}` unavailable: {source}")]
    ContainerUnavailable { name: String, source: StowageError },

    /// The channel could not be moved under the archive category.
    #[error("failed to move channel into archive category: {source}")]
    RelocationFailed { source: StowageError },
}

impl ArchiveError {
    /// The message shown to the invoking member.
    pub fn user_message(&self) -> String {
        match self {
            ArchiveError::NotAdministrator => {
                "❌ Only server admins can use this command.".to_string()
            }
            ArchiveError::UnsupportedChannel { .. } => {
                "❌ This command only works in text, voice, forum, or announcement channels."
                    .to_string()
            }
            ArchiveError::AlreadyRunning { .. } => {
                "⏳ This channel is already being archived.".to_string()
            }
            ArchiveError::RosterUnavailable { .. } => {
                "❌ Failed to fetch members. Ensure your bot has the `GUILD_MEMBERS` intent enabled."
                    .to_string()
            }
            ArchiveError::ScopeUnavailable { .. } => {
                "❌ Server roles are not cached yet. Try again in a moment.".to_string()
            }
            ArchiveError::ChannelsUnavailable { .. } => {
                "❌ Server channels are not cached yet. Try again in a moment.".to_string()
            }
            ArchiveError::ContainerUnavailable { name, .. } => format!(
                "❌ Could not create the {name} category. Check that the bot can manage channels."
            ),
            ArchiveError::RelocationFailed { .. } => {
                "❌ Could not move the channel into the archive category. Check that the bot can manage channels."
                    .to_string()
            }
        }
    }

    /// Stage that raised the error, `None` for checks made before the pipeline starts.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ArchiveError::NotAdministrator
            | ArchiveError::UnsupportedChannel { .. }
            | ArchiveError::AlreadyRunning { .. } => None,
            ArchiveError::RosterUnavailable { .. } | ArchiveError::ScopeUnavailable { .. } => {
                Some(Stage::Snapshot)
            }
            ArchiveError::ChannelsUnavailable { .. } | ArchiveError::ContainerUnavailable { .. } => {
                Some(Stage::Locate)
            }
            ArchiveError::RelocationFailed { .. } => Some(Stage::Relocate),
        }
    }

    /// Whether the guild may have been changed before the error.
    ///
    /// Only category creation and the move itself touch the guild; every
    /// earlier failure, including the category cache lookup, is read-only.
    pub fn after_mutation(&self) -> bool {
        matches!(
            self,
            ArchiveError::ContainerUnavailable { .. } | ArchiveError::RelocationFailed { .. }
        )
    }
}
