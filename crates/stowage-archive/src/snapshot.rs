// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stage 1: record which members can currently see the channel.

use std::collections::HashSet;

use serenity::all::UserId;
use stowage_core::permissions::can_view;
use stowage_core::{ChannelInfo, GuildApi, GuildMember, ScopeRoles};
use tracing::{debug, warn};

use crate::error::ArchiveError;

/// Members (bots excluded) holding effective `VIEW_CHANNEL` before the archive.
///
/// Computed once and never corrected afterwards; it is the only input to the
/// restore stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessSnapshot {
    members: Vec<UserId>,
}

impl AccessSnapshot {
    /// Evaluates `roster` against the channel's current overwrites.
    ///
    /// Members whose permissions cannot be resolved are logged and left out.
    pub fn capture(roster: &[GuildMember], scope: &ScopeRoles, channel: &ChannelInfo) -> Self {
        let mut seen = HashSet::new();
        let mut members = Vec::new();

        for member in roster {
            if member.bot {
                continue;
            }
            match can_view(scope, member, &channel.overwrites) {
                Ok(true) => {
                    if seen.insert(member.id) {
                        members.push(member.id);
                    }
                }
                Ok(false) => {}
                Err(e) => warn!(
                    channel_id = %channel.id,
                    user_id = %member.id,
                    member = %member.tag,
                    error = %e,
                    "permission check failed, excluding member from snapshot"
                ),
            }
        }

        debug!(channel_id = %channel.id, roster = roster.len(), members = members.len(), "snapshot evaluated");
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    /// Member ids in roster order.
    pub fn members(&self) -> &[UserId] {
        &self.members
    }
}

/// Fetches the roster and role table, then captures the snapshot.
///
/// Read-only: nothing in the guild has changed when this fails.
pub async fn take_snapshot(
    guild: &dyn GuildApi,
    channel: &ChannelInfo,
) -> Result<AccessSnapshot, ArchiveError> {
    let roster = guild
        .fetch_members()
        .await
        .map_err(|source| ArchiveError::RosterUnavailable { source })?;
    let scope = guild
        .scope_roles()
        .map_err(|source| ArchiveError::ScopeUnavailable { source })?;

    Ok(AccessSnapshot::capture(&roster, &scope, channel))
}
