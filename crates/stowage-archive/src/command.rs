// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `/archive` slash command.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serenity::all::{ChannelId, Permissions};
use stowage_config::model::ArchiveConfig;
use stowage_core::types::is_archivable;
use stowage_core::{Command, GuildApi, Invocation, ReplySurface, StowageError};
use tracing::{info, warn};

use crate::error::ArchiveError;
use crate::pipeline::ArchiveWorkflow;
use crate::progress::Progress;

/// Archives the channel the command is used in.
pub struct ArchiveCommand {
    config: ArchiveConfig,
    in_flight: Mutex<HashSet<ChannelId>>,
}

impl ArchiveCommand {
    pub fn new(config: ArchiveConfig) -> Self {
        Self {
            config,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    fn running(&self) -> MutexGuard<'_, HashSet<ChannelId>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claims `channel`, or returns `None` if another run holds it.
    fn claim(&self, channel: ChannelId) -> Option<InFlight<'_>> {
        let claimed = self.running().insert(channel);
        claimed.then(|| InFlight {
            command: self,
            channel,
        })
    }

    /// Whether an archive of `channel` is running in this process.
    pub fn is_running(&self, channel: ChannelId) -> bool {
        self.running().contains(&channel)
    }

    async fn refuse(reply: &dyn ReplySurface, err: ArchiveError) -> Result<(), StowageError> {
        info!(reason = %err, "archive refused");
        reply.respond(&err.user_message(), true).await
    }
}

/// Releases the channel claim when the run ends, however it ends.
struct InFlight<'a> {
    command: &'a ArchiveCommand,
    channel: ChannelId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.command.running().remove(&self.channel);
    }
}

#[async_trait]
impl Command for ArchiveCommand {
    fn name(&self) -> &str {
        "archive"
    }

    fn description(&self) -> &str {
        "Archives the channel this command is used in"
    }

    fn default_member_permissions(&self) -> Option<Permissions> {
        Some(Permissions::ADMINISTRATOR)
    }

    async fn execute(
        &self,
        invocation: &Invocation,
        guild: &dyn GuildApi,
        reply: &dyn ReplySurface,
    ) -> Result<(), StowageError> {
        if !invocation.is_administrator() {
            return Self::refuse(reply, ArchiveError::NotAdministrator).await;
        }

        let channel_id = invocation.channel_id;
        let Some(_claim) = self.claim(channel_id) else {
            return Self::refuse(reply, ArchiveError::AlreadyRunning { channel_id }).await;
        };

        let channel = guild.channel(channel_id).await?;
        if !is_archivable(channel.kind) {
            return Self::refuse(reply, ArchiveError::UnsupportedChannel { kind: channel.kind }).await;
        }

        reply.defer().await?;
        info!(channel_id = %channel.id, channel = %channel.name, user_id = %invocation.user_id, "archiving channel");

        let mut progress = Progress::new(reply, format!("📦 Archiving **{}**...", channel.name));
        match ArchiveWorkflow::new(guild, &self.config)
            .run(&channel, &mut progress)
            .await
        {
            Ok(summary) => {
                info!(
                    channel_id = %summary.channel_id,
                    category_id = %summary.category_id,
                    category_created = summary.category_created,
                    snapshot = summary.snapshot.len(),
                    deleted = summary.strip.deleted(),
                    strip_failures = summary.strip.failed().len(),
                    everyone_denied = summary.strip.everyone_denied,
                    restored = summary.restore.restored(),
                    restore_failures = summary.restore.failed().len(),
                    pauses = summary.restore.pauses,
                    "channel archived"
                );
            }
            Err(err) => {
                warn!(channel_id = %channel.id, stage = ?err.stage(), error = %err, "archive aborted");
                if err.after_mutation() {
                    progress.record(err.user_message()).await;
                } else {
                    reply.edit(&err.user_message()).await?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serenity::all::UserId;
    use stowage_test_utils::fixtures::{human, text_channel};
    use stowage_test_utils::{MockGuild, MockReply, ReplyEvent};

    use super::*;

    fn admin_invocation(guild: &MockGuild, channel: u64) -> Invocation {
        Invocation {
            command: "archive".into(),
            guild_id: guild.guild_id(),
            channel_id: ChannelId::new(channel),
            user_id: UserId::new(77),
            member_permissions: Permissions::ADMINISTRATOR,
        }
    }

    #[test]
    fn claim_is_exclusive_until_dropped() {
        let command = ArchiveCommand::new(ArchiveConfig::default());
        let id = ChannelId::new(10);

        let first = command.claim(id);
        assert!(first.is_some());
        assert!(command.is_running(id));
        assert!(command.claim(id).is_none());
        assert!(command.is_running(id), "a refused claim must not release the holder");
        assert!(command.claim(ChannelId::new(11)).is_some());

        drop(first);
        assert!(!command.is_running(id));
        assert!(command.claim(id).is_some());
    }

    #[tokio::test]
    async fn claim_is_released_after_a_run() {
        let guild = MockGuild::new(1, 2)
            .with_member(human(3, &[]))
            .with_channel(text_channel(10, "general"));
        let command = ArchiveCommand::new(ArchiveConfig::default());
        let reply = MockReply::new();
        let invocation = admin_invocation(&guild, 10);

        command.execute(&invocation, &guild, &reply).await.unwrap();
        assert!(!command.is_running(ChannelId::new(10)));
    }

    #[tokio::test]
    async fn concurrent_invocation_is_refused_without_calls() {
        let guild = MockGuild::new(1, 2)
            .with_member(human(3, &[]))
            .with_channel(text_channel(10, "general"));
        let command = ArchiveCommand::new(ArchiveConfig::default());
        let reply = MockReply::new();
        let invocation = admin_invocation(&guild, 10);

        let _running = command.claim(ChannelId::new(10)).unwrap();
        command.execute(&invocation, &guild, &reply).await.unwrap();

        assert!(guild.calls().is_empty());
        assert_eq!(
            reply.events().await,
            vec![ReplyEvent::Responded {
                content: "⏳ This channel is already being archived.".into(),
                ephemeral: true,
            }]
        );
        assert!(command.is_running(ChannelId::new(10)));
    }

    #[test]
    fn registered_as_admin_only() {
        let command = ArchiveCommand::new(ArchiveConfig::default());
        assert_eq!(command.name(), "archive");
        assert_eq!(
            command.default_member_permissions(),
            Some(Permissions::ADMINISTRATOR)
        );
    }
}
