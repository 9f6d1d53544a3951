// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs the five archive stages in order and reports after each one.

use serenity::all::ChannelId;
use stowage_config::model::ArchiveConfig;
use stowage_core::{ChannelInfo, GuildApi};
use strum::{Display, EnumIter};
use tracing::{info, warn};

use crate::error::ArchiveError;
use crate::locator::locate_or_create;
use crate::outcome::{RestoreReport, StripReport};
use crate::progress::Progress;
use crate::relocate::relocate;
use crate::restore::{Throttle, restore_access};
use crate::snapshot::{AccessSnapshot, take_snapshot};
use crate::strip::{delete_overwrites, deny_everyone};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Snapshot,
    Locate,
    Relocate,
    Strip,
    Restore,
}

/// Everything a completed run did.
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub channel_id: ChannelId,
    pub snapshot: AccessSnapshot,
    pub category_id: ChannelId,
    pub category_created: bool,
    pub strip: StripReport,
    pub restore: RestoreReport,
}

/// One archive run against one guild.
pub struct ArchiveWorkflow<'a> {
    guild: &'a dyn GuildApi,
    config: &'a ArchiveConfig,
}

impl<'a> ArchiveWorkflow<'a> {
    pub fn new(guild: &'a dyn GuildApi, config: &'a ArchiveConfig) -> Self {
        Self { guild, config }
    }

    /// Archives `channel`, pushing status lines into `progress` as stages finish.
    ///
    /// Stops at the first fatal error; whatever was already changed stays
    /// changed.
    pub async fn run(
        &self,
        channel: &ChannelInfo,
        progress: &mut Progress<'_>,
    ) -> Result<ArchiveSummary, ArchiveError> {
        let snapshot = take_snapshot(self.guild, channel).await?;
        info!(stage = %Stage::Snapshot, channel_id = %channel.id, members = snapshot.len(), "captured access snapshot");
        progress
            .record(format!("👥 Found {} members with access.", snapshot.len()))
            .await;

        let container = locate_or_create(self.guild, self.config).await?;
        let label = &self.config.category_name;
        info!(stage = %Stage::Locate, category_id = %container.category.id, created = container.created, "archive category ready");
        if container.created {
            progress.record(format!("📁 Created {label} category.")).await;
        }

        let relocated = relocate(self.guild, channel, &container.category).await?;
        progress
            .record(format!("📁 Moved channel to {label} category."))
            .await;

        let deletions = delete_overwrites(self.guild, &relocated).await;
        progress.record("🧹 Cleared all role and user permissions.").await;
        let everyone_denied = deny_everyone(self.guild, relocated.id).await;
        let strip = StripReport {
            deletions,
            everyone_denied,
        };
        if strip.failed().is_empty() {
            info!(stage = %Stage::Strip, channel_id = %relocated.id, deleted = strip.deleted(), everyone_denied, "stripped overwrites");
        } else {
            warn!(stage = %Stage::Strip, channel_id = %relocated.id, failed = strip.failed().len(), everyone_denied, "overwrites left on channel");
        }

        let restore = restore_access(
            self.guild,
            relocated.id,
            &snapshot,
            Throttle::from(self.config),
        )
        .await;
        info!(stage = %Stage::Restore, channel_id = %relocated.id, restored = restore.restored(), failed = restore.failed().len(), pauses = restore.pauses, "restored read-only access");

        progress.note(format!(
            "👁️‍🗨️ Restored view-only access for {} members.",
            restore.restored()
        ));
        progress.record("✅ Channel successfully archived.").await;

        Ok(ArchiveSummary {
            channel_id: relocated.id,
            snapshot,
            category_id: container.category.id,
            category_created: container.created,
            strip,
            restore,
        })
    }
}
