// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guild API trait consumed by the archive pipeline.

use async_trait::async_trait;
use serenity::all::{ChannelId, GuildId, PermissionOverwrite, PermissionOverwriteType};

use crate::error::StowageError;
use crate::types::{ChannelInfo, GuildMember, ScopeRoles};

/// Read and write access to a single guild on the chat platform.
///
/// Synchronous methods read from the adapter's local cache and never hit the
/// network. Async methods are remote calls and each one is a suspend point.
#[async_trait]
pub trait GuildApi: Send + Sync {
    /// The guild this handle operates on.
    fn guild_id(&self) -> GuildId;

    /// Fetches a channel of this guild.
    async fn channel(&self, id: ChannelId) -> Result<ChannelInfo, StowageError>;

    /// Fetches the full member roster. May be slow or fail on large guilds.
    async fn fetch_members(&self) -> Result<Vec<GuildMember>, StowageError>;

    /// Role permission table from the cache.
    fn scope_roles(&self) -> Result<ScopeRoles, StowageError>;

    /// Every channel of the guild from the cache, categories included.
    fn cached_channels(&self) -> Result<Vec<ChannelInfo>, StowageError>;

    /// Creates a category channel, recording `reason` in the audit log.
    async fn create_category(&self, name: &str, reason: &str) -> Result<ChannelInfo, StowageError>;

    /// Moves `channel` under `parent` and returns the updated channel.
    ///
    /// With `lock_permissions` the channel's overwrites are replaced by the
    /// parent's, mirroring the platform client's "sync with category".
    async fn set_parent(
        &self,
        channel: ChannelId,
        parent: ChannelId,
        lock_permissions: bool,
    ) -> Result<ChannelInfo, StowageError>;

    /// Deletes the overwrite held by `principal` on `channel`.
    async fn delete_overwrite(
        &self,
        channel: ChannelId,
        principal: PermissionOverwriteType,
    ) -> Result<(), StowageError>;

    /// Creates or replaces the overwrite for `overwrite.kind` on `channel`.
    async fn put_overwrite(
        &self,
        channel: ChannelId,
        overwrite: PermissionOverwrite,
    ) -> Result<(), StowageError>;
}
