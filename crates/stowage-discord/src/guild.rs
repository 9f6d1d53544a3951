// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`GuildApi`] over serenity's HTTP client and gateway cache.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{
    Cache, ChannelId, ChannelType, CreateChannel, EditChannel, GuildChannel, GuildId, Http, Member,
    PermissionOverwrite, PermissionOverwriteType, UserId,
};
use stowage_core::{ChannelInfo, GuildApi, GuildMember, ScopeRoles, StowageError};
use tracing::debug;

/// Largest page the member list endpoint returns.
pub const MEMBER_PAGE_SIZE: u64 = 1000;

/// One guild, as seen through the bot's HTTP client and cache.
pub struct DiscordGuild {
    guild_id: GuildId,
    http: Arc<Http>,
    cache: Arc<Cache>,
    member_fetch_timeout: Duration,
}

impl DiscordGuild {
    pub fn new(
        guild_id: GuildId,
        http: Arc<Http>,
        cache: Arc<Cache>,
        member_fetch_timeout: Duration,
    ) -> Self {
        Self {
            guild_id,
            http,
            cache,
            member_fetch_timeout,
        }
    }

    fn uncached(&self) -> StowageError {
        StowageError::not_found("cached guild", self.guild_id)
    }
}

fn channel_info(channel: &GuildChannel) -> ChannelInfo {
    ChannelInfo {
        id: channel.id,
        name: channel.name.clone(),
        kind: channel.kind,
        parent_id: channel.parent_id,
        overwrites: channel.permission_overwrites.clone(),
    }
}

fn guild_member(member: &Member) -> GuildMember {
    GuildMember {
        id: member.user.id,
        tag: member.user.tag(),
        bot: member.user.bot,
        roles: member.roles.clone(),
    }
}

/// Fetches pages with `fetch(after)` until a short page comes back.
///
/// `after` is the id of the last entry of the previous page.
pub(crate) async fn paginate<T, F, Fut>(
    page_size: usize,
    id_of: impl Fn(&T) -> UserId,
    mut fetch: F,
) -> Result<Vec<T>, StowageError>
where
    F: FnMut(Option<UserId>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, StowageError>>,
{
    let mut all = Vec::new();
    let mut after = None;
    loop {
        let page = fetch(after).await?;
        let full = page.len() >= page_size;
        if let Some(last) = page.last() {
            after = Some(id_of(last));
        }
        all.extend(page);
        if !full {
            return Ok(all);
        }
    }
}

#[async_trait]
impl GuildApi for DiscordGuild {
    fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    async fn channel(&self, id: ChannelId) -> Result<ChannelInfo, StowageError> {
        let channel = id
            .to_channel(&self.http)
            .await
            .map_err(|e| StowageError::platform(format!("failed to fetch channel {id}: {e}"), e))?;
        channel
            .guild()
            .filter(|c| c.guild_id == self.guild_id)
            .map(|c| channel_info(&c))
            .ok_or_else(|| StowageError::not_found("guild channel", id))
    }

    async fn fetch_members(&self) -> Result<Vec<GuildMember>, StowageError> {
        let http = &self.http;
        let guild_id = self.guild_id;
        let pages = paginate(MEMBER_PAGE_SIZE as usize, |m: &Member| m.user.id, |after| async move {
            guild_id
                .members(http, Some(MEMBER_PAGE_SIZE), after)
                .await
                .map_err(|e| StowageError::platform(format!("failed to list members: {e}"), e))
        });

        let members = tokio::time::timeout(self.member_fetch_timeout, pages)
            .await
            .map_err(|_| StowageError::Timeout {
                duration: self.member_fetch_timeout,
            })??;

        debug!(guild_id = %self.guild_id, count = members.len(), "fetched member roster");
        Ok(members.iter().map(guild_member).collect())
    }

    fn scope_roles(&self) -> Result<ScopeRoles, StowageError> {
        let guild = self.cache.guild(self.guild_id).ok_or_else(|| self.uncached())?;
        let roles = guild
            .roles
            .iter()
            .map(|(id, role)| (*id, role.permissions))
            .collect();
        Ok(ScopeRoles::new(self.guild_id, guild.owner_id, roles))
    }

    fn cached_channels(&self) -> Result<Vec<ChannelInfo>, StowageError> {
        let guild = self.cache.guild(self.guild_id).ok_or_else(|| self.uncached())?;
        Ok(guild.channels.values().map(channel_info).collect())
    }

    async fn create_category(&self, name: &str, reason: &str) -> Result<ChannelInfo, StowageError> {
        let builder = CreateChannel::new(name)
            .kind(ChannelType::Category)
            .audit_log_reason(reason);
        let created = self
            .guild_id
            .create_channel(&self.http, builder)
            .await
            .map_err(|e| StowageError::platform(format!("failed to create category {name}: {e}"), e))?;
        Ok(channel_info(&created))
    }

    async fn set_parent(
        &self,
        channel: ChannelId,
        parent: ChannelId,
        lock_permissions: bool,
    ) -> Result<ChannelInfo, StowageError> {
        let mut edit = EditChannel::new().category(Some(parent));
        if lock_permissions {
            let category = self.channel(parent).await?;
            edit = edit.permissions(category.overwrites);
        }
        let updated = channel
            .edit(&self.http, edit)
            .await
            .map_err(|e| StowageError::platform(format!("failed to move channel {channel}: {e}"), e))?;
        Ok(channel_info(&updated))
    }

    async fn delete_overwrite(
        &self,
        channel: ChannelId,
        principal: PermissionOverwriteType,
    ) -> Result<(), StowageError> {
        channel
            .delete_permission(&self.http, principal)
            .await
            .map_err(|e| StowageError::platform(format!("failed to delete overwrite: {e}"), e))
    }

    async fn put_overwrite(
        &self,
        channel: ChannelId,
        overwrite: PermissionOverwrite,
    ) -> Result<(), StowageError> {
        channel
            .create_permission(&self.http, overwrite)
            .await
            .map_err(|e| StowageError::platform(format!("failed to put overwrite: {e}"), e))
    }
}
