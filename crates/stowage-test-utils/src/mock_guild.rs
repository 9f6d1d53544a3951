// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory guild for deterministic pipeline tests.
//!
//! `MockGuild` implements `GuildApi` over a mutable channel/role/member table,
//! records every remote call in order, and can be told to fail specific calls.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serenity::all::{
    ChannelId, ChannelType, GuildId, PermissionOverwrite, PermissionOverwriteType, Permissions,
    RoleId, UserId,
};
use stowage_core::types::everyone_role;
use stowage_core::{ChannelInfo, GuildApi, GuildMember, ScopeRoles, StowageError};

/// Ids handed out to channels created through the mock.
const FIRST_CREATED_ID: u64 = 900_000;

/// A remote call observed by [`MockGuild`].
#[derive(Debug, Clone)]
pub enum GuildCall {
    Channel(ChannelId),
    FetchMembers,
    CreateCategory {
        name: String,
        reason: String,
    },
    SetParent {
        channel: ChannelId,
        parent: ChannelId,
        lock_permissions: bool,
    },
    DeleteOverwrite {
        channel: ChannelId,
        principal: PermissionOverwriteType,
    },
    PutOverwrite {
        channel: ChannelId,
        overwrite: PermissionOverwrite,
    },
}

impl GuildCall {
    /// Returns `true` for calls that change guild state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, GuildCall::Channel(_) | GuildCall::FetchMembers)
    }
}

#[derive(Default)]
struct Failures {
    fetch_members: bool,
    scope_roles: bool,
    cached_channels: bool,
    create_category: bool,
    set_parent: bool,
    delete_overwrite: Vec<PermissionOverwriteType>,
    put_overwrite: Vec<PermissionOverwriteType>,
}

struct GuildState {
    owner_id: UserId,
    roles: HashMap<RoleId, Permissions>,
    members: Vec<GuildMember>,
    channels: BTreeMap<ChannelId, ChannelInfo>,
    next_id: u64,
    calls: Vec<GuildCall>,
    failures: Failures,
}

/// A mock guild for testing.
///
/// State sits behind a `std` mutex because the cache-backed `GuildApi`
/// methods are synchronous; the lock is never held across an await.
pub struct MockGuild {
    guild_id: GuildId,
    state: Mutex<GuildState>,
}

impl MockGuild {
    /// Creates a guild whose `@everyone` role grants view, send, and history.
    pub fn new(guild_id: u64, owner_id: u64) -> Self {
        let guild_id = GuildId::new(guild_id);
        let mut roles = HashMap::new();
        roles.insert(
            everyone_role(guild_id),
            Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES | Permissions::READ_MESSAGE_HISTORY,
        );

        Self {
            guild_id,
            state: Mutex::new(GuildState {
                owner_id: UserId::new(owner_id),
                roles,
                members: Vec::new(),
                channels: BTreeMap::new(),
                next_id: FIRST_CREATED_ID,
                calls: Vec::new(),
                failures: Failures::default(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, GuildState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces the base permissions of `@everyone`.
    pub fn with_everyone_permissions(self, permissions: Permissions) -> Self {
        let everyone = everyone_role(self.guild_id);
        self.state().roles.insert(everyone, permissions);
        self
    }

    /// Adds a role with base `permissions`.
    pub fn with_role(self, id: u64, permissions: Permissions) -> Self {
        self.state().roles.insert(RoleId::new(id), permissions);
        self
    }

    /// Adds a roster entry.
    pub fn with_member(self, member: GuildMember) -> Self {
        self.state().members.push(member);
        self
    }

    /// Adds several roster entries.
    pub fn with_members(self, members: impl IntoIterator<Item = GuildMember>) -> Self {
        self.state().members.extend(members);
        self
    }

    /// Adds a channel (or category).
    pub fn with_channel(self, channel: ChannelInfo) -> Self {
        self.state().channels.insert(channel.id, channel);
        self
    }

    /// Makes `fetch_members` fail as if the members intent were missing.
    pub fn fail_member_fetch(self) -> Self {
        self.state().failures.fetch_members = true;
        self
    }

    /// Makes `scope_roles` fail as if the guild were not cached.
    pub fn fail_scope_roles(self) -> Self {
        self.state().failures.scope_roles = true;
        self
    }

    /// Makes `cached_channels` fail as if the guild were not cached.
    pub fn fail_cached_channels(self) -> Self {
        self.state().failures.cached_channels = true;
        self
    }

    /// Makes `create_category` fail.
    pub fn fail_category_creation(self) -> Self {
        self.state().failures.create_category = true;
        self
    }

    /// Makes `set_parent` fail.
    pub fn fail_set_parent(self) -> Self {
        self.state().failures.set_parent = true;
        self
    }

    /// Makes deleting the overwrite of `principal` fail.
    pub fn fail_delete_overwrite(self, principal: PermissionOverwriteType) -> Self {
        self.state().failures.delete_overwrite.push(principal);
        self
    }

    /// Makes putting an overwrite for `principal` fail.
    pub fn fail_put_overwrite(self, principal: PermissionOverwriteType) -> Self {
        self.state().failures.put_overwrite.push(principal);
        self
    }

    /// Current state of a channel.
    pub fn channel_state(&self, id: ChannelId) -> Option<ChannelInfo> {
        self.state().channels.get(&id).cloned()
    }

    /// All categories whose name matches `name` case-insensitively.
    pub fn categories_named(&self, name: &str) -> Vec<ChannelInfo> {
        self.state()
            .channels
            .values()
            .filter(|c| c.kind == ChannelType::Category && c.name.to_lowercase() == name.to_lowercase())
            .cloned()
            .collect()
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<GuildCall> {
        self.state().calls.clone()
    }

    /// Number of state-changing calls observed so far.
    pub fn mutation_count(&self) -> usize {
        self.state().calls.iter().filter(|c| c.is_mutation()).count()
    }

    /// Forgets recorded calls, keeping guild state.
    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    fn rejected(call: &str) -> StowageError {
        StowageError::Platform {
            message: format!("{call} rejected by mock guild"),
            source: None,
        }
    }
}

#[async_trait]
impl GuildApi for MockGuild {
    fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    async fn channel(&self, id: ChannelId) -> Result<ChannelInfo, StowageError> {
        let mut state = self.state();
        state.calls.push(GuildCall::Channel(id));
        state
            .channels
            .get(&id)
            .cloned()
            .ok_or_else(|| StowageError::not_found("channel", id))
    }

    async fn fetch_members(&self) -> Result<Vec<GuildMember>, StowageError> {
        let mut state = self.state();
        state.calls.push(GuildCall::FetchMembers);
        if state.failures.fetch_members {
            return Err(Self::rejected("member fetch"));
        }
        Ok(state.members.clone())
    }

    fn scope_roles(&self) -> Result<ScopeRoles, StowageError> {
        let state = self.state();
        if state.failures.scope_roles {
            return Err(StowageError::not_found("guild", self.guild_id));
        }
        Ok(ScopeRoles::new(self.guild_id, state.owner_id, state.roles.clone()))
    }

    fn cached_channels(&self) -> Result<Vec<ChannelInfo>, StowageError> {
        let state = self.state();
        if state.failures.cached_channels {
            return Err(StowageError::not_found("guild", self.guild_id));
        }
        Ok(state.channels.values().cloned().collect())
    }

    async fn create_category(&self, name: &str, reason: &str) -> Result<ChannelInfo, StowageError> {
        let mut state = self.state();
        state.calls.push(GuildCall::CreateCategory {
            name: name.to_string(),
            reason: reason.to_string(),
        });
        if state.failures.create_category {
            return Err(Self::rejected("category creation"));
        }

        let id = ChannelId::new(state.next_id);
        state.next_id += 1;
        let category = ChannelInfo {
            id,
            name: name.to_string(),
            kind: ChannelType::Category,
            parent_id: None,
            overwrites: Vec::new(),
        };
        state.channels.insert(id, category.clone());
        Ok(category)
    }

    async fn set_parent(
        &self,
        channel: ChannelId,
        parent: ChannelId,
        lock_permissions: bool,
    ) -> Result<ChannelInfo, StowageError> {
        let mut state = self.state();
        state.calls.push(GuildCall::SetParent {
            channel,
            parent,
            lock_permissions,
        });
        if state.failures.set_parent {
            return Err(Self::rejected("reparent"));
        }

        let parent_overwrites = state
            .channels
            .get(&parent)
            .map(|p| p.overwrites.clone())
            .ok_or_else(|| StowageError::not_found("channel", parent))?;
        let target = state
            .channels
            .get_mut(&channel)
            .ok_or_else(|| StowageError::not_found("channel", channel))?;

        target.parent_id = Some(parent);
        if lock_permissions {
            target.overwrites = parent_overwrites;
        }
        Ok(target.clone())
    }

    async fn delete_overwrite(
        &self,
        channel: ChannelId,
        principal: PermissionOverwriteType,
    ) -> Result<(), StowageError> {
        let mut state = self.state();
        state.calls.push(GuildCall::DeleteOverwrite { channel, principal });
        if state.failures.delete_overwrite.contains(&principal) {
            return Err(Self::rejected("overwrite delete"));
        }

        let target = state
            .channels
            .get_mut(&channel)
            .ok_or_else(|| StowageError::not_found("channel", channel))?;
        target.overwrites.retain(|ow| ow.kind != principal);
        Ok(())
    }

    async fn put_overwrite(
        &self,
        channel: ChannelId,
        overwrite: PermissionOverwrite,
    ) -> Result<(), StowageError> {
        let mut state = self.state();
        state.calls.push(GuildCall::PutOverwrite {
            channel,
            overwrite: overwrite.clone(),
        });
        if state.failures.put_overwrite.contains(&overwrite.kind) {
            return Err(Self::rejected("overwrite edit"));
        }

        let target = state
            .channels
            .get_mut(&channel)
            .ok_or_else(|| StowageError::not_found("channel", channel))?;
        target.overwrites.retain(|ow| ow.kind != overwrite.kind);
        target.overwrites.push(overwrite);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{category, human, role_overwrite, text_channel};

    fn guild() -> MockGuild {
        MockGuild::new(1, 2)
            .with_member(human(10, &[]))
            .with_channel(text_channel(100, "general"))
    }

    #[tokio::test]
    async fn channel_lookup_is_recorded_but_not_a_mutation() {
        let guild = guild();
        let channel = guild.channel(ChannelId::new(100)).await.unwrap();
        assert_eq!(channel.name, "general");
        assert_eq!(guild.calls().len(), 1);
        assert_eq!(guild.mutation_count(), 0);
    }

    #[tokio::test]
    async fn missing_channel_is_not_found() {
        let guild = guild();
        let err = guild.channel(ChannelId::new(5)).await.unwrap_err();
        assert!(matches!(err, StowageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn created_categories_get_increasing_ids() {
        let guild = guild();
        let a = guild.create_category("Archive", "r").await.unwrap();
        let b = guild.create_category("Archive", "r").await.unwrap();
        assert!(a.id < b.id);
        assert_eq!(guild.categories_named("archive").len(), 2);
    }

    #[tokio::test]
    async fn locked_reparent_copies_parent_overwrites() {
        let mut cat = category(50, "Archive");
        cat.overwrites
            .push(role_overwrite(1, Permissions::empty(), Permissions::SEND_MESSAGES));
        let guild = guild().with_channel(cat);

        let moved = guild
            .set_parent(ChannelId::new(100), ChannelId::new(50), true)
            .await
            .unwrap();
        assert_eq!(moved.parent_id, Some(ChannelId::new(50)));
        assert_eq!(moved.overwrites.len(), 1);
        assert_eq!(moved.overwrites[0].deny, Permissions::SEND_MESSAGES);
    }

    #[tokio::test]
    async fn put_overwrite_replaces_existing_entry() {
        let guild = guild();
        let id = ChannelId::new(100);
        guild
            .put_overwrite(id, role_overwrite(1, Permissions::VIEW_CHANNEL, Permissions::empty()))
            .await
            .unwrap();
        guild
            .put_overwrite(id, role_overwrite(1, Permissions::empty(), Permissions::VIEW_CHANNEL))
            .await
            .unwrap();
        let state = guild.channel_state(id).unwrap();
        assert_eq!(state.overwrites.len(), 1);
        assert_eq!(state.overwrites[0].deny, Permissions::VIEW_CHANNEL);
    }

    #[tokio::test]
    async fn injected_failures_are_returned() {
        let principal = PermissionOverwriteType::Member(UserId::new(10));
        let guild = guild()
            .fail_member_fetch()
            .fail_put_overwrite(principal);
        assert!(guild.fetch_members().await.is_err());
        let err = guild
            .put_overwrite(
                ChannelId::new(100),
                PermissionOverwrite {
                    allow: Permissions::VIEW_CHANNEL,
                    deny: Permissions::empty(),
                    kind: principal,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StowageError::Platform { .. }));
        assert!(guild.channel_state(ChannelId::new(100)).unwrap().overwrites.is_empty());
    }
}
