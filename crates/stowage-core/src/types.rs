// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the archive pipeline and the platform adapters.

use std::collections::HashMap;

use serenity::all::{
    ChannelId, ChannelType, GuildId, PermissionOverwrite, PermissionOverwriteType, Permissions,
    RoleId, UserId,
};

use crate::error::StowageError;

/// Channel kinds that can be archived.
pub const ARCHIVABLE_KINDS: [ChannelType; 4] = [
    ChannelType::Text,
    ChannelType::Voice,
    ChannelType::Forum,
    ChannelType::News,
];

/// Returns `true` for text, voice, forum, and announcement channels.
pub fn is_archivable(kind: ChannelType) -> bool {
    ARCHIVABLE_KINDS.contains(&kind)
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// A guild channel as seen by the archive pipeline.
///
/// Holds the subset of platform state the pipeline reads: identity, kind,
/// parent category, and the permission overwrites currently in place.
#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelType,
    pub parent_id: Option<ChannelId>,
    pub overwrites: Vec<PermissionOverwrite>,
}

impl ChannelInfo {
    /// Returns the overwrite for `principal`, if the channel has one.
    pub fn overwrite_for(&self, principal: PermissionOverwriteType) -> Option<&PermissionOverwrite> {
        self.overwrites.iter().find(|ow| ow.kind == principal)
    }

    /// Returns `true` if this channel is a category.
    pub fn is_category(&self) -> bool {
        self.kind == ChannelType::Category
    }
}

/// A guild member entry from the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub id: UserId,
    /// Display tag used in log lines only.
    pub tag: String,
    pub bot: bool,
    pub roles: Vec<RoleId>,
}

/// Role permission table for one guild.
///
/// The `@everyone` role shares its id with the guild; its base permissions
/// apply to every member.
#[derive(Debug, Clone)]
pub struct ScopeRoles {
    pub owner_id: UserId,
    pub everyone: RoleId,
    pub roles: HashMap<RoleId, Permissions>,
}

impl ScopeRoles {
    /// Builds a role table for `guild_id`, deriving the `@everyone` role id.
    pub fn new(guild_id: GuildId, owner_id: UserId, roles: HashMap<RoleId, Permissions>) -> Self {
        Self {
            owner_id,
            everyone: everyone_role(guild_id),
            roles,
        }
    }

    /// Base permissions granted by `role`.
    pub fn role_permissions(&self, role: RoleId) -> Result<Permissions, StowageError> {
        self.roles
            .get(&role)
            .copied()
            .ok_or_else(|| StowageError::not_found("role", role))
    }

    /// The `@everyone` principal as an overwrite target.
    pub fn everyone_principal(&self) -> PermissionOverwriteType {
        PermissionOverwriteType::Role(self.everyone)
    }
}

/// The `@everyone` role id of a guild.
pub fn everyone_role(guild_id: GuildId) -> RoleId {
    RoleId::new(guild_id.get())
}

/// Context of a single slash-command invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: String,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub user_id: UserId,
    /// Guild-level permissions of the invoking member as resolved by the platform.
    pub member_permissions: Permissions,
}

impl Invocation {
    pub fn is_administrator(&self) -> bool {
        self.member_permissions.contains(Permissions::ADMINISTRATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archivable_kinds_are_exactly_four() {
        assert!(is_archivable(ChannelType::Text));
        assert!(is_archivable(ChannelType::Voice));
        assert!(is_archivable(ChannelType::Forum));
        assert!(is_archivable(ChannelType::News));

        assert!(!is_archivable(ChannelType::Category));
        assert!(!is_archivable(ChannelType::Stage));
        assert!(!is_archivable(ChannelType::PublicThread));
        assert!(!is_archivable(ChannelType::Private));
    }

    #[test]
    fn everyone_role_shares_guild_id() {
        let guild = GuildId::new(4242);
        assert_eq!(everyone_role(guild), RoleId::new(4242));
        let scope = ScopeRoles::new(guild, UserId::new(1), HashMap::new());
        assert_eq!(
            scope.everyone_principal(),
            PermissionOverwriteType::Role(RoleId::new(4242))
        );
    }

    #[test]
    fn unknown_role_is_not_found() {
        let scope = ScopeRoles::new(GuildId::new(1), UserId::new(2), HashMap::new());
        let err = scope.role_permissions(RoleId::new(99)).unwrap_err();
        assert!(matches!(err, StowageError::NotFound { ref kind, .. } if kind == "role"));
    }

    #[test]
    fn administrator_invocation() {
        let mut inv = Invocation {
            command: "archive".into(),
            guild_id: GuildId::new(1),
            channel_id: ChannelId::new(2),
            user_id: UserId::new(3),
            member_permissions: Permissions::MANAGE_CHANNELS,
        };
        assert!(!inv.is_administrator());
        inv.member_permissions |= Permissions::ADMINISTRATOR;
        assert!(inv.is_administrator());
    }
}
