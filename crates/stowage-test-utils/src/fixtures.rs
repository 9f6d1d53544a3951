// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small constructors for guild entities used across tests.

use serenity::all::{
    ChannelId, ChannelType, PermissionOverwrite, PermissionOverwriteType, Permissions, RoleId,
    UserId,
};
use stowage_core::{ChannelInfo, GuildMember};

/// A non-bot member with the given role ids.
pub fn human(id: u64, roles: &[u64]) -> GuildMember {
    GuildMember {
        id: UserId::new(id),
        tag: format!("member{id}"),
        bot: false,
        roles: roles.iter().copied().map(RoleId::new).collect(),
    }
}

/// A bot account with no roles.
pub fn bot(id: u64) -> GuildMember {
    GuildMember {
        id: UserId::new(id),
        tag: format!("bot{id}"),
        bot: true,
        roles: Vec::new(),
    }
}

/// A channel of `kind` without a parent and without overwrites.
pub fn channel(id: u64, name: &str, kind: ChannelType) -> ChannelInfo {
    ChannelInfo {
        id: ChannelId::new(id),
        name: name.to_string(),
        kind,
        parent_id: None,
        overwrites: Vec::new(),
    }
}

/// A text channel without a parent and without overwrites.
pub fn text_channel(id: u64, name: &str) -> ChannelInfo {
    channel(id, name, ChannelType::Text)
}

/// A category channel without overwrites.
pub fn category(id: u64, name: &str) -> ChannelInfo {
    channel(id, name, ChannelType::Category)
}

/// A member overwrite.
pub fn member_overwrite(user: u64, allow: Permissions, deny: Permissions) -> PermissionOverwrite {
    PermissionOverwrite {
        allow,
        deny,
        kind: PermissionOverwriteType::Member(UserId::new(user)),
    }
}

/// A role overwrite. Pass the guild id to target `@everyone`.
pub fn role_overwrite(role: u64, allow: Permissions, deny: Permissions) -> PermissionOverwrite {
    PermissionOverwrite {
        allow,
        deny,
        kind: PermissionOverwriteType::Role(RoleId::new(role)),
    }
}
