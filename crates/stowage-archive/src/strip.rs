// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stage 4: remove every overwrite, then hide the channel from `@everyone`.

use serenity::all::{ChannelId, GuildId, PermissionOverwrite, PermissionOverwriteType, Permissions};
use stowage_core::types::everyone_role;
use stowage_core::{ChannelInfo, GuildApi};
use tracing::{error, warn};

use crate::outcome::Outcome;

/// Deletes each overwrite on `channel` independently.
///
/// Failures are logged and recorded; every principal is visited.
pub async fn delete_overwrites(
    guild: &dyn GuildApi,
    channel: &ChannelInfo,
) -> Vec<(PermissionOverwriteType, Outcome)> {
    let mut deletions = Vec::with_capacity(channel.overwrites.len());
    for overwrite in &channel.overwrites {
        let principal = overwrite.kind;
        let result = guild.delete_overwrite(channel.id, principal).await;
        if let Err(e) = &result {
            warn!(channel_id = %channel.id, principal = ?principal, error = %e, "failed to delete overwrite");
        }
        deletions.push((principal, Outcome::from(result)));
    }
    deletions
}

/// The `@everyone` overwrite that hides a channel.
pub fn everyone_view_deny(guild_id: GuildId) -> PermissionOverwrite {
    PermissionOverwrite {
        allow: Permissions::empty(),
        deny: Permissions::VIEW_CHANNEL,
        kind: PermissionOverwriteType::Role(everyone_role(guild_id)),
    }
}

/// Puts the `@everyone` view deny on `channel`. Returns whether it landed.
///
/// A failure leaves the channel visible to the whole guild, so it is logged
/// at error level, but the archive still continues.
pub async fn deny_everyone(guild: &dyn GuildApi, channel: ChannelId) -> bool {
    match guild
        .put_overwrite(channel, everyone_view_deny(guild.guild_id()))
        .await
    {
        Ok(()) => true,
        Err(e) => {
            error!(
                channel_id = %channel,
                error = %e,
                "failed to deny @everyone view access; archived channel may still be public"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use serenity::all::{RoleId, UserId};
    use stowage_test_utils::fixtures::{member_overwrite, role_overwrite, text_channel};
    use stowage_test_utils::MockGuild;

    use super::*;

    const GUILD: u64 = 1;

    fn crowded_channel() -> ChannelInfo {
        let mut channel = text_channel(10, "general");
        channel.overwrites = vec![
            role_overwrite(GUILD, Permissions::empty(), Permissions::SEND_MESSAGES),
            role_overwrite(50, Permissions::VIEW_CHANNEL, Permissions::empty()),
            member_overwrite(3, Permissions::VIEW_CHANNEL, Permissions::empty()),
        ];
        channel
    }

    #[tokio::test]
    async fn clean_strip_leaves_only_everyone_deny() {
        let channel = crowded_channel();
        let guild = MockGuild::new(GUILD, 2).with_channel(channel.clone());

        let deletions = delete_overwrites(&guild, &channel).await;
        assert_eq!(deletions.len(), 3);
        assert!(deletions.iter().all(|(_, o)| o.is_applied()));
        assert!(deny_everyone(&guild, channel.id).await);

        let state = guild.channel_state(channel.id).unwrap();
        assert_eq!(state.overwrites.len(), 1);
        assert_eq!(
            state.overwrites[0].kind,
            PermissionOverwriteType::Role(RoleId::new(GUILD))
        );
        assert_eq!(state.overwrites[0].deny, Permissions::VIEW_CHANNEL);
        assert!(state.overwrites[0].allow.is_empty());
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn failed_delete_is_skipped() {
        let channel = crowded_channel();
        let stuck = PermissionOverwriteType::Role(RoleId::new(50));
        let guild = MockGuild::new(GUILD, 2)
            .with_channel(channel.clone())
            .fail_delete_overwrite(stuck);

        let deletions = delete_overwrites(&guild, &channel).await;
        let failed: Vec<_> = deletions
            .iter()
            .filter(|(_, o)| !o.is_applied())
            .map(|(p, _)| *p)
            .collect();
        assert_eq!(failed, vec![stuck]);
        assert!(deletions.iter().any(|(p, o)| *p
            == PermissionOverwriteType::Member(UserId::new(3))
            && o.is_applied()));
        assert!(logs_contain("failed to delete overwrite"));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn failed_everyone_deny_is_reported() {
        let channel = text_channel(10, "general");
        let guild = MockGuild::new(GUILD, 2)
            .with_channel(channel.clone())
            .fail_put_overwrite(PermissionOverwriteType::Role(RoleId::new(GUILD)));

        assert!(!deny_everyone(&guild, channel.id).await);
        assert!(logs_contain("may still be public"));
    }
}
