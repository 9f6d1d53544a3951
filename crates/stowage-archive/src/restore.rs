// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stage 5: give every snapshot member read-only access back.

use std::time::Duration;

use serenity::all::{ChannelId, PermissionOverwrite, PermissionOverwriteType, Permissions, UserId};
use stowage_config::model::ArchiveConfig;
use stowage_core::GuildApi;
use tracing::{debug, warn};

use crate::outcome::{Outcome, RestoreReport};
use crate::snapshot::AccessSnapshot;

/// Granted to every restored member.
pub const READ_ONLY_ALLOW: Permissions =
    Permissions::VIEW_CHANNEL.union(Permissions::READ_MESSAGE_HISTORY);

/// Denied to every restored member.
pub const READ_ONLY_DENY: Permissions = Permissions::SEND_MESSAGES
    .union(Permissions::ADD_REACTIONS)
    .union(Permissions::CONNECT)
    .union(Permissions::SPEAK)
    .union(Permissions::SEND_MESSAGES_IN_THREADS)
    .union(Permissions::CREATE_PUBLIC_THREADS)
    .union(Permissions::CREATE_PRIVATE_THREADS)
    .union(Permissions::ATTACH_FILES)
    .union(Permissions::EMBED_LINKS)
    .union(Permissions::USE_EXTERNAL_EMOJIS)
    .union(Permissions::USE_EXTERNAL_STICKERS)
    .union(Permissions::MENTION_EVERYONE)
    .union(Permissions::MANAGE_MESSAGES)
    .union(Permissions::MANAGE_THREADS);

/// The read-only member overwrite for `user`.
pub fn read_only_overwrite(user: UserId) -> PermissionOverwrite {
    PermissionOverwrite {
        allow: READ_ONLY_ALLOW,
        deny: READ_ONLY_DENY,
        kind: PermissionOverwriteType::Member(user),
    }
}

/// Pause cadence for the restore loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    batch: usize,
    delay: Duration,
}

impl Throttle {
    /// A zero `batch` is treated as 1.
    pub fn new(batch: usize, delay: Duration) -> Self {
        Self {
            batch: batch.max(1),
            delay,
        }
    }

    /// Whether to pause after the `successes`-th successful grant.
    pub fn due(&self, successes: usize) -> bool {
        successes > 0 && successes % self.batch == 0
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl From<&ArchiveConfig> for Throttle {
    fn from(config: &ArchiveConfig) -> Self {
        Self::new(config.throttle_batch, config.throttle_delay())
    }
}

/// Puts [`read_only_overwrite`] for each snapshot member, in snapshot order.
///
/// Pauses after every `batch` successful grants; failures are logged,
/// recorded, and never trigger a pause.
pub async fn restore_access(
    guild: &dyn GuildApi,
    channel: ChannelId,
    snapshot: &AccessSnapshot,
    throttle: Throttle,
) -> RestoreReport {
    let mut report = RestoreReport::default();
    let mut successes = 0usize;

    for &user in snapshot.members() {
        let result = guild.put_overwrite(channel, read_only_overwrite(user)).await;
        match &result {
            Ok(()) => {
                successes += 1;
                if throttle.due(successes) {
                    debug!(channel_id = %channel, successes, delay_ms = throttle.delay().as_millis() as u64, "throttling access restore");
                    tokio::time::sleep(throttle.delay()).await;
                    report.pauses += 1;
                }
            }
            Err(e) => {
                warn!(channel_id = %channel, user_id = %user, error = %e, "failed to restore view access");
            }
        }
        report.grants.push((user, Outcome::from(result)));
    }

    report
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serenity::all::{GuildId, Permissions};
    use stowage_core::ScopeRoles;
    use stowage_test_utils::fixtures::{human, text_channel};
    use stowage_test_utils::{GuildCall, MockGuild};
    use tokio::time::Instant;

    use super::*;

    const GUILD: u64 = 1;

    fn snapshot_of(ids: impl IntoIterator<Item = u64>) -> AccessSnapshot {
        let roster: Vec<_> = ids.into_iter().map(|id| human(id, &[])).collect();
        let mut roles = HashMap::new();
        roles.insert(
            stowage_core::types::everyone_role(GuildId::new(GUILD)),
            Permissions::VIEW_CHANNEL,
        );
        let scope = ScopeRoles::new(GuildId::new(GUILD), UserId::new(2), roles);
        AccessSnapshot::capture(&roster, &scope, &text_channel(10, "general"))
    }

    #[test]
    fn bundle_is_read_only() {
        let ow = read_only_overwrite(UserId::new(5));
        assert!(ow.allow.contains(Permissions::VIEW_CHANNEL));
        assert!(ow.allow.contains(Permissions::READ_MESSAGE_HISTORY));
        assert_eq!(ow.allow.bits().count_ones(), 2);
        assert!(ow.deny.contains(Permissions::SEND_MESSAGES | Permissions::CONNECT));
        assert_eq!(ow.deny.bits().count_ones(), 14);
        assert!((ow.allow & ow.deny).is_empty());
    }

    #[test]
    fn throttle_due_every_batch() {
        let throttle = Throttle::new(10, Duration::from_millis(500));
        assert!(!throttle.due(0));
        assert!(!throttle.due(9));
        assert!(throttle.due(10));
        assert!(throttle.due(20));
        assert!(Throttle::new(0, Duration::ZERO).due(1));
    }

    #[tokio::test(start_paused = true)]
    async fn one_pause_per_batch_of_successes() {
        let guild = MockGuild::new(GUILD, 2).with_channel(text_channel(10, "general"));
        let snapshot = snapshot_of(100..125);
        let start = Instant::now();

        let report = restore_access(
            &guild,
            ChannelId::new(10),
            &snapshot,
            Throttle::new(10, Duration::from_millis(500)),
        )
        .await;

        assert_eq!(report.restored(), 25);
        assert_eq!(report.pauses, 2);
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    #[tracing_test::traced_test]
    async fn failures_do_not_count_toward_pauses() {
        let guild = MockGuild::new(GUILD, 2)
            .with_channel(text_channel(10, "general"))
            .fail_put_overwrite(PermissionOverwriteType::Member(UserId::new(103)))
            .fail_put_overwrite(PermissionOverwriteType::Member(UserId::new(107)));
        let snapshot = snapshot_of(100..111);

        let report = restore_access(
            &guild,
            ChannelId::new(10),
            &snapshot,
            Throttle::new(10, Duration::from_millis(500)),
        )
        .await;

        assert_eq!(report.grants.len(), 11);
        assert_eq!(report.restored(), 9);
        assert_eq!(report.failed(), vec![UserId::new(103), UserId::new(107)]);
        assert_eq!(report.pauses, 0);
        assert!(logs_contain("failed to restore view access"));
    }

    #[tokio::test]
    async fn grants_follow_snapshot_order() {
        let guild = MockGuild::new(GUILD, 2).with_channel(text_channel(10, "general"));
        let snapshot = snapshot_of([30, 10, 20]);
        restore_access(&guild, ChannelId::new(10), &snapshot, Throttle::new(10, Duration::ZERO)).await;

        let targets: Vec<_> = guild
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GuildCall::PutOverwrite { overwrite, .. } => Some(overwrite.kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            targets,
            vec![
                PermissionOverwriteType::Member(UserId::new(30)),
                PermissionOverwriteType::Member(UserId::new(10)),
                PermissionOverwriteType::Member(UserId::new(20)),
            ]
        );
    }
}
