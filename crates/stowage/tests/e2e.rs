// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: configuration flows through the archive command into the guild.
//!
//! Each test builds an isolated TestHarness over an in-memory guild; tests are
//! independent and order-insensitive.

use std::sync::Arc;
use std::time::Duration;

use serenity::all::{ChannelId, PermissionOverwriteType, Permissions, UserId};
use stowage_archive::ArchiveCommand;
use stowage_config::load_and_validate_str;
use stowage_test_utils::fixtures::{human, member_overwrite, role_overwrite, text_channel};
use stowage_test_utils::{GuildCall, MockGuild, ReplyEvent, TestHarness};
use tokio::time::Instant;

const GUILD: u64 = 5000;
const CHANNEL: u64 = 42;

fn harness_from_toml(toml: &str, guild: MockGuild) -> TestHarness {
    let config = load_and_validate_str(toml).expect("test config should be valid");
    TestHarness::builder(guild)
        .with_command(Arc::new(ArchiveCommand::new(config.archive)))
        .build()
}

fn busy_guild(members: u64) -> MockGuild {
    MockGuild::new(GUILD, 1)
        .with_members((100..100 + members).map(|id| human(id, &[])))
        .with_channel(text_channel(CHANNEL, "raid-night"))
}

// ---- Configured category name and audit reason ----

#[tokio::test]
async fn configured_category_label_is_used_everywhere() {
    let h = harness_from_toml(
        r#"
[archive]
category_name = "Cold Storage"
audit_reason = "stowage archive"
"#,
        busy_guild(2),
    );

    let invoked = h.invoke_as_admin("archive", CHANNEL).await;
    invoked.result.unwrap();

    assert!(h.guild.calls().iter().any(|c| matches!(
        c,
        GuildCall::CreateCategory { name, reason } if name == "Cold Storage" && reason == "stowage archive"
    )));
    let transcript = invoked.reply.visible_content().await.unwrap();
    assert!(transcript.contains("📁 Created Cold Storage category."));
    assert!(transcript.contains("📁 Moved channel to Cold Storage category."));
}

// ---- Throttle settings ----

#[tokio::test(start_paused = true)]
async fn configured_throttle_paces_restores() {
    let h = harness_from_toml(
        "[archive]\nthrottle_batch = 3\nthrottle_delay_ms = 200\n",
        busy_guild(7),
    );

    let start = Instant::now();
    let invoked = h.invoke_as_admin("archive", CHANNEL).await;
    invoked.result.unwrap();

    // 7 grants at a batch of 3: pauses after the 3rd and 6th
    assert_eq!(start.elapsed(), Duration::from_millis(400));
    assert!(
        invoked
            .reply
            .visible_content()
            .await
            .unwrap()
            .contains("Restored view-only access for 7 members.")
    );
}

// ---- Channel that was already private ----

#[tokio::test]
async fn hidden_members_stay_hidden() {
    let mut channel = text_channel(CHANNEL, "officers");
    channel.overwrites = vec![
        role_overwrite(GUILD, Permissions::empty(), Permissions::VIEW_CHANNEL),
        member_overwrite(100, Permissions::VIEW_CHANNEL, Permissions::empty()),
    ];
    let guild = MockGuild::new(GUILD, 1)
        .with_members([human(100, &[]), human(101, &[])])
        .with_channel(channel);
    let h = harness_from_toml("", guild);

    h.invoke_as_admin("archive", CHANNEL).await.result.unwrap();

    let state = h.guild.channel_state(ChannelId::new(CHANNEL)).unwrap();
    assert!(state.overwrite_for(PermissionOverwriteType::Member(UserId::new(100))).is_some());
    assert!(state.overwrite_for(PermissionOverwriteType::Member(UserId::new(101))).is_none());
}

// ---- Dispatch shell ----

#[tokio::test]
async fn unknown_command_is_reported_to_the_dispatcher() {
    let h = harness_from_toml("", busy_guild(1));
    let invoked = h.invoke_as_admin("create-raid", CHANNEL).await;
    assert!(invoked.result.is_err());
    assert!(invoked.reply.events().await.is_empty());
}

#[tokio::test]
async fn archive_reply_is_deferred_publicly() {
    let h = harness_from_toml("", busy_guild(1));
    let invoked = h.invoke_as_admin("archive", CHANNEL).await;
    invoked.result.unwrap();

    let events = invoked.reply.events().await;
    assert_eq!(events.first(), Some(&ReplyEvent::Deferred));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, ReplyEvent::Responded { .. }))
    );
}
