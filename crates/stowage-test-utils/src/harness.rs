// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end command testing.
//!
//! `TestHarness` wires a [`CommandRegistry`] to a [`MockGuild`] and drives
//! invocations the way the gateway dispatcher does, with a fresh
//! [`MockReply`] per invocation.

use std::sync::Arc;

use serenity::all::{ChannelId, Permissions, UserId};
use stowage_core::{Command, CommandRegistry, GuildApi, Invocation, StowageError};

use crate::mock_guild::MockGuild;
use crate::mock_reply::MockReply;

/// Member id used by [`TestHarness::invoke_as_admin`].
pub const ADMIN_USER: u64 = 77;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    guild: MockGuild,
    commands: Vec<Arc<dyn Command>>,
}

impl TestHarnessBuilder {
    /// Register a command with the harness registry.
    pub fn with_command(mut self, command: Arc<dyn Command>) -> Self {
        self.commands.push(command);
        self
    }

    /// Build the harness.
    pub fn build(self) -> TestHarness {
        let mut registry = CommandRegistry::new();
        for command in self.commands {
            registry.register(command);
        }
        TestHarness {
            guild: Arc::new(self.guild),
            registry,
        }
    }
}

/// Outcome of one harness invocation.
pub struct Invoked {
    pub result: Result<(), StowageError>,
    pub reply: MockReply,
}

/// A command registry bound to a mock guild.
pub struct TestHarness {
    pub guild: Arc<MockGuild>,
    pub registry: CommandRegistry,
}

impl TestHarness {
    /// Start building a harness around `guild`.
    pub fn builder(guild: MockGuild) -> TestHarnessBuilder {
        TestHarnessBuilder {
            guild,
            commands: Vec::new(),
        }
    }

    /// Invoke `command` in `channel` as `user` holding `permissions`.
    pub async fn invoke(
        &self,
        command: &str,
        channel: u64,
        user: u64,
        permissions: Permissions,
    ) -> Invoked {
        let invocation = Invocation {
            command: command.to_string(),
            guild_id: self.guild.guild_id(),
            channel_id: ChannelId::new(channel),
            user_id: UserId::new(user),
            member_permissions: permissions,
        };
        let reply = MockReply::new();
        let result = self
            .registry
            .dispatch(&invocation, self.guild.as_ref(), &reply)
            .await;
        Invoked { result, reply }
    }

    /// Invoke `command` in `channel` as an administrator.
    pub async fn invoke_as_admin(&self, command: &str, channel: u64) -> Invoked {
        self.invoke(command, channel, ADMIN_USER, Permissions::ADMINISTRATOR)
            .await
    }
}
