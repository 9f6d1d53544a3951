// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command registry, populated once at startup and read by the dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::StowageError;
use crate::traits::{Command, GuildApi, ReplySurface};
use crate::types::Invocation;

/// Registry of slash commands, indexed by name.
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a command under its `name()`, replacing any previous entry.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.insert(command.name().to_string(), command);
    }

    /// Looks up a command by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    /// Returns all registered commands sorted by name.
    pub fn commands(&self) -> Vec<Arc<dyn Command>> {
        let mut all: Vec<Arc<dyn Command>> = self.commands.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    /// Routes `invocation` to the command it names.
    pub async fn dispatch(
        &self,
        invocation: &Invocation,
        guild: &dyn GuildApi,
        reply: &dyn ReplySurface,
    ) -> Result<(), StowageError> {
        let command = self
            .get(&invocation.command)
            .ok_or_else(|| StowageError::not_found("command", &invocation.command))?;

        debug!(
            command = %invocation.command,
            guild_id = %invocation.guild_id,
            channel_id = %invocation.channel_id,
            user_id = %invocation.user_id,
            "dispatching command"
        );
        command.execute(invocation, guild, reply).await
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
