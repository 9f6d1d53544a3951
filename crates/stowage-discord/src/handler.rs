// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway event handling: command registration on ready, dispatch on interaction.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{
    Command as SlashCommand, CommandInteraction, Context, CreateCommand, EventHandler, GuildId,
    Interaction, Permissions, Ready,
};
use stowage_core::{CommandRegistry, Invocation, ReplySurface};
use tracing::{debug, error, info, warn};

use crate::guild::DiscordGuild;
use crate::reply::{InteractionReply, SERVER_ONLY};

/// Builds the slash-command definitions for every registered command.
pub fn build_commands(registry: &CommandRegistry) -> Vec<CreateCommand> {
    registry
        .commands()
        .iter()
        .map(|command| {
            let mut def = CreateCommand::new(command.name())
                .description(command.description())
                .dm_permission(false);
            if let Some(permissions) = command.default_member_permissions() {
                def = def.default_member_permissions(permissions);
            }
            def
        })
        .collect()
}

/// Routes gateway events to the command registry.
pub struct Handler {
    registry: Arc<CommandRegistry>,
    command_guilds: Vec<GuildId>,
    member_fetch_timeout: Duration,
}

impl Handler {
    pub fn new(
        registry: Arc<CommandRegistry>,
        command_guilds: Vec<GuildId>,
        member_fetch_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            command_guilds,
            member_fetch_timeout,
        }
    }

    async fn register(&self, ctx: &Context) {
        let commands = build_commands(&self.registry);
        if self.command_guilds.is_empty() {
            match SlashCommand::set_global_commands(&ctx.http, commands).await {
                Ok(registered) => info!(count = registered.len(), "registered global commands"),
                Err(e) => error!(error = %e, "failed to register global commands"),
            }
            return;
        }

        for guild_id in &self.command_guilds {
            match guild_id.set_commands(&ctx.http, commands.clone()).await {
                Ok(registered) => {
                    info!(guild_id = %guild_id, count = registered.len(), "registered guild commands")
                }
                Err(e) => error!(guild_id = %guild_id, error = %e, "failed to register guild commands"),
            }
        }
    }

    async fn dispatch(&self, ctx: &Context, interaction: CommandInteraction) {
        let name = interaction.data.name.clone();
        if self.registry.get(&name).is_none() {
            debug!(command = %name, "ignoring unknown command");
            return;
        }

        let guild_id = interaction.guild_id;
        let invocation = guild_id.map(|guild_id| Invocation {
            command: name.clone(),
            guild_id,
            channel_id: interaction.channel_id,
            user_id: interaction.user.id,
            member_permissions: interaction
                .member
                .as_ref()
                .and_then(|m| m.permissions)
                .unwrap_or_else(Permissions::empty),
        });
        let reply = InteractionReply::new(ctx.http.clone(), interaction);

        let Some(invocation) = invocation else {
            if let Err(e) = reply.respond(SERVER_ONLY, true).await {
                warn!(error = %e, "failed to answer direct-message invocation");
            }
            return;
        };

        let guild = DiscordGuild::new(
            invocation.guild_id,
            ctx.http.clone(),
            ctx.cache.clone(),
            self.member_fetch_timeout,
        );
        if let Err(e) = self.registry.dispatch(&invocation, &guild, &reply).await {
            error!(command = %name, guild_id = %invocation.guild_id, channel_id = %invocation.channel_id, error = %e, "command failed");
            reply.report_failure().await;
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Logged in as {}", ready.user.tag());
        self.register(&ctx).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.dispatch(&ctx, command).await;
        }
    }
}
