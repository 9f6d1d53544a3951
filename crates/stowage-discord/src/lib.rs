// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord adapter for the Stowage archive bot.
//!
//! Connects to the gateway with serenity, registers the slash commands of a
//! [`CommandRegistry`] once ready, and runs each invocation against a
//! [`DiscordGuild`] with an [`InteractionReply`] as its reply surface.

pub mod guild;
pub mod handler;
pub mod reply;

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{Client, GatewayIntents, GuildId, Http, ShardManager};
use stowage_config::model::DiscordConfig;
use stowage_core::{CommandRegistry, HealthStatus, PluginAdapter, StowageError};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use guild::DiscordGuild;
pub use handler::{Handler, build_commands};
pub use reply::InteractionReply;

/// Gateway intents the bot needs: guild structure and the member list.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS
}

/// Discord gateway adapter implementing [`PluginAdapter`].
pub struct DiscordAdapter {
    token: String,
    config: DiscordConfig,
    http: Arc<Http>,
    shard_manager: Mutex<Option<Arc<ShardManager>>>,
}

impl DiscordAdapter {
    /// Creates a new adapter.
    ///
    /// Requires `config.bot_token` to be set and non-empty.
    pub fn new(config: DiscordConfig) -> Result<Self, StowageError> {
        let token = config
            .bot_token
            .clone()
            .ok_or_else(|| StowageError::Config("discord.bot_token is required to connect".into()))?;

        if token.trim().is_empty() {
            return Err(StowageError::Config(
                "discord.bot_token cannot be empty".into(),
            ));
        }

        Ok(Self {
            http: Arc::new(Http::new(&token)),
            token,
            config,
            shard_manager: Mutex::new(None),
        })
    }

    /// Guilds that get instant command registration; empty means global.
    pub fn command_guilds(&self) -> Vec<GuildId> {
        self.config
            .command_guilds
            .iter()
            .filter_map(|id| (*id != 0).then(|| GuildId::new(*id)))
            .collect()
    }

    /// Connects to the gateway and handles events until `cancel` fires or the
    /// connection ends.
    pub async fn run(
        &self,
        registry: Arc<CommandRegistry>,
        cancel: CancellationToken,
    ) -> Result<(), StowageError> {
        let handler = Handler::new(
            registry,
            self.command_guilds(),
            self.config.member_fetch_timeout(),
        );
        let mut client = Client::builder(&self.token, intents())
            .event_handler(handler)
            .await
            .map_err(|e| StowageError::platform(format!("failed to build Discord client: {e}"), e))?;

        let shard_manager = client.shard_manager.clone();
        *self.shard_manager.lock().await = Some(shard_manager.clone());

        let watcher = tokio::spawn(async move {
            cancel.cancelled().await;
            info!("stopping Discord gateway");
            shard_manager.shutdown_all().await;
        });

        info!("connecting to Discord gateway");
        let result = client
            .start()
            .await
            .map_err(|e| StowageError::platform(format!("Discord gateway error: {e}"), e));
        watcher.abort();
        result
    }
}

#[async_trait]
impl PluginAdapter for DiscordAdapter {
    fn name(&self) -> &str {
        "discord"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, StowageError> {
        match self.http.get_current_user().await {
            Ok(user) => {
                debug!(user = %user.tag(), "Discord token valid");
                Ok(HealthStatus::Healthy)
            }
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Discord API unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), StowageError> {
        debug!("Discord adapter shutting down");
        if let Some(manager) = self.shard_manager.lock().await.take() {
            manager.shutdown_all().await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>) -> DiscordConfig {
        DiscordConfig {
            bot_token: token.map(str::to_string),
            ..DiscordConfig::default()
        }
    }

    #[test]
    fn new_requires_bot_token() {
        assert!(DiscordAdapter::new(config(None)).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        let err = DiscordAdapter::new(config(Some("  "))).err().unwrap();
        assert!(matches!(err, StowageError::Config(ref m) if m.contains("empty")));
    }

    #[test]
    fn new_accepts_valid_token() {
        assert!(DiscordAdapter::new(config(Some("MTAx.abc.def"))).is_ok());
    }

    #[test]
    fn intents_include_guild_members() {
        assert!(intents().contains(GatewayIntents::GUILD_MEMBERS));
        assert!(intents().contains(GatewayIntents::GUILDS));
        assert!(!intents().contains(GatewayIntents::MESSAGE_CONTENT));
    }

    #[test]
    fn command_guilds_map_to_ids() {
        let adapter = DiscordAdapter::new(DiscordConfig {
            bot_token: Some("t".into()),
            command_guilds: vec![111, 222],
            ..DiscordConfig::default()
        })
        .unwrap();
        assert_eq!(adapter.command_guilds(), vec![GuildId::new(111), GuildId::new(222)]);
    }

    #[test]
    fn plugin_adapter_metadata() {
        let adapter = DiscordAdapter::new(config(Some("t"))).unwrap();
        assert_eq!(adapter.name(), "discord");
        assert_eq!(adapter.version(), semver::Version::new(0, 1, 0));
    }

    #[tokio::test]
    async fn shutdown_before_run_is_a_noop() {
        let adapter = DiscordAdapter::new(config(Some("t"))).unwrap();
        adapter.shutdown().await.unwrap();
    }
}
