// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stowage serve` command implementation.
//!
//! Registers the archive command, connects the Discord adapter, and runs
//! until a shutdown signal arrives.

use std::sync::Arc;

use stowage_archive::ArchiveCommand;
use stowage_config::StowageConfig;
use stowage_core::{CommandRegistry, HealthStatus, PluginAdapter, StowageError};
use tracing::{info, warn};

#[cfg(feature = "discord")]
use stowage_discord::DiscordAdapter;

#[cfg(not(feature = "discord"))]
compile_error!("stowage requires the 'discord' feature for a chat platform");

use crate::shutdown;

/// Builds the command registry from configuration.
pub fn build_registry(config: &StowageConfig) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(ArchiveCommand::new(config.archive.clone())));
    info!(count = registry.len(), "command registry initialized");
    registry
}

/// Runs the `stowage serve` command.
pub async fn run_serve(config: StowageConfig) -> Result<(), StowageError> {
    init_tracing(&config.bot.log_level);

    info!("starting stowage serve");

    let registry = Arc::new(build_registry(&config));
    let adapter = DiscordAdapter::new(config.discord.clone())?;

    match adapter.health_check().await? {
        HealthStatus::Healthy => info!(adapter = adapter.name(), "adapter healthy"),
        HealthStatus::Degraded(reason) | HealthStatus::Unhealthy(reason) => {
            warn!(adapter = adapter.name(), reason = %reason, "adapter health check failed, connecting anyway");
        }
    }

    let cancel = shutdown::install_signal_handler();
    let result = adapter.run(registry, cancel).await;

    adapter.shutdown().await?;
    info!("stowage stopped");
    result
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stowage={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
