// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Stowage archive bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Stowage configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StowageConfig {
    /// Process-level settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Discord connection settings.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Archive workflow settings.
    #[serde(default)]
    pub archive: ArchiveConfig,
}

impl StowageConfig {
    /// Renders the configuration as TOML with the bot token masked.
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        let mut shown = self.clone();
        if shown.discord.bot_token.is_some() {
            shown.discord.bot_token = Some("<redacted>".to_string());
        }
        toml::to_string_pretty(&shown)
    }
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Discord connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscordConfig {
    /// Discord bot token. `None` disables `serve`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Guild ids to register slash commands in directly.
    /// Empty registers them globally, which can take up to an hour to propagate.
    #[serde(default)]
    pub command_guilds: Vec<u64>,

    /// Upper bound for fetching the full member roster, in seconds.
    #[serde(default = "default_member_fetch_timeout_secs")]
    pub member_fetch_timeout_secs: u64,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            command_guilds: Vec::new(),
            member_fetch_timeout_secs: default_member_fetch_timeout_secs(),
        }
    }
}

impl DiscordConfig {
    pub fn member_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.member_fetch_timeout_secs)
    }
}

fn default_member_fetch_timeout_secs() -> u64 {
    30
}

/// Archive workflow configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Name of the archive category. Matched case-insensitively.
    #[serde(default = "default_category_name")]
    pub category_name: String,

    /// Audit-log reason recorded when the archive category is created.
    #[serde(default = "default_audit_reason")]
    pub audit_reason: String,

    /// Number of successful access restorations between throttle pauses.
    #[serde(default = "default_throttle_batch")]
    pub throttle_batch: usize,

    /// Length of each throttle pause, in milliseconds.
    #[serde(default = "default_throttle_delay_ms")]
    pub throttle_delay_ms: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            category_name: default_category_name(),
            audit_reason: default_audit_reason(),
            throttle_batch: default_throttle_batch(),
            throttle_delay_ms: default_throttle_delay_ms(),
        }
    }
}

impl ArchiveConfig {
    pub fn throttle_delay(&self) -> Duration {
        Duration::from_millis(self.throttle_delay_ms)
    }
}

fn default_category_name() -> String {
    "Archive".to_string()
}

fn default_audit_reason() -> String {
    "Archive category created by bot".to_string()
}

fn default_throttle_batch() -> usize {
    10
}

fn default_throttle_delay_ms() -> u64 {
    500
}
