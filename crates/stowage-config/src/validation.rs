// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express. All failures
//! are collected rather than stopping at the first.

use crate::diagnostic::ConfigError;
use crate::model::StowageConfig;

/// Log levels accepted by `bot.log_level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &StowageConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.bot.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "bot.log_level `{}` must be one of: {}",
            config.bot.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if let Some(token) = &config.discord.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::validation(
            "discord.bot_token must not be empty when set",
        ));
    }

    if config.discord.command_guilds.contains(&0) {
        errors.push(ConfigError::validation(
            "discord.command_guilds must not contain 0",
        ));
    }

    if config.discord.member_fetch_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "discord.member_fetch_timeout_secs must be at least 1",
        ));
    }

    if config.archive.category_name.trim().is_empty() {
        errors.push(ConfigError::validation(
            "archive.category_name must not be empty",
        ));
    }

    if config.archive.category_name.chars().count() > 100 {
        errors.push(ConfigError::validation(
            "archive.category_name must be at most 100 characters",
        ));
    }

    if config.archive.throttle_batch == 0 {
        errors.push(ConfigError::validation(
            "archive.throttle_batch must be at least 1",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
