// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./stowage.toml` > `~/.config/stowage/stowage.toml` > `/etc/stowage/stowage.toml`
//! with environment variable overrides via `STOWAGE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::StowageConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/stowage/stowage.toml` (system-wide)
/// 3. `~/.config/stowage/stowage.toml` (user XDG config)
/// 4. `./stowage.toml` (local directory)
/// 5. `STOWAGE_*` environment variables
pub fn load_config() -> Result<StowageConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<StowageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StowageConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StowageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StowageConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(StowageConfig::default()))
        .merge(Toml::file("/etc/stowage/stowage.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("stowage/stowage.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("stowage.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")`: `STOWAGE_DISCORD_BOT_TOKEN`
/// must map to `discord.bot_token`, not `discord.bot.token`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("STOWAGE_").map(|key| {
        // `key` keeps the variable's original case with the prefix stripped.
        // Example: STOWAGE_ARCHIVE_THROTTLE_BATCH -> "archive_throttle_batch"
        let key_str = key.as_str().to_ascii_lowercase();
        SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(*section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|field| format!("{section}.{field}"))
            })
            .unwrap_or(key_str)
            .into()
    })
}

/// Top-level config sections addressable from the environment.
const SECTIONS: [&str; 3] = ["bot", "discord", "archive"];
