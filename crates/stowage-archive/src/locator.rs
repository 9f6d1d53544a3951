// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stage 2: find the archive category, creating it when missing.

use stowage_config::model::ArchiveConfig;
use stowage_core::{ChannelInfo, GuildApi};
use tracing::{info, warn};

use crate::error::ArchiveError;

/// The category archived channels are moved into.
#[derive(Debug, Clone)]
pub struct ArchiveContainer {
    pub category: ChannelInfo,
    /// `true` when this run created the category.
    pub created: bool,
}

/// Picks the category named `label` (case-insensitive) from `channels`.
///
/// With several matches the oldest one (smallest id) wins.
pub fn find_archive_category<'a>(channels: &'a [ChannelInfo], label: &str) -> Option<&'a ChannelInfo> {
    let wanted = label.to_lowercase();
    let matches: Vec<&ChannelInfo> = channels
        .iter()
        .filter(|c| c.is_category() && c.name.to_lowercase() == wanted)
        .collect();

    let oldest = matches.iter().copied().min_by_key(|c| c.id)?;
    if matches.len() > 1 {
        warn!(
            label,
            count = matches.len(),
            chosen = %oldest.id,
            "multiple archive categories found, using the oldest"
        );
    }
    Some(oldest)
}

/// Looks the category up in the cached channel list and creates it if absent.
pub async fn locate_or_create(
    guild: &dyn GuildApi,
    config: &ArchiveConfig,
) -> Result<ArchiveContainer, ArchiveError> {
    let channels = guild
        .cached_channels()
        .map_err(|source| ArchiveError::ChannelsUnavailable { source })?;
    if let Some(existing) = find_archive_category(&channels, &config.category_name) {
        return Ok(ArchiveContainer {
            category: existing.clone(),
            created: false,
        });
    }

    let category = guild
        .create_category(&config.category_name, &config.audit_reason)
        .await
        .map_err(|source| ArchiveError::ContainerUnavailable {
            name: config.category_name.clone(),
            source,
        })?;
    info!(category_id = %category.id, name = %category.name, "created archive category");

    Ok(ArchiveContainer {
        category,
        created: true,
    })
}
