// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stage 3: move the channel under the archive category.

use stowage_core::{ChannelInfo, GuildApi};
use tracing::info;

use crate::error::ArchiveError;

/// Reparents `channel` under `category` with permissions synced to the category.
///
/// Returns the channel as it stands after the move; its overwrites are now
/// the category's.
pub async fn relocate(
    guild: &dyn GuildApi,
    channel: &ChannelInfo,
    category: &ChannelInfo,
) -> Result<ChannelInfo, ArchiveError> {
    let moved = guild
        .set_parent(channel.id, category.id, true)
        .await
        .map_err(|source| ArchiveError::RelocationFailed { source })?;

    info!(
        channel_id = %moved.id,
        category_id = %category.id,
        overwrites = moved.overwrites.len(),
        "moved channel into archive category"
    );
    Ok(moved)
}
