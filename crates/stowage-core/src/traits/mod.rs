// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seams between the pipeline and the platform.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod command;
pub mod guild;
pub mod reply;

pub use adapter::PluginAdapter;
pub use command::Command;
pub use guild::GuildApi;
pub use reply::ReplySurface;
