// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Stowage archive bot.
//!
//! This crate provides the error type, the guild domain types, effective
//! permission resolution, and the traits at the seams between the archive
//! pipeline and the chat platform. Platform adapters implement the traits
//! defined here.

pub mod error;
pub mod permissions;
pub mod registry;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StowageError;
pub use registry::CommandRegistry;
pub use types::{ChannelInfo, GuildMember, HealthStatus, Invocation, ScopeRoles};

pub use traits::{Command, GuildApi, PluginAdapter, ReplySurface};
