// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Stowage integration tests.
//!
//! Provides mock adapters and a dispatch harness for fast, deterministic,
//! CI-runnable tests without a Discord connection.
//!
//! # Components
//!
//! - [`MockGuild`] - In-memory guild with call recording and failure injection
//! - [`MockReply`] - Reply surface that captures every respond/defer/edit
//! - [`TestHarness`] - Command registry wired to a mock guild

pub mod fixtures;
pub mod harness;
pub mod mock_guild;
pub mod mock_reply;

pub use harness::TestHarness;
pub use mock_guild::{GuildCall, MockGuild};
pub use mock_reply::{MockReply, ReplyEvent};
