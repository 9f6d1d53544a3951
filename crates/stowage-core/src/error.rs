// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Stowage archive bot.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
#[derive(Debug, Error)]
pub enum StowageError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Platform API errors (HTTP failure, missing permissions, rate limiting).
    #[error("platform error: {message}")]
    Platform {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A guild entity (channel, role, member, command) was not found.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StowageError {
    /// Wraps a platform client error with a short description of the failed call.
    pub fn platform<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StowageError::Platform {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for [`StowageError::NotFound`].
    pub fn not_found(kind: impl Into<String>, id: impl ToString) -> Self {
        StowageError::NotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }
}
