// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`ReplySurface`] for a slash-command interaction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serenity::all::{
    CommandInteraction, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse, Http,
};
use stowage_core::{ReplySurface, StowageError};
use tracing::warn;

/// Shown when a command returns an error.
pub const COMMAND_FAILED: &str = "❌ There was an error executing this command!";

/// Shown when a command is used outside a server.
pub const SERVER_ONLY: &str = "❌ This command can only be used in a server.";

/// The response side of one interaction.
pub struct InteractionReply {
    http: Arc<Http>,
    interaction: CommandInteraction,
    acknowledged: AtomicBool,
}

impl InteractionReply {
    pub fn new(http: Arc<Http>, interaction: CommandInteraction) -> Self {
        Self {
            http,
            interaction,
            acknowledged: AtomicBool::new(false),
        }
    }

    /// Whether an initial response (message or deferral) has been sent.
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::SeqCst)
    }

    /// Tells the member the command failed, editing the reply if one exists.
    pub async fn report_failure(&self) {
        let sent = if self.is_acknowledged() {
            self.edit(COMMAND_FAILED).await
        } else {
            self.respond(COMMAND_FAILED, true).await
        };
        if let Err(e) = sent {
            warn!(error = %e, command = %self.interaction.data.name, "failed to report command error");
        }
    }
}

#[async_trait]
impl ReplySurface for InteractionReply {
    async fn respond(&self, content: &str, ephemeral: bool) -> Result<(), StowageError> {
        let message = CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(ephemeral);
        self.interaction
            .create_response(&self.http, CreateInteractionResponse::Message(message))
            .await
            .map_err(|e| StowageError::platform(format!("failed to respond to interaction: {e}"), e))?;
        self.acknowledged.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn defer(&self) -> Result<(), StowageError> {
        self.interaction
            .defer(&self.http)
            .await
            .map_err(|e| StowageError::platform(format!("failed to defer interaction: {e}"), e))?;
        self.acknowledged.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn edit(&self, content: &str) -> Result<(), StowageError> {
        self.interaction
            .edit_response(&self.http, EditInteractionResponse::new().content(content))
            .await
            .map(|_| ())
            .map_err(|e| StowageError::platform(format!("failed to edit interaction reply: {e}"), e))
    }
}
