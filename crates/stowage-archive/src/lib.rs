// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel archive workflow.
//!
//! An archive run moves a channel into the archive category and leaves it
//! readable, but not writable, by exactly the members who could see it
//! before. It runs five stages in order:
//!
//! 1. [`snapshot`] records which non-bot members can view the channel.
//! 2. [`locator`] finds or creates the archive category.
//! 3. [`relocate`] moves the channel in, syncing permissions to the category.
//! 4. [`strip`] deletes every overwrite and denies `@everyone` view access.
//! 5. [`restore`] grants each snapshot member a read-only overwrite.
//!
//! Stages 1 to 3 fail the run; stages 4 and 5 are best-effort per principal.

pub mod command;
pub mod error;
pub mod locator;
pub mod outcome;
pub mod pipeline;
pub mod progress;
pub mod relocate;
pub mod restore;
pub mod snapshot;
pub mod strip;

pub use command::ArchiveCommand;
pub use error::ArchiveError;
pub use outcome::{Outcome, RestoreReport, StripReport};
pub use pipeline::{ArchiveSummary, ArchiveWorkflow, Stage};
pub use progress::{Progress, ProgressLog};
pub use snapshot::AccessSnapshot;
