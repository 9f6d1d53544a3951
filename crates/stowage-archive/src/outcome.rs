// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-principal results of the best-effort stages.

use serenity::all::{PermissionOverwriteType, UserId};

/// Result of one remote call in a best-effort loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Failed(String),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for Outcome {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Outcome::Applied,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }
}

/// What the permission strip did.
#[derive(Debug, Clone, Default)]
pub struct StripReport {
    /// One entry per overwrite found on the relocated channel.
    pub deletions: Vec<(PermissionOverwriteType, Outcome)>,
    /// Whether the `@everyone` view deny was put in place.
    pub everyone_denied: bool,
}

impl StripReport {
    pub fn deleted(&self) -> usize {
        self.deletions.iter().filter(|(_, o)| o.is_applied()).count()
    }

    /// Principals whose overwrite is still on the channel.
    pub fn failed(&self) -> Vec<PermissionOverwriteType> {
        self.deletions
            .iter()
            .filter(|(_, o)| !o.is_applied())
            .map(|(p, _)| *p)
            .collect()
    }
}

/// What the access restore did.
#[derive(Debug, Clone, Default)]
pub struct RestoreReport {
    /// One entry per snapshot member, in snapshot order.
    pub grants: Vec<(UserId, Outcome)>,
    /// Throttle pauses taken.
    pub pauses: usize,
}

impl RestoreReport {
    pub fn restored(&self) -> usize {
        self.grants.iter().filter(|(_, o)| o.is_applied()).count()
    }

    /// Snapshot members left without read-only access.
    pub fn failed(&self) -> Vec<UserId> {
        self.grants
            .iter()
            .filter(|(_, o)| !o.is_applied())
            .map(|(u, _)| *u)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serenity::all::RoleId;

    use super::*;

    #[test]
    fn outcome_from_result() {
        assert_eq!(Outcome::from(Ok::<(), String>(())), Outcome::Applied);
        assert_eq!(
            Outcome::from(Err::<(), _>("boom")),
            Outcome::Failed("boom".into())
        );
    }

    #[test]
    fn reports_count_failures() {
        let strip = StripReport {
            deletions: vec![
                (PermissionOverwriteType::Role(RoleId::new(1)), Outcome::Applied),
                (
                    PermissionOverwriteType::Member(UserId::new(2)),
                    Outcome::Failed("403".into()),
                ),
            ],
            everyone_denied: true,
        };
        assert_eq!(strip.deleted(), 1);
        assert_eq!(strip.failed(), vec![PermissionOverwriteType::Member(UserId::new(2))]);

        let restore = RestoreReport {
            grants: vec![(UserId::new(3), Outcome::Applied), (UserId::new(4), Outcome::Applied)],
            pauses: 0,
        };
        assert_eq!(restore.restored(), 2);
        assert!(restore.failed().is_empty());
    }
}
