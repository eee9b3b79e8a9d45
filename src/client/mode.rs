//! Operating mode gating every mutating call

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Kind of mutation a call performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Adds items or creates a list
    Add,
    /// Removes items or deletes a list
    Remove,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Add => f.write_str("add"),
            Mutation::Remove => f.write_str("remove"),
        }
    }
}

/// Process-wide operating mode, fixed at client construction
///
/// | mode       | add       | remove    |
/// |------------|-----------|-----------|
/// | `full`     | executes  | executes  |
/// | `add-only` | executes  | simulated |
/// | `dry-run`  | simulated | simulated |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    #[default]
    Full,
    AddOnly,
    DryRun,
}

impl SyncMode {
    pub const ALL: [SyncMode; 3] = [SyncMode::Full, SyncMode::AddOnly, SyncMode::DryRun];

    pub fn as_str(self) -> &'static str {
        match self {
            SyncMode::Full => "full",
            SyncMode::AddOnly => "add-only",
            SyncMode::DryRun => "dry-run",
        }
    }

    /// Whether `mutation` reaches the network in this mode
    pub fn permits(self, mutation: Mutation) -> bool {
        match (self, mutation) {
            (SyncMode::Full, _) => true,
            (SyncMode::AddOnly, Mutation::Add) => true,
            (SyncMode::AddOnly, Mutation::Remove) => false,
            (SyncMode::DryRun, _) => false,
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SyncMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                Error::config(format!(
                    "failure using trakt sync mode {}: valid modes are full, add-only, dry-run",
                    s
                ))
            })
    }
}

/// Result of a mode-gated mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "result", rename_all = "snake_case")]
pub enum MutationOutcome<T> {
    /// The request was sent and answered
    Applied(T),
    /// The mode suppressed the request; nothing was sent
    Simulated,
}

impl<T> MutationOutcome<T> {
    pub fn is_simulated(&self) -> bool {
        matches!(self, MutationOutcome::Simulated)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            MutationOutcome::Applied(value) => Some(value),
            MutationOutcome::Simulated => None,
        }
    }
}
