// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Versioned-record contract.
//!
//! A mutable business record is stored as an append-only sequence of
//! immutable revisions sharing one identity. The revision holding the
//! maximum version is the current one. Edits and rollbacks append a new
//! revision; a status transition rewrites the status of the latest revision
//! in place and does not mint a version.

use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, Utc};

/// Implemented by entities persisted as revision histories.
///
/// Invariants the stores rely on: `version` starts at 1 and is strictly
/// increasing with no gaps per id; a revision is never mutated after it is
/// written (stores only ever append or rewrite the latest status).
pub trait Revisioned: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + Debug + Send + Sync;
    type Status: Copy + PartialEq + Debug + Send + Sync;
    type Patch: Clone + Send + Sync;

    fn id(&self) -> Self::Id;

    fn version(&self) -> i32;
    fn set_version(&mut self, version: i32);

    fn status(&self) -> Self::Status;
    fn set_status(&mut self, status: Self::Status);

    fn created_at(&self) -> DateTime<Utc>;
    fn set_created_at(&mut self, at: DateTime<Utc>);

    /// Overlay the provided (non-`None`) fields onto this revision's
    /// mutable fields.
    fn apply(&mut self, patch: &Self::Patch);
}
