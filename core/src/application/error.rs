// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Error taxonomy surfaced by every workflow operation.
//!
//! | Kind | Meaning |
//! |------|---------|
//! | `Invalid` | malformed input or violated field/state constraint |
//! | `Unauthenticated` | username does not resolve to any principal |
//! | `Forbidden` | principal resolved but lacks the required relationship |
//! | `NotExist` | referenced entity, version or record is absent |
//! | `Internal` | persistence or invariant failure; retry the whole operation |
//!
//! Store-level `NotFound` is translated to `NotExist` at the workflow
//! boundary and never leaks as a raw storage error. `Internal` errors
//! propagate unchanged; every mutation is safely retryable because a retried
//! edit simply produces the next version.

use crate::domain::repository::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("invalid: {0}")]
    Invalid(String),

    #[error("username does not resolve to a principal")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not exist: {0}")]
    NotExist(String),

    #[error("internal: {0}")]
    Internal(#[source] StoreError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl WorkflowError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        WorkflowError::Invalid(reason.into())
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        WorkflowError::Forbidden(reason.into())
    }

    pub fn not_exist(reason: impl Into<String>) -> Self {
        WorkflowError::NotExist(reason.into())
    }

    pub fn internal(err: StoreError) -> Self {
        WorkflowError::Internal(err)
    }

    /// Boundary translation for call sites where an absent row means the
    /// referenced record does not exist.
    pub fn from_store(err: StoreError, missing: &str) -> Self {
        match err {
            StoreError::NotFound(_) => WorkflowError::NotExist(missing.to_string()),
            other => WorkflowError::Internal(other),
        }
    }
}
