// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Persistence contracts.
//!
//! One repository interface per aggregate root, defined here and implemented
//! in `crate::infrastructure::repositories` (PostgreSQL for production,
//! in-memory for tests and development).
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|-----------------|
//! | `VersionStore<Tender>` + `TenderIndex` | `Tender` | `InMemoryVersionStore`, `PostgresTenderStore` |
//! | `VersionStore<Bid>` + `BidIndex` | `Bid` | `InMemoryVersionStore`, `PostgresBidStore` |
//! | `DecisionStore` | `BidDecision` | `InMemoryDecisionStore`, `PostgresDecisionStore` |
//! | `ReviewStore` | `BidReview` | `InMemoryReviewStore`, `PostgresReviewStore` |
//! | `PrincipalDirectory` | `Principal` | `InMemoryPrincipalDirectory`, `PostgresPrincipalDirectory` |

use async_trait::async_trait;

use crate::domain::bid::{Bid, BidDecision, BidId};
use crate::domain::page::Page;
use crate::domain::principal::{OrganizationId, Principal, PrincipalId};
use crate::domain::review::BidReview;
use crate::domain::revision::Revisioned;
use crate::domain::tender::{ServiceType, Tender, TenderId};

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row not found".to_string()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(err.to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Generic revision-history store.
///
/// Concurrency contract: `apply_edit`, `rollback` and `set_status` execute
/// their "read current max version, write" sequence atomically per id, so
/// two concurrent writers can never mint the same version number — the
/// losing writer fails instead of silently overwriting.
#[async_trait]
pub trait VersionStore<T: Revisioned>: Send + Sync {
    /// Persist the first revision. Fails with `Conflict` if the identity is
    /// already taken.
    async fn create(&self, entity: T) -> Result<T, StoreError>;

    /// The revision holding the maximum version for `id`.
    async fn get_current(&self, id: T::Id) -> Result<T, StoreError>;

    /// Overlay `patch` onto the current revision and append the result as a
    /// brand-new revision with version incremented by exactly one.
    async fn apply_edit(&self, id: T::Id, patch: T::Patch) -> Result<T, StoreError>;

    /// Rewrite the status of the current revision in place. Status
    /// transitions do not mint a version.
    async fn set_status(&self, id: T::Id, status: T::Status) -> Result<T, StoreError>;

    /// Append a copy of the historical revision (`id`, `version`) as a new
    /// revision numbered max + 1. Not a destructive revert: all history
    /// before and after the rollback point is preserved.
    async fn rollback(&self, id: T::Id, version: i32) -> Result<T, StoreError>;
}

/// Tender listing queries, always collapsed to the latest revision per id
/// and ordered by name ascending.
#[async_trait]
pub trait TenderIndex: Send + Sync {
    /// `Published` tenders only; an empty `service_types` slice means no
    /// filter.
    async fn list_published(
        &self,
        service_types: &[ServiceType],
        page: Page,
    ) -> Result<Vec<Tender>, StoreError>;

    /// Every tender created by the principal, regardless of status.
    async fn list_by_creator(
        &self,
        creator_id: PrincipalId,
        page: Page,
    ) -> Result<Vec<Tender>, StoreError>;
}

pub trait TenderStore: VersionStore<Tender> + TenderIndex {}

impl<S> TenderStore for S where S: VersionStore<Tender> + TenderIndex + ?Sized {}

/// Bid listing queries, collapsed to the latest revision per id and ordered
/// by name ascending.
#[async_trait]
pub trait BidIndex: Send + Sync {
    async fn list_by_creator(
        &self,
        creator_id: PrincipalId,
        page: Page,
    ) -> Result<Vec<Bid>, StoreError>;

    /// Restricted to the statuses visible to the tender's organization:
    /// `Published`, `Approved`, `Rejected`.
    async fn list_by_tender(
        &self,
        tender_id: TenderId,
        page: Page,
    ) -> Result<Vec<Bid>, StoreError>;

    async fn has_by_creator_and_tender(
        &self,
        creator_id: PrincipalId,
        tender_id: TenderId,
    ) -> Result<bool, StoreError>;
}

pub trait BidStore: VersionStore<Bid> + BidIndex {}

impl<S> BidStore for S where S: VersionStore<Bid> + BidIndex + ?Sized {}

/// Outcome of recording an approval.
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    pub bid: Bid,
    /// Distinct approving employees counted after the insert.
    pub approvals: usize,
    pub quorum_reached: bool,
}

/// Append-only decision log plus the transactional quorum cascade.
///
/// Both mutating operations run inside one database transaction: the
/// decision insert, the deduplicated count and any resulting status writes
/// either all commit or none do. A bid observed already terminal is returned
/// unchanged without any write, which makes a concurrent quorum-reaching
/// call an idempotent no-op.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Record an approval; when the count of distinct approvers reaches
    /// `quorum`, flip the bid to `Approved` and close its tender.
    async fn record_approval(
        &self,
        bid_id: BidId,
        tender_id: TenderId,
        organization_id: OrganizationId,
        approver_id: PrincipalId,
        quorum: usize,
    ) -> Result<ApprovalOutcome, StoreError>;

    /// Record a rejection and set the bid terminally `Rejected` — no quorum
    /// involved.
    async fn record_rejection(
        &self,
        bid_id: BidId,
        organization_id: OrganizationId,
        approver_id: PrincipalId,
    ) -> Result<Bid, StoreError>;

    /// The decision that currently counts for each approver of the bid
    /// within one organization. Audit surface; the underlying log is never
    /// rewritten.
    async fn latest_decisions(
        &self,
        bid_id: BidId,
        organization_id: OrganizationId,
    ) -> Result<Vec<BidDecision>, StoreError>;
}

/// Append-only review log.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn append(&self, review: BidReview) -> Result<BidReview, StoreError>;

    /// Reviews left on any bid authored by the given creator, oldest first.
    async fn list_by_bid_creator(
        &self,
        creator_id: PrincipalId,
        page: Page,
    ) -> Result<Vec<BidReview>, StoreError>;
}

/// Identity gate seam: caller resolution and organizational membership.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError>;

    async fn is_member(
        &self,
        principal_id: PrincipalId,
        organization_id: OrganizationId,
    ) -> Result<bool, StoreError>;

    async fn list_members(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Principal>, StoreError>;
}
