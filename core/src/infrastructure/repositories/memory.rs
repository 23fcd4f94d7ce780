// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! In-memory repositories.
//!
//! Thread-safe HashMap-backed implementations used by the test suites and
//! for local development without PostgreSQL. Each write operation holds the
//! write lock across its whole read-compute-write sequence, which gives the
//! same per-id atomicity the PostgreSQL implementations get from row locks.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::bid::{Bid, BidDecision, BidId, BidStatus, DecisionKind};
use crate::domain::page::Page;
use crate::domain::principal::{OrganizationId, Principal, PrincipalId};
use crate::domain::repository::{
    ApprovalOutcome, BidIndex, DecisionStore, PrincipalDirectory, ReviewStore, StoreError,
    TenderIndex, VersionStore,
};
use crate::domain::review::BidReview;
use crate::domain::revision::Revisioned;
use crate::domain::tender::{ServiceType, Tender, TenderId, TenderStatus};

fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

/// Revision history for any `Revisioned` aggregate, keyed by id with the
/// full version list kept in order.
#[derive(Clone)]
pub struct InMemoryVersionStore<T: Revisioned> {
    revisions: Arc<RwLock<HashMap<T::Id, Vec<T>>>>,
}

impl<T: Revisioned> InMemoryVersionStore<T> {
    pub fn new() -> Self {
        Self {
            revisions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Latest revision of every id, for the index implementations.
    fn snapshot_current(&self) -> Vec<T> {
        let revisions = self.revisions.read().unwrap();
        revisions
            .values()
            .filter_map(|history| history.last().cloned())
            .collect()
    }
}

impl<T: Revisioned> Default for InMemoryVersionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Revisioned> VersionStore<T> for InMemoryVersionStore<T> {
    async fn create(&self, entity: T) -> Result<T, StoreError> {
        let mut revisions = self.revisions.write().unwrap();
        if revisions.contains_key(&entity.id()) {
            return Err(StoreError::Conflict(format!(
                "id already exists: {:?}",
                entity.id()
            )));
        }
        revisions.insert(entity.id(), vec![entity.clone()]);
        Ok(entity)
    }

    async fn get_current(&self, id: T::Id) -> Result<T, StoreError> {
        let revisions = self.revisions.read().unwrap();
        revisions
            .get(&id)
            .and_then(|history| history.last().cloned())
            .ok_or_else(|| StoreError::NotFound(format!("{id:?}")))
    }

    async fn apply_edit(&self, id: T::Id, patch: T::Patch) -> Result<T, StoreError> {
        let mut revisions = self.revisions.write().unwrap();
        let history = revisions
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("{id:?}")))?;
        let mut next = history.last().cloned().expect("history is never empty");
        next.apply(&patch);
        next.set_version(next.version() + 1);
        next.set_created_at(Utc::now());
        history.push(next.clone());
        Ok(next)
    }

    async fn set_status(&self, id: T::Id, status: T::Status) -> Result<T, StoreError> {
        let mut revisions = self.revisions.write().unwrap();
        let history = revisions
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("{id:?}")))?;
        let current = history.last_mut().expect("history is never empty");
        current.set_status(status);
        Ok(current.clone())
    }

    async fn rollback(&self, id: T::Id, version: i32) -> Result<T, StoreError> {
        let mut revisions = self.revisions.write().unwrap();
        let history = revisions
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("{id:?}")))?;
        let mut restored = history
            .iter()
            .find(|r| r.version() == version)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{id:?} version {version}")))?;
        let max = history.last().map(|r| r.version()).unwrap_or(0);
        restored.set_version(max + 1);
        restored.set_created_at(Utc::now());
        history.push(restored.clone());
        Ok(restored)
    }
}

#[async_trait]
impl TenderIndex for InMemoryVersionStore<Tender> {
    async fn list_published(
        &self,
        service_types: &[ServiceType],
        page: Page,
    ) -> Result<Vec<Tender>, StoreError> {
        let mut tenders: Vec<Tender> = self
            .snapshot_current()
            .into_iter()
            .filter(|t| t.status == TenderStatus::Published)
            .filter(|t| service_types.is_empty() || service_types.contains(&t.service_type))
            .collect();
        tenders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(tenders, page))
    }

    async fn list_by_creator(
        &self,
        creator_id: PrincipalId,
        page: Page,
    ) -> Result<Vec<Tender>, StoreError> {
        let mut tenders: Vec<Tender> = self
            .snapshot_current()
            .into_iter()
            .filter(|t| t.creator_id == creator_id)
            .collect();
        tenders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(tenders, page))
    }
}

#[async_trait]
impl BidIndex for InMemoryVersionStore<Bid> {
    async fn list_by_creator(
        &self,
        creator_id: PrincipalId,
        page: Page,
    ) -> Result<Vec<Bid>, StoreError> {
        let mut bids: Vec<Bid> = self
            .snapshot_current()
            .into_iter()
            .filter(|b| b.creator_id == creator_id)
            .collect();
        bids.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(bids, page))
    }

    async fn list_by_tender(&self, tender_id: TenderId, page: Page) -> Result<Vec<Bid>, StoreError> {
        let visible = [BidStatus::Published, BidStatus::Approved, BidStatus::Rejected];
        let mut bids: Vec<Bid> = self
            .snapshot_current()
            .into_iter()
            .filter(|b| b.tender_id == tender_id && visible.contains(&b.status))
            .collect();
        bids.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(bids, page))
    }

    async fn has_by_creator_and_tender(
        &self,
        creator_id: PrincipalId,
        tender_id: TenderId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .snapshot_current()
            .iter()
            .any(|b| b.creator_id == creator_id && b.tender_id == tender_id))
    }
}

/// Decision log plus the quorum cascade against the in-memory stores.
#[derive(Clone)]
pub struct InMemoryDecisionStore {
    decisions: Arc<RwLock<Vec<BidDecision>>>,
    bids: Arc<InMemoryVersionStore<Bid>>,
    tenders: Arc<InMemoryVersionStore<Tender>>,
}

impl InMemoryDecisionStore {
    pub fn new(
        bids: Arc<InMemoryVersionStore<Bid>>,
        tenders: Arc<InMemoryVersionStore<Tender>>,
    ) -> Self {
        Self {
            decisions: Arc::new(RwLock::new(Vec::new())),
            bids,
            tenders,
        }
    }

    fn latest_per_approver(
        &self,
        bid_id: BidId,
        organization_id: OrganizationId,
    ) -> Vec<BidDecision> {
        let decisions = self.decisions.read().unwrap();
        let mut latest: HashMap<PrincipalId, BidDecision> = HashMap::new();
        for decision in decisions
            .iter()
            .filter(|d| d.bid_id == bid_id && d.organization_id == organization_id)
        {
            match latest.get(&decision.approver_id) {
                Some(seen) if seen.created_at >= decision.created_at => {}
                _ => {
                    latest.insert(decision.approver_id, decision.clone());
                }
            }
        }
        let mut out: Vec<BidDecision> = latest.into_values().collect();
        out.sort_by_key(|d| d.created_at);
        out
    }
}

#[async_trait]
impl DecisionStore for InMemoryDecisionStore {
    async fn record_approval(
        &self,
        bid_id: BidId,
        tender_id: TenderId,
        organization_id: OrganizationId,
        approver_id: PrincipalId,
        quorum: usize,
    ) -> Result<ApprovalOutcome, StoreError> {
        let bid = self.bids.get_current(bid_id).await?;
        if bid.status.is_terminal() {
            return Ok(ApprovalOutcome {
                bid,
                approvals: 0,
                quorum_reached: false,
            });
        }
        {
            let mut decisions = self.decisions.write().unwrap();
            decisions.push(BidDecision::new(
                bid_id,
                DecisionKind::Approved,
                organization_id,
                approver_id,
            ));
        }
        let approvals = self
            .latest_per_approver(bid_id, organization_id)
            .iter()
            .filter(|d| d.kind == DecisionKind::Approved)
            .count();
        if approvals >= quorum {
            let bid = self.bids.set_status(bid_id, BidStatus::Approved).await?;
            self.tenders
                .set_status(tender_id, TenderStatus::Closed)
                .await?;
            Ok(ApprovalOutcome {
                bid,
                approvals,
                quorum_reached: true,
            })
        } else {
            let bid = self.bids.get_current(bid_id).await?;
            Ok(ApprovalOutcome {
                bid,
                approvals,
                quorum_reached: false,
            })
        }
    }

    async fn record_rejection(
        &self,
        bid_id: BidId,
        organization_id: OrganizationId,
        approver_id: PrincipalId,
    ) -> Result<Bid, StoreError> {
        let bid = self.bids.get_current(bid_id).await?;
        if bid.status.is_terminal() {
            return Ok(bid);
        }
        {
            let mut decisions = self.decisions.write().unwrap();
            decisions.push(BidDecision::new(
                bid_id,
                DecisionKind::Rejected,
                organization_id,
                approver_id,
            ));
        }
        self.bids.set_status(bid_id, BidStatus::Rejected).await
    }

    async fn latest_decisions(
        &self,
        bid_id: BidId,
        organization_id: OrganizationId,
    ) -> Result<Vec<BidDecision>, StoreError> {
        Ok(self.latest_per_approver(bid_id, organization_id))
    }
}

/// Append-only review log over the in-memory bid store.
#[derive(Clone)]
pub struct InMemoryReviewStore {
    reviews: Arc<RwLock<Vec<BidReview>>>,
    bids: Arc<InMemoryVersionStore<Bid>>,
}

impl InMemoryReviewStore {
    pub fn new(bids: Arc<InMemoryVersionStore<Bid>>) -> Self {
        Self {
            reviews: Arc::new(RwLock::new(Vec::new())),
            bids,
        }
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn append(&self, review: BidReview) -> Result<BidReview, StoreError> {
        let mut reviews = self.reviews.write().unwrap();
        reviews.push(review.clone());
        Ok(review)
    }

    async fn list_by_bid_creator(
        &self,
        creator_id: PrincipalId,
        page: Page,
    ) -> Result<Vec<BidReview>, StoreError> {
        let creator_bids: HashSet<BidId> = self
            .bids
            .snapshot_current()
            .iter()
            .filter(|b| b.creator_id == creator_id)
            .map(|b| b.id)
            .collect();
        let reviews = self.reviews.read().unwrap();
        let mut out: Vec<BidReview> = reviews
            .iter()
            .filter(|r| creator_bids.contains(&r.bid_id))
            .cloned()
            .collect();
        out.sort_by_key(|r| r.created_at);
        Ok(paginate(out, page))
    }
}

/// Scripted identities and memberships for tests and development.
#[derive(Clone, Default)]
pub struct InMemoryPrincipalDirectory {
    principals: Arc<RwLock<HashMap<PrincipalId, Principal>>>,
    memberships: Arc<RwLock<HashMap<OrganizationId, HashSet<PrincipalId>>>>,
}

impl InMemoryPrincipalDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_principal(&self, principal: Principal) {
        let mut principals = self.principals.write().unwrap();
        principals.insert(principal.id, principal);
    }

    pub fn add_employee(&self, principal: Principal, organization_id: OrganizationId) {
        let id = principal.id;
        self.add_principal(principal);
        let mut memberships = self.memberships.write().unwrap();
        memberships.entry(organization_id).or_default().insert(id);
    }

    pub fn remove_employee(&self, principal_id: PrincipalId, organization_id: OrganizationId) {
        let mut memberships = self.memberships.write().unwrap();
        if let Some(members) = memberships.get_mut(&organization_id) {
            members.remove(&principal_id);
        }
    }
}

#[async_trait]
impl PrincipalDirectory for InMemoryPrincipalDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError> {
        let principals = self.principals.read().unwrap();
        Ok(principals.values().find(|p| p.username == username).cloned())
    }

    async fn is_member(
        &self,
        principal_id: PrincipalId,
        organization_id: OrganizationId,
    ) -> Result<bool, StoreError> {
        let memberships = self.memberships.read().unwrap();
        Ok(memberships
            .get(&organization_id)
            .is_some_and(|members| members.contains(&principal_id)))
    }

    async fn list_members(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Principal>, StoreError> {
        let memberships = self.memberships.read().unwrap();
        let principals = self.principals.read().unwrap();
        Ok(memberships
            .get(&organization_id)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|id| principals.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }
}
