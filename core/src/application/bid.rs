// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Bid workflow and decision aggregation.
//!
//! Bids are created only against published tenders, mutated only by their
//! author, and settled by the quorum path in [`BidWorkflow::submit_decision`]:
//! a single rejection is final, while approval needs `min(3, N)` distinct
//! employees of the tender's organization. Reaching the quorum closes the
//! tender as a side effect, inside the same database transaction as the bid
//! status write.

use std::sync::Arc;

use tracing::info;

use crate::application::error::{WorkflowError, WorkflowResult};
use crate::application::identity::IdentityGate;
use crate::application::tender::TenderWorkflow;
use crate::domain::bid::{
    required_quorum, Bid, BidAuthor, BidDraft, BidId, BidPatch, BidStatus, DecisionKind,
};
use crate::domain::page::Page;
use crate::domain::principal::Principal;
use crate::domain::repository::{BidStore, DecisionStore};
use crate::domain::tender::{TenderId, TenderStatus};

pub struct BidWorkflow {
    bids: Arc<dyn BidStore>,
    decisions: Arc<dyn DecisionStore>,
    tenders: Arc<TenderWorkflow>,
    identity: IdentityGate,
}

impl BidWorkflow {
    pub fn new(
        bids: Arc<dyn BidStore>,
        decisions: Arc<dyn DecisionStore>,
        tenders: Arc<TenderWorkflow>,
        identity: IdentityGate,
    ) -> Self {
        Self {
            bids,
            decisions,
            tenders,
            identity,
        }
    }

    /// Current revision, with the store's `NotFound` translated at the
    /// boundary.
    pub async fn get_by_id(&self, bid_id: BidId) -> WorkflowResult<Bid> {
        self.bids
            .get_current(bid_id)
            .await
            .map_err(|e| WorkflowError::from_store(e, "bid does not exist"))
    }

    /// The caller bids for an organization when `draft.organization_id` is
    /// set (and must be its employee), otherwise as an individual.
    pub async fn create(&self, username: &str, draft: BidDraft) -> WorkflowResult<Bid> {
        draft.validate().map_err(WorkflowError::invalid)?;
        let tender = self.tenders.get_by_id(draft.tender_id).await?;
        if tender.status != TenderStatus::Published {
            return Err(WorkflowError::invalid("tender is not published"));
        }
        let (author, creator_id) = match draft.organization_id {
            Some(organization_id) => {
                let employee = self
                    .identity
                    .resolve_employee(username, organization_id)
                    .await?;
                (BidAuthor::Organization(organization_id), employee.id)
            }
            None => {
                let principal = self.identity.resolve_principal(username).await?;
                (BidAuthor::Individual(principal.id), principal.id)
            }
        };
        let bid = Bid::new(draft, author, creator_id);
        info!(bid_id = %bid.id.0, tender_id = %bid.tender_id.0, "creating bid");
        self.bids.create(bid).await.map_err(WorkflowError::internal)
    }

    /// The caller's own bids, latest revision per id.
    pub async fn get_by_creator(
        &self,
        username: &str,
        limit: i64,
        offset: i64,
    ) -> WorkflowResult<Vec<Bid>> {
        let page = Page::new(limit, offset).map_err(|e| WorkflowError::invalid(e.to_string()))?;
        let principal = self.identity.resolve_principal(username).await?;
        self.bids
            .list_by_creator(principal.id, page)
            .await
            .map_err(WorkflowError::internal)
    }

    /// Bids on a tender, visible only to employees of the tender's owning
    /// organization and restricted to published or settled bids.
    pub async fn get_by_tender(
        &self,
        username: &str,
        tender_id: TenderId,
        limit: i64,
        offset: i64,
    ) -> WorkflowResult<Vec<Bid>> {
        let page = Page::new(limit, offset).map_err(|e| WorkflowError::invalid(e.to_string()))?;
        let tender = self.tenders.get_by_id(tender_id).await?;
        self.identity
            .resolve_employee(username, tender.organization_id)
            .await?;
        self.bids
            .list_by_tender(tender_id, page)
            .await
            .map_err(WorkflowError::internal)
    }

    /// Any resolvable principal may query a bid's status.
    pub async fn get_status(&self, username: &str, bid_id: BidId) -> WorkflowResult<BidStatus> {
        self.identity.resolve_principal(username).await?;
        let bid = self.get_by_id(bid_id).await?;
        Ok(bid.status)
    }

    pub async fn update_status(
        &self,
        username: &str,
        bid_id: BidId,
        status: BidStatus,
    ) -> WorkflowResult<Bid> {
        if status.is_terminal() {
            return Err(WorkflowError::invalid(
                "approved and rejected are set through decisions",
            ));
        }
        let bid = self.get_by_id(bid_id).await?;
        if bid.status.is_terminal() {
            return Err(WorkflowError::invalid(
                "cannot update approved or rejected bid",
            ));
        }
        self.authorize_author(username, &bid).await?;
        info!(bid_id = %bid_id.0, status = status.as_str(), "updating bid status");
        self.bids
            .set_status(bid_id, status)
            .await
            .map_err(|e| WorkflowError::from_store(e, "bid does not exist"))
    }

    pub async fn update(
        &self,
        username: &str,
        bid_id: BidId,
        patch: BidPatch,
    ) -> WorkflowResult<Bid> {
        patch.validate().map_err(WorkflowError::invalid)?;
        let bid = self.get_by_id(bid_id).await?;
        if bid.status.is_terminal() {
            return Err(WorkflowError::invalid(
                "cannot update approved or rejected bid",
            ));
        }
        self.authorize_author(username, &bid).await?;
        self.bids
            .apply_edit(bid_id, patch)
            .await
            .map_err(|e| WorkflowError::from_store(e, "bid does not exist"))
    }

    /// Append a copy of the requested historical revision as the newest one.
    /// Settled bids stay settled: no rollback out of a terminal state.
    pub async fn rollback(
        &self,
        username: &str,
        bid_id: BidId,
        version: i32,
    ) -> WorkflowResult<Bid> {
        if version < 1 {
            return Err(WorkflowError::invalid("bid version must be greater than 0"));
        }
        let bid = self.get_by_id(bid_id).await?;
        if bid.status.is_terminal() {
            return Err(WorkflowError::invalid(
                "cannot update approved or rejected bid",
            ));
        }
        self.authorize_author(username, &bid).await?;
        self.bids
            .rollback(bid_id, version)
            .await
            .map_err(|e| WorkflowError::from_store(e, "bid version does not exist"))
    }

    /// Quorum entry point.
    ///
    /// A bid already settled short-circuits to an idempotent no-op so late
    /// or retried decisions stay harmless; everything else follows the
    /// state machine: bid and tender both `Published`, caller an employee
    /// of the tender's organization, rejection unconditional, approval
    /// gated on `min(3, N)` distinct approvers.
    pub async fn submit_decision(
        &self,
        username: &str,
        bid_id: BidId,
        decision: DecisionKind,
    ) -> WorkflowResult<Bid> {
        self.identity.resolve_principal(username).await?;
        let bid = self.get_by_id(bid_id).await?;
        if bid.status.is_terminal() {
            return Ok(bid);
        }
        if bid.status != BidStatus::Published {
            return Err(WorkflowError::invalid("bid is not published"));
        }
        let tender = self.tenders.get_by_id(bid.tender_id).await?;
        if tender.status != TenderStatus::Published {
            return Err(WorkflowError::invalid("tender is not published"));
        }
        let approver = self
            .identity
            .resolve_employee(username, tender.organization_id)
            .await?;

        match decision {
            DecisionKind::Rejected => {
                info!(bid_id = %bid_id.0, approver = %approver.id.0, "rejecting bid");
                self.decisions
                    .record_rejection(bid.id, tender.organization_id, approver.id)
                    .await
                    .map_err(WorkflowError::internal)
            }
            DecisionKind::Approved => {
                let employees = self.identity.list_employees(tender.organization_id).await?;
                let quorum = required_quorum(employees.len());
                let outcome = self
                    .decisions
                    .record_approval(bid.id, tender.id, tender.organization_id, approver.id, quorum)
                    .await
                    .map_err(WorkflowError::internal)?;
                if outcome.quorum_reached {
                    info!(
                        bid_id = %bid_id.0,
                        tender_id = %tender.id.0,
                        approvals = outcome.approvals,
                        "bid approved, tender closed"
                    );
                }
                Ok(outcome.bid)
            }
        }
    }

    /// Existence probe used by the review log.
    pub async fn has_by_creator_and_tender(
        &self,
        creator: &Principal,
        tender_id: TenderId,
    ) -> WorkflowResult<()> {
        let has = self
            .bids
            .has_by_creator_and_tender(creator.id, tender_id)
            .await
            .map_err(WorkflowError::internal)?;
        if !has {
            return Err(WorkflowError::not_exist(
                "creator does not have a bid for the tender",
            ));
        }
        Ok(())
    }

    async fn authorize_author(&self, username: &str, bid: &Bid) -> WorkflowResult<Principal> {
        match bid.author {
            BidAuthor::Organization(organization_id) => {
                self.identity
                    .resolve_employee(username, organization_id)
                    .await
            }
            BidAuthor::Individual(_) => {
                let principal = self.identity.resolve_principal(username).await?;
                if principal.id != bid.creator_id {
                    return Err(WorkflowError::forbidden("user is not the bid author"));
                }
                Ok(principal)
            }
        }
    }
}
