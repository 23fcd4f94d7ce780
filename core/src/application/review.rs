// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Review workflow.
//!
//! Feedback written by the tender's organization against a bid, and the
//! cross-bid listing an organization uses to vet a bidder's track record.

use std::sync::Arc;

use tracing::info;

use crate::application::bid::BidWorkflow;
use crate::application::error::{WorkflowError, WorkflowResult};
use crate::application::identity::IdentityGate;
use crate::application::tender::TenderWorkflow;
use crate::domain::bid::BidId;
use crate::domain::page::Page;
use crate::domain::repository::ReviewStore;
use crate::domain::review::BidReview;
use crate::domain::tender::TenderId;

pub struct ReviewWorkflow {
    reviews: Arc<dyn ReviewStore>,
    bids: Arc<BidWorkflow>,
    tenders: Arc<TenderWorkflow>,
    identity: IdentityGate,
}

impl ReviewWorkflow {
    pub fn new(
        reviews: Arc<dyn ReviewStore>,
        bids: Arc<BidWorkflow>,
        tenders: Arc<TenderWorkflow>,
        identity: IdentityGate,
    ) -> Self {
        Self {
            reviews,
            bids,
            tenders,
            identity,
        }
    }

    /// Append feedback on a bid. Only employees of the organization that owns
    /// the bid's tender may leave reviews.
    pub async fn create_review(
        &self,
        username: &str,
        bid_id: BidId,
        description: String,
    ) -> WorkflowResult<BidReview> {
        let bid = self.bids.get_by_id(bid_id).await?;
        let tender = self.tenders.get_by_id(bid.tender_id).await?;
        let reviewer = self
            .identity
            .resolve_employee(username, tender.organization_id)
            .await?;
        let review = BidReview::new(bid.id, tender.organization_id, reviewer.id, description);
        review.validate().map_err(WorkflowError::invalid)?;
        info!(bid_id = %bid_id.0, reviewer = %reviewer.id.0, "appending bid review");
        self.reviews
            .append(review)
            .await
            .map_err(WorkflowError::internal)
    }

    /// Reviews previously left on any bid by `creator_username`, requested by
    /// an employee of the tender's organization. The creator must exist and
    /// must have bid on the tender, otherwise `NotExist`.
    pub async fn list_by_bid_creator(
        &self,
        requester_username: &str,
        tender_id: TenderId,
        creator_username: &str,
        limit: i64,
        offset: i64,
    ) -> WorkflowResult<Vec<BidReview>> {
        let page = Page::new(limit, offset).map_err(|e| WorkflowError::invalid(e.to_string()))?;
        let tender = self.tenders.get_by_id(tender_id).await?;
        self.identity
            .resolve_employee(requester_username, tender.organization_id)
            .await?;
        let creator = self
            .identity
            .lookup_principal(creator_username)
            .await?
            .ok_or_else(|| WorkflowError::not_exist("bid creator does not exist"))?;
        self.bids.has_by_creator_and_tender(&creator, tender_id).await?;
        self.reviews
            .list_by_bid_creator(creator.id, page)
            .await
            .map_err(WorkflowError::internal)
    }
}
