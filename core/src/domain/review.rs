// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Bid review append log.
//!
//! Free-text feedback left by the tender's organization on a bid. Reviews
//! are append-only; they are never edited or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::bid::BidId;
use crate::domain::principal::{OrganizationId, PrincipalId};

pub const REVIEW_DESCRIPTION_MAX: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub Uuid);

impl ReviewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReviewId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidReview {
    pub id: ReviewId,
    pub bid_id: BidId,
    pub organization_id: OrganizationId,
    pub creator_id: PrincipalId,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl BidReview {
    pub fn new(
        bid_id: BidId,
        organization_id: OrganizationId,
        creator_id: PrincipalId,
        description: String,
    ) -> Self {
        Self {
            id: ReviewId::new(),
            bid_id,
            organization_id,
            creator_id,
            description,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.description.is_empty()
            || self.description.chars().count() > REVIEW_DESCRIPTION_MAX
        {
            return Err(format!(
                "review description must be non-empty and at most {REVIEW_DESCRIPTION_MAX} characters"
            ));
        }
        Ok(())
    }
}
