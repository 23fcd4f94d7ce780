// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Bid aggregate and decision records.
//!
//! A bid is a versioned record placed against a published tender by either
//! an organization (acting through an employee) or an individual principal.
//! `Approved` and `Rejected` are terminal and are written exclusively by the
//! decision aggregation path in `crate::application::bid`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::principal::{OrganizationId, PrincipalId};
use crate::domain::revision::Revisioned;
use crate::domain::tender::TenderId;

pub const BID_NAME_MAX: usize = 100;
pub const BID_DESCRIPTION_MAX: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BidId(pub Uuid);

impl BidId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BidId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidStatus {
    Created,
    Published,
    Canceled,
    Approved,
    Rejected,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Created => "Created",
            BidStatus::Published => "Published",
            BidStatus::Canceled => "Canceled",
            BidStatus::Approved => "Approved",
            BidStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Created" => Some(BidStatus::Created),
            "Published" => Some(BidStatus::Published),
            "Canceled" => Some(BidStatus::Canceled),
            "Approved" => Some(BidStatus::Approved),
            "Rejected" => Some(BidStatus::Rejected),
            _ => None,
        }
    }

    /// Terminal states can never be left again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BidStatus::Approved | BidStatus::Rejected)
    }
}

/// Who a bid speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "authorType", content = "authorId")]
pub enum BidAuthor {
    Organization(OrganizationId),
    Individual(PrincipalId),
}

impl BidAuthor {
    /// Relational form: discriminator plus a single id column.
    pub fn as_parts(&self) -> (&'static str, Uuid) {
        match self {
            BidAuthor::Organization(id) => ("Organization", id.0),
            BidAuthor::Individual(id) => ("Individual", id.0),
        }
    }

    pub fn from_parts(kind: &str, id: Uuid) -> Option<Self> {
        match kind {
            "Organization" => Some(BidAuthor::Organization(OrganizationId(id))),
            "Individual" => Some(BidAuthor::Individual(PrincipalId(id))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub name: String,
    pub description: String,
    pub status: BidStatus,
    pub tender_id: TenderId,
    pub author: BidAuthor,
    pub creator_id: PrincipalId,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl Bid {
    /// First revision: fresh identity, version 1, `Created` status.
    pub fn new(draft: BidDraft, author: BidAuthor, creator_id: PrincipalId) -> Self {
        Self {
            id: BidId::new(),
            name: draft.name,
            description: draft.description,
            status: BidStatus::Created,
            tender_id: draft.tender_id,
            author,
            creator_id,
            version: 1,
            created_at: Utc::now(),
        }
    }
}

impl Revisioned for Bid {
    type Id = BidId;
    type Status = BidStatus;
    type Patch = BidPatch;

    fn id(&self) -> BidId {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    fn status(&self) -> BidStatus {
        self.status
    }

    fn set_status(&mut self, status: BidStatus) {
        self.status = status;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    fn apply(&mut self, patch: &BidPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
    }
}

/// Fields accepted at bid creation time. A set `organization_id` makes the
/// bid organizational; otherwise the caller bids as an individual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidDraft {
    pub name: String,
    pub description: String,
    pub tender_id: TenderId,
    pub organization_id: Option<OrganizationId>,
}

impl BidDraft {
    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)?;
        validate_description(&self.description)
    }
}

/// Partial overlay for edits; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BidPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl BidPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.chars().count() > BID_NAME_MAX {
        return Err(format!(
            "bid name must be non-empty and at most {BID_NAME_MAX} characters"
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), String> {
    if description.chars().count() > BID_DESCRIPTION_MAX {
        return Err(format!(
            "bid description must be at most {BID_DESCRIPTION_MAX} characters"
        ));
    }
    Ok(())
}

/// An approver's decision on a bid — an immutable, append-only fact. When an
/// employee decides twice, only their most recent decision counts toward the
/// quorum; the older rows stay for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidDecision {
    pub id: Uuid,
    pub bid_id: BidId,
    pub kind: DecisionKind,
    pub organization_id: OrganizationId,
    pub approver_id: PrincipalId,
    pub created_at: DateTime<Utc>,
}

impl BidDecision {
    pub fn new(
        bid_id: BidId,
        kind: DecisionKind,
        organization_id: OrganizationId,
        approver_id: PrincipalId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            bid_id,
            kind,
            organization_id,
            approver_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionKind {
    Approved,
    Rejected,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Approved => "Approved",
            DecisionKind::Rejected => "Rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Approved" => Some(DecisionKind::Approved),
            "Rejected" => Some(DecisionKind::Rejected),
            _ => None,
        }
    }
}

/// Distinct approving employees required to approve a bid. Uses the
/// organization size at decision time, so the threshold can move while
/// decisions are being collected.
pub fn required_quorum(organization_size: usize) -> usize {
    organization_size.min(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quorum_caps_at_three() {
        assert_eq!(required_quorum(1), 1);
        assert_eq!(required_quorum(2), 2);
        assert_eq!(required_quorum(3), 3);
        assert_eq!(required_quorum(10), 3);
    }

    #[test]
    fn author_parts_round_trip() {
        let org = BidAuthor::Organization(OrganizationId::new());
        let (kind, id) = org.as_parts();
        assert_eq!(BidAuthor::from_parts(kind, id), Some(org));

        let individual = BidAuthor::Individual(PrincipalId::new());
        let (kind, id) = individual.as_parts();
        assert_eq!(BidAuthor::from_parts(kind, id), Some(individual));
        assert_eq!(BidAuthor::from_parts("Robot", id), None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(BidStatus::Approved.is_terminal());
        assert!(BidStatus::Rejected.is_terminal());
        assert!(!BidStatus::Published.is_terminal());
        assert!(!BidStatus::Canceled.is_terminal());
    }
}
