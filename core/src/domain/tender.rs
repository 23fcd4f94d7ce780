// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Tender aggregate.
//!
//! A tender is a versioned record owned by an organization. It is created in
//! `Created` status, becomes visible to bidders once `Published`, and ends
//! `Closed` — either manually by the owner or automatically when a bid on it
//! reaches the approval quorum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::principal::{OrganizationId, PrincipalId};
use crate::domain::revision::Revisioned;

pub const TENDER_NAME_MAX: usize = 100;
pub const TENDER_DESCRIPTION_MAX: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenderId(pub Uuid);

impl TenderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TenderId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    Construction,
    Delivery,
    Manufacture,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Construction => "Construction",
            ServiceType::Delivery => "Delivery",
            ServiceType::Manufacture => "Manufacture",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Construction" => Some(ServiceType::Construction),
            "Delivery" => Some(ServiceType::Delivery),
            "Manufacture" => Some(ServiceType::Manufacture),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenderStatus {
    Created,
    Published,
    Closed,
}

impl TenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenderStatus::Created => "Created",
            TenderStatus::Published => "Published",
            TenderStatus::Closed => "Closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Created" => Some(TenderStatus::Created),
            "Published" => Some(TenderStatus::Published),
            "Closed" => Some(TenderStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tender {
    pub id: TenderId,
    pub name: String,
    pub description: String,
    pub service_type: ServiceType,
    pub status: TenderStatus,
    pub organization_id: OrganizationId,
    pub creator_id: PrincipalId,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl Tender {
    /// First revision: fresh identity, version 1, `Created` status.
    pub fn new(draft: TenderDraft, creator_id: PrincipalId) -> Self {
        Self {
            id: TenderId::new(),
            name: draft.name,
            description: draft.description,
            service_type: draft.service_type,
            status: TenderStatus::Created,
            organization_id: draft.organization_id,
            creator_id,
            version: 1,
            created_at: Utc::now(),
        }
    }
}

impl Revisioned for Tender {
    type Id = TenderId;
    type Status = TenderStatus;
    type Patch = TenderPatch;

    fn id(&self) -> TenderId {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    fn status(&self) -> TenderStatus {
        self.status
    }

    fn set_status(&mut self, status: TenderStatus) {
        self.status = status;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    fn apply(&mut self, patch: &TenderPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(service_type) = patch.service_type {
            self.service_type = service_type;
        }
    }
}

/// Fields accepted at tender creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenderDraft {
    pub name: String,
    pub description: String,
    pub service_type: ServiceType,
    pub organization_id: OrganizationId,
}

impl TenderDraft {
    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)?;
        validate_description(&self.description)
    }
}

/// Partial overlay for edits; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenderPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub service_type: Option<ServiceType>,
}

impl TenderPatch {
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
    if name.is_empty() || name.chars().count() > TENDER_NAME_MAX {
        return Err(format!(
            "tender name must be non-empty and at most {TENDER_NAME_MAX} characters"
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), String> {
    if description.chars().count() > TENDER_DESCRIPTION_MAX {
        return Err(format!(
            "tender description must be at most {TENDER_DESCRIPTION_MAX} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, description: &str) -> TenderDraft {
        TenderDraft {
            name: name.to_string(),
            description: description.to_string(),
            service_type: ServiceType::Delivery,
            organization_id: OrganizationId::new(),
        }
    }

    #[test]
    fn name_length_boundary() {
        assert!(draft(&"a".repeat(100), "d").validate().is_ok());
        assert!(draft(&"a".repeat(101), "d").validate().is_err());
        assert!(draft("", "d").validate().is_err());
    }

    #[test]
    fn description_length_boundary() {
        assert!(draft("n", &"d".repeat(500)).validate().is_ok());
        assert!(draft("n", &"d".repeat(501)).validate().is_err());
    }

    #[test]
    fn patch_overlays_only_provided_fields() {
        let mut tender = Tender::new(draft("old", "desc"), PrincipalId::new());
        tender.apply(&TenderPatch {
            name: Some("new".to_string()),
            ..TenderPatch::default()
        });
        assert_eq!(tender.name, "new");
        assert_eq!(tender.description, "desc");
        assert_eq!(tender.service_type, ServiceType::Delivery);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [TenderStatus::Created, TenderStatus::Published, TenderStatus::Closed] {
            assert_eq!(TenderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TenderStatus::parse("Open"), None);
    }
}
