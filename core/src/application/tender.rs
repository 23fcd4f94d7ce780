// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Tender workflow.
//!
//! Business rules layered on the versioned store: creation by an employee of
//! the owning organization, publication-gated visibility, ownership-gated
//! mutation and rollback.

use std::sync::Arc;

use tracing::info;

use crate::application::error::{WorkflowError, WorkflowResult};
use crate::application::identity::IdentityGate;
use crate::domain::page::Page;
use crate::domain::repository::TenderStore;
use crate::domain::tender::{ServiceType, Tender, TenderDraft, TenderId, TenderPatch, TenderStatus};

pub struct TenderWorkflow {
    tenders: Arc<dyn TenderStore>,
    identity: IdentityGate,
}

impl TenderWorkflow {
    pub fn new(tenders: Arc<dyn TenderStore>, identity: IdentityGate) -> Self {
        Self { tenders, identity }
    }

    /// Current revision, with the store's `NotFound` translated at the
    /// boundary.
    pub async fn get_by_id(&self, tender_id: TenderId) -> WorkflowResult<Tender> {
        self.tenders
            .get_current(tender_id)
            .await
            .map_err(|e| WorkflowError::from_store(e, "tender does not exist"))
    }

    pub async fn create(&self, username: &str, draft: TenderDraft) -> WorkflowResult<Tender> {
        draft.validate().map_err(WorkflowError::invalid)?;
        let employee = self
            .identity
            .resolve_employee(username, draft.organization_id)
            .await?;
        let tender = Tender::new(draft, employee.id);
        info!(tender_id = %tender.id.0, organization_id = %tender.organization_id.0, "creating tender");
        self.tenders
            .create(tender)
            .await
            .map_err(WorkflowError::internal)
    }

    /// Published tenders only, latest revision per id, optionally filtered
    /// by service type.
    pub async fn list_by_service_type(
        &self,
        service_types: &[ServiceType],
        limit: i64,
        offset: i64,
    ) -> WorkflowResult<Vec<Tender>> {
        let page = Page::new(limit, offset).map_err(|e| WorkflowError::invalid(e.to_string()))?;
        self.tenders
            .list_published(service_types, page)
            .await
            .map_err(WorkflowError::internal)
    }

    /// Every tender created by the caller, regardless of status.
    pub async fn list_by_creator(
        &self,
        username: &str,
        limit: i64,
        offset: i64,
    ) -> WorkflowResult<Vec<Tender>> {
        let page = Page::new(limit, offset).map_err(|e| WorkflowError::invalid(e.to_string()))?;
        let principal = self.identity.resolve_principal(username).await?;
        self.tenders
            .list_by_creator(principal.id, page)
            .await
            .map_err(WorkflowError::internal)
    }

    /// Published tenders are readable by anyone; otherwise the caller must
    /// be an employee of the owning organization.
    pub async fn get_status(
        &self,
        username: &str,
        tender_id: TenderId,
    ) -> WorkflowResult<TenderStatus> {
        let tender = self.get_by_id(tender_id).await?;
        if tender.status != TenderStatus::Published {
            self.identity
                .resolve_employee(username, tender.organization_id)
                .await?;
        }
        Ok(tender.status)
    }

    pub async fn update_status(
        &self,
        username: &str,
        tender_id: TenderId,
        status: TenderStatus,
    ) -> WorkflowResult<Tender> {
        let tender = self.get_by_id(tender_id).await?;
        self.identity
            .resolve_employee(username, tender.organization_id)
            .await?;
        info!(tender_id = %tender_id.0, status = status.as_str(), "updating tender status");
        self.tenders
            .set_status(tender_id, status)
            .await
            .map_err(|e| WorkflowError::from_store(e, "tender does not exist"))
    }

    pub async fn update(
        &self,
        username: &str,
        tender_id: TenderId,
        patch: TenderPatch,
    ) -> WorkflowResult<Tender> {
        patch.validate().map_err(WorkflowError::invalid)?;
        let tender = self.get_by_id(tender_id).await?;
        self.identity
            .resolve_employee(username, tender.organization_id)
            .await?;
        self.tenders
            .apply_edit(tender_id, patch)
            .await
            .map_err(|e| WorkflowError::from_store(e, "tender does not exist"))
    }

    /// Append a copy of the requested historical revision as the newest one.
    pub async fn rollback(
        &self,
        username: &str,
        tender_id: TenderId,
        version: i32,
    ) -> WorkflowResult<Tender> {
        if version < 1 {
            return Err(WorkflowError::invalid(
                "tender version must be greater than 0",
            ));
        }
        let tender = self.get_by_id(tender_id).await?;
        self.identity
            .resolve_employee(username, tender.organization_id)
            .await?;
        info!(tender_id = %tender_id.0, version, "rolling back tender");
        self.tenders
            .rollback(tender_id, version)
            .await
            .map_err(|e| WorkflowError::from_store(e, "tender version does not exist"))
    }
}
