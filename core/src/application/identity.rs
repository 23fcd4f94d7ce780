// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Identity gate.
//!
//! Wraps the `PrincipalDirectory` seam with the two authorization outcomes
//! the workflows care about: an unknown username is `Unauthenticated`, a
//! known principal without the required organizational membership is
//! `Forbidden`.

use std::sync::Arc;

use crate::application::error::{WorkflowError, WorkflowResult};
use crate::domain::principal::{OrganizationId, Principal};
use crate::domain::repository::PrincipalDirectory;

#[derive(Clone)]
pub struct IdentityGate {
    directory: Arc<dyn PrincipalDirectory>,
}

impl IdentityGate {
    pub fn new(directory: Arc<dyn PrincipalDirectory>) -> Self {
        Self { directory }
    }

    /// Any known principal, individual or employee.
    pub async fn resolve_principal(&self, username: &str) -> WorkflowResult<Principal> {
        self.directory
            .find_by_username(username)
            .await
            .map_err(WorkflowError::internal)?
            .ok_or(WorkflowError::Unauthenticated)
    }

    /// Lookup without the authentication verdict, for callers that treat an
    /// unknown username as a missing record rather than a failed login.
    pub async fn lookup_principal(&self, username: &str) -> WorkflowResult<Option<Principal>> {
        self.directory
            .find_by_username(username)
            .await
            .map_err(WorkflowError::internal)
    }

    /// A principal acting as an employee of the given organization.
    pub async fn resolve_employee(
        &self,
        username: &str,
        organization_id: OrganizationId,
    ) -> WorkflowResult<Principal> {
        let principal = self.resolve_principal(username).await?;
        let member = self
            .directory
            .is_member(principal.id, organization_id)
            .await
            .map_err(WorkflowError::internal)?;
        if !member {
            return Err(WorkflowError::forbidden(
                "user is not an employee of the organization",
            ));
        }
        Ok(principal)
    }

    /// Current employees of the organization, used for quorum sizing.
    pub async fn list_employees(
        &self,
        organization_id: OrganizationId,
    ) -> WorkflowResult<Vec<Principal>> {
        self.directory
            .list_members(organization_id)
            .await
            .map_err(WorkflowError::internal)
    }
}
