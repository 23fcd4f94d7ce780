// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Principal Directory
//!
//! Read-only lookups over the `employee`, `organization` and
//! `organization_responsible` tables. Ownership of this data sits with the
//! identity service; this crate only consults it.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::principal::{OrganizationId, Principal, PrincipalId};
use crate::domain::repository::{PrincipalDirectory, StoreError};

pub struct PostgresPrincipalDirectory {
    pool: PgPool,
}

impl PostgresPrincipalDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn principal_from_row(row: &PgRow) -> Principal {
    Principal {
        id: PrincipalId(row.get("id")),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl PrincipalDirectory for PostgresPrincipalDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, first_name, last_name, created_at FROM employee WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(principal_from_row))
    }

    async fn is_member(
        &self,
        principal_id: PrincipalId,
        organization_id: OrganizationId,
    ) -> Result<bool, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM organization_responsible
                WHERE user_id = $1 AND organization_id = $2
            ) AS member
            "#,
        )
        .bind(principal_id.0)
        .bind(organization_id.0)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("member"))
    }

    async fn list_members(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Principal>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT e.id, e.username, e.first_name, e.last_name, e.created_at
            FROM employee e
            JOIN organization_responsible orsp ON orsp.user_id = e.id
            WHERE orsp.organization_id = $1
            ORDER BY e.username ASC
            "#,
        )
        .bind(organization_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(principal_from_row).collect())
    }
}
