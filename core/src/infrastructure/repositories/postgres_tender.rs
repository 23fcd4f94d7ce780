// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Tender Store
//!
//! Production `TenderStore` implementation backed by the `tender` table.
//! Every revision is a row; the primary key is `(id, version)` and the
//! current revision of a tender is the row with its maximum version.
//!
//! Concurrency: writers lock the current revision with `SELECT ... FOR
//! UPDATE` before computing the next version, and the composite primary key
//! rejects any duplicate version a racing writer could still produce.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::page::Page;
use crate::domain::principal::{OrganizationId, PrincipalId};
use crate::domain::repository::{StoreError, TenderIndex, VersionStore};
use crate::domain::revision::Revisioned;
use crate::domain::tender::{ServiceType, Tender, TenderId, TenderPatch, TenderStatus};

pub struct PostgresTenderStore {
    pool: PgPool,
}

impl PostgresTenderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn tender_from_row(row: &PgRow) -> Result<Tender, StoreError> {
    let service_type_str: String = row.get("service_type");
    let status_str: String = row.get("status");

    let service_type = ServiceType::parse(&service_type_str)
        .ok_or_else(|| StoreError::Database(format!("invalid service_type: {service_type_str}")))?;
    let status = TenderStatus::parse(&status_str)
        .ok_or_else(|| StoreError::Database(format!("invalid tender status: {status_str}")))?;

    Ok(Tender {
        id: TenderId(row.get("id")),
        name: row.get("name"),
        description: row.get("description"),
        service_type,
        status,
        organization_id: OrganizationId(row.get("organization_id")),
        creator_id: PrincipalId(row.get("creator_id")),
        version: row.get("version"),
        created_at: row.get("created_at"),
    })
}

const TENDER_COLUMNS: &str =
    "id, version, name, description, service_type, status, organization_id, creator_id, created_at";

async fn insert_revision(
    executor: &mut sqlx::PgConnection,
    tender: &Tender,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO tender (
            id, version, name, description, service_type, status,
            organization_id, creator_id, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(tender.id.0)
    .bind(tender.version)
    .bind(&tender.name)
    .bind(&tender.description)
    .bind(tender.service_type.as_str())
    .bind(tender.status.as_str())
    .bind(tender.organization_id.0)
    .bind(tender.creator_id.0)
    .bind(tender.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

async fn lock_current(
    executor: &mut sqlx::PgConnection,
    id: TenderId,
) -> Result<Tender, StoreError> {
    let row = sqlx::query(&format!(
        "SELECT {TENDER_COLUMNS} FROM tender WHERE id = $1 ORDER BY version DESC LIMIT 1 FOR UPDATE"
    ))
    .bind(id.0)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| StoreError::NotFound(format!("tender {}", id.0)))?;
    tender_from_row(&row)
}

#[async_trait]
impl VersionStore<Tender> for PostgresTenderStore {
    async fn create(&self, tender: Tender) -> Result<Tender, StoreError> {
        let mut conn = self.pool.acquire().await?;
        insert_revision(&mut conn, &tender).await?;
        Ok(tender)
    }

    async fn get_current(&self, id: TenderId) -> Result<Tender, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {TENDER_COLUMNS} FROM tender WHERE id = $1 ORDER BY version DESC LIMIT 1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("tender {}", id.0)))?;
        tender_from_row(&row)
    }

    async fn apply_edit(&self, id: TenderId, patch: TenderPatch) -> Result<Tender, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut next = lock_current(&mut tx, id).await?;
        next.apply(&patch);
        next.version += 1;
        next.created_at = Utc::now();
        insert_revision(&mut tx, &next).await?;
        tx.commit().await?;
        Ok(next)
    }

    async fn set_status(&self, id: TenderId, status: TenderStatus) -> Result<Tender, StoreError> {
        // Rewrites the current revision in place; no new version is minted.
        let row = sqlx::query(&format!(
            r#"
            UPDATE tender SET status = $2
            WHERE id = $1
              AND version = (SELECT MAX(version) FROM tender WHERE id = $1)
            RETURNING {TENDER_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("tender {}", id.0)))?;
        tender_from_row(&row)
    }

    async fn rollback(&self, id: TenderId, version: i32) -> Result<Tender, StoreError> {
        let mut tx = self.pool.begin().await?;
        let current = lock_current(&mut tx, id).await?;
        let row = sqlx::query(&format!(
            "SELECT {TENDER_COLUMNS} FROM tender WHERE id = $1 AND version = $2"
        ))
        .bind(id.0)
        .bind(version)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("tender {} version {version}", id.0)))?;
        let mut restored = tender_from_row(&row)?;
        restored.version = current.version + 1;
        restored.created_at = Utc::now();
        insert_revision(&mut tx, &restored).await?;
        tx.commit().await?;
        Ok(restored)
    }
}

#[async_trait]
impl TenderIndex for PostgresTenderStore {
    async fn list_published(
        &self,
        service_types: &[ServiceType],
        page: Page,
    ) -> Result<Vec<Tender>, StoreError> {
        let filter: Vec<String> = service_types
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();
        let rows = sqlx::query(&format!(
            r#"
            SELECT {TENDER_COLUMNS} FROM (
                SELECT DISTINCT ON (id) * FROM tender ORDER BY id, version DESC
            ) t
            WHERE t.status = 'Published'
              AND (cardinality($1::text[]) = 0 OR t.service_type = ANY($1::text[]))
            ORDER BY t.name ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&filter)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(tender_from_row).collect()
    }

    async fn list_by_creator(
        &self,
        creator_id: PrincipalId,
        page: Page,
    ) -> Result<Vec<Tender>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {TENDER_COLUMNS} FROM (
                SELECT DISTINCT ON (id) * FROM tender ORDER BY id, version DESC
            ) t
            WHERE t.creator_id = $1
            ORDER BY t.name ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(creator_id.0)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(tender_from_row).collect()
    }
}
