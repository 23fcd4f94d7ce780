// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Bid Store
//!
//! Production `BidStore` implementation backed by the `bid` table, laid out
//! the same way as the tender store: one row per revision, `(id, version)`
//! primary key, current revision at maximum version. The author is stored as
//! a discriminator column (`author_type`) plus a single `author_id` UUID.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::bid::{Bid, BidAuthor, BidId, BidPatch, BidStatus};
use crate::domain::page::Page;
use crate::domain::principal::PrincipalId;
use crate::domain::repository::{BidIndex, StoreError, VersionStore};
use crate::domain::revision::Revisioned;
use crate::domain::tender::TenderId;

pub struct PostgresBidStore {
    pool: PgPool,
}

impl PostgresBidStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn bid_from_row(row: &PgRow) -> Result<Bid, StoreError> {
    let status_str: String = row.get("status");
    let author_type: String = row.get("author_type");

    let status = BidStatus::parse(&status_str)
        .ok_or_else(|| StoreError::Database(format!("invalid bid status: {status_str}")))?;
    let author = BidAuthor::from_parts(&author_type, row.get("author_id"))
        .ok_or_else(|| StoreError::Database(format!("invalid bid author type: {author_type}")))?;

    Ok(Bid {
        id: BidId(row.get("id")),
        name: row.get("name"),
        description: row.get("description"),
        status,
        tender_id: TenderId(row.get("tender_id")),
        author,
        creator_id: PrincipalId(row.get("creator_id")),
        version: row.get("version"),
        created_at: row.get("created_at"),
    })
}

pub(crate) const BID_COLUMNS: &str =
    "id, version, name, description, status, tender_id, author_type, author_id, creator_id, created_at";

pub(crate) async fn insert_revision(
    executor: &mut sqlx::PgConnection,
    bid: &Bid,
) -> Result<(), StoreError> {
    let (author_type, author_id) = bid.author.as_parts();
    sqlx::query(
        r#"
        INSERT INTO bid (
            id, version, name, description, status, tender_id,
            author_type, author_id, creator_id, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(bid.id.0)
    .bind(bid.version)
    .bind(&bid.name)
    .bind(&bid.description)
    .bind(bid.status.as_str())
    .bind(bid.tender_id.0)
    .bind(author_type)
    .bind(author_id)
    .bind(bid.creator_id.0)
    .bind(bid.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn lock_current(
    executor: &mut sqlx::PgConnection,
    id: BidId,
) -> Result<Bid, StoreError> {
    let row = sqlx::query(&format!(
        "SELECT {BID_COLUMNS} FROM bid WHERE id = $1 ORDER BY version DESC LIMIT 1 FOR UPDATE"
    ))
    .bind(id.0)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| StoreError::NotFound(format!("bid {}", id.0)))?;
    bid_from_row(&row)
}

#[async_trait]
impl VersionStore<Bid> for PostgresBidStore {
    async fn create(&self, bid: Bid) -> Result<Bid, StoreError> {
        let mut conn = self.pool.acquire().await?;
        insert_revision(&mut conn, &bid).await?;
        Ok(bid)
    }

    async fn get_current(&self, id: BidId) -> Result<Bid, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {BID_COLUMNS} FROM bid WHERE id = $1 ORDER BY version DESC LIMIT 1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("bid {}", id.0)))?;
        bid_from_row(&row)
    }

    async fn apply_edit(&self, id: BidId, patch: BidPatch) -> Result<Bid, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut next = lock_current(&mut tx, id).await?;
        next.apply(&patch);
        next.version += 1;
        next.created_at = Utc::now();
        insert_revision(&mut tx, &next).await?;
        tx.commit().await?;
        Ok(next)
    }

    async fn set_status(&self, id: BidId, status: BidStatus) -> Result<Bid, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE bid SET status = $2
            WHERE id = $1
              AND version = (SELECT MAX(version) FROM bid WHERE id = $1)
            RETURNING {BID_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("bid {}", id.0)))?;
        bid_from_row(&row)
    }

    async fn rollback(&self, id: BidId, version: i32) -> Result<Bid, StoreError> {
        let mut tx = self.pool.begin().await?;
        let current = lock_current(&mut tx, id).await?;
        let row = sqlx::query(&format!(
            "SELECT {BID_COLUMNS} FROM bid WHERE id = $1 AND version = $2"
        ))
        .bind(id.0)
        .bind(version)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("bid {} version {version}", id.0)))?;
        let mut restored = bid_from_row(&row)?;
        restored.version = current.version + 1;
        restored.created_at = Utc::now();
        insert_revision(&mut tx, &restored).await?;
        tx.commit().await?;
        Ok(restored)
    }
}

#[async_trait]
impl BidIndex for PostgresBidStore {
    async fn list_by_creator(
        &self,
        creator_id: PrincipalId,
        page: Page,
    ) -> Result<Vec<Bid>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {BID_COLUMNS} FROM (
                SELECT DISTINCT ON (id) * FROM bid ORDER BY id, version DESC
            ) b
            WHERE b.creator_id = $1
            ORDER BY b.name ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(creator_id.0)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(bid_from_row).collect()
    }

    async fn list_by_tender(&self, tender_id: TenderId, page: Page) -> Result<Vec<Bid>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {BID_COLUMNS} FROM (
                SELECT DISTINCT ON (id) * FROM bid ORDER BY id, version DESC
            ) b
            WHERE b.tender_id = $1
              AND b.status IN ('Published', 'Approved', 'Rejected')
            ORDER BY b.name ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(tender_id.0)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(bid_from_row).collect()
    }

    async fn has_by_creator_and_tender(
        &self,
        creator_id: PrincipalId,
        tender_id: TenderId,
    ) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT EXISTS (SELECT 1 FROM bid WHERE creator_id = $1 AND tender_id = $2) AS found",
        )
        .bind(creator_id.0)
        .bind(tender_id.0)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("found"))
    }
}
