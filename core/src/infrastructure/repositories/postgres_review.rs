// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Review Store
//!
//! Append-only `bid_review` log. Rows are inserted and listed, never updated
//! or deleted.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::bid::BidId;
use crate::domain::page::Page;
use crate::domain::principal::{OrganizationId, PrincipalId};
use crate::domain::repository::{ReviewStore, StoreError};
use crate::domain::review::{BidReview, ReviewId};

pub struct PostgresReviewStore {
    pool: PgPool,
}

impl PostgresReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn review_from_row(row: &PgRow) -> BidReview {
    BidReview {
        id: ReviewId(row.get("id")),
        bid_id: BidId(row.get("bid_id")),
        organization_id: OrganizationId(row.get("organization_id")),
        creator_id: PrincipalId(row.get("creator_id")),
        description: row.get("description"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl ReviewStore for PostgresReviewStore {
    async fn append(&self, review: BidReview) -> Result<BidReview, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO bid_review (id, bid_id, organization_id, creator_id, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(review.id.0)
        .bind(review.bid_id.0)
        .bind(review.organization_id.0)
        .bind(review.creator_id.0)
        .bind(&review.description)
        .bind(review.created_at)
        .execute(&self.pool)
        .await?;
        Ok(review)
    }

    async fn list_by_bid_creator(
        &self,
        creator_id: PrincipalId,
        page: Page,
    ) -> Result<Vec<BidReview>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.bid_id, r.organization_id, r.creator_id, r.description, r.created_at
            FROM bid_review r
            WHERE EXISTS (
                SELECT 1 FROM bid b WHERE b.id = r.bid_id AND b.creator_id = $1
            )
            ORDER BY r.created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(creator_id.0)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(review_from_row).collect())
    }
}
