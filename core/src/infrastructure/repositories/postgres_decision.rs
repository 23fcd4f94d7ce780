// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Decision Store
//!
//! Append-only `bid_decision` log plus the quorum cascade. Each mutating
//! operation runs in a single transaction that first locks the bid's current
//! revision with `SELECT ... FOR UPDATE`:
//!
//! 1. a bid observed terminal under the lock is returned unchanged, making
//!    concurrent or repeated decisions idempotent;
//! 2. the decision row is inserted;
//! 3. approvals are counted as distinct approvers, keeping only each
//!    approver's most recent decision (`DISTINCT ON ... ORDER BY created_at
//!    DESC`);
//! 4. on quorum, the bid flips to `Approved` and the tender to `Closed`
//!    inside the same transaction, so the cascade commits or aborts whole.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::bid::{Bid, BidDecision, BidId, BidStatus, DecisionKind};
use crate::domain::principal::{OrganizationId, PrincipalId};
use crate::domain::repository::{ApprovalOutcome, DecisionStore, StoreError};
use crate::domain::tender::TenderId;

use super::postgres_bid::{bid_from_row, lock_current, BID_COLUMNS};

pub struct PostgresDecisionStore {
    pool: PgPool,
}

impl PostgresDecisionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decision_from_row(row: &PgRow) -> Result<BidDecision, StoreError> {
    let kind_str: String = row.get("kind");
    let kind = DecisionKind::parse(&kind_str)
        .ok_or_else(|| StoreError::Database(format!("invalid decision kind: {kind_str}")))?;

    Ok(BidDecision {
        id: row.get("id"),
        bid_id: BidId(row.get("bid_id")),
        kind,
        organization_id: OrganizationId(row.get("organization_id")),
        approver_id: PrincipalId(row.get("approver_id")),
        created_at: row.get("created_at"),
    })
}

async fn insert_decision(
    executor: &mut sqlx::PgConnection,
    decision: &BidDecision,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO bid_decision (id, bid_id, kind, organization_id, approver_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(decision.id)
    .bind(decision.bid_id.0)
    .bind(decision.kind.as_str())
    .bind(decision.organization_id.0)
    .bind(decision.approver_id.0)
    .bind(decision.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

async fn set_bid_status(
    executor: &mut sqlx::PgConnection,
    bid_id: BidId,
    status: BidStatus,
) -> Result<Bid, StoreError> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE bid SET status = $2
        WHERE id = $1
          AND version = (SELECT MAX(version) FROM bid WHERE id = $1)
        RETURNING {BID_COLUMNS}
        "#
    ))
    .bind(bid_id.0)
    .bind(status.as_str())
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| StoreError::NotFound(format!("bid {}", bid_id.0)))?;
    bid_from_row(&row)
}

#[async_trait]
impl DecisionStore for PostgresDecisionStore {
    async fn record_approval(
        &self,
        bid_id: BidId,
        tender_id: TenderId,
        organization_id: OrganizationId,
        approver_id: PrincipalId,
        quorum: usize,
    ) -> Result<ApprovalOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;
        let bid = lock_current(&mut tx, bid_id).await?;
        if bid.status.is_terminal() {
            tx.commit().await?;
            return Ok(ApprovalOutcome {
                bid,
                approvals: 0,
                quorum_reached: false,
            });
        }

        let decision =
            BidDecision::new(bid_id, DecisionKind::Approved, organization_id, approver_id);
        insert_decision(&mut tx, &decision).await?;

        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS approvals FROM (
                SELECT DISTINCT ON (approver_id) kind
                FROM bid_decision
                WHERE bid_id = $1 AND organization_id = $2
                ORDER BY approver_id, created_at DESC
            ) d
            WHERE d.kind = 'Approved'
            "#,
        )
        .bind(bid_id.0)
        .bind(organization_id.0)
        .fetch_one(&mut *tx)
        .await?;
        let approvals: i64 = row.get("approvals");
        let approvals = approvals as usize;

        if approvals >= quorum {
            let bid = set_bid_status(&mut tx, bid_id, BidStatus::Approved).await?;
            sqlx::query(
                r#"
                UPDATE tender SET status = 'Closed'
                WHERE id = $1
                  AND version = (SELECT MAX(version) FROM tender WHERE id = $1)
                "#,
            )
            .bind(tender_id.0)
            .execute(&mut *tx)
            .await?;
            tx.commit().await?;
            Ok(ApprovalOutcome {
                bid,
                approvals,
                quorum_reached: true,
            })
        } else {
            tx.commit().await?;
            Ok(ApprovalOutcome {
                bid,
                approvals,
                quorum_reached: false,
            })
        }
    }

    async fn record_rejection(
        &self,
        bid_id: BidId,
        organization_id: OrganizationId,
        approver_id: PrincipalId,
    ) -> Result<Bid, StoreError> {
        let mut tx = self.pool.begin().await?;
        let bid = lock_current(&mut tx, bid_id).await?;
        if bid.status.is_terminal() {
            tx.commit().await?;
            return Ok(bid);
        }

        let decision =
            BidDecision::new(bid_id, DecisionKind::Rejected, organization_id, approver_id);
        insert_decision(&mut tx, &decision).await?;
        let bid = set_bid_status(&mut tx, bid_id, BidStatus::Rejected).await?;
        tx.commit().await?;
        Ok(bid)
    }

    async fn latest_decisions(
        &self,
        bid_id: BidId,
        organization_id: OrganizationId,
    ) -> Result<Vec<BidDecision>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, bid_id, kind, organization_id, approver_id, created_at FROM (
                SELECT DISTINCT ON (approver_id) *
                FROM bid_decision
                WHERE bid_id = $1 AND organization_id = $2
                ORDER BY approver_id, created_at DESC
            ) d
            ORDER BY d.created_at ASC
            "#,
        )
        .bind(bid_id.0)
        .bind(organization_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decision_from_row).collect()
    }
}
