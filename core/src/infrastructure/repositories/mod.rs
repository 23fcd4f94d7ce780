// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! This module provides infrastructure implementations of the persistence
//! contracts defined in the domain layer, following the Repository pattern
//! from DDD.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve versioned aggregates and append-only logs
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Available Implementations
//!
//! ## PostgreSQL Repositories
//!
//! Production implementations backed by PostgreSQL:
//! - **PostgresTenderStore** - tender revision history
//! - **PostgresBidStore** - bid revision history
//! - **PostgresDecisionStore** - decision log and the transactional quorum cascade
//! - **PostgresReviewStore** - bid review append log
//! - **PostgresPrincipalDirectory** - employee / organization lookups
//!
//! ## In-Memory Repositories
//!
//! Lightweight implementations for testing and development:
//! - **InMemoryVersionStore** - revision history for any `Revisioned` aggregate
//! - **InMemoryDecisionStore** / **InMemoryReviewStore** - append-only logs
//! - **InMemoryPrincipalDirectory** - scripted identities and memberships

pub mod memory;
pub mod postgres_bid;
pub mod postgres_decision;
pub mod postgres_principal;
pub mod postgres_review;
pub mod postgres_tender;

pub use memory::{
    InMemoryDecisionStore, InMemoryPrincipalDirectory, InMemoryReviewStore, InMemoryVersionStore,
};
pub use postgres_bid::PostgresBidStore;
pub use postgres_decision::PostgresDecisionStore;
pub use postgres_principal::PostgresPrincipalDirectory;
pub use postgres_review::PostgresReviewStore;
pub use postgres_tender::PostgresTenderStore;
