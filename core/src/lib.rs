// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Procura Core
//!
//! Versioned tender/bid records and the quorum decision workflow.
//!
//! # Architecture
//!
//! - **domain** — entities, the revision contract, repository interfaces
//! - **application** — workflow services (authorization, validation, quorum)
//! - **infrastructure** — PostgreSQL and in-memory repository implementations

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
