// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod error;
pub mod identity;
pub mod tender;
pub mod bid;
pub mod review;

// Re-export the workflow surface for convenience
pub use error::{WorkflowError, WorkflowResult};
pub use identity::IdentityGate;
pub use tender::TenderWorkflow;
pub use bid::BidWorkflow;
pub use review::ReviewWorkflow;
