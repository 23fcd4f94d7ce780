// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shared fixture wiring the workflows over in-memory repositories.

use std::sync::Arc;

use chrono::Utc;

use procura_core::application::{BidWorkflow, IdentityGate, ReviewWorkflow, TenderWorkflow};
use procura_core::bid::{Bid, BidDraft, BidStatus};
use procura_core::infrastructure::repositories::{
    InMemoryDecisionStore, InMemoryPrincipalDirectory, InMemoryReviewStore, InMemoryVersionStore,
};
use procura_core::principal::{OrganizationId, Principal, PrincipalId};
use procura_core::tender::{ServiceType, Tender, TenderDraft, TenderStatus};

pub struct World {
    pub directory: InMemoryPrincipalDirectory,
    pub decisions: Arc<InMemoryDecisionStore>,
    pub tenders: Arc<TenderWorkflow>,
    pub bids: Arc<BidWorkflow>,
    pub reviews: ReviewWorkflow,
}

impl World {
    pub fn new() -> Self {
        let directory = InMemoryPrincipalDirectory::new();
        let identity = IdentityGate::new(Arc::new(directory.clone()));

        let tender_store = Arc::new(InMemoryVersionStore::<Tender>::new());
        let bid_store = Arc::new(InMemoryVersionStore::<Bid>::new());
        let decisions = Arc::new(InMemoryDecisionStore::new(
            bid_store.clone(),
            tender_store.clone(),
        ));
        let reviews = Arc::new(InMemoryReviewStore::new(bid_store.clone()));

        let tenders = Arc::new(TenderWorkflow::new(tender_store, identity.clone()));
        let bids = Arc::new(BidWorkflow::new(
            bid_store,
            decisions.clone(),
            tenders.clone(),
            identity.clone(),
        ));
        let reviews = ReviewWorkflow::new(reviews, bids.clone(), tenders.clone(), identity);

        Self {
            directory,
            decisions,
            tenders,
            bids,
            reviews,
        }
    }

    pub fn principal(&self, username: &str) -> Principal {
        let principal = Principal {
            id: PrincipalId::new(),
            username: username.to_string(),
            first_name: None,
            last_name: None,
            created_at: Utc::now(),
        };
        self.directory.add_principal(principal.clone());
        principal
    }

    pub fn employee(&self, username: &str, organization_id: OrganizationId) -> Principal {
        let principal = Principal {
            id: PrincipalId::new(),
            username: username.to_string(),
            first_name: None,
            last_name: None,
            created_at: Utc::now(),
        };
        self.directory.add_employee(principal.clone(), organization_id);
        principal
    }

    pub async fn published_tender(&self, username: &str, organization_id: OrganizationId) -> Tender {
        let tender = self
            .tenders
            .create(
                username,
                TenderDraft {
                    name: "Warehouse build".to_string(),
                    description: "New warehouse in the north district".to_string(),
                    service_type: ServiceType::Construction,
                    organization_id,
                },
            )
            .await
            .unwrap();
        self.tenders
            .update_status(username, tender.id, TenderStatus::Published)
            .await
            .unwrap()
    }

    pub async fn published_bid(&self, username: &str, tender: &Tender) -> Bid {
        let bid = self
            .bids
            .create(
                username,
                BidDraft {
                    name: "Competitive offer".to_string(),
                    description: "We can start next month".to_string(),
                    tender_id: tender.id,
                    organization_id: None,
                },
            )
            .await
            .unwrap();
        self.bids
            .update_status(username, bid.id, BidStatus::Published)
            .await
            .unwrap()
    }
}
