// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Authorization, validation and pagination rules across the tender and bid
//! workflows.

mod common;

use common::World;
use procura_core::application::WorkflowError;
use procura_core::bid::{BidDraft, BidPatch, BidStatus};
use procura_core::principal::OrganizationId;
use procura_core::tender::{ServiceType, TenderDraft, TenderId, TenderStatus};

fn draft(org: OrganizationId) -> TenderDraft {
    TenderDraft {
        name: "Crane rental".to_string(),
        description: "Six months".to_string(),
        service_type: ServiceType::Manufacture,
        organization_id: org,
    }
}

#[tokio::test]
async fn test_unknown_username_is_unauthenticated() {
    let world = World::new();
    let org = OrganizationId::new();

    let err = world.tenders.create("ghost", draft(org)).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Unauthenticated));
}

#[tokio::test]
async fn test_non_employee_cannot_create_tender() {
    let world = World::new();
    let org = OrganizationId::new();
    world.principal("frank");

    let err = world.tenders.create("frank", draft(org)).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
}

#[tokio::test]
async fn test_tender_name_length_is_validated() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);

    let mut long = draft(org);
    long.name = "x".repeat(101);
    let err = world.tenders.create("alice", long).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));

    let mut edge = draft(org);
    edge.name = "x".repeat(100);
    assert!(world.tenders.create("alice", edge).await.is_ok());
}

#[tokio::test]
async fn test_unpublished_tender_status_is_org_only() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    world.principal("frank");

    let tender = world.tenders.create("alice", draft(org)).await.unwrap();

    let err = world
        .tenders
        .get_status("frank", tender.id)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));

    assert_eq!(
        world.tenders.get_status("alice", tender.id).await.unwrap(),
        TenderStatus::Created
    );

    world
        .tenders
        .update_status("alice", tender.id, TenderStatus::Published)
        .await
        .unwrap();
    assert_eq!(
        world.tenders.get_status("frank", tender.id).await.unwrap(),
        TenderStatus::Published
    );
}

#[tokio::test]
async fn test_missing_tender_is_not_exist() {
    let world = World::new();
    world.principal("frank");

    let err = world
        .tenders
        .get_status("frank", TenderId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotExist(_)));
}

#[tokio::test]
async fn test_list_published_filters_by_service_type() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);

    world.published_tender("alice", org).await; // Construction
    let manufacture = world.tenders.create("alice", draft(org)).await.unwrap();
    world
        .tenders
        .update_status("alice", manufacture.id, TenderStatus::Published)
        .await
        .unwrap();
    // a Created tender must never show up
    world.tenders.create("alice", draft(org)).await.unwrap();

    let all = world.tenders.list_by_service_type(&[], 0, 0).await.unwrap();
    assert_eq!(all.len(), 2);

    let filtered = world
        .tenders
        .list_by_service_type(&[ServiceType::Manufacture], 0, 0)
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, manufacture.id);
}

#[tokio::test]
async fn test_pagination_limits() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);

    for i in 0..7 {
        let mut d = draft(org);
        d.name = format!("Tender {i}");
        let t = world.tenders.create("alice", d).await.unwrap();
        world
            .tenders
            .update_status("alice", t.id, TenderStatus::Published)
            .await
            .unwrap();
    }

    // limit 0 falls back to the default page size of 5
    let page = world.tenders.list_by_service_type(&[], 0, 0).await.unwrap();
    assert_eq!(page.len(), 5);

    let rest = world.tenders.list_by_service_type(&[], 0, 5).await.unwrap();
    assert_eq!(rest.len(), 2);

    let err = world
        .tenders
        .list_by_service_type(&[], 101, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));

    let err = world
        .tenders
        .list_by_service_type(&[], -1, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));

    let err = world
        .tenders
        .list_by_service_type(&[], 5, -1)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));
}

#[tokio::test]
async fn test_bid_requires_published_tender() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    world.principal("frank");

    let tender = world.tenders.create("alice", draft(org)).await.unwrap();
    let err = world
        .bids
        .create(
            "frank",
            BidDraft {
                name: "Too early".to_string(),
                description: String::new(),
                tender_id: tender.id,
                organization_id: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));
}

#[tokio::test]
async fn test_only_author_can_edit_bid() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    world.principal("frank");
    world.principal("mallory");

    let tender = world.published_tender("alice", org).await;
    let bid = world.published_bid("frank", &tender).await;

    let err = world
        .bids
        .update(
            "mallory",
            bid.id,
            BidPatch {
                name: Some("Hijacked".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
}

#[tokio::test]
async fn test_org_bid_is_editable_by_any_org_employee() {
    let world = World::new();
    let tender_org = OrganizationId::new();
    let bidder_org = OrganizationId::new();
    world.employee("alice", tender_org);
    world.employee("bob", bidder_org);
    world.employee("carol", bidder_org);

    let tender = world.published_tender("alice", tender_org).await;
    let bid = world
        .bids
        .create(
            "bob",
            BidDraft {
                name: "Org offer".to_string(),
                description: String::new(),
                tender_id: tender.id,
                organization_id: Some(bidder_org),
            },
        )
        .await
        .unwrap();

    // carol never touched the bid but shares bob's organization
    let edited = world
        .bids
        .update(
            "carol",
            bid.id,
            BidPatch {
                description: Some("Revised terms".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.version, 2);
}

#[tokio::test]
async fn test_settled_bid_is_immutable() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    world.principal("frank");

    let tender = world.published_tender("alice", org).await;
    let bid = world.published_bid("frank", &tender).await;
    world
        .bids
        .submit_decision("alice", bid.id, procura_core::bid::DecisionKind::Rejected)
        .await
        .unwrap();

    let err = world
        .bids
        .update(
            "frank",
            bid.id,
            BidPatch {
                name: Some("One more try".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));

    let err = world
        .bids
        .update_status("frank", bid.id, BidStatus::Canceled)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));

    let err = world.bids.rollback("frank", bid.id, 1).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));
}

#[tokio::test]
async fn test_terminal_statuses_rejected_by_update_status() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    world.principal("frank");

    let tender = world.published_tender("alice", org).await;
    let bid = world.published_bid("frank", &tender).await;

    let err = world
        .bids
        .update_status("frank", bid.id, BidStatus::Approved)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));
}

#[tokio::test]
async fn test_bid_status_readable_by_any_principal() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    world.principal("frank");
    world.principal("grace");

    let tender = world.published_tender("alice", org).await;
    let bid = world.published_bid("frank", &tender).await;

    assert_eq!(
        world.bids.get_status("grace", bid.id).await.unwrap(),
        BidStatus::Published
    );

    let mine = world.bids.get_by_creator("frank", 0, 0).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, bid.id);
    assert!(world
        .bids
        .get_by_creator("grace", 0, 0)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_bid_listing_by_tender_hides_drafts() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    world.principal("frank");
    world.principal("grace");

    let tender = world.published_tender("alice", org).await;
    world.published_bid("frank", &tender).await;
    // grace never publishes hers
    world
        .bids
        .create(
            "grace",
            BidDraft {
                name: "Private draft".to_string(),
                description: String::new(),
                tender_id: tender.id,
                organization_id: None,
            },
        )
        .await
        .unwrap();

    let visible = world
        .bids
        .get_by_tender("alice", tender.id, 0, 0)
        .await
        .unwrap();
    assert_eq!(visible.len(), 1);

    // outsiders cannot list a tender's bids at all
    let err = world
        .bids
        .get_by_tender("frank", tender.id, 0, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
}
