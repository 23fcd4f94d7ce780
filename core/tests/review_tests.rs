// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Review append log: who may write, who may read, and the existence
//! checks on the listing path.

mod common;

use common::World;
use procura_core::application::WorkflowError;
use procura_core::principal::OrganizationId;

#[tokio::test]
async fn test_only_tender_org_employees_can_review() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    world.principal("frank");
    world.principal("mallory");

    let tender = world.published_tender("alice", org).await;
    let bid = world.published_bid("frank", &tender).await;

    let review = world
        .reviews
        .create_review("alice", bid.id, "Solid proposal".to_string())
        .await
        .unwrap();
    assert_eq!(review.bid_id, bid.id);

    let err = world
        .reviews
        .create_review("mallory", bid.id, "Drive-by".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
}

#[tokio::test]
async fn test_review_description_is_validated() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    world.principal("frank");

    let tender = world.published_tender("alice", org).await;
    let bid = world.published_bid("frank", &tender).await;

    let err = world
        .reviews
        .create_review("alice", bid.id, String::new())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));

    let err = world
        .reviews
        .create_review("alice", bid.id, "x".repeat(1001))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));
}

#[tokio::test]
async fn test_listing_collects_reviews_across_creator_bids() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    world.principal("frank");

    let tender = world.published_tender("alice", org).await;
    let bid = world.published_bid("frank", &tender).await;
    world
        .reviews
        .create_review("alice", bid.id, "First impression".to_string())
        .await
        .unwrap();
    world
        .reviews
        .create_review("alice", bid.id, "Second look".to_string())
        .await
        .unwrap();

    let reviews = world
        .reviews
        .list_by_bid_creator("alice", tender.id, "frank", 0, 0)
        .await
        .unwrap();
    assert_eq!(reviews.len(), 2);
    // oldest first
    assert_eq!(reviews[0].description, "First impression");
}

#[tokio::test]
async fn test_listing_requires_existing_creator_with_a_bid() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    world.principal("frank");
    world.principal("grace");

    let tender = world.published_tender("alice", org).await;
    world.published_bid("frank", &tender).await;

    let err = world
        .reviews
        .list_by_bid_creator("alice", tender.id, "nobody", 0, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotExist(_)));

    // grace exists but never bid on this tender
    let err = world
        .reviews
        .list_by_bid_creator("alice", tender.id, "grace", 0, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotExist(_)));
}

#[tokio::test]
async fn test_listing_is_gated_to_tender_org() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    world.principal("frank");

    let tender = world.published_tender("alice", org).await;
    world.published_bid("frank", &tender).await;

    let err = world
        .reviews
        .list_by_bid_creator("frank", tender.id, "frank", 0, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
}
