// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Revision-history behavior of the versioned store as seen through the
//! tender workflow: edits append, status writes do not, rollbacks append a
//! copy of a historical revision.

mod common;

use common::World;
use procura_core::application::WorkflowError;
use procura_core::principal::OrganizationId;
use procura_core::tender::{TenderDraft, TenderPatch, TenderStatus};

#[tokio::test]
async fn test_create_starts_at_version_one() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);

    let tender = world
        .tenders
        .create(
            "alice",
            TenderDraft {
                name: "Bridge repair".to_string(),
                description: "South bridge".to_string(),
                service_type: procura_core::tender::ServiceType::Construction,
                organization_id: org,
            },
        )
        .await
        .unwrap();

    assert_eq!(tender.version, 1);
    assert_eq!(tender.status, TenderStatus::Created);
}

#[tokio::test]
async fn test_edit_appends_new_version() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    let tender = world.published_tender("alice", org).await;
    assert_eq!(tender.version, 1);

    let edited = world
        .tenders
        .update(
            "alice",
            tender.id,
            TenderPatch {
                name: Some("Warehouse build, phase 2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.version, 2);
    assert_eq!(edited.name, "Warehouse build, phase 2");
    // untouched fields carry over
    assert_eq!(edited.description, tender.description);
}

#[tokio::test]
async fn test_status_change_does_not_mint_version() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);

    let tender = world
        .tenders
        .create(
            "alice",
            TenderDraft {
                name: "Fleet delivery".to_string(),
                description: String::new(),
                service_type: procura_core::tender::ServiceType::Delivery,
                organization_id: org,
            },
        )
        .await
        .unwrap();

    let published = world
        .tenders
        .update_status("alice", tender.id, TenderStatus::Published)
        .await
        .unwrap();

    assert_eq!(published.version, 1);
    assert_eq!(published.status, TenderStatus::Published);
}

#[tokio::test]
async fn test_rollback_appends_copy_of_old_revision() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    let tender = world.published_tender("alice", org).await;

    world
        .tenders
        .update(
            "alice",
            tender.id,
            TenderPatch {
                name: Some("Renamed once".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    world
        .tenders
        .update(
            "alice",
            tender.id,
            TenderPatch {
                name: Some("Renamed twice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let rolled = world.tenders.rollback("alice", tender.id, 1).await.unwrap();

    // a rollback is an append, not a revert
    assert_eq!(rolled.version, 4);
    assert_eq!(rolled.name, tender.name);

    let current = world.tenders.get_by_id(tender.id).await.unwrap();
    assert_eq!(current.version, 4);
    assert_eq!(current.name, tender.name);
}

#[tokio::test]
async fn test_rollback_to_missing_version_is_not_exist() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    let tender = world.published_tender("alice", org).await;

    let err = world
        .tenders
        .rollback("alice", tender.id, 7)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotExist(_)));
}

#[tokio::test]
async fn test_rollback_to_non_positive_version_is_invalid() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    let tender = world.published_tender("alice", org).await;

    let err = world
        .tenders
        .rollback("alice", tender.id, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));
}

#[tokio::test]
async fn test_edit_after_rollback_continues_version_sequence() {
    let world = World::new();
    let org = OrganizationId::new();
    world.employee("alice", org);
    let tender = world.published_tender("alice", org).await;

    world
        .tenders
        .update(
            "alice",
            tender.id,
            TenderPatch {
                description: Some("Updated scope".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let rolled = world.tenders.rollback("alice", tender.id, 1).await.unwrap();
    assert_eq!(rolled.version, 3);

    let edited = world
        .tenders
        .update(
            "alice",
            tender.id,
            TenderPatch {
                name: Some("Final name".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.version, 4);
}
