// ==========================================
// OrderDirectory 集成测试
// ==========================================
// 测试范围:
// 1. 新建采购单: 确认 / 超时 / 远端失败 / 重复 / 非法单号
// 2. 目录筛选与排序
// 3. 实时推送更新目录
// ==========================================

mod helpers;

use std::time::Duration;

use helpers::api_test_helper::*;
use helpers::test_data_builder::OrderBuilder;
use inspection_tracker::api::{ApiError, CreateOutcome, OrderFilter};
use inspection_tracker::config::config_keys;
use inspection_tracker::domain::types::{PoStatus, ShipTo};

// ==========================================
// 新建采购单
// ==========================================

#[tokio::test]
async fn test_create_order_confirmed() {
    let env = ApiTestEnv::new().await.unwrap();

    let created = env
        .state
        .directory
        .create("  test-po ", ShipTo::As5645)
        .await
        .unwrap();
    assert_eq!(created.outcome, CreateOutcome::Confirmed);
    assert_eq!(created.order.id, "TEST-PO");

    let doc = &created.order.document;
    assert_eq!(doc.status, PoStatus::Draft);
    assert_eq!(doc.ship_to, ShipTo::As5645);
    assert_eq!(doc.work_orders.len(), 1);
    assert_eq!(doc.work_orders[0].wo_id, "WO-01");
    assert!(doc.work_orders[0].steps.iter().all(|s| !s.checked && s.photo_url.is_none()));

    let stored = env.raw_orders.find_by_id("TEST-PO").await.unwrap().unwrap();
    assert_eq!(stored.updated_by, TEST_UID);

    let listed = env.state.directory.list(&OrderFilter::default()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "TEST-PO");
}

#[tokio::test]
async fn test_create_order_assumed_after_timeout() {
    let env = ApiTestEnv::with_options(EnvOptions {
        store_mode: StoreMode::Slow(Duration::from_millis(300)),
        config: vec![(config_keys::CREATE_TIMEOUT_MS, "50".to_string())],
        ..EnvOptions::default()
    })
    .await
    .unwrap();

    let created = env
        .state
        .directory
        .create("PO-SLOW", ShipTo::Tg0075)
        .await
        .unwrap();
    assert!(matches!(created.outcome, CreateOutcome::Assumed { .. }));

    // 本地列表立即可见
    assert!(env.state.directory.find("PO-SLOW").unwrap().is_some());

    // 超时后写入仍会完成
    tokio::time::sleep(Duration::from_millis(500)).await;
    let stored = env.raw_orders.find_by_id("PO-SLOW").await.unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn test_create_order_assumed_when_remote_fails() {
    let env = ApiTestEnv::with_options(EnvOptions {
        store_mode: StoreMode::Failing,
        ..EnvOptions::default()
    })
    .await
    .unwrap();

    let created = env
        .state
        .directory
        .create("PO-OFFLINE", ShipTo::As5752)
        .await
        .unwrap();
    match created.outcome {
        CreateOutcome::Assumed { reason } => assert!(!reason.is_empty()),
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert!(env.state.directory.find("PO-OFFLINE").unwrap().is_some());
    assert!(env.raw_orders.find_by_id("PO-OFFLINE").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_duplicate_order_rejected() {
    let env = ApiTestEnv::new().await.unwrap();
    env.state.directory.create("PO-1", ShipTo::As5645).await.unwrap();

    let result = env.state.directory.create("po-1", ShipTo::Tg0083).await;
    assert!(matches!(result, Err(ApiError::AlreadyExists(id)) if id == "PO-1"));

    let stored = env.raw_orders.find_by_id("PO-1").await.unwrap().unwrap();
    assert_eq!(stored.ship_to, ShipTo::As5645);
}

#[tokio::test]
async fn test_create_rejects_invalid_ids() {
    let env = ApiTestEnv::new().await.unwrap();
    for raw in ["", "   ", "A/B"] {
        let result = env.state.directory.create(raw, ShipTo::As5645).await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))), "id {:?}", raw);
    }
    assert!(env.state.directory.list(&OrderFilter::default()).unwrap().is_empty());
}

#[tokio::test]
async fn test_create_without_identity_stamps_guest() {
    let env = ApiTestEnv::with_options(EnvOptions {
        auth_token: None,
        ..EnvOptions::default()
    })
    .await
    .unwrap();
    assert!(!env.state.session.is_signed_in());

    env.state.directory.create("PO-G", ShipTo::As5645).await.unwrap();
    let stored = env.raw_orders.find_by_id("PO-G").await.unwrap().unwrap();
    assert_eq!(stored.updated_by, "guest");
}

// ==========================================
// 筛选与排序
// ==========================================

async fn seeded_env() -> ApiTestEnv {
    let env = ApiTestEnv::new().await.unwrap();
    env.seed_order(
        "PO-100",
        &OrderBuilder::new()
            .created_at("2024-01-10T09:00:00.000Z")
            .ship_to(ShipTo::As5645)
            .build(),
    )
    .await;
    env.seed_order(
        "PO-200",
        &OrderBuilder::new()
            .created_at("2024-02-20T09:00:00.000Z")
            .ship_to(ShipTo::Tg0075)
            .work_orders(2)
            .completed_steps(&[4])
            .build(),
    )
    .await;
    env.seed_order(
        "XY-300",
        &OrderBuilder::new()
            .created_at("2024-03-05T09:00:00.000Z")
            .ship_to(ShipTo::As5645)
            .submitted()
            .build(),
    )
    .await;
    env.state.directory.refresh().await.unwrap();
    env
}

#[tokio::test]
async fn test_list_sorted_newest_first() {
    let env = seeded_env().await;
    let ids: Vec<String> = env
        .state
        .directory
        .list(&OrderFilter::default())
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["XY-300", "PO-200", "PO-100"]);
}

#[tokio::test]
async fn test_list_filters() {
    let env = seeded_env().await;
    let dir = &env.state.directory;

    let by_term = dir.list(&OrderFilter::search("po-")).unwrap();
    assert_eq!(by_term.len(), 2);

    // 日期区间两端包含
    let by_range = dir
        .list(&OrderFilter::default().with_range("2024-01-10", "2024-02-20"))
        .unwrap();
    let ids: Vec<&str> = by_range.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["PO-200", "PO-100"]);

    let by_ship_to = dir
        .list(&OrderFilter::default().with_ship_to(ShipTo::As5645))
        .unwrap();
    assert!(by_ship_to.iter().all(|s| s.ship_to == ShipTo::As5645));
    assert_eq!(by_ship_to.len(), 2);

    let combined = dir
        .list(&OrderFilter::search("PO").with_ship_to(ShipTo::Tg0075))
        .unwrap();
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0].id, "PO-200");
    assert_eq!(combined[0].progress_percent(), 50);
}

// ==========================================
// 实时推送
// ==========================================

#[tokio::test]
async fn test_live_updates_reach_directory() {
    let env = ApiTestEnv::new().await.unwrap();
    assert!(env.state.directory.is_loaded());

    env.seed_order("PO-LIVE", &OrderBuilder::new().build()).await;
    let dir = env.state.directory.clone();
    assert!(wait_until(|| dir.find("PO-LIVE").ok().flatten().is_some()).await);

    env.raw_orders.delete("PO-LIVE").await.unwrap();
    assert!(wait_until(|| dir.find("PO-LIVE").ok().flatten().is_none()).await);
}

#[tokio::test]
async fn test_delete_order_from_directory() {
    let env = seeded_env().await;
    env.state.directory.delete("PO-100").await.unwrap();

    assert!(env.state.directory.find("PO-100").unwrap().is_none());
    assert!(env.raw_orders.find_by_id("PO-100").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_normalizes_order_id() {
    let env = seeded_env().await;
    env.state.directory.delete("  po-100 ").await.unwrap();

    assert!(env.state.directory.find("PO-100").unwrap().is_none());
    assert!(env.raw_orders.find_by_id("PO-100").await.unwrap().is_none());
}
