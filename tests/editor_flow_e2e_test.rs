// ==========================================
// 检验流程端到端测试
// ==========================================
// 场景: 新建采购单 → 填写工单 → 四关拍照确认 → 提交 → 回到目录
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use helpers::test_data_builder::OrderBuilder;
use inspection_tracker::api::{ApiError, DeleteOutcome, NavOutcome, OrderFilter, SubmitOutcome};
use inspection_tracker::domain::types::{InspectionResult, PoStatus, ShipTo};
use inspection_tracker::domain::work_order::WorkOrderField;
use inspection_tracker::engine::SyncOutcome;
use inspection_tracker::OrderEditor;

async fn pass_all_steps(editor: &mut OrderEditor) {
    for step in 0..4 {
        editor
            .upload_photo(&format!("step-{}.jpg", step + 1), vec![0xFF, 0xD8])
            .await
            .unwrap();
        if step < 3 {
            assert_eq!(
                editor.next_step().unwrap(),
                NavOutcome::Moved { step_index: step + 1 }
            );
        }
    }
}

#[tokio::test]
async fn test_full_inspection_flow_to_submitted() {
    let env = ApiTestEnv::new().await.unwrap();
    let dir = env.state.directory.clone();

    let created = dir.create("po-e2e", ShipTo::Asgus6).await.unwrap();
    assert!(created.outcome.is_confirmed());

    let mut editor = env.state.open_order("PO-E2E").await.unwrap();
    editor
        .update_field(0, WorkOrderField::CustomerId, "C-123")
        .await
        .unwrap();
    editor
        .update_field(0, WorkOrderField::InspectDate, "2024-06-30")
        .await
        .unwrap();
    editor
        .update_field(0, WorkOrderField::Result, "FAIL")
        .await
        .unwrap();
    pass_all_steps(&mut editor).await;

    let added = editor.add_work_order().await.unwrap();
    assert_eq!(added.wo_id, "WO-02");
    pass_all_steps(&mut editor).await;

    let view = editor.view().unwrap();
    assert_eq!(view.progress_percent, 100);
    assert!(view.is_last_step && view.can_advance);

    let outcome = editor.finish().await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Submitted(SyncOutcome::Synced));
    assert!(!editor.is_loaded());

    let stored = env.raw_orders.find_by_id("PO-E2E").await.unwrap().unwrap();
    assert_eq!(stored.status, PoStatus::Submitted);
    assert_eq!(stored.updated_by, TEST_UID);
    assert_eq!(stored.work_orders.len(), 2);
    assert_eq!(stored.work_orders[0].customer_id, "C-123");
    assert_eq!(stored.work_orders[0].inspect_date, "2024/06/30");
    assert_eq!(stored.work_orders[0].result, InspectionResult::Fail);
    assert!(stored
        .work_orders
        .iter()
        .flat_map(|wo| wo.steps.iter())
        .all(|s| s.is_complete() && !s.is_uploading));

    // 目录经实时推送更新为已提交
    assert!(
        wait_until(|| dir
            .find("PO-E2E")
            .ok()
            .flatten()
            .is_some_and(|s| s.status == PoStatus::Submitted))
        .await
    );

    // 重新打开: 只读浏览
    let mut editor = env.state.open_order("PO-E2E").await.unwrap();
    assert!(editor.view().unwrap().read_only);
    assert!(matches!(
        editor.update_remarks(0, 0, "x").await,
        Err(ApiError::OrderSubmitted(_))
    ));
    assert_eq!(editor.submit().await.unwrap(), SubmitOutcome::AlreadySubmitted);
}

#[tokio::test]
async fn test_progress_for_partially_inspected_order() {
    let env = ApiTestEnv::new().await.unwrap();
    env.seed_order(
        "PO-HALF",
        &OrderBuilder::new().work_orders(4).completed_steps(&[4, 4, 2]).build(),
    )
    .await;
    env.state.directory.refresh().await.unwrap();

    let summary = env.state.directory.find("PO-HALF").unwrap().unwrap();
    assert_eq!(summary.completed_work_orders, 2);
    assert_eq!(summary.total_work_orders, 4);
    assert_eq!(summary.progress_percent(), 50);

    let mut editor = env.state.open_order("PO-HALF").await.unwrap();
    assert_eq!(
        editor.submit().await.unwrap(),
        SubmitOutcome::Incomplete { completed: 2, total: 4 }
    );
    let progress = editor.work_order_progress().unwrap();
    let done: Vec<usize> = progress.iter().map(|p| p.completed_steps).collect();
    assert_eq!(done, vec![4, 4, 2, 0]);
}

#[tokio::test]
async fn test_deleting_only_work_order_removes_order() {
    let env = ApiTestEnv::new().await.unwrap();
    let dir = env.state.directory.clone();
    dir.create("PO-1", ShipTo::As5645).await.unwrap();

    let mut editor = env.state.open_order("PO-1").await.unwrap();
    let outcome = editor.delete_work_order(0).await.unwrap();
    assert_eq!(
        outcome,
        DeleteOutcome::OrderDeleted {
            po_id: "PO-1".to_string()
        }
    );
    assert!(!editor.is_loaded());

    assert!(env.raw_orders.find_by_id("PO-1").await.unwrap().is_none());
    assert!(wait_until(|| dir.list(&OrderFilter::default()).is_ok_and(|l| l.is_empty())).await);
}

#[tokio::test]
async fn test_edits_without_identity_stay_local() {
    let env = ApiTestEnv::with_options(EnvOptions {
        auth_token: None,
        ..EnvOptions::default()
    })
    .await
    .unwrap();
    env.seed_order("PO-LOCAL", &OrderBuilder::new().build()).await;

    let mut editor = env.state.open_order("PO-LOCAL").await.unwrap();
    let outcome = editor
        .update_field(0, WorkOrderField::Size, "XL")
        .await
        .unwrap();
    assert!(matches!(outcome, SyncOutcome::Skipped(_)));
    assert_eq!(editor.document().unwrap().work_orders[0].size, "XL");

    let stored = env.raw_orders.find_by_id("PO-LOCAL").await.unwrap().unwrap();
    assert_eq!(stored.work_orders[0].size, "");
}

#[tokio::test]
async fn test_failed_push_keeps_local_edit() {
    let env = ApiTestEnv::with_options(EnvOptions {
        store_mode: StoreMode::Failing,
        ..EnvOptions::default()
    })
    .await
    .unwrap();
    env.seed_order("PO-OFF", &OrderBuilder::new().build()).await;

    let mut editor = env.state.open_order("PO-OFF").await.unwrap();
    let outcome = editor.update_remarks(0, 0, "離線備註").await.unwrap();
    assert!(matches!(outcome, SyncOutcome::Failed(_)));
    assert_eq!(editor.document().unwrap().work_orders[0].steps[0].remarks, "離線備註");
}

#[tokio::test]
async fn test_remote_edit_reaches_open_editor() {
    let env = ApiTestEnv::new().await.unwrap();
    env.seed_order("PO-SHARED", &OrderBuilder::new().build()).await;

    let mut editor = env.state.open_order("PO-SHARED").await.unwrap();
    let mut remote = OrderBuilder::new().build();
    remote.work_orders[0].color = "Navy".to_string();
    env.seed_order("PO-SHARED", &remote).await;

    assert_eq!(editor.sync_remote_updates(), 1);
    assert_eq!(editor.document().unwrap().work_orders[0].color, "Navy");
}
