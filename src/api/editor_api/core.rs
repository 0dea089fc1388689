use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::order::{normalize_po_id, OrderDocument, PurchaseOrder};
use crate::domain::step::{InspectionStep, STEPS_PER_WORK_ORDER};
use crate::domain::types::{PoStatus, ShipTo};
use crate::domain::work_order::WorkOrder;
use crate::engine::{PhotoCapture, SyncGateway, SyncOutcome};
use crate::i18n::t;
use crate::repository::{DocumentChange, OrderChange};

// ==========================================
// OrderEditor - 采购单编辑器
// ==========================================
// 同一时间只编辑一张采购单
pub struct OrderEditor {
    pub(super) gateway: SyncGateway,
    pub(super) photos: Arc<dyn PhotoCapture>,
    pub(super) photo_implies_pass: bool,
    pub(super) loaded: Option<LoadedOrder>,
}

/// 已载入的采购单及导航位置
pub(super) struct LoadedOrder {
    pub(super) po_id: String,
    pub(super) document: OrderDocument,
    pub(super) active_wo: usize,
    pub(super) active_step: usize,
    pub(super) changes: broadcast::Receiver<DocumentChange>,
}

impl LoadedOrder {
    pub(super) fn active_work_order(&self) -> Option<&WorkOrder> {
        self.document.work_orders.get(self.active_wo)
    }

    pub(super) fn active_step(&self) -> Option<&InspectionStep> {
        self.active_work_order()
            .and_then(|wo| wo.steps.get(self.active_step))
    }

    pub(super) fn check_wo(&self, wo_index: usize) -> ApiResult<()> {
        let len = self.document.work_orders.len();
        if wo_index >= len {
            return Err(ApiError::IndexOutOfRange {
                what: "wo_index",
                index: wo_index,
                len,
            });
        }
        Ok(())
    }

    pub(super) fn check_step(&self, wo_index: usize, step_index: usize) -> ApiResult<()> {
        self.check_wo(wo_index)?;
        let len = self.document.work_orders[wo_index].steps.len();
        if step_index >= len {
            return Err(ApiError::IndexOutOfRange {
                what: "step_index",
                index: step_index,
                len,
            });
        }
        Ok(())
    }

    /// 远端快照整体覆盖本地
    ///
    /// 本地上传中标记按 (工单标签, 关卡序号) 保留;工单计数器取较大值
    fn apply_remote(&mut self, remote: OrderDocument) {
        let uploading: Vec<(String, usize)> = self
            .document
            .work_orders
            .iter()
            .flat_map(|wo| {
                wo.steps
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.is_uploading)
                    .map(move |(i, _)| (wo.wo_id.clone(), i))
            })
            .collect();
        let local_seq = self.document.next_wo_seq;

        self.document = remote;
        self.document.next_wo_seq = self.document.next_wo_seq.max(local_seq);

        for (wo_id, step_index) in uploading {
            if let Some(step) = self
                .document
                .work_orders
                .iter_mut()
                .find(|wo| wo.wo_id == wo_id)
                .and_then(|wo| wo.steps.get_mut(step_index))
            {
                step.is_uploading = true;
            }
        }

        let len = self.document.work_orders.len();
        if self.active_wo >= len {
            self.active_wo = len.saturating_sub(1);
            self.active_step = 0;
        }
    }
}

// ==========================================
// 视图模型
// ==========================================

/// 侧栏中单张工单的进度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderProgress {
    pub wo_id: String,
    pub completed_steps: usize,
    pub total_steps: usize,
    pub is_complete: bool,
}

/// 编辑器当前画面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    pub po_id: String,
    pub status: PoStatus,
    pub read_only: bool,
    pub ship_to: ShipTo,
    pub active_wo_index: usize,
    pub active_step_index: usize,
    pub work_order: Option<WorkOrder>,
    pub step: Option<InspectionStep>,
    pub sidebar: Vec<WorkOrderProgress>,
    pub completed_work_orders: usize,
    pub progress_percent: u32,
    /// 当前关卡已完成,可进入下一关卡/完成
    pub can_advance: bool,
    pub is_last_step: bool,
    pub back_label: String,
    /// 前进按钮文字（最后一关为完成按钮）
    pub next_label: String,
    pub finish_label: String,
    /// 无法前进时的提示
    pub gate_reason: Option<String>,
    /// 只读提示
    pub notice: Option<String>,
}

impl OrderEditor {
    pub fn new(gateway: SyncGateway, photos: Arc<dyn PhotoCapture>, photo_implies_pass: bool) -> Self {
        Self {
            gateway,
            photos,
            photo_implies_pass,
            loaded: None,
        }
    }

    // ==========================================
    // 载入与关闭
    // ==========================================

    /// 载入采购单并订阅其变更
    pub async fn load(&mut self, po_id: &str) -> ApiResult<()> {
        let po_id = normalize_po_id(po_id);
        let po_id = po_id.as_str();
        if po_id.is_empty() {
            return Err(ApiError::InvalidInput("采购单号不能为空".to_string()));
        }

        // 先订阅再读取,避免遗漏读取期间的变更
        let changes = self.gateway.orders().subscribe();
        let document = self
            .gateway
            .orders()
            .find_by_id(po_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("采购单(id={})不存在", po_id)))?;

        tracing::info!(po_id, work_orders = document.work_orders.len(), "采购单已载入");
        self.install(po_id.to_string(), document, changes);
        Ok(())
    }

    /// 直接打开本地已有的采购单（新建后远端未确认时使用）
    pub fn adopt(&mut self, order: PurchaseOrder) {
        let changes = self.gateway.orders().subscribe();
        tracing::info!(po_id = %order.id, "采购单以本地快照打开");
        self.install(order.id, order.document, changes);
    }

    fn install(&mut self, po_id: String, document: OrderDocument, changes: broadcast::Receiver<DocumentChange>) {
        self.loaded = Some(LoadedOrder {
            po_id,
            document,
            active_wo: 0,
            active_step: 0,
            changes,
        });
    }

    /// 关闭编辑器（回到目录）
    pub fn close(&mut self) {
        if let Some(order) = self.loaded.take() {
            tracing::debug!(po_id = %order.po_id, "编辑器已关闭");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn current_po_id(&self) -> Option<&str> {
        self.loaded.as_ref().map(|o| o.po_id.as_str())
    }

    /// 当前内存快照
    pub fn document(&self) -> Option<&OrderDocument> {
        self.loaded.as_ref().map(|o| &o.document)
    }

    /// 当前 (工单, 关卡) 位置
    pub fn active_position(&self) -> ApiResult<(usize, usize)> {
        let order = self.order()?;
        Ok((order.active_wo, order.active_step))
    }

    // ==========================================
    // 远端推送
    // ==========================================

    /// 处理积压的远端变更
    ///
    /// 本单被远端删除时编辑器关闭
    ///
    /// # 返回
    /// 已应用的远端快照数
    pub fn sync_remote_updates(&mut self) -> usize {
        let Some(order) = self.loaded.as_mut() else {
            return 0;
        };
        let orders = self.gateway.orders();

        let mut applied = 0;
        let mut removed = false;
        loop {
            match order.changes.try_recv() {
                Ok(change) => match orders.decode_change(change) {
                    Some(OrderChange::Upserted(po)) if po.id == order.po_id => {
                        order.apply_remote(po.document);
                        applied += 1;
                    }
                    Some(OrderChange::Removed(id)) if id == order.po_id => {
                        removed = true;
                        break;
                    }
                    _ => {}
                },
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(po_id = %order.po_id, skipped, "远端推送积压,部分消息已丢弃");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        if removed {
            tracing::warn!(po_id = %order.po_id, "采购单已被远端删除,编辑器关闭");
            self.loaded = None;
        }
        applied
    }

    // ==========================================
    // 视图
    // ==========================================

    /// 侧栏各工单完成关卡数
    pub fn work_order_progress(&self) -> ApiResult<Vec<WorkOrderProgress>> {
        let order = self.order()?;
        Ok(order
            .document
            .work_orders
            .iter()
            .map(|wo| WorkOrderProgress {
                wo_id: wo.wo_id.clone(),
                completed_steps: wo.completed_steps(),
                total_steps: wo.steps.len(),
                is_complete: wo.is_complete(),
            })
            .collect())
    }

    pub fn view(&self) -> ApiResult<EditorView> {
        let order = self.order()?;
        let read_only = order.document.status.is_read_only();
        let can_advance = order.active_step().is_some_and(|s| s.is_complete());
        let is_last_step = order.active_step + 1 == STEPS_PER_WORK_ORDER;
        let finish_label = if read_only {
            t("editor.finish_view_done")
        } else {
            t("editor.finish_save")
        };
        let gate_reason = if can_advance {
            None
        } else if order.active_step().is_some_and(|s| s.has_photo()) {
            Some(t("editor.step_gate"))
        } else {
            Some(t("editor.photo_required"))
        };

        Ok(EditorView {
            po_id: order.po_id.clone(),
            status: order.document.status,
            read_only,
            ship_to: order.document.ship_to,
            active_wo_index: order.active_wo,
            active_step_index: order.active_step,
            work_order: order.active_work_order().cloned(),
            step: order.active_step().cloned(),
            sidebar: self.work_order_progress()?,
            completed_work_orders: order.document.completed_work_orders(),
            progress_percent: order.document.progress_percent(),
            can_advance,
            is_last_step,
            back_label: if order.active_step == 0 {
                t("editor.back_exit")
            } else {
                t("editor.back_previous")
            },
            next_label: if is_last_step {
                finish_label.clone()
            } else {
                t("editor.next_step")
            },
            finish_label,
            gate_reason,
            notice: read_only.then(|| t("editor.submitted_read_only")),
        })
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    pub(super) fn order(&self) -> ApiResult<&LoadedOrder> {
        self.loaded.as_ref().ok_or(ApiError::OrderNotLoaded)
    }

    pub(super) fn order_mut(&mut self) -> ApiResult<&mut LoadedOrder> {
        self.loaded.as_mut().ok_or(ApiError::OrderNotLoaded)
    }

    /// 可编辑的采购单（已提交则拒绝）
    pub(super) fn editable_mut(&mut self) -> ApiResult<&mut LoadedOrder> {
        let order = self.order_mut()?;
        if order.document.status.is_read_only() {
            return Err(ApiError::OrderSubmitted(order.po_id.clone()));
        }
        Ok(order)
    }

    /// 推送当前快照
    pub(super) async fn push(&self) -> SyncOutcome {
        match self.loaded.as_ref() {
            Some(order) => self.gateway.push_snapshot(&order.po_id, &order.document).await,
            None => SyncOutcome::Skipped("尚未载入采购单".to_string()),
        }
    }
}
