// ==========================================
// 出货检验追踪系统 - 采购单领域模型
// ==========================================
// 采购单 (PO) = 顶层检验任务,包含一张或多张工单
// 对齐: 文档 artifacts/{appId}/public/data/orders/{poId}
// ==========================================

use crate::domain::date_text;
use crate::domain::types::{PoStatus, ShipTo};
use crate::domain::work_order::WorkOrder;
use serde::{Deserialize, Serialize};

/// 规范化采购单号（去除首尾空白并转大写）
pub fn normalize_po_id(input: &str) -> String {
    input.trim().to_uppercase()
}

/// 按完成数计算进度百分比（四舍五入,无工单时为 0）
pub fn progress_percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

// ==========================================
// OrderDocument - 采购单文档（存储形态）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
    #[serde(default)]
    pub status: PoStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub updated_by: String,
    #[serde(default)]
    pub ship_to: ShipTo,
    #[serde(default)]
    pub work_orders: Vec<WorkOrder>,

    // 工单标签计数器（单调递增,删除工单不回退）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_wo_seq: Option<u32>,
}

impl OrderDocument {
    /// 创建新采购单的初始文档（含一张空白工单 WO-01）
    ///
    /// # 参数
    /// - `ship_to`: 出货地
    /// - `created_at`: 创建时间（ISO-8601）
    /// - `updated_by`: 创建人（无身份时为 "guest"）
    /// - `today`: 今天的存储形式日期
    pub fn new_initial(ship_to: ShipTo, created_at: String, updated_by: String, today: &str) -> Self {
        Self {
            status: PoStatus::Draft,
            created_at,
            updated_at: None,
            updated_by,
            ship_to,
            work_orders: vec![WorkOrder::new(1, today)],
            next_wo_seq: Some(2),
        }
    }

    /// 下一张工单的序号
    ///
    /// 旧文档没有计数器时按当前工单数推导
    pub fn next_seq(&self) -> u32 {
        self.next_wo_seq
            .unwrap_or(self.work_orders.len() as u32 + 1)
            .max(1)
    }

    /// 追加一张空白工单
    ///
    /// # 返回
    /// 新工单的索引
    pub fn append_work_order(&mut self, today: &str) -> usize {
        let seq = self.next_seq();
        self.work_orders.push(WorkOrder::new(seq, today));
        self.next_wo_seq = Some(seq + 1);
        self.work_orders.len() - 1
    }

    /// 已完成工单数
    pub fn completed_work_orders(&self) -> usize {
        self.work_orders.iter().filter(|wo| wo.is_complete()).count()
    }

    /// 进度百分比
    pub fn progress_percent(&self) -> u32 {
        progress_percent(self.completed_work_orders(), self.work_orders.len())
    }

    /// 是否全部工单的全部关卡均已完成（至少一张工单）
    pub fn all_complete(&self) -> bool {
        !self.work_orders.is_empty() && self.work_orders.iter().all(|wo| wo.is_complete())
    }
}

// ==========================================
// PurchaseOrder - 采购单（带 ID）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: String,
    pub document: OrderDocument,
}

impl PurchaseOrder {
    pub fn new(id: impl Into<String>, document: OrderDocument) -> Self {
        Self {
            id: id.into(),
            document,
        }
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary::from_document(&self.id, &self.document)
    }
}

// ==========================================
// OrderSummary - 目录列表项
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: String,
    pub status: PoStatus,
    pub ship_to: ShipTo,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub updated_by: String,
    pub total_work_orders: usize,
    pub completed_work_orders: usize,
}

impl OrderSummary {
    pub fn from_document(id: &str, doc: &OrderDocument) -> Self {
        Self {
            id: id.to_string(),
            status: doc.status,
            ship_to: doc.ship_to,
            created_at: doc.created_at.clone(),
            updated_at: doc.updated_at.clone(),
            updated_by: doc.updated_by.clone(),
            total_work_orders: doc.work_orders.len(),
            completed_work_orders: doc.completed_work_orders(),
        }
    }

    /// 进度百分比
    pub fn progress_percent(&self) -> u32 {
        progress_percent(self.completed_work_orders, self.total_work_orders)
    }

    /// 创建日期（YYYY-MM-DD 前缀）
    pub fn created_date(&self) -> &str {
        date_text::date_prefix(&self.created_at)
    }

    /// 显示用创建日期（YYYY/MM/DD）
    pub fn display_created(&self) -> String {
        date_text::display_date(&self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::step::{StepUpdate, STEPS_PER_WORK_ORDER};

    fn complete_work_order(wo: &mut WorkOrder) {
        for i in 0..STEPS_PER_WORK_ORDER {
            wo.update_step(i, &StepUpdate::photo_uploaded("https://img/x", true));
        }
    }

    fn initial() -> OrderDocument {
        OrderDocument::new_initial(
            ShipTo::As5645,
            "2024-01-15T08:00:00.000Z".to_string(),
            "guest".to_string(),
            "2024/01/15",
        )
    }

    #[test]
    fn test_normalize_po_id() {
        assert_eq!(normalize_po_id("  test-po "), "TEST-PO");
        assert_eq!(normalize_po_id(""), "");
    }

    #[test]
    fn test_initial_document() {
        let doc = initial();
        assert_eq!(doc.status, PoStatus::Draft);
        assert_eq!(doc.work_orders.len(), 1);
        assert_eq!(doc.work_orders[0].wo_id, "WO-01");
        assert!(doc.work_orders[0]
            .steps
            .iter()
            .all(|s| !s.checked && s.photo_url.is_none()));
        assert_eq!(doc.next_seq(), 2);
    }

    #[test]
    fn test_labels_never_collide_after_delete() {
        let mut doc = initial();
        doc.append_work_order("2024/01/15"); // WO-02
        doc.append_work_order("2024/01/15"); // WO-03
        doc.work_orders.remove(1);
        let idx = doc.append_work_order("2024/01/15");
        assert_eq!(doc.work_orders[idx].wo_id, "WO-04");

        let labels: Vec<&str> = doc.work_orders.iter().map(|w| w.wo_id.as_str()).collect();
        assert_eq!(labels, vec!["WO-01", "WO-03", "WO-04"]);
    }

    #[test]
    fn test_legacy_document_derives_sequence() {
        let json = serde_json::json!({
            "status": "DRAFT",
            "createdAt": "2024-01-15T08:00:00.000Z",
            "updatedBy": "u1",
            "shipTo": "TG0075",
            "workOrders": [serde_json::to_value(WorkOrder::new(1, "2024/01/15")).unwrap()]
        });
        let mut doc: OrderDocument = serde_json::from_value(json).unwrap();
        assert_eq!(doc.next_wo_seq, None);
        assert_eq!(doc.ship_to, ShipTo::Tg0075);
        let idx = doc.append_work_order("2024/01/16");
        assert_eq!(doc.work_orders[idx].wo_id, "WO-02");
    }

    #[test]
    fn test_progress_two_of_four_is_fifty() {
        let mut doc = initial();
        for _ in 0..3 {
            doc.append_work_order("2024/01/15");
        }
        complete_work_order(&mut doc.work_orders[0]);
        complete_work_order(&mut doc.work_orders[2]);
        assert_eq!(doc.completed_work_orders(), 2);
        assert_eq!(doc.progress_percent(), 50);
        assert!(!doc.all_complete());
        assert_eq!(OrderSummary::from_document("PO-X", &doc).progress_percent(), 50);
    }

    #[test]
    fn test_progress_rounding_and_empty() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
    }

    #[test]
    fn test_all_complete_requires_work_orders() {
        let mut doc = initial();
        complete_work_order(&mut doc.work_orders[0]);
        assert!(doc.all_complete());
        doc.work_orders.clear();
        assert!(!doc.all_complete());
    }

    #[test]
    fn test_document_shape() {
        let doc = initial();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["status"], "DRAFT");
        assert_eq!(json["shipTo"], "AS5645");
        assert!(json.get("workOrders").unwrap().is_array());
        assert!(json.get("updatedAt").is_none());
        assert_eq!(json["nextWoSeq"], 2);
    }

    #[test]
    fn test_summary() {
        let po = PurchaseOrder::new("PO-1", initial());
        let summary = po.summary();
        assert_eq!(summary.id, "PO-1");
        assert_eq!(summary.total_work_orders, 1);
        assert_eq!(summary.created_date(), "2024-01-15");
        assert_eq!(summary.progress_percent(), 0);
    }
}
