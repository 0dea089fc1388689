// ==========================================
// 出货检验追踪系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、完成度与状态转换规则
// 红线: 不含数据访问逻辑,不含远端同步逻辑
// ==========================================

pub mod date_text;
pub mod order;
pub mod spec_catalog;
pub mod step;
pub mod types;
pub mod work_order;

// 重导出核心类型
pub use order::{normalize_po_id, progress_percent, OrderDocument, OrderSummary, PurchaseOrder};
pub use spec_catalog::{localized_specs, InspectionSpec, LocalizedSpec, LocalizedText, INSPECTION_SPECS};
pub use step::{InspectionStep, StepTemplate, StepUpdate, STEPS_PER_WORK_ORDER, STEP_CATALOG};
pub use types::{InspectionResult, Language, PoStatus, ShipTo};
pub use work_order::{WorkOrder, WorkOrderField};
