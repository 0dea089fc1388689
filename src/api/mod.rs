// ==========================================
// 出货检验追踪系统 - API 层
// ==========================================
// 职责: 面向操作员的交互接口（目录 / 编辑器 / 检验规范）
// 红线: 只读保护与完成度校验在此层执行
// ==========================================

pub mod directory_api;
pub mod editor_api;
pub mod error;
pub mod spec_api;

pub use directory_api::{filter_and_sort, CreateOutcome, CreatedOrder, OrderDirectory, OrderFilter};
pub use editor_api::{
    DeleteOutcome, EditorView, NavOutcome, OrderEditor, SubmitOutcome, WorkOrderAdded,
    WorkOrderProgress,
};
pub use error::{ApiError, ApiResult};
pub use spec_api::{current_specs, steps_catalog};
