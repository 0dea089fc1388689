// ==========================================
// 出货检验追踪系统 - 采购单编辑器 API
// ==========================================
// 职责: 载入单张采购单,编辑工单字段与关卡,导航,删除工单,提交
// 红线: 已提交 (SUBMITTED) 的采购单拒绝一切修改
// 同步: 每次修改后推送完整工单快照;远端推送整体覆盖本地
// ==========================================

mod core;
mod mutations;
mod navigation;


pub use core::{EditorView, OrderEditor, WorkOrderProgress};
pub use mutations::{DeleteOutcome, SubmitOutcome, WorkOrderAdded};
pub use navigation::NavOutcome;
