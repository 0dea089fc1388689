// ==========================================
// 出货检验追踪系统 - 应用层
// ==========================================
// 职责: 依赖注入根,组装各层实例
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
