// ==========================================
// 出货检验追踪系统 - 配置层
// ==========================================
// 职责: 运行环境注入配置 + config_kv 持久化配置
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod inspection_config_trait;
pub mod runtime_env;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, InspectionSettings};
pub use inspection_config_trait::{ConfigResult, InspectionConfigReader};
pub use runtime_env::{RuntimeEnv, DEFAULT_APP_ID};
