// ==========================================
// 出货检验追踪系统 - 核心库
// ==========================================
// 采购单 (PO) → 工单 (WO) → 4 个检验关卡
// 技术栈: Rust + SQLite 文档存储 + 实时推送
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-TW");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 文档存储与订阅
pub mod repository;

// 身份层 - 登录会话
pub mod auth;

// 引擎层 - 远端同步与拍照上传
pub mod engine;

// 配置层 - 运行环境与持久化配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 目录与编辑器
pub mod api;

// 应用层 - 依赖注入根
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{InspectionResult, Language, PoStatus, ShipTo};

// 领域实体
pub use domain::{
    InspectionStep, OrderDocument, OrderSummary, PurchaseOrder, StepUpdate, WorkOrder,
    WorkOrderField,
};

// API
pub use api::{ApiError, ApiResult, OrderDirectory, OrderEditor, OrderFilter};

// 应用
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "出貨檢驗追蹤系統";
