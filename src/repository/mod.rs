// ==========================================
// 出货检验追踪系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供文档存取与实时订阅接口,屏蔽存储细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod document_store;
pub mod error;
pub mod order_repo;
pub mod sqlite_document_store;

// 重导出核心仓储
pub use document_store::{CollectionPath, DocumentChange, DocumentStore};
pub use error::{RepositoryError, RepositoryResult};
pub use order_repo::{OrderChange, OrderRepository};
pub use sqlite_document_store::SqliteDocumentStore;
