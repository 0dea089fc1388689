// ==========================================
// 出货检验追踪系统 - 远端文档存储接口
// ==========================================
// 职责: 定义文档存储的读写与实时订阅接口（不包含业务逻辑）
// 实现者: SqliteDocumentStore（rusqlite + broadcast 推送）
// 测试中可替换为慢速/失败的模拟实现
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use tokio::sync::broadcast;

/// 实时推送通道容量
pub const CHANGE_CHANNEL_CAPACITY: usize = 256;

// ==========================================
// CollectionPath - 集合路径
// ==========================================
// 形如 artifacts/{appId}/public/data/orders
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// 由路径段构建集合路径
    ///
    /// 路径段不可为空,不可包含 `/`;集合路径必须为奇数段
    pub fn new(segments: &[&str]) -> RepositoryResult<Self> {
        if segments.is_empty() || segments.len() % 2 == 0 {
            return Err(RepositoryError::InvalidPath(format!(
                "集合路径段数必须为奇数: {}",
                segments.join("/")
            )));
        }
        for seg in segments {
            validate_segment(seg)?;
        }
        Ok(Self(segments.join("/")))
    }

    /// 采购单集合: artifacts/{appId}/public/data/orders
    pub fn orders(app_id: &str) -> RepositoryResult<Self> {
        Self::new(&["artifacts", app_id, "public", "data", "orders"])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 文档完整路径
    pub fn document_path(&self, id: &str) -> String {
        format!("{}/{}", self.0, id)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 校验路径段/文档 ID
pub fn validate_segment(segment: &str) -> RepositoryResult<()> {
    if segment.trim().is_empty() {
        return Err(RepositoryError::InvalidPath("路径段不能为空".to_string()));
    }
    if segment.contains('/') {
        return Err(RepositoryError::InvalidPath(format!(
            "路径段不能包含'/': {}",
            segment
        )));
    }
    Ok(())
}

// ==========================================
// DocumentChange - 实时推送的变更
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    pub collection: CollectionPath,
    pub id: String,
    /// 变更后的文档（None 表示已删除）
    pub document: Option<Value>,
}

impl DocumentChange {
    pub fn is_deleted(&self) -> bool {
        self.document.is_none()
    }
}

// ==========================================
// DocumentStore Trait
// ==========================================
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 读取单个文档
    ///
    /// # 返回
    /// - Ok(None): 文档不存在
    async fn get(&self, collection: &CollectionPath, id: &str) -> RepositoryResult<Option<Value>>;

    /// 写入整个文档（不存在则创建,存在则覆盖）
    async fn set(&self, collection: &CollectionPath, id: &str, document: Value) -> RepositoryResult<()>;

    /// 合并顶层字段
    ///
    /// # 返回
    /// - Err(NotFound): 文档不存在
    async fn update(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Map<String, Value>,
    ) -> RepositoryResult<()>;

    /// 删除文档（不存在时视为成功）
    async fn delete(&self, collection: &CollectionPath, id: &str) -> RepositoryResult<()>;

    /// 列出集合内全部文档
    async fn list(&self, collection: &CollectionPath) -> RepositoryResult<Vec<(String, Value)>>;

    /// 订阅全部变更
    ///
    /// 订阅方自行按集合/文档过滤
    fn subscribe(&self) -> broadcast::Receiver<DocumentChange>;
}
