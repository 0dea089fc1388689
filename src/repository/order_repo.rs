// ==========================================
// 出货检验追踪系统 - 采购单仓储
// ==========================================
// 职责: 在 DocumentStore 之上提供类型化的采购单读写与订阅
// 红线: 不含业务规则（只读保护、完成度判定在 API 层）
// ==========================================

use crate::domain::order::{OrderDocument, OrderSummary, PurchaseOrder};
use crate::repository::document_store::{CollectionPath, DocumentChange, DocumentStore};
use crate::repository::error::{RepositoryError, RepositoryResult};
use futures::stream::{self, Stream};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

// ==========================================
// OrderChange - 类型化的采购单变更
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum OrderChange {
    /// 新建或更新
    Upserted(PurchaseOrder),
    /// 已删除
    Removed(String),
}

impl OrderChange {
    pub fn order_id(&self) -> &str {
        match self {
            OrderChange::Upserted(po) => &po.id,
            OrderChange::Removed(id) => id,
        }
    }
}

// ==========================================
// OrderRepository
// ==========================================
#[derive(Clone)]
pub struct OrderRepository {
    store: Arc<dyn DocumentStore>,
    collection: CollectionPath,
}

impl OrderRepository {
    /// 创建仓储实例
    ///
    /// # 参数
    /// - `store`: 文档存储
    /// - `app_id`: 应用 ID（决定集合路径）
    pub fn new(store: Arc<dyn DocumentStore>, app_id: &str) -> RepositoryResult<Self> {
        Ok(Self {
            store,
            collection: CollectionPath::orders(app_id)?,
        })
    }

    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        self.store.clone()
    }

    /// 读取采购单文档
    pub async fn find_by_id(&self, po_id: &str) -> RepositoryResult<Option<OrderDocument>> {
        match self.store.get(&self.collection, po_id).await? {
            Some(value) => Ok(Some(decode_document(po_id, value)?)),
            None => Ok(None),
        }
    }

    /// 写入完整文档（新建采购单）
    pub async fn create(&self, po_id: &str, document: &OrderDocument) -> RepositoryResult<()> {
        let value = serde_json::to_value(document)?;
        self.store.set(&self.collection, po_id, value).await
    }

    /// 合并顶层字段
    pub async fn update_fields(&self, po_id: &str, fields: Map<String, Value>) -> RepositoryResult<()> {
        self.store.update(&self.collection, po_id, fields).await
    }

    /// 删除采购单
    pub async fn delete(&self, po_id: &str) -> RepositoryResult<()> {
        self.store.delete(&self.collection, po_id).await
    }

    /// 列出全部采购单摘要（无法解析的文档跳过并记录日志）
    pub async fn list_summaries(&self) -> RepositoryResult<Vec<OrderSummary>> {
        let docs = self.store.list(&self.collection).await?;
        let mut summaries = Vec::with_capacity(docs.len());
        for (id, value) in docs {
            match decode_document(&id, value) {
                Ok(doc) => summaries.push(OrderSummary::from_document(&id, &doc)),
                Err(e) => {
                    tracing::warn!(po_id = %id, error = %e, "跳过无法解析的采购单文档");
                }
            }
        }
        Ok(summaries)
    }

    /// 订阅原始变更
    pub fn subscribe(&self) -> broadcast::Receiver<DocumentChange> {
        self.store.subscribe()
    }

    /// 将原始变更转为本集合的类型化变更
    ///
    /// # 返回
    /// - None: 其他集合的变更,或文档无法解析
    pub fn decode_change(&self, change: DocumentChange) -> Option<OrderChange> {
        if change.collection != self.collection {
            return None;
        }
        match change.document {
            None => Some(OrderChange::Removed(change.id)),
            Some(value) => match decode_document(&change.id, value) {
                Ok(doc) => Some(OrderChange::Upserted(PurchaseOrder::new(change.id, doc))),
                Err(e) => {
                    tracing::warn!(po_id = %change.id, error = %e, "忽略无法解析的推送");
                    None
                }
            },
        }
    }

    /// 监听本集合的变更流
    ///
    /// 推送积压时跳过丢失的消息继续监听;存储关闭时结束
    pub fn watch(&self) -> impl Stream<Item = OrderChange> + Send + 'static {
        let repo = self.clone();
        let rx = self.subscribe();
        stream::unfold((repo, rx), |(repo, mut rx)| async move {
            loop {
                match rx.recv().await {
                    Ok(change) => {
                        if let Some(order_change) = repo.decode_change(change) {
                            return Some((order_change, (repo, rx)));
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "变更推送积压,部分消息已丢弃");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
    }
}

fn decode_document(po_id: &str, value: Value) -> RepositoryResult<OrderDocument> {
    serde_json::from_value(value).map_err(|e| {
        RepositoryError::SerializationError(format!("采购单 {} 解析失败: {}", po_id, e))
    })
}
