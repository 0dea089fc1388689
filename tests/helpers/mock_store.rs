// ==========================================
// Mock 文档存储 - 用于集成测试
// ==========================================
// SlowDocumentStore: 写入前等待固定时长（模拟远端延迟）
// FailingDocumentStore: 一切写入均失败（模拟远端离线）
// 读取与订阅均委托给底层 SqliteDocumentStore
// ==========================================

use async_trait::async_trait;
use inspection_tracker::repository::{
    CollectionPath, DocumentChange, DocumentStore, RepositoryError, RepositoryResult,
    SqliteDocumentStore,
};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

// ==========================================
// SlowDocumentStore
// ==========================================

pub struct SlowDocumentStore {
    inner: Arc<SqliteDocumentStore>,
    write_delay: Duration,
}

impl SlowDocumentStore {
    pub fn new(inner: Arc<SqliteDocumentStore>, write_delay: Duration) -> Self {
        Self { inner, write_delay }
    }
}

#[async_trait]
impl DocumentStore for SlowDocumentStore {
    async fn get(&self, collection: &CollectionPath, id: &str) -> RepositoryResult<Option<Value>> {
        self.inner.get(collection, id).await
    }

    async fn set(&self, collection: &CollectionPath, id: &str, document: Value) -> RepositoryResult<()> {
        tokio::time::sleep(self.write_delay).await;
        self.inner.set(collection, id, document).await
    }

    async fn update(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Map<String, Value>,
    ) -> RepositoryResult<()> {
        tokio::time::sleep(self.write_delay).await;
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &CollectionPath, id: &str) -> RepositoryResult<()> {
        self.inner.delete(collection, id).await
    }

    async fn list(&self, collection: &CollectionPath) -> RepositoryResult<Vec<(String, Value)>> {
        self.inner.list(collection).await
    }

    fn subscribe(&self) -> broadcast::Receiver<DocumentChange> {
        self.inner.subscribe()
    }
}

// ==========================================
// FailingDocumentStore
// ==========================================

pub struct FailingDocumentStore {
    inner: Arc<SqliteDocumentStore>,
    attempts: AtomicUsize,
}

impl FailingDocumentStore {
    pub fn new(inner: Arc<SqliteDocumentStore>) -> Self {
        Self {
            inner,
            attempts: AtomicUsize::new(0),
        }
    }

    /// 已拒绝的写入次数
    pub fn rejected_writes(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn reject(&self) -> RepositoryError {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        RepositoryError::Unavailable("模拟离线".to_string())
    }
}

#[async_trait]
impl DocumentStore for FailingDocumentStore {
    async fn get(&self, collection: &CollectionPath, id: &str) -> RepositoryResult<Option<Value>> {
        self.inner.get(collection, id).await
    }

    async fn set(&self, _collection: &CollectionPath, _id: &str, _document: Value) -> RepositoryResult<()> {
        Err(self.reject())
    }

    async fn update(
        &self,
        _collection: &CollectionPath,
        _id: &str,
        _fields: Map<String, Value>,
    ) -> RepositoryResult<()> {
        Err(self.reject())
    }

    async fn delete(&self, _collection: &CollectionPath, _id: &str) -> RepositoryResult<()> {
        Err(self.reject())
    }

    async fn list(&self, collection: &CollectionPath) -> RepositoryResult<Vec<(String, Value)>> {
        self.inner.list(collection).await
    }

    fn subscribe(&self) -> broadcast::Receiver<DocumentChange> {
        self.inner.subscribe()
    }
}
