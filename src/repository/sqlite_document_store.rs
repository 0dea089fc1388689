// ==========================================
// 出货检验追踪系统 - SQLite 文档存储
// ==========================================
// 职责: 以 documents 表保存 JSON 文档,并通过 broadcast 推送变更
// 红线: 只做数据映射,不含业务逻辑
// ==========================================

use crate::db::{ensure_schema, open_in_memory_connection, open_sqlite_connection};
use crate::domain::date_text;
use crate::repository::document_store::{
    validate_segment, CollectionPath, DocumentChange, DocumentStore, CHANGE_CHANNEL_CAPACITY,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;

// ==========================================
// SqliteDocumentStore
// ==========================================
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
    changes: broadcast::Sender<DocumentChange>,
}

impl SqliteDocumentStore {
    /// 打开文件数据库
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 打开内存数据库
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = open_in_memory_connection()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建（与 ConfigManager 共享连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            ensure_schema(&guard)?;
        }
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self { conn, changes })
    }

    /// 共享连接
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn publish(&self, collection: &CollectionPath, id: &str, document: Option<Value>) {
        let change = DocumentChange {
            collection: collection.clone(),
            id: id.to_string(),
            document,
        };
        // 没有订阅者时发送失败属正常情况
        if self.changes.send(change).is_err() {
            tracing::trace!(collection = %collection, doc_id = id, "无订阅者,跳过变更推送");
        }
    }

    // ==========================================
    // 同步读写（持锁区间内不 await）
    // ==========================================
    // 变更在释放连接锁之前推送,推送顺序与提交顺序一致

    fn read_doc(&self, collection: &CollectionPath, id: &str) -> RepositoryResult<Option<Value>> {
        let conn = self.get_conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT body_json FROM documents WHERE collection = ?1 AND doc_id = ?2",
                params![collection.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    fn write_doc(&self, collection: &CollectionPath, id: &str, document: Value) -> RepositoryResult<()> {
        validate_segment(id)?;
        if !document.is_object() {
            return Err(RepositoryError::SerializationError(
                "文档必须为 JSON 对象".to_string(),
            ));
        }
        let body = serde_json::to_string(&document)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO documents (collection, doc_id, body_json, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(collection, doc_id) DO UPDATE SET body_json = ?3, updated_at = ?4
            "#,
            params![collection.as_str(), id, body, date_text::now_iso()],
        )?;
        self.publish(collection, id, Some(document));
        drop(conn);
        Ok(())
    }

    fn merge_doc(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Map<String, Value>,
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let raw: Option<String> = tx
            .query_row(
                "SELECT body_json FROM documents WHERE collection = ?1 AND doc_id = ?2",
                params![collection.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;

        let raw = raw.ok_or_else(|| RepositoryError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;

        let mut doc: Value = serde_json::from_str(&raw)?;
        let obj = doc.as_object_mut().ok_or_else(|| {
            RepositoryError::SerializationError(format!("文档不是 JSON 对象: {}", id))
        })?;
        for (k, v) in fields {
            obj.insert(k, v);
        }

        tx.execute(
            "UPDATE documents SET body_json = ?3, updated_at = ?4 WHERE collection = ?1 AND doc_id = ?2",
            params![
                collection.as_str(),
                id,
                serde_json::to_string(&doc)?,
                date_text::now_iso()
            ],
        )?;
        tx.commit()?;
        self.publish(collection, id, Some(doc));
        drop(conn);
        Ok(())
    }

    fn remove_doc(&self, collection: &CollectionPath, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2",
            params![collection.as_str(), id],
        )?;
        if rows > 0 {
            self.publish(collection, id, None);
        }
        drop(conn);
        Ok(())
    }

    fn list_docs(&self, collection: &CollectionPath) -> RepositoryResult<Vec<(String, Value)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT doc_id, body_json FROM documents WHERE collection = ?1 ORDER BY doc_id",
        )?;
        let rows = stmt.query_map(params![collection.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, body) = row?;
            docs.push((id, serde_json::from_str(&body)?));
        }
        Ok(docs)
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &CollectionPath, id: &str) -> RepositoryResult<Option<Value>> {
        self.read_doc(collection, id)
    }

    async fn set(&self, collection: &CollectionPath, id: &str, document: Value) -> RepositoryResult<()> {
        self.write_doc(collection, id, document)
    }

    async fn update(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Map<String, Value>,
    ) -> RepositoryResult<()> {
        self.merge_doc(collection, id, fields)
    }

    async fn delete(&self, collection: &CollectionPath, id: &str) -> RepositoryResult<()> {
        self.remove_doc(collection, id)
    }

    async fn list(&self, collection: &CollectionPath) -> RepositoryResult<Vec<(String, Value)>> {
        self.list_docs(collection)
    }

    fn subscribe(&self) -> broadcast::Receiver<DocumentChange> {
        self.changes.subscribe()
    }
}
