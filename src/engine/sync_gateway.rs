// ==========================================
// 出货检验追踪系统 - 同步网关
// ==========================================
// 职责: 每次本地变更后推送完整工单快照（不做差异比对）
// 策略: 尽力而为,错误只记录日志,不回滚本地状态
// ==========================================

use crate::auth::Session;
use crate::domain::date_text;
use crate::domain::order::OrderDocument;
use crate::repository::OrderRepository;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// 一次推送的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// 已写入远端
    Synced,
    /// 未写入（原因）
    Skipped(String),
    /// 写入失败（错误信息）
    Failed(String),
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced)
    }
}

// ==========================================
// SyncGateway
// ==========================================
#[derive(Clone)]
pub struct SyncGateway {
    orders: OrderRepository,
    session: Arc<Session>,
}

impl SyncGateway {
    pub fn new(orders: OrderRepository, session: Arc<Session>) -> Self {
        Self { orders, session }
    }

    pub fn orders(&self) -> &OrderRepository {
        &self.orders
    }

    /// 构建快照写入字段
    ///
    /// 写入 workOrders / status / updatedAt / updatedBy,
    /// 文档带有工单计数器时一并写入 nextWoSeq
    fn snapshot_fields(document: &OrderDocument, uid: &str) -> Result<Map<String, Value>, serde_json::Error> {
        let mut fields = Map::new();
        fields.insert("workOrders".to_string(), serde_json::to_value(&document.work_orders)?);
        fields.insert("status".to_string(), serde_json::to_value(document.status)?);
        fields.insert("updatedAt".to_string(), json!(date_text::now_iso()));
        fields.insert("updatedBy".to_string(), json!(uid));
        if let Some(seq) = document.next_wo_seq {
            fields.insert("nextWoSeq".to_string(), json!(seq));
        }
        Ok(fields)
    }

    /// 推送采购单的完整快照
    ///
    /// # 返回
    /// - Synced: 写入成功
    /// - Skipped: 无登录身份
    /// - Failed: 序列化或远端写入失败（已记录日志）
    pub async fn push_snapshot(&self, po_id: &str, document: &OrderDocument) -> SyncOutcome {
        let uid = match self.session.uid() {
            Some(uid) => uid.to_string(),
            None => {
                tracing::debug!(po_id, "无登录身份，跳过同步");
                return SyncOutcome::Skipped("无登录身份".to_string());
            }
        };

        let fields = match Self::snapshot_fields(document, &uid) {
            Ok(fields) => fields,
            Err(e) => {
                tracing::error!(po_id, error = %e, "快照序列化失败");
                return SyncOutcome::Failed(e.to_string());
            }
        };

        match self.orders.update_fields(po_id, fields).await {
            Ok(()) => {
                tracing::info!(
                    po_id,
                    status = %document.status,
                    work_orders = document.work_orders.len(),
                    updated_by = %uid,
                    "快照已同步"
                );
                SyncOutcome::Synced
            }
            Err(e) => {
                tracing::error!(po_id, error = %e, "快照同步失败");
                SyncOutcome::Failed(e.to_string())
            }
        }
    }
}
