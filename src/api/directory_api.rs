// ==========================================
// 出货检验追踪系统 - 采购单目录 API
// ==========================================
// 职责: 采购单摘要列表（实时更新）、筛选、新建、删除
// 筛选在本地完成: 单号子串 / 创建日期区间 / 出货地
// ==========================================

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::api::error::{ApiError, ApiResult};
use crate::auth::Session;
use crate::domain::date_text;
use crate::domain::order::{normalize_po_id, OrderDocument, OrderSummary, PurchaseOrder};
use crate::domain::types::ShipTo;
use crate::i18n::t_with_args;
use crate::repository::{OrderChange, OrderRepository};

// ==========================================
// OrderFilter - 目录筛选条件
// ==========================================
// Default 即"清除筛选"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// 单号关键字（不区分大小写）
    pub search_term: String,
    /// 起始日期 YYYY-MM-DD（含,空为不限）
    pub date_start: String,
    /// 结束日期 YYYY-MM-DD（含,空为不限）
    pub date_end: String,
    /// 出货地（None 为不限）
    pub ship_to: Option<ShipTo>,
}

impl OrderFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..Self::default()
        }
    }

    pub fn with_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.date_start = start.into();
        self.date_end = end.into();
        self
    }

    pub fn with_ship_to(mut self, ship_to: ShipTo) -> Self {
        self.ship_to = Some(ship_to);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 单条摘要是否匹配
    pub fn matches(&self, summary: &OrderSummary) -> bool {
        let term = self.search_term.to_lowercase();
        if !summary.id.to_lowercase().contains(&term) {
            return false;
        }

        // 按 YYYY-MM-DD 字符串比较
        let created = summary.created_date();
        if !self.date_start.is_empty() && created < self.date_start.as_str() {
            return false;
        }
        if !self.date_end.is_empty() && created > self.date_end.as_str() {
            return false;
        }

        match self.ship_to {
            Some(ship_to) => summary.ship_to == ship_to,
            None => true,
        }
    }
}

/// 筛选并按创建时间倒序排列（无法解析的时间排在最后）
pub fn filter_and_sort(summaries: &[OrderSummary], filter: &OrderFilter) -> Vec<OrderSummary> {
    let mut matched: Vec<OrderSummary> = summaries
        .iter()
        .filter(|s| filter.matches(s))
        .cloned()
        .collect();

    matched.sort_by(|a, b| {
        let ta = date_text::parse_timestamp(&a.created_at);
        let tb = date_text::parse_timestamp(&b.created_at);
        match (ta, tb) {
            (Some(ta), Some(tb)) => tb.cmp(&ta),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    matched
}

// ==========================================
// CreateOutcome - 新建结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// 远端已在超时前确认写入
    Confirmed,
    /// 超时或远端出错,按已创建处理
    Assumed { reason: String },
}

impl CreateOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, CreateOutcome::Confirmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrder {
    pub order: PurchaseOrder,
    pub outcome: CreateOutcome,
}

impl CreatedOrder {
    /// 未经远端确认时给用户的提示
    pub fn notice(&self) -> Option<String> {
        match self.outcome {
            CreateOutcome::Confirmed => None,
            CreateOutcome::Assumed { .. } => Some(t_with_args(
                "directory.create_assumed",
                &[("po", self.order.id.as_str())],
            )),
        }
    }
}

// ==========================================
// OrderDirectory - 采购单目录
// ==========================================
pub struct OrderDirectory {
    orders: OrderRepository,
    session: Arc<Session>,
    summaries: Arc<RwLock<Vec<OrderSummary>>>,
    loaded: Arc<AtomicBool>,
    create_timeout: Duration,
    live_task: Mutex<Option<JoinHandle<()>>>,
}

impl OrderDirectory {
    /// 创建目录实例（尚未载入,需调用 start）
    pub fn new(orders: OrderRepository, session: Arc<Session>, create_timeout: Duration) -> Self {
        Self {
            orders,
            session,
            summaries: Arc::new(RwLock::new(Vec::new())),
            loaded: Arc::new(AtomicBool::new(false)),
            create_timeout,
            live_task: Mutex::new(None),
        }
    }

    /// 开始实时监听并载入当前列表
    ///
    /// 载入失败只记录日志,目录仍标记为已载入
    pub async fn start(&self) {
        // 先订阅再读取,避免遗漏读取期间的变更
        self.spawn_live_updates();

        if let Err(e) = self.refresh().await {
            tracing::error!(error = %e, "采购单列表载入失败");
        }
        self.loaded.store(true, AtomicOrdering::SeqCst);
    }

    fn spawn_live_updates(&self) {
        let mut guard = match self.live_task.lock() {
            Ok(guard) => guard,
            Err(e) => {
                tracing::error!(error = %e, "实时监听启动失败");
                return;
            }
        };
        if guard.is_some() {
            return;
        }

        let summaries = self.summaries.clone();
        let loaded = self.loaded.clone();
        let mut changes = Box::pin(self.orders.watch());

        *guard = Some(tokio::spawn(async move {
            while let Some(change) = changes.next().await {
                tracing::debug!(po_id = change.order_id(), "收到采购单实时变更");
                if let Err(e) = apply_change(&summaries, change) {
                    tracing::error!(error = %e, "实时更新写入列表失败");
                }
                loaded.store(true, AtomicOrdering::SeqCst);
            }
            tracing::debug!("采购单实时监听结束");
        }));
    }

    /// 停止实时监听
    pub fn stop(&self) {
        if let Ok(mut guard) = self.live_task.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }

    /// 重新读取完整列表
    ///
    /// # 返回
    /// - Ok(usize): 采购单数量
    pub async fn refresh(&self) -> ApiResult<usize> {
        let fresh = self.orders.list_summaries().await?;
        let count = fresh.len();
        let mut summaries = self.write_summaries()?;
        *summaries = fresh;
        self.loaded.store(true, AtomicOrdering::SeqCst);
        tracing::debug!(count, "采购单列表已刷新");
        Ok(count)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(AtomicOrdering::SeqCst)
    }

    /// 按条件列出摘要
    pub fn list(&self, filter: &OrderFilter) -> ApiResult<Vec<OrderSummary>> {
        let summaries = self
            .summaries
            .read()
            .map_err(|e| ApiError::InternalError(format!("列表锁获取失败: {}", e)))?;
        Ok(filter_and_sort(&summaries, filter))
    }

    /// 查找单个摘要
    pub fn find(&self, po_id: &str) -> ApiResult<Option<OrderSummary>> {
        let summaries = self
            .summaries
            .read()
            .map_err(|e| ApiError::InternalError(format!("列表锁获取失败: {}", e)))?;
        Ok(summaries.iter().find(|s| s.id == po_id).cloned())
    }

    /// 新建采购单
    ///
    /// # 参数
    /// - raw_id: 用户输入的单号（去空白并转大写）
    /// - ship_to: 出货地
    ///
    /// # 返回
    /// - Ok(CreatedOrder): 无论远端是否确认,新单均已加入本地列表
    /// - Err(InvalidInput): 单号为空
    /// - Err(AlreadyExists): 本地列表已有同号采购单
    pub async fn create(&self, raw_id: &str, ship_to: ShipTo) -> ApiResult<CreatedOrder> {
        let po_id = normalize_po_id(raw_id);
        if po_id.is_empty() {
            return Err(ApiError::InvalidInput("采购单号不能为空".to_string()));
        }
        if po_id.contains('/') {
            return Err(ApiError::InvalidInput(format!("采购单号不能包含'/': {}", po_id)));
        }
        if self.find(&po_id)?.is_some() {
            return Err(ApiError::AlreadyExists(po_id));
        }

        let document = OrderDocument::new_initial(
            ship_to,
            date_text::now_iso(),
            self.session.updated_by(),
            &date_text::today_canonical(),
        );

        // 写入在后台任务中进行,超时后仍可能完成
        let repo = self.orders.clone();
        let write_id = po_id.clone();
        let write_doc = document.clone();
        let write = tokio::spawn(async move { repo.create(&write_id, &write_doc).await });

        let outcome = match tokio::time::timeout(self.create_timeout, write).await {
            Ok(Ok(Ok(()))) => {
                tracing::info!(po_id = %po_id, ship_to = %ship_to, "采购单已建立");
                CreateOutcome::Confirmed
            }
            Ok(Ok(Err(e))) => {
                tracing::error!(po_id = %po_id, error = %e, "采购单建立失败，按已建立继续");
                CreateOutcome::Assumed {
                    reason: e.to_string(),
                }
            }
            Ok(Err(e)) => {
                tracing::error!(po_id = %po_id, error = %e, "采购单写入任务异常，按已建立继续");
                CreateOutcome::Assumed {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                tracing::warn!(
                    po_id = %po_id,
                    timeout_ms = self.create_timeout.as_millis() as u64,
                    "采购单建立超时，按已建立继续"
                );
                CreateOutcome::Assumed {
                    reason: format!("写入超时({}ms)", self.create_timeout.as_millis()),
                }
            }
        };

        let order = PurchaseOrder::new(po_id, document);
        {
            let mut summaries = self.write_summaries()?;
            if !summaries.iter().any(|s| s.id == order.id) {
                summaries.insert(0, order.summary());
            }
        }

        Ok(CreatedOrder { order, outcome })
    }

    /// 删除采购单（远端与本地）
    pub async fn delete(&self, raw_id: &str) -> ApiResult<()> {
        let po_id = normalize_po_id(raw_id);
        if po_id.is_empty() {
            return Err(ApiError::InvalidInput("采购单号不能为空".to_string()));
        }
        self.orders.delete(&po_id).await?;
        self.write_summaries()?.retain(|s| s.id != po_id);
        tracing::info!(po_id = %po_id, "采购单已删除");
        Ok(())
    }

    fn write_summaries(&self) -> ApiResult<std::sync::RwLockWriteGuard<'_, Vec<OrderSummary>>> {
        self.summaries
            .write()
            .map_err(|e| ApiError::InternalError(format!("列表锁获取失败: {}", e)))
    }
}

impl Drop for OrderDirectory {
    fn drop(&mut self) {
        self.stop();
    }
}

/// 将一条实时变更并入摘要列表
fn apply_change(summaries: &RwLock<Vec<OrderSummary>>, change: OrderChange) -> Result<(), String> {
    let mut summaries = summaries.write().map_err(|e| e.to_string())?;
    match change {
        OrderChange::Upserted(po) => {
            let summary = po.summary();
            match summaries.iter_mut().find(|s| s.id == summary.id) {
                Some(existing) => *existing = summary,
                None => summaries.push(summary),
            }
        }
        OrderChange::Removed(id) => summaries.retain(|s| s.id != id),
    }
    Ok(())
}
