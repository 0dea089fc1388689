// ==========================================
// 出货检验追踪系统 - 应用状态
// ==========================================
// 职责: 显式构建存储、配置、会话、目录与编辑器,统一注入
// 不使用全局可变句柄
// ==========================================

use std::sync::Arc;

use crate::api::{ApiResult, OrderDirectory, OrderEditor};
use crate::auth::{AuthProvider, LocalAuthProvider, Session};
use crate::config::runtime_env::ENV_DB_PATH;
use crate::config::{ConfigManager, InspectionSettings, RuntimeEnv};
use crate::engine::{MockPhotoCapture, PhotoCapture, SyncGateway};
use crate::repository::{DocumentStore, OrderRepository, SqliteDocumentStore};

/// 应用状态
///
/// 包含共享资源与 API 实例
pub struct AppState {
    /// 数据库路径（内存模式为 ":memory:"）
    pub db_path: String,

    /// 运行环境注入配置
    pub env: RuntimeEnv,

    /// 持久化配置
    pub config: Arc<ConfigManager>,

    /// 启动时读取的检验配置
    pub settings: InspectionSettings,

    /// 登录会话
    pub session: Arc<Session>,

    /// 采购单仓储
    pub orders: OrderRepository,

    /// 采购单目录
    pub directory: Arc<OrderDirectory>,

    gateway: SyncGateway,
    photos: Arc<dyn PhotoCapture>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - env: 运行环境配置
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开文档存储并与配置共享连接
    /// 2. 读取检验配置
    /// 3. 建立会话（失败时以无身份继续）
    /// 4. 启动目录实时监听
    pub async fn new(db_path: String, env: RuntimeEnv) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let store = SqliteDocumentStore::new(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let config = ConfigManager::from_connection(store.connection())
            .map_err(|e| format!("无法初始化配置: {}", e))?;

        Self::assemble(db_path, Arc::new(store), config, env, &LocalAuthProvider::new(), None).await
    }

    /// 内存模式（测试/临时会话）
    pub async fn in_memory(env: RuntimeEnv) -> Result<Self, String> {
        let store = SqliteDocumentStore::in_memory()
            .map_err(|e| format!("无法打开内存数据库: {}", e))?;
        let config = ConfigManager::from_connection(store.connection())
            .map_err(|e| format!("无法初始化配置: {}", e))?;

        Self::assemble(
            ":memory:".to_string(),
            Arc::new(store),
            config,
            env,
            &LocalAuthProvider::new(),
            None,
        )
        .await
    }

    /// 由已构建的部件组装
    ///
    /// # 参数
    /// - photos: 拍照上传实现（None 时按配置使用占位图上传）
    pub async fn assemble(
        db_path: String,
        store: Arc<dyn DocumentStore>,
        config: ConfigManager,
        env: RuntimeEnv,
        auth: &dyn AuthProvider,
        photos: Option<Arc<dyn PhotoCapture>>,
    ) -> Result<Self, String> {
        let settings = config
            .load_settings()
            .await
            .map_err(|e| format!("无法读取配置: {}", e))?;
        tracing::debug!(?settings, "检验配置已载入");

        let session = Arc::new(Session::start(auth, env.auth_token.as_deref()).await);

        let orders = OrderRepository::new(store, &env.app_id)
            .map_err(|e| format!("无效的应用ID: {}", e))?;
        let gateway = SyncGateway::new(orders.clone(), session.clone());
        let photos = photos
            .unwrap_or_else(|| Arc::new(MockPhotoCapture::from_settings(&settings)));

        let directory = Arc::new(OrderDirectory::new(
            orders.clone(),
            session.clone(),
            settings.create_timeout,
        ));
        directory.start().await;

        tracing::info!(app_id = %env.app_id, signed_in = session.is_signed_in(), "AppState初始化成功");

        Ok(Self {
            db_path,
            env,
            config: Arc::new(config),
            settings,
            session,
            orders,
            directory,
            gateway,
            photos,
        })
    }

    /// 创建空白编辑器
    pub fn editor(&self) -> OrderEditor {
        OrderEditor::new(
            self.gateway.clone(),
            self.photos.clone(),
            self.settings.photo_implies_pass,
        )
    }

    /// 打开采购单
    pub async fn open_order(&self, po_id: &str) -> ApiResult<OrderEditor> {
        let mut editor = self.editor();
        editor.load(po_id).await?;
        Ok(editor)
    }
}

/// 获取默认数据库路径
///
/// 优先使用环境变量 INSPECTION_DB_PATH,其次为用户数据目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(ENV_DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./inspection_tracker.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("inspection-tracker-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("inspection-tracker");
        }

        if let Err(e) = std::fs::create_dir_all(&path) {
            tracing::warn!("无法创建数据目录 {}: {}", path.display(), e);
        }
        path = path.join("inspection_tracker.db");
    }

    path.to_string_lossy().to_string()
}
