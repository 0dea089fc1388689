// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

use inspection_tracker::auth::LocalAuthProvider;
use inspection_tracker::config::{ConfigManager, RuntimeEnv};
use inspection_tracker::domain::order::OrderDocument;
use inspection_tracker::engine::{MockPhotoCapture, PhotoCapture};
use inspection_tracker::repository::{DocumentStore, OrderRepository, SqliteDocumentStore};
use inspection_tracker::AppState;

use super::mock_store::{FailingDocumentStore, SlowDocumentStore};

pub const TEST_APP_ID: &str = "test-app";
pub const TEST_UID: &str = "qa-01";

/// 远端存储的行为
#[derive(Debug, Clone, Copy)]
pub enum StoreMode {
    Normal,
    /// 每次写入延迟指定时长
    Slow(Duration),
    /// 一切写入失败
    Failing,
}

/// 测试环境选项
pub struct EnvOptions {
    pub store_mode: StoreMode,
    /// None 时使用无法通过校验的令牌（无身份）
    pub auth_token: Option<String>,
    /// 预先写入的配置项
    pub config: Vec<(&'static str, String)>,
}

impl Default for EnvOptions {
    fn default() -> Self {
        Self {
            store_mode: StoreMode::Normal,
            auth_token: Some(TEST_UID.to_string()),
            config: Vec::new(),
        }
    }
}

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含应用状态与用于准备数据的底层存储
pub struct ApiTestEnv {
    pub db_path: String,
    pub state: AppState,

    /// 底层存储（绕过慢速/失败包装,用于准备数据）
    pub raw_store: Arc<SqliteDocumentStore>,
    pub raw_orders: OrderRepository,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境（已登录,远端正常）
    pub async fn new() -> Result<Self, String> {
        Self::with_options(EnvOptions::default()).await
    }

    /// 按选项创建测试环境
    ///
    /// # 说明
    /// - 使用临时数据库文件
    /// - 拍照上传无延迟
    pub async fn with_options(options: EnvOptions) -> Result<Self, String> {
        inspection_tracker::logging::init_test();

        let temp_file = NamedTempFile::new().map_err(|e| format!("创建临时文件失败: {}", e))?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| "临时文件路径无效".to_string())?
            .to_string();

        let raw_store = Arc::new(
            SqliteDocumentStore::new(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?,
        );
        let config = ConfigManager::from_connection(raw_store.connection())
            .map_err(|e| format!("无法创建ConfigManager: {}", e))?;
        for (key, value) in &options.config {
            config
                .set_global_config_value(key, value)
                .map_err(|e| format!("写入配置失败: {}", e))?;
        }

        let store: Arc<dyn DocumentStore> = match options.store_mode {
            StoreMode::Normal => raw_store.clone(),
            StoreMode::Slow(delay) => Arc::new(SlowDocumentStore::new(raw_store.clone(), delay)),
            StoreMode::Failing => Arc::new(FailingDocumentStore::new(raw_store.clone())),
        };

        let env = RuntimeEnv {
            auth_token: Some(options.auth_token.unwrap_or_else(|| "bad token".to_string())),
            ..RuntimeEnv::default()
        }
        .with_app_id(TEST_APP_ID);

        let photos: Arc<dyn PhotoCapture> = Arc::new(MockPhotoCapture::new(
            "https://img.test",
            10,
            10,
            Duration::ZERO,
        ));

        let state = AppState::assemble(
            db_path.clone(),
            store,
            config,
            env,
            &LocalAuthProvider::new(),
            Some(photos),
        )
        .await?;

        let raw_orders = OrderRepository::new(raw_store.clone(), TEST_APP_ID)
            .map_err(|e| format!("无法创建OrderRepository: {}", e))?;

        Ok(Self {
            db_path,
            state,
            raw_store,
            raw_orders,
            _temp_file: temp_file,
        })
    }

    /// 直接写入采购单（不经过目录）
    pub async fn seed_order(&self, po_id: &str, document: &OrderDocument) {
        self.raw_orders
            .create(po_id, document)
            .await
            .expect("写入测试采购单失败");
    }
}

/// 轮询等待条件成立（实时推送在后台任务中处理）
pub async fn wait_until<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
