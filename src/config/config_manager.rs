// ==========================================
// 出货检验追踪系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::inspection_config_trait::{ConfigResult, InspectionConfigReader};
use crate::db::{ensure_schema, open_in_memory_connection, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 内存配置（测试用）
    pub fn in_memory() -> ConfigResult<Self> {
        let conn = open_in_memory_connection()?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接幂等建表,保证 config_kv 存在。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 此方法会覆盖现有的 global 配置
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }

    fn get_u64_or(&self, key: &str, default: u64) -> ConfigResult<u64> {
        let value = self.get_config_or_default(key, &default.to_string())?;
        Ok(value.trim().parse::<u64>().unwrap_or_else(|_| {
            tracing::warn!(config_key = key, raw_value = %value, "配置格式错误，使用默认值");
            default
        }))
    }

    /// 一次性读取全部检验配置
    pub async fn load_settings(&self) -> ConfigResult<InspectionSettings> {
        let (photo_width, photo_height) = self.get_photo_dimensions().await?;
        Ok(InspectionSettings {
            create_timeout: Duration::from_millis(self.get_create_timeout_ms().await?),
            upload_delay: Duration::from_millis(self.get_upload_delay_ms().await?),
            photo_implies_pass: self.get_photo_implies_pass().await?,
            photo_placeholder_base: self.get_photo_placeholder_base().await?,
            photo_width,
            photo_height,
        })
    }
}

// ==========================================
// InspectionConfigReader Trait 实现
// ==========================================
#[async_trait]
impl InspectionConfigReader for ConfigManager {
    async fn get_create_timeout_ms(&self) -> ConfigResult<u64> {
        self.get_u64_or(config_keys::CREATE_TIMEOUT_MS, defaults::CREATE_TIMEOUT_MS)
    }

    async fn get_upload_delay_ms(&self) -> ConfigResult<u64> {
        self.get_u64_or(config_keys::UPLOAD_DELAY_MS, defaults::UPLOAD_DELAY_MS)
    }

    async fn get_photo_implies_pass(&self) -> ConfigResult<bool> {
        let value = self.get_config_or_default(config_keys::PHOTO_IMPLIES_PASS, "true")?;
        match value.trim().to_lowercase().as_str() {
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Ok(true), // 默认 true
        }
    }

    async fn get_photo_placeholder_base(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(
            config_keys::PHOTO_PLACEHOLDER_BASE,
            defaults::PHOTO_PLACEHOLDER_BASE,
        )?;
        let trimmed = value.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            Ok(defaults::PHOTO_PLACEHOLDER_BASE.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }

    async fn get_photo_dimensions(&self) -> ConfigResult<(u32, u32)> {
        let width = self.get_u64_or(config_keys::PHOTO_WIDTH, defaults::PHOTO_WIDTH as u64)?;
        let height = self.get_u64_or(config_keys::PHOTO_HEIGHT, defaults::PHOTO_HEIGHT as u64)?;
        let width = u32::try_from(width).unwrap_or(defaults::PHOTO_WIDTH);
        let height = u32::try_from(height).unwrap_or(defaults::PHOTO_HEIGHT);
        Ok((width, height))
    }
}

// ==========================================
// InspectionSettings - 检验配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionSettings {
    pub create_timeout: Duration,
    pub upload_delay: Duration,
    pub photo_implies_pass: bool,
    pub photo_placeholder_base: String,
    pub photo_width: u32,
    pub photo_height: u32,
}

impl Default for InspectionSettings {
    fn default() -> Self {
        Self {
            create_timeout: Duration::from_millis(defaults::CREATE_TIMEOUT_MS),
            upload_delay: Duration::from_millis(defaults::UPLOAD_DELAY_MS),
            photo_implies_pass: true,
            photo_placeholder_base: defaults::PHOTO_PLACEHOLDER_BASE.to_string(),
            photo_width: defaults::PHOTO_WIDTH,
            photo_height: defaults::PHOTO_HEIGHT,
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 远端写入
    pub const CREATE_TIMEOUT_MS: &str = "create_timeout_ms";

    // 拍照上传
    pub const UPLOAD_DELAY_MS: &str = "upload_delay_ms";
    pub const PHOTO_IMPLIES_PASS: &str = "photo_implies_pass";
    pub const PHOTO_PLACEHOLDER_BASE: &str = "photo_placeholder_base";
    pub const PHOTO_WIDTH: &str = "photo_width";
    pub const PHOTO_HEIGHT: &str = "photo_height";
}

pub mod defaults {
    pub const CREATE_TIMEOUT_MS: u64 = 2_000;
    pub const UPLOAD_DELAY_MS: u64 = 1_200;
    pub const PHOTO_PLACEHOLDER_BASE: &str = "https://picsum.photos/seed";
    pub const PHOTO_WIDTH: u32 = 1200;
    pub const PHOTO_HEIGHT: u32 = 800;
}
