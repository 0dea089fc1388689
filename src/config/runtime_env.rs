// ==========================================
// 出货检验追踪系统 - 运行环境注入配置
// ==========================================
// 来源: 进程环境变量
// - INSPECTION_BACKEND_CONFIG: 后端凭据 (JSON)
// - INSPECTION_APP_ID: 应用 ID,决定集合路径
// - INSPECTION_AUTH_TOKEN: 预发登录令牌（可选）
// - INSPECTION_DB_PATH: 本地存储路径（可选）
// ==========================================

use serde_json::{Map, Value};

pub const ENV_BACKEND_CONFIG: &str = "INSPECTION_BACKEND_CONFIG";
pub const ENV_APP_ID: &str = "INSPECTION_APP_ID";
pub const ENV_AUTH_TOKEN: &str = "INSPECTION_AUTH_TOKEN";
pub const ENV_DB_PATH: &str = "INSPECTION_DB_PATH";

/// 默认应用 ID
pub const DEFAULT_APP_ID: &str = "inspection-master-pro";

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeEnv {
    pub backend_config: Map<String, Value>,
    pub app_id: String,
    pub auth_token: Option<String>,
    pub db_path: Option<String>,
}

impl Default for RuntimeEnv {
    fn default() -> Self {
        Self {
            backend_config: Map::new(),
            app_id: DEFAULT_APP_ID.to_string(),
            auth_token: None,
            db_path: None,
        }
    }
}

impl RuntimeEnv {
    /// 从进程环境变量读取
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取
    ///
    /// 空值视为未设置;后端配置不是 JSON 对象时记录告警并忽略
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let backend_config = match read(ENV_BACKEND_CONFIG) {
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    tracing::warn!(env = ENV_BACKEND_CONFIG, "后端配置不是 JSON 对象，已忽略");
                    Map::new()
                }
                Err(e) => {
                    tracing::warn!(env = ENV_BACKEND_CONFIG, error = %e, "后端配置解析失败，已忽略");
                    Map::new()
                }
            },
            None => Map::new(),
        };

        Self {
            backend_config,
            app_id: read(ENV_APP_ID).unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
            auth_token: read(ENV_AUTH_TOKEN),
            db_path: read(ENV_DB_PATH),
        }
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}
