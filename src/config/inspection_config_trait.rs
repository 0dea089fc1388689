// ==========================================
// 出货检验追踪系统 - 检验配置读取 Trait
// ==========================================
// 职责: 定义目录/编辑器/拍照模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// InspectionConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait InspectionConfigReader: Send + Sync {
    // ===== 远端写入 =====

    /// 新建采购单的远端写入超时（毫秒）
    ///
    /// # 默认值
    /// - 2000
    async fn get_create_timeout_ms(&self) -> ConfigResult<u64>;

    // ===== 拍照上传 =====

    /// 模拟上传延迟（毫秒）
    ///
    /// # 默认值
    /// - 1200
    async fn get_upload_delay_ms(&self) -> ConfigResult<u64>;

    /// 上传照片后是否自动确认关卡
    ///
    /// # 默认值
    /// - true
    async fn get_photo_implies_pass(&self) -> ConfigResult<bool>;

    /// 占位图地址前缀
    ///
    /// # 默认值
    /// - https://picsum.photos/seed
    async fn get_photo_placeholder_base(&self) -> ConfigResult<String>;

    /// 占位图尺寸 (宽, 高)
    ///
    /// # 默认值
    /// - (1200, 800)
    async fn get_photo_dimensions(&self) -> ConfigResult<(u32, u32)>;
}
