// ==========================================
// 出货检验追踪系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为用户友好的错误消息
// 所有错误信息必须包含显式原因
// ==========================================

use crate::engine::CaptureError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与资源错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("采购单已存在: {0}")]
    AlreadyExists(String),

    // ==========================================
    // 编辑器状态错误
    // ==========================================
    /// 已提交的采购单只读
    #[error("采购单已提交，不可修改: {0}")]
    OrderSubmitted(String),

    #[error("尚未载入采购单")]
    OrderNotLoaded,

    #[error("索引越界: {what}={index}, 共{len}项")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("当前关卡未完成: 关卡{step}")]
    StepIncomplete { step: usize },

    #[error("请先上传照片: 关卡{step}")]
    PhotoRequired { step: usize },

    #[error("照片上传中: 工单{wo_index} 关卡{step_index}")]
    UploadInProgress { wo_index: usize, step_index: usize },

    #[error("照片上传失败: {0}")]
    UploadFailed(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { collection, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", collection, id))
            }
            RepositoryError::InvalidPath(msg) => ApiError::InvalidInput(msg),
            RepositoryError::SerializationError(msg) => {
                ApiError::InternalError(format!("文档格式错误: {}", msg))
            }
            RepositoryError::DatabaseConnectionError(msg) => {
                ApiError::DatabaseError(format!("数据库连接失败: {}", msg))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::Unavailable(msg) => ApiError::DatabaseError(format!("远端不可用: {}", msg)),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<CaptureError> for ApiError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::EmptyFile => ApiError::InvalidInput(err.to_string()),
            CaptureError::UploadFailed(msg) => ApiError::UploadFailed(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
