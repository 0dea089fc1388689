// ==========================================
// 出货检验追踪系统 - 引擎层
// ==========================================
// 职责: 远端同步与拍照上传
// 红线: Engine 不拼 SQL,不持有界面状态
// ==========================================

pub mod photo_capture;
pub mod sync_gateway;

// 重导出核心引擎
pub use photo_capture::{CaptureError, MockPhotoCapture, PhotoCapture, PhotoRequest};
pub use sync_gateway::{SyncGateway, SyncOutcome};
