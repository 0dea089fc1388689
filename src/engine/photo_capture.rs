// ==========================================
// 出货检验追踪系统 - 拍照上传
// ==========================================
// 职责: 接收关卡照片并返回可访问的图片地址
// 当前实现: 固定延迟后返回占位图地址（可替换为对象存储上传）
// ==========================================

use crate::config::InspectionSettings;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("未选择照片")]
    EmptyFile,

    #[error("照片上传失败: {0}")]
    UploadFailed(String),
}

/// 一次上传请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRequest {
    pub po_id: String,
    pub wo_index: usize,
    pub step_index: usize,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

// ==========================================
// PhotoCapture Trait
// ==========================================
#[async_trait]
pub trait PhotoCapture: Send + Sync {
    /// 上传照片
    ///
    /// # 返回
    /// - Ok(url): 图片地址
    async fn upload(&self, request: &PhotoRequest) -> Result<String, CaptureError>;
}

// ==========================================
// MockPhotoCapture - 占位图上传
// ==========================================
// 地址形如 {base}/{po}-{wo}-{step}-{millis}/{width}/{height}
#[derive(Debug, Clone)]
pub struct MockPhotoCapture {
    base: String,
    width: u32,
    height: u32,
    delay: Duration,
}

impl MockPhotoCapture {
    pub fn new(base: impl Into<String>, width: u32, height: u32, delay: Duration) -> Self {
        Self {
            base: base.into(),
            width,
            height,
            delay,
        }
    }

    pub fn from_settings(settings: &InspectionSettings) -> Self {
        Self::new(
            settings.photo_placeholder_base.clone(),
            settings.photo_width,
            settings.photo_height,
            settings.upload_delay,
        )
    }

    /// 生成占位图地址
    pub fn placeholder_url(&self, request: &PhotoRequest, millis: i64) -> String {
        format!(
            "{}/{}-{}-{}-{}/{}/{}",
            self.base,
            request.po_id,
            request.wo_index,
            request.step_index,
            millis,
            self.width,
            self.height
        )
    }
}

#[async_trait]
impl PhotoCapture for MockPhotoCapture {
    async fn upload(&self, request: &PhotoRequest) -> Result<String, CaptureError> {
        if request.bytes.is_empty() {
            return Err(CaptureError::EmptyFile);
        }
        tokio::time::sleep(self.delay).await;
        let url = self.placeholder_url(request, chrono::Utc::now().timestamp_millis());
        tracing::debug!(
            po_id = %request.po_id,
            wo_index = request.wo_index,
            step_index = request.step_index,
            file_name = %request.file_name,
            url = %url,
            "照片上传完成"
        );
        Ok(url)
    }
}
