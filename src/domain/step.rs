// ==========================================
// 出货检验追踪系统 - 检验关卡领域模型
// ==========================================
// 每张工单固定 4 个关卡,以位置识别（1..4）
// 完成条件: 已拍照 且 已确认
// ==========================================

use serde::{Deserialize, Serialize};

/// 每张工单的关卡数
pub const STEPS_PER_WORK_ORDER: usize = 4;

// ==========================================
// StepTemplate - 关卡目录项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTemplate {
    pub id: u8,
    pub title: &'static str,
    pub description: &'static str,
}

/// 固定的关卡目录（顺序即关卡序号）
pub const STEP_CATALOG: [StepTemplate; STEPS_PER_WORK_ORDER] = [
    StepTemplate {
        id: 1,
        title: "Blind overview - Closed slat",
        description: "盲窗概覽：請確認葉片處於「完全閉合」狀態，檢查整體外觀與遮光性。",
    },
    StepTemplate {
        id: 2,
        title: "Blind overview - Opened slat",
        description: "盲窗概覽：請確認葉片處於「開啟」狀態，檢查梯繩平整度與運作順暢度。",
    },
    StepTemplate {
        id: 3,
        title: "Bottom rail label",
        description: "底軌標籤：請清晰拍攝底軌上的產品標籤，須包含規格、序號與製造資訊。",
    },
    StepTemplate {
        id: 4,
        title: "Completed package",
        description: "成品包裝：請拍攝產品裝箱後的封箱狀態、外箱標籤與保護材配置。",
    },
];

// ==========================================
// InspectionStep - 检验关卡
// ==========================================
// 对齐: 文档 workOrders[].steps[] 字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionStep {
    pub id: u8,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub remarks: String,

    // 上传中标记,仅存在于本地,不写入文档
    #[serde(skip)]
    pub is_uploading: bool,
}

impl InspectionStep {
    /// 由目录项创建空白关卡
    pub fn from_template(template: &StepTemplate) -> Self {
        Self {
            id: template.id,
            title: template.title.to_string(),
            description: template.description.to_string(),
            checked: false,
            photo_url: None,
            remarks: String::new(),
            is_uploading: false,
        }
    }

    /// 创建一组完整的空白关卡
    pub fn default_set() -> Vec<InspectionStep> {
        STEP_CATALOG.iter().map(Self::from_template).collect()
    }

    /// 是否已拍照
    pub fn has_photo(&self) -> bool {
        self.photo_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// 是否完成（已拍照 且 已确认）
    pub fn is_complete(&self) -> bool {
        self.has_photo() && self.checked
    }

    /// 合并局部更新
    pub fn apply(&mut self, update: &StepUpdate) {
        if let Some(checked) = update.checked {
            self.checked = checked;
        }
        if let Some(photo_url) = &update.photo_url {
            self.photo_url = photo_url.clone();
        }
        if let Some(remarks) = &update.remarks {
            self.remarks = remarks.clone();
        }
        if let Some(is_uploading) = update.is_uploading {
            self.is_uploading = is_uploading;
        }
    }
}

// ==========================================
// StepUpdate - 关卡局部更新
// ==========================================
// None 表示不修改该字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepUpdate {
    pub checked: Option<bool>,
    pub photo_url: Option<Option<String>>,
    pub remarks: Option<String>,
    pub is_uploading: Option<bool>,
}

impl StepUpdate {
    pub fn checked(checked: bool) -> Self {
        Self {
            checked: Some(checked),
            ..Self::default()
        }
    }

    pub fn remarks(remarks: impl Into<String>) -> Self {
        Self {
            remarks: Some(remarks.into()),
            ..Self::default()
        }
    }

    /// 开始上传
    pub fn uploading() -> Self {
        Self {
            is_uploading: Some(true),
            ..Self::default()
        }
    }

    /// 上传完成: 写入照片并清除上传标记
    pub fn photo_uploaded(url: impl Into<String>, mark_checked: bool) -> Self {
        Self {
            checked: mark_checked.then_some(true),
            photo_url: Some(Some(url.into())),
            remarks: None,
            is_uploading: Some(false),
        }
    }

    /// 此更新是否将关卡置为上传中（上传中不写入远端）
    pub fn starts_upload(&self) -> bool {
        self.is_uploading == Some(true)
    }
}
