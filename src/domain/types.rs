// ==========================================
// 出货检验追踪系统 - 领域类型定义
// ==========================================
// 采购单状态 / 工单判定结果 / 出货地 / 语言
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 采购单状态 (PO Status)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与文档存储一致)
// 红线: SUBMITTED 为终态,不可回退
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoStatus {
    #[default]
    Draft, // 草稿(可编辑)
    Submitted, // 已提交(只读)
}

impl fmt::Display for PoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoStatus::Draft => write!(f, "DRAFT"),
            PoStatus::Submitted => write!(f, "SUBMITTED"),
        }
    }
}

impl PoStatus {
    /// 从字符串解析状态（未知值视为 DRAFT）
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "SUBMITTED" => PoStatus::Submitted,
            _ => PoStatus::Draft,
        }
    }

    /// 是否为只读终态
    pub fn is_read_only(&self) -> bool {
        matches!(self, PoStatus::Submitted)
    }
}

// ==========================================
// 工单判定结果 (Inspection Result)
// ==========================================
// 存储值为中文字面量,与历史文档保持一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InspectionResult {
    #[default]
    #[serde(rename = "合格")]
    Pass,
    #[serde(rename = "不合格")]
    Fail,
    #[serde(rename = "待處理")]
    Pending,
}

impl InspectionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionResult::Pass => "合格",
            InspectionResult::Fail => "不合格",
            InspectionResult::Pending => "待處理",
        }
    }

    /// 解析存储值,同时接受英文别名
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "合格" | "PASS" | "Pass" => Some(InspectionResult::Pass),
            "不合格" | "FAIL" | "Fail" => Some(InspectionResult::Fail),
            "待處理" | "PENDING" | "Pending" => Some(InspectionResult::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for InspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 出货地代码 (ShipTo)
// ==========================================
// 固定枚举集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShipTo {
    #[default]
    #[serde(rename = "AS5645")]
    As5645,
    #[serde(rename = "AS5752")]
    As5752,
    #[serde(rename = "ASGUS6")]
    Asgus6,
    #[serde(rename = "TG0075")]
    Tg0075,
    #[serde(rename = "TG0083")]
    Tg0083,
    #[serde(rename = "TG0099")]
    Tg0099,
}

impl ShipTo {
    /// 全部出货地（下拉选单顺序）
    pub const ALL: [ShipTo; 6] = [
        ShipTo::As5645,
        ShipTo::As5752,
        ShipTo::Asgus6,
        ShipTo::Tg0075,
        ShipTo::Tg0083,
        ShipTo::Tg0099,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipTo::As5645 => "AS5645",
            ShipTo::As5752 => "AS5752",
            ShipTo::Asgus6 => "ASGUS6",
            ShipTo::Tg0075 => "TG0075",
            ShipTo::Tg0083 => "TG0083",
            ShipTo::Tg0099 => "TG0099",
        }
    }

    /// 解析出货地代码（忽略大小写与首尾空白）
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim().to_uppercase();
        Self::ALL.iter().copied().find(|s| s.as_str() == code)
    }
}

impl fmt::Display for ShipTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 语言 (Language)
// ==========================================
// 检验标准目录的三种语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En, // 英文
    Cn, // 中文
    Vn, // 越南文
}

impl Language {
    /// 由 i18n locale 代码映射（未知 locale 回退中文）
    pub fn from_locale(locale: &str) -> Self {
        let lower = locale.to_lowercase();
        if lower.starts_with("en") {
            Language::En
        } else if lower.starts_with("vi") || lower.starts_with("vn") {
            Language::Vn
        } else {
            Language::Cn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_po_status_serde() {
        assert_eq!(
            serde_json::to_string(&PoStatus::Submitted).unwrap(),
            "\"SUBMITTED\""
        );
        let status: PoStatus = serde_json::from_str("\"DRAFT\"").unwrap();
        assert_eq!(status, PoStatus::Draft);
        assert!(PoStatus::Submitted.is_read_only());
        assert_eq!(PoStatus::from_str("garbage"), PoStatus::Draft);
    }

    #[test]
    fn test_inspection_result_uses_chinese_literals() {
        assert_eq!(
            serde_json::to_string(&InspectionResult::Fail).unwrap(),
            "\"不合格\""
        );
        let r: InspectionResult = serde_json::from_str("\"待處理\"").unwrap();
        assert_eq!(r, InspectionResult::Pending);
        assert_eq!(InspectionResult::parse("PASS"), Some(InspectionResult::Pass));
        assert_eq!(InspectionResult::parse("unknown"), None);
    }

    #[test]
    fn test_ship_to_parse() {
        assert_eq!(ShipTo::parse(" as5645 "), Some(ShipTo::As5645));
        assert_eq!(ShipTo::parse("TG0099"), Some(ShipTo::Tg0099));
        assert_eq!(ShipTo::parse("XX0000"), None);
        assert_eq!(serde_json::to_string(&ShipTo::Asgus6).unwrap(), "\"ASGUS6\"");
    }

    #[test]
    fn test_language_from_locale() {
        assert_eq!(Language::from_locale("en"), Language::En);
        assert_eq!(Language::from_locale("vi"), Language::Vn);
        assert_eq!(Language::from_locale("zh-TW"), Language::Cn);
    }
}
