// ==========================================
// 出货检验追踪系统 - 检验标准目录
// ==========================================
// 只读参考资料,不与检验结果做校验,不随采购单存储
// ==========================================

use crate::domain::types::Language;
use serde::Serialize;

// ==========================================
// LocalizedText - 三语文本
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    pub en: &'static str,
    pub cn: &'static str,
    pub vn: &'static str,
}

impl LocalizedText {
    pub fn get(&self, lang: Language) -> &'static str {
        match lang {
            Language::En => self.en,
            Language::Cn => self.cn,
            Language::Vn => self.vn,
        }
    }
}

// ==========================================
// InspectionSpec - 检验标准条目
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InspectionSpec {
    pub id: u8,
    pub category: LocalizedText,
    pub content: LocalizedText,
}

/// 固定的 6 条检验标准
pub const INSPECTION_SPECS: [InspectionSpec; 6] = [
    InspectionSpec {
        id: 1,
        category: LocalizedText {
            en: "Package",
            cn: "包裝",
            vn: "bao bì bên ngoài",
        },
        content: LocalizedText {
            en: "Check if the packing belt is secure, box is deformed or dirty; Box dimensions: L x W x H",
            cn: "打包帶：內盒有正確形狀、髒污；內盒長*寬*高。外觀檢查：箱子外觀是否變形、破損、髒污。",
            vn: "Độ chặt, hỏng của đai đóng gói, hộp không thể bị biến dạng, hư hỏng, bẩn, chiều dài * chiều rộng * chiều cao của hộp bên ngoài",
        },
    },
    InspectionSpec {
        id: 2,
        category: LocalizedText {
            en: "male and female box",
            cn: "內盒",
            vn: "hộp trong",
        },
        content: LocalizedText {
            en: "The male and female boxes need to be nailed; The appearance must not be deformed, dirty, color differences or damaged.",
            cn: "天地蓋紙盒，上下蓋需打釘，二側。外觀：變形、髒污、色差、破損。外觀：紙箱外觀，不應有髒污、破損、刮傷、受潮等。",
            vn: "Các nắp trên và dưới của hộp cần được đóng đinh, hộp có ba lớp. Ngoại hình: biến dạng, bụi bẩn, khác màu, thiếu chất liệu.",
        },
    },
    InspectionSpec {
        id: 3,
        category: LocalizedText {
            en: "Product label",
            cn: "產品標籤",
            vn: "dán nhãn sản phẩm",
        },
        content: LocalizedText {
            en: "White background with red text label, affix to both ends of the box. The content must be accurate.",
            cn: "*2張，白底紅字，貼於外盒兩側盒蓋正中間，內容及PO#須正確及清晰形貼標（上蓋上方）。",
            vn: "2 tờ, có chữ màu đỏ trên nền trắng, dán ở giữa nắp hộp và 2 mặt của hộp ngoài, ghi đúng nội dung, PO# và dán nhãn tròn trắng (ở nắp trên).",
        },
    },
    InspectionSpec {
        id: 4,
        category: LocalizedText {
            en: "Blind color",
            cn: "產品顏色",
            vn: "Sản phẩm hoàn thiện",
        },
        content: LocalizedText {
            en: "The overall color of the blinds must be consistent, with a ΔE ≤ 1 or a visual grade of 4 or higher.",
            cn: "*整體顏色一致性與標準樣做比對量測數據: ΔE值<1 或目視級4級以上。",
            vn: "Độ nhất quán của tổng thể so với liệu đo mẫu màu tiêu chuẩn: Giá trị ΔE <1 hoặc cao hơn cấp độ thị giác 4",
        },
    },
    InspectionSpec {
        id: 5,
        category: LocalizedText {
            en: "Complete package",
            cn: "完整包裝",
            vn: "Tất cả các phụ kiện",
        },
        content: LocalizedText {
            en: "The packaging must include: blinds + wand + valance + valance returns + hardware + EPE protective pads + PE film + cardboard, placed in designated positions.",
            cn: "*包含有:窗簾 + EPE保護墊 + PE增厚單張 + 頂飾片(含側飾) + 拉繩片轉角組 + 五金盒 +長形紙板放依指定位置。Bag 包含: Blinds+Wand+Valance returns+Hardware+EPE+PE+Paper board...",
            vn: "Bao gồm: Mành sáo +Đệm mút EPE+Túi PE+ Lá dự bị (gần cây xoay)+ Bộ đầu nối góc lá dự bị+hộp đựng phụ kiện+Các tông dài được đặt vào vị trí được chỉ định.",
        },
    },
    InspectionSpec {
        id: 6,
        category: LocalizedText {
            en: "Hardware",
            cn: "五金包",
            vn: "Bộ phận góc nhỏ",
        },
        content: LocalizedText {
            en: "The hardware box needs to include: Mounting brackets(Left+Right), Center Support Brackets, L connectors, Valance Clip, Bottomrail end cap, screws.",
            cn: "*1個，內容物數量及規格須確認要求包含有:五金盒，上封套，托架，L型轉角架，飾片支架，下封塞，六角螺絲各數量及規格。",
            vn: "1 cái, phải xác nhận số lượng và thông số kỹ thuật bên trong, yêu cầu bao gồm: hộp phụ kiện, nắp đậy, giá đỡ, đầu nối góc chữ L, kẹp lá dự bị, nắp chặn ray dưới và vít lục giác.",
        },
    },
];

// ==========================================
// LocalizedSpec - 单语视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedSpec {
    pub id: u8,
    pub category: String,
    pub content: String,
}

/// 按语言取出检验标准目录
pub fn localized_specs(lang: Language) -> Vec<LocalizedSpec> {
    INSPECTION_SPECS
        .iter()
        .map(|spec| LocalizedSpec {
            id: spec.id,
            category: spec.category.get(lang).to_string(),
            content: spec.content.get(lang).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_six_ordered_entries() {
        assert_eq!(INSPECTION_SPECS.len(), 6);
        for (i, spec) in INSPECTION_SPECS.iter().enumerate() {
            assert_eq!(spec.id as usize, i + 1);
            assert!(!spec.category.en.is_empty());
            assert!(!spec.content.vn.is_empty());
        }
    }

    #[test]
    fn test_localized_view() {
        let en = localized_specs(Language::En);
        assert_eq!(en[5].category, "Hardware");
        let cn = localized_specs(Language::Cn);
        assert_eq!(cn[0].category, "包裝");
        let vn = localized_specs(Language::Vn);
        assert_eq!(vn[1].category, "hộp trong");
    }
}
