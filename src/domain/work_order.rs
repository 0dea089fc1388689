// ==========================================
// 出货检验追踪系统 - 工单领域模型
// ==========================================
// 一张工单 = 一个受检生产批次,包含 4 个固定检验关卡
// 对齐: 文档 workOrders[] 字段 (snake_case)
// ==========================================

use crate::domain::date_text;
use crate::domain::step::{InspectionStep, StepUpdate, STEPS_PER_WORK_ORDER};
use crate::domain::types::InspectionResult;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// WorkOrder - 工单
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub wo_id: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub prod_date: String, // YYYY/MM/DD
    #[serde(default)]
    pub inspect_date: String, // YYYY/MM/DD
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub prod_qty: String,
    #[serde(default)]
    pub inspect_qty: String,
    #[serde(default)]
    pub failed_qty: String,
    #[serde(default)]
    pub result: InspectionResult,
    #[serde(default = "InspectionStep::default_set")]
    pub steps: Vec<InspectionStep>,
}

impl WorkOrder {
    /// 按序号生成工单标签（WO-01, WO-02, ...）
    pub fn label_for(seq: u32) -> String {
        format!("WO-{:02}", seq)
    }

    /// 创建空白工单
    ///
    /// # 参数
    /// - `seq`: 工单序号（从 1 开始）
    /// - `today`: 今天的存储形式日期（YYYY/MM/DD）,同时写入生产日与检验日
    pub fn new(seq: u32, today: &str) -> Self {
        Self {
            wo_id: Self::label_for(seq),
            customer_id: String::new(),
            prod_date: today.to_string(),
            inspect_date: today.to_string(),
            size: String::new(),
            color: String::new(),
            prod_qty: String::new(),
            inspect_qty: String::new(),
            failed_qty: "0".to_string(),
            result: InspectionResult::Pass,
            steps: InspectionStep::default_set(),
        }
    }

    /// 已完成关卡数
    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.is_complete()).count()
    }

    /// 是否完成（全部关卡完成）
    ///
    /// 关卡数不足 4 的残缺工单视为未完成
    pub fn is_complete(&self) -> bool {
        self.steps.len() == STEPS_PER_WORK_ORDER && self.steps.iter().all(|s| s.is_complete())
    }

    /// 读取字段的存储值
    pub fn field(&self, field: WorkOrderField) -> String {
        match field {
            WorkOrderField::CustomerId => self.customer_id.clone(),
            WorkOrderField::ProdDate => self.prod_date.clone(),
            WorkOrderField::InspectDate => self.inspect_date.clone(),
            WorkOrderField::Size => self.size.clone(),
            WorkOrderField::Color => self.color.clone(),
            WorkOrderField::ProdQty => self.prod_qty.clone(),
            WorkOrderField::InspectQty => self.inspect_qty.clone(),
            WorkOrderField::FailedQty => self.failed_qty.clone(),
            WorkOrderField::Result => self.result.as_str().to_string(),
        }
    }

    /// 读取字段的编辑控件值（日期字段转换为 YYYY-MM-DD）
    pub fn widget_value(&self, field: WorkOrderField) -> String {
        let stored = self.field(field);
        if field.is_date() {
            date_text::to_widget(&stored)
        } else {
            stored
        }
    }

    /// 写入字段
    ///
    /// 日期字段统一转换为斜线形式,其余字段原样写入。
    ///
    /// # 返回
    /// - `Ok(())`: 写入成功
    /// - `Err(value)`: 判定结果字段的值不在允许范围内
    pub fn set_field(&mut self, field: WorkOrderField, value: &str) -> Result<(), String> {
        match field {
            WorkOrderField::CustomerId => self.customer_id = value.to_string(),
            WorkOrderField::ProdDate => self.prod_date = date_text::to_canonical(value),
            WorkOrderField::InspectDate => self.inspect_date = date_text::to_canonical(value),
            WorkOrderField::Size => self.size = value.to_string(),
            WorkOrderField::Color => self.color = value.to_string(),
            WorkOrderField::ProdQty => self.prod_qty = value.to_string(),
            WorkOrderField::InspectQty => self.inspect_qty = value.to_string(),
            WorkOrderField::FailedQty => self.failed_qty = value.to_string(),
            WorkOrderField::Result => {
                self.result = InspectionResult::parse(value).ok_or_else(|| value.to_string())?;
            }
        }
        Ok(())
    }

    /// 对指定关卡应用局部更新
    ///
    /// # 返回
    /// - `false`: 关卡序号越界
    pub fn update_step(&mut self, step_index: usize, update: &StepUpdate) -> bool {
        match self.steps.get_mut(step_index) {
            Some(step) => {
                step.apply(update);
                true
            }
            None => false,
        }
    }
}

// ==========================================
// WorkOrderField - 可编辑字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkOrderField {
    CustomerId,
    ProdDate,
    InspectDate,
    Size,
    Color,
    ProdQty,
    InspectQty,
    FailedQty,
    Result,
}

impl WorkOrderField {
    /// 文档中的字段名
    pub fn key(&self) -> &'static str {
        match self {
            WorkOrderField::CustomerId => "customer_id",
            WorkOrderField::ProdDate => "prod_date",
            WorkOrderField::InspectDate => "inspect_date",
            WorkOrderField::Size => "size",
            WorkOrderField::Color => "color",
            WorkOrderField::ProdQty => "prod_qty",
            WorkOrderField::InspectQty => "inspect_qty",
            WorkOrderField::FailedQty => "failed_qty",
            WorkOrderField::Result => "result",
        }
    }

    /// 由文档字段名解析
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "customer_id" => Some(WorkOrderField::CustomerId),
            "prod_date" => Some(WorkOrderField::ProdDate),
            "inspect_date" => Some(WorkOrderField::InspectDate),
            "size" => Some(WorkOrderField::Size),
            "color" => Some(WorkOrderField::Color),
            "prod_qty" => Some(WorkOrderField::ProdQty),
            "inspect_qty" => Some(WorkOrderField::InspectQty),
            "failed_qty" => Some(WorkOrderField::FailedQty),
            "result" => Some(WorkOrderField::Result),
            _ => None,
        }
    }

    /// 是否为日期字段
    pub fn is_date(&self) -> bool {
        matches!(self, WorkOrderField::ProdDate | WorkOrderField::InspectDate)
    }
}

impl fmt::Display for WorkOrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
