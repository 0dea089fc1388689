// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use inspection_tracker::domain::order::OrderDocument;
use inspection_tracker::domain::step::StepUpdate;
use inspection_tracker::domain::types::{PoStatus, ShipTo};

// ==========================================
// OrderDocument 构建器
// ==========================================

pub struct OrderBuilder {
    ship_to: ShipTo,
    created_at: String,
    status: PoStatus,
    work_orders: usize,
    /// 每张工单已完成的关卡数（按工单顺序）
    completed_steps: Vec<usize>,
}

impl OrderBuilder {
    pub fn new() -> Self {
        Self {
            ship_to: ShipTo::As5645,
            created_at: "2024-01-15T08:00:00.000Z".to_string(),
            status: PoStatus::Draft,
            work_orders: 1,
            completed_steps: Vec::new(),
        }
    }

    pub fn ship_to(mut self, ship_to: ShipTo) -> Self {
        self.ship_to = ship_to;
        self
    }

    pub fn created_at(mut self, created_at: &str) -> Self {
        self.created_at = created_at.to_string();
        self
    }

    pub fn submitted(mut self) -> Self {
        self.status = PoStatus::Submitted;
        self
    }

    pub fn work_orders(mut self, count: usize) -> Self {
        self.work_orders = count;
        self
    }

    pub fn completed_steps(mut self, steps: &[usize]) -> Self {
        self.completed_steps = steps.to_vec();
        self
    }

    pub fn build(self) -> OrderDocument {
        let today = self.created_at.get(..10).unwrap_or("2024-01-15").replace('-', "/");
        let mut doc = OrderDocument::new_initial(
            self.ship_to,
            self.created_at.clone(),
            "builder".to_string(),
            &today,
        );
        while doc.work_orders.len() < self.work_orders {
            doc.append_work_order(&today);
        }
        for (wo, done) in doc.work_orders.iter_mut().zip(self.completed_steps.iter()) {
            for step in 0..(*done).min(wo.steps.len()) {
                wo.update_step(
                    step,
                    &StepUpdate::photo_uploaded(format!("https://img.test/{}-{}", wo.wo_id, step), true),
                );
            }
        }
        doc.status = self.status;
        doc
    }
}
