use crate::api::error::{ApiError, ApiResult};
use crate::domain::step::STEPS_PER_WORK_ORDER;

use super::core::OrderEditor;

/// 导航结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// 已切换到指定关卡
    Moved { step_index: usize },
    /// 已退出编辑器回到目录
    Exited,
}

// 导航只改变本地位置,不推送;已提交的采购单也可浏览
impl OrderEditor {
    /// 下一关卡（当前关卡须已完成）
    pub fn next_step(&mut self) -> ApiResult<NavOutcome> {
        let order = self.order_mut()?;
        if !order.active_step().is_some_and(|s| s.is_complete()) {
            return Err(ApiError::StepIncomplete {
                step: order.active_step + 1,
            });
        }
        if order.active_step + 1 >= STEPS_PER_WORK_ORDER {
            return Err(ApiError::InvalidInput("已是最后一关,请完成检验".to_string()));
        }
        order.active_step += 1;
        Ok(NavOutcome::Moved {
            step_index: order.active_step,
        })
    }

    /// 上一关卡;第一关时退出编辑器
    pub fn previous_step(&mut self) -> ApiResult<NavOutcome> {
        let order = self.order_mut()?;
        if order.active_step == 0 {
            self.close();
            return Ok(NavOutcome::Exited);
        }
        order.active_step -= 1;
        Ok(NavOutcome::Moved {
            step_index: order.active_step,
        })
    }

    /// 切换工单,关卡回到第一关
    pub fn select_work_order(&mut self, wo_index: usize) -> ApiResult<()> {
        let order = self.order_mut()?;
        order.check_wo(wo_index)?;
        order.active_wo = wo_index;
        order.active_step = 0;
        Ok(())
    }
}
