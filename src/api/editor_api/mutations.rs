use crate::api::error::{ApiError, ApiResult};
use crate::domain::date_text;
use crate::domain::step::{StepUpdate, STEPS_PER_WORK_ORDER};
use crate::domain::types::PoStatus;
use crate::domain::work_order::WorkOrderField;
use crate::engine::{PhotoRequest, SyncOutcome};
use crate::i18n::t_with_args;

use super::core::OrderEditor;

/// 删除工单结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// 删除的是最后一张工单,整张采购单已删除,编辑器已关闭
    OrderDeleted { po_id: String },
    /// 工单已移除
    WorkOrderRemoved {
        wo_id: String,
        remaining: usize,
        sync: SyncOutcome,
    },
}

/// 提交结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 状态已转为 SUBMITTED
    Submitted(SyncOutcome),
    /// 尚有未完成的工单,未写入
    Incomplete { completed: usize, total: usize },
    /// 已是 SUBMITTED,未写入
    AlreadySubmitted,
}

/// 新增工单结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderAdded {
    pub index: usize,
    pub wo_id: String,
    pub sync: SyncOutcome,
}

// 每个修改操作先消化已排队的远端推送（含自身写入的回声）,
// 推送失败后队列中不会残留旧快照覆盖本地修改
impl OrderEditor {
    // ==========================================
    // 工单字段
    // ==========================================

    /// 修改工单字段
    ///
    /// 日期字段接受 YYYY-MM-DD,统一保存为 YYYY/MM/DD
    pub async fn update_field(
        &mut self,
        wo_index: usize,
        field: WorkOrderField,
        value: &str,
    ) -> ApiResult<SyncOutcome> {
        self.sync_remote_updates();
        let order = self.editable_mut()?;
        order.check_wo(wo_index)?;
        order.document.work_orders[wo_index]
            .set_field(field, value)
            .map_err(|v| ApiError::InvalidInput(format!("判定结果不在允许范围: {}", v)))?;
        tracing::debug!(po_id = %order.po_id, wo_index, field = %field, "工单字段已修改");
        Ok(self.push().await)
    }

    // ==========================================
    // 检验关卡
    // ==========================================

    /// 合并关卡局部更新
    ///
    /// 将关卡置为上传中的更新不推送
    pub async fn update_step(
        &mut self,
        wo_index: usize,
        step_index: usize,
        update: StepUpdate,
    ) -> ApiResult<SyncOutcome> {
        self.sync_remote_updates();
        let order = self.editable_mut()?;
        order.check_step(wo_index, step_index)?;
        order.document.work_orders[wo_index].update_step(step_index, &update);

        if update.starts_upload() {
            return Ok(SyncOutcome::Skipped("照片上传中".to_string()));
        }
        Ok(self.push().await)
    }

    /// 修改关卡备注
    pub async fn update_remarks(
        &mut self,
        wo_index: usize,
        step_index: usize,
        remarks: &str,
    ) -> ApiResult<SyncOutcome> {
        self.update_step(wo_index, step_index, StepUpdate::remarks(remarks))
            .await
    }

    /// 切换关卡确认状态（须已拍照）
    pub async fn toggle_check(&mut self, wo_index: usize, step_index: usize) -> ApiResult<SyncOutcome> {
        self.sync_remote_updates();
        let checked = {
            let order = self.editable_mut()?;
            order.check_step(wo_index, step_index)?;
            let step = &order.document.work_orders[wo_index].steps[step_index];
            if !step.has_photo() {
                return Err(ApiError::PhotoRequired { step: step_index + 1 });
            }
            !step.checked
        };
        self.update_step(wo_index, step_index, StepUpdate::checked(checked))
            .await
    }

    // ==========================================
    // 拍照上传
    // ==========================================

    /// 标记关卡上传中（不推送）
    pub fn begin_upload(
        &mut self,
        wo_index: usize,
        step_index: usize,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<PhotoRequest> {
        self.sync_remote_updates();
        let order = self.editable_mut()?;
        order.check_step(wo_index, step_index)?;

        let wo = &mut order.document.work_orders[wo_index];
        if wo.steps[step_index].is_uploading {
            return Err(ApiError::UploadInProgress { wo_index, step_index });
        }
        wo.update_step(step_index, &StepUpdate::uploading());

        tracing::debug!(po_id = %order.po_id, wo_index, step_index, "开始上传照片");
        Ok(PhotoRequest {
            po_id: order.po_id.clone(),
            wo_index,
            step_index,
            file_name: file_name.to_string(),
            bytes,
        })
    }

    /// 上传完成: 写入照片地址、清除上传标记,按配置自动确认,然后推送
    pub async fn finish_upload(
        &mut self,
        wo_index: usize,
        step_index: usize,
        url: &str,
    ) -> ApiResult<SyncOutcome> {
        let mark_checked = self.photo_implies_pass;
        self.update_step(wo_index, step_index, StepUpdate::photo_uploaded(url, mark_checked))
            .await
    }

    /// 上传失败: 清除上传标记（不推送）
    pub fn fail_upload(&mut self, wo_index: usize, step_index: usize) {
        if let Ok(order) = self.order_mut() {
            if let Some(step) = order
                .document
                .work_orders
                .get_mut(wo_index)
                .and_then(|wo| wo.steps.get_mut(step_index))
            {
                step.is_uploading = false;
            }
        }
    }

    /// 为当前关卡上传照片
    pub async fn upload_photo(&mut self, file_name: &str, bytes: Vec<u8>) -> ApiResult<SyncOutcome> {
        let (wo_index, step_index) = self.active_position()?;
        let request = self.begin_upload(wo_index, step_index, file_name, bytes)?;

        let photos = self.photos.clone();
        match photos.upload(&request).await {
            Ok(url) => self.finish_upload(wo_index, step_index, &url).await,
            Err(e) => {
                tracing::error!(po_id = %request.po_id, wo_index, step_index, error = %e, "照片上传失败");
                self.fail_upload(wo_index, step_index);
                Err(e.into())
            }
        }
    }

    // ==========================================
    // 工单增删
    // ==========================================

    /// 新增空白工单并切换到该工单的第一关
    pub async fn add_work_order(&mut self) -> ApiResult<WorkOrderAdded> {
        self.sync_remote_updates();
        let order = self.editable_mut()?;
        let index = order
            .document
            .append_work_order(&date_text::today_canonical());
        order.active_wo = index;
        order.active_step = 0;

        let wo_id = order.document.work_orders[index].wo_id.clone();
        tracing::info!(po_id = %order.po_id, wo_id = %wo_id, "新增工单");

        let sync = self.push().await;
        Ok(WorkOrderAdded { index, wo_id, sync })
    }

    /// 删除确认提示
    pub fn delete_prompt(&self, wo_index: usize) -> ApiResult<String> {
        let order = self.order()?;
        order.check_wo(wo_index)?;
        if order.document.work_orders.len() <= 1 {
            Ok(t_with_args("editor.delete_last_prompt", &[("po", order.po_id.as_str())]))
        } else {
            let wo_id = &order.document.work_orders[wo_index].wo_id;
            Ok(t_with_args("editor.delete_prompt", &[("wo", wo_id.as_str())]))
        }
    }

    /// 删除工单
    ///
    /// 删除最后一张工单时删除整张采购单并关闭编辑器;
    /// 否则当前工单索引收敛为 min(当前, 剩余数-1),关卡回到第一关
    pub async fn delete_work_order(&mut self, wo_index: usize) -> ApiResult<DeleteOutcome> {
        self.sync_remote_updates();
        let order = self.editable_mut()?;
        order.check_wo(wo_index)?;

        if order.document.work_orders.len() <= 1 {
            let po_id = order.po_id.clone();
            self.gateway.orders().delete(&po_id).await?;
            self.loaded = None;
            tracing::info!(po_id = %po_id, "最后一张工单已删除,采购单随之删除");
            return Ok(DeleteOutcome::OrderDeleted { po_id });
        }

        let removed = order.document.work_orders.remove(wo_index);
        let remaining = order.document.work_orders.len();
        order.active_wo = order.active_wo.min(remaining - 1);
        order.active_step = 0;
        tracing::info!(po_id = %order.po_id, wo_id = %removed.wo_id, remaining, "工单已删除");

        let sync = self.push().await;
        Ok(DeleteOutcome::WorkOrderRemoved {
            wo_id: removed.wo_id,
            remaining,
            sync,
        })
    }

    // ==========================================
    // 提交
    // ==========================================

    /// 提交采购单
    ///
    /// 仅当全部工单的全部关卡均已完成时转为 SUBMITTED
    pub async fn submit(&mut self) -> ApiResult<SubmitOutcome> {
        self.sync_remote_updates();
        let order = self.order_mut()?;
        if order.document.status.is_read_only() {
            return Ok(SubmitOutcome::AlreadySubmitted);
        }
        if !order.document.all_complete() {
            let completed = order.document.completed_work_orders();
            let total = order.document.work_orders.len();
            tracing::info!(po_id = %order.po_id, completed, total, "尚有未完成工单,不提交");
            return Ok(SubmitOutcome::Incomplete { completed, total });
        }

        order.document.status = PoStatus::Submitted;
        tracing::info!(po_id = %order.po_id, from = %PoStatus::Draft, to = %PoStatus::Submitted, "采购单状态变更");

        Ok(SubmitOutcome::Submitted(self.push().await))
    }

    /// 在最后一关完成检验: 尝试提交,然后回到目录
    pub async fn finish(&mut self) -> ApiResult<SubmitOutcome> {
        {
            let order = self.order()?;
            if order.active_step + 1 != STEPS_PER_WORK_ORDER {
                return Err(ApiError::InvalidInput(format!(
                    "只能在第{}关完成检验",
                    STEPS_PER_WORK_ORDER
                )));
            }
            if !order.active_step().is_some_and(|s| s.is_complete()) {
                return Err(ApiError::StepIncomplete {
                    step: order.active_step + 1,
                });
            }
        }

        let outcome = self.submit().await?;
        self.close();
        Ok(outcome)
    }
}
