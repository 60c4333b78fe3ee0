//! 批量暂存编排器 - 编排层
//!
//! ## 职责
//!
//! "先录入多道题目，再一次性全部保存"的总调度。
//!
//! ## 核心功能
//!
//! 1. **暂存 / 修改**：把草稿交给表单控制器保存，再写入暂存列表
//! 2. **载入编辑**：草稿有未保存内容时先弹出确认
//! 3. **待提交计数**：暂存题目数 + 正在录入的新题
//! 4. **全部保存**：逐条顺序提交，汇总部分失败，按结果决定是否清空会话
//!
//! ## 状态归属
//!
//! - 暂存列表归 `StagedListManager`
//! - 草稿与"正在编辑哪道题"归 `DraftFormController`
//! - 公共设置与提交生命周期归本模块

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::{StageError, StageResult};
use crate::infrastructure::{Confirmer, Notification, Notifier, NotifyLevel, RecordCreator};
use crate::models::{DraftState, LocalId, SharedSettings, StagedRecord};
use crate::orchestrator::submission::{submit_sequentially, Classification, SubmissionSummary};
use crate::services::field_utils::extract_shared_settings;
use crate::services::QuestionSchema;
use crate::utils::logging::{log_submission_complete, log_submission_start};
use crate::workflow::{DraftFormController, FormState, PendingDraft, StagedListManager};

/// 放弃未保存草稿前的确认文案
pub const DISCARD_DRAFT_PROMPT: &str = "当前题目尚未保存，确定放弃并编辑所选题目吗？";

/// 暂存 / 修改操作的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// 草稿没有内容，什么也没做
    Skipped,
    /// 新题已暂存
    Added(LocalId),
    /// 已原位更新暂存题目
    Updated(LocalId),
}

/// 载入编辑的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(LocalId),
    /// 用户拒绝放弃当前草稿
    Declined,
}

/// 批量暂存编排器
pub struct BatchOrchestrator {
    staged: StagedListManager,
    form: DraftFormController,
    shared_settings: Option<SharedSettings>,
    creator: Arc<dyn RecordCreator>,
    confirmer: Arc<dyn Confirmer>,
    notifier: Arc<dyn Notifier>,
    dialog_open: bool,
}

impl BatchOrchestrator {
    pub fn new(
        schema: Arc<dyn QuestionSchema>,
        creator: Arc<dyn RecordCreator>,
        confirmer: Arc<dyn Confirmer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            staged: StagedListManager::new(),
            form: DraftFormController::new(schema),
            shared_settings: None,
            creator,
            confirmer,
            notifier,
            dialog_open: false,
        }
    }

    // ========== 对话框生命周期 ==========

    pub fn open_dialog(&mut self) {
        self.form.discard(self.shared_settings.as_ref());
        self.dialog_open = true;
        debug!("批量录入对话框已打开");
    }

    /// 关闭对话框，丢弃整个暂存会话
    pub fn close_dialog(&mut self) {
        self.reset_session();
        self.dialog_open = false;
        debug!("批量录入对话框已关闭");
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    // ========== 只读访问 ==========

    pub fn staged_records(&self) -> &[StagedRecord] {
        self.staged.records()
    }

    pub fn shared_settings(&self) -> Option<&SharedSettings> {
        self.shared_settings.as_ref()
    }

    pub fn form(&self) -> &FormState {
        self.form.form()
    }

    /// 供输入框写入草稿
    pub fn form_mut(&mut self) -> &mut FormState {
        self.form.form_mut()
    }

    pub fn draft_state(&self) -> DraftState {
        self.form.state()
    }

    /// 待提交数量
    ///
    /// 正在编辑已暂存题目时草稿不计数，它不代表一道新题。
    pub fn total_pending_count(&self) -> usize {
        let draft = usize::from(self.form.has_unsaved_input() && !self.form.is_editing());
        self.staged.len() + draft
    }

    // ========== 用户操作 ==========

    /// "添加 / 保存修改"按钮
    ///
    /// 编辑模式下总是保存修改（载入后未改动也照常退出编辑）；新题没有输入时什么也不做。
    pub fn request_add_or_edit(&mut self) -> StageResult<StageOutcome> {
        if let Some(id) = self.form.editing_id() {
            let staged = self.form.save_as_update(id, self.shared_settings.as_ref())?;
            self.staged.update_in_place(id, staged);
            self.form.clear_editing_marker();
            info!("✓ 已更新暂存题目 #{}", id);
            return Ok(StageOutcome::Updated(id));
        }

        if !self.form.has_unsaved_input() {
            debug!("草稿为空，忽略");
            return Ok(StageOutcome::Skipped);
        }

        let staged_list = &mut self.staged;
        let staged = self
            .form
            .save_as_new(|| staged_list.allocate_id(), &mut self.shared_settings)?;
        let id = staged.id;
        self.staged.add(staged);
        info!("✓ 已暂存题目 #{}，共 {} 道", id, self.staged.len());
        Ok(StageOutcome::Added(id))
    }

    /// 载入暂存题目进行编辑
    ///
    /// 草稿有未保存内容时需要用户确认才会丢弃。
    pub async fn request_load_for_editing(&mut self, id: LocalId) -> StageResult<LoadOutcome> {
        let record = self
            .staged
            .get(id)
            .cloned()
            .ok_or(StageError::NotFound(id))?;

        if self.form.has_unsaved_input() && !self.confirmer.confirm(DISCARD_DRAFT_PROMPT).await {
            debug!("用户保留当前草稿，取消载入 #{}", id);
            return Ok(LoadOutcome::Declined);
        }

        self.form.load_for_editing(&record);
        self.shared_settings = Some(extract_shared_settings(
            &record.record,
            self.form.form().schema().shared_field_names(),
        ));
        Ok(LoadOutcome::Loaded(id))
    }

    /// 删除暂存题目，不需要确认
    ///
    /// 删除的正是正在编辑的题目时，编辑一并放弃。
    pub fn request_delete(&mut self, id: LocalId) -> bool {
        let removed = self.staged.remove(id).is_some();
        if removed && self.form.editing_id() == Some(id) {
            self.form.discard(self.shared_settings.as_ref());
        }
        removed
    }

    /// 丢弃当前草稿，按公共设置重新预填
    pub fn discard_draft(&mut self) {
        self.form.discard(self.shared_settings.as_ref());
    }

    /// 放弃正在进行的编辑
    pub fn cancel_editing(&mut self) {
        if self.form.is_editing() {
            self.form.discard(self.shared_settings.as_ref());
        }
    }

    /// "全部保存"
    ///
    /// `include_draft` 为真时先校验当前草稿，失败则整体中止，不发出任何请求。
    /// 全部成功或部分成功时清空会话并关闭对话框；全部失败时保留一切以便重试。
    pub async fn save_all(&mut self, include_draft: bool) -> StageResult<SubmissionSummary> {
        let pending = if include_draft && self.form.has_unsaved_input() {
            match self.form.validated_wire_record() {
                Ok(record) => Some(PendingDraft {
                    record,
                    editing: self.form.editing_id(),
                }),
                Err(err) => {
                    self.notify(NotifyLevel::Warning, format!("请先修正当前题目: {}", err));
                    return Err(err);
                }
            }
        } else {
            None
        };

        let records = self.staged.flatten_for_submission(pending);
        if records.is_empty() {
            self.notify(NotifyLevel::Warning, "没有可提交的题目");
            return Err(StageError::EmptyBatch);
        }

        log_submission_start(records.len());
        let creator = Arc::clone(&self.creator);
        let outcomes = submit_sequentially(creator.as_ref(), records).await;
        let summary = SubmissionSummary::from_outcomes(outcomes);
        log_submission_complete(&summary);

        match summary.classification {
            Classification::AllSucceeded => {
                self.notify(
                    NotifyLevel::Success,
                    format!("已成功保存 {} 道题目", summary.successes.len()),
                );
                self.close_dialog();
            }
            Classification::Partial => {
                let reason = summary
                    .first_error()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                self.notify(
                    NotifyLevel::Warning,
                    format!(
                        "已保存 {}/{} 道题目，失败原因: {}",
                        summary.successes.len(),
                        summary.total(),
                        reason
                    ),
                );
                self.close_dialog();
            }
            Classification::AllFailed => {
                error!("全部 {} 道题目提交失败，保留暂存内容", summary.total());
                let reason = summary
                    .first_error()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                self.notify(NotifyLevel::Error, format!("保存失败: {}", reason));
            }
        }

        Ok(summary)
    }

    fn reset_session(&mut self) {
        self.staged.clear();
        self.shared_settings = None;
        self.form.discard(None);
    }

    fn notify(&self, level: NotifyLevel, message: impl Into<String>) {
        self.notifier.notify(Notification::new(level, message));
    }
}
