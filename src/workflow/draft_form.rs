//! 草稿表单控制器 - 流程层
//!
//! 一个表单反复用于录入多道题目。草稿的状态机：
//!
//! ```text
//! Empty ──输入──▶ DirtyNew ──save_as_new──▶ Empty(预填公共设置)
//!   │                 │
//!   └──load_for_editing──▶ Editing(id) ──save_as_update──▶ Empty(预填公共设置)
//!                          Editing(id) ──discard──▶ Empty
//! ```
//!
//! 控制器不认识暂存列表，只通过返回值把暂存题目交给编排层。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{StageError, StageResult, ValidationError};
use crate::models::{
    Draft, DraftState, FieldValue, LocalId, SharedSettings, StagedRecord, WireRecord,
};
use crate::services::field_utils::{
    apply_shared_settings, extract_shared_settings, from_wire_shape, has_unsaved_input,
    to_wire_shape,
};
use crate::services::QuestionSchema;

/// 表单状态
///
/// 绑定输入框的数据载体，校验委托给题型 schema。
pub struct FormState {
    schema: Arc<dyn QuestionSchema>,
    values: Draft,
    /// 最近一次重置时预填的值
    seed: Draft,
    errors: Option<ValidationError>,
}

impl FormState {
    pub fn new(schema: Arc<dyn QuestionSchema>) -> Self {
        Self {
            schema,
            values: Draft::new(),
            seed: Draft::new(),
            errors: None,
        }
    }

    pub fn schema(&self) -> &dyn QuestionSchema {
        self.schema.as_ref()
    }

    pub fn values(&self) -> &Draft {
        &self.values
    }

    pub fn seed(&self) -> &Draft {
        &self.seed
    }

    /// 最近一次校验留下的字段错误
    pub fn errors(&self) -> Option<&ValidationError> {
        self.errors.as_ref()
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.set(name, value);
    }

    pub fn clear_field(&mut self, name: &str) {
        self.values.remove(name);
    }

    /// 把若干字段写入表单，已有同名字段被覆盖
    pub fn write_values(&mut self, draft: &Draft) {
        for (name, value) in draft.iter() {
            self.values.set(name.clone(), value.clone());
        }
    }

    /// 重置表单，并用公共设置预填
    pub fn reset(&mut self, settings: Option<&SharedSettings>) {
        let mut seed = Draft::new();
        apply_shared_settings(&mut seed, settings);
        self.values = seed.clone();
        self.seed = seed;
        self.errors = None;
    }

    /// 重置表单为给定的值，并把它们作为新的预填值
    pub fn reset_to(&mut self, values: Draft) {
        self.seed = values.clone();
        self.values = values;
        self.errors = None;
    }

    pub fn validate(&mut self) -> Result<(), ValidationError> {
        match self.schema.validate(&self.values) {
            Ok(()) => {
                self.errors = None;
                Ok(())
            }
            Err(err) => {
                self.errors = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn has_unsaved_input(&self) -> bool {
        has_unsaved_input(&self.values, &self.seed)
    }
}

/// 草稿表单控制器
pub struct DraftFormController {
    form: FormState,
    editing_id: Option<LocalId>,
}

impl DraftFormController {
    pub fn new(schema: Arc<dyn QuestionSchema>) -> Self {
        Self {
            form: FormState::new(schema),
            editing_id: None,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// 供输入框写入
    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// 保存为新题
    ///
    /// 校验失败时表单原样保留（错误信息留在表单上），不会调用 `next_id`。
    /// 成功时更新 `shared` 为本题的公共设置，并用它重新预填表单。
    pub fn save_as_new(
        &mut self,
        next_id: impl FnOnce() -> LocalId,
        shared: &mut Option<SharedSettings>,
    ) -> StageResult<StagedRecord> {
        let record = self.validated_wire_record()?;

        let settings =
            extract_shared_settings(self.form.values(), self.form.schema().shared_field_names());
        self.form.reset(Some(&settings));
        *shared = Some(settings);

        let staged = StagedRecord::new(next_id(), record);
        debug!("草稿保存为新题 #{}", staged.id);
        Ok(staged)
    }

    /// 保存为对暂存题目 `staged_id` 的修改
    ///
    /// 不分配新ID；保存后表单按当前公共设置重新预填，修改不会改变公共设置。
    pub fn save_as_update(
        &mut self,
        staged_id: LocalId,
        shared: Option<&SharedSettings>,
    ) -> StageResult<StagedRecord> {
        let record = self.validated_wire_record()?;
        self.form.reset(shared);

        debug!("草稿保存为对 #{} 的修改", staged_id);
        Ok(StagedRecord::new(staged_id, record))
    }

    /// 把暂存题目载入表单编辑，不做校验
    ///
    /// 载入的值即预填值，未改动时不算未保存的输入。
    pub fn load_for_editing(&mut self, staged: &StagedRecord) {
        let values = from_wire_shape(&staged.record, self.form.schema());
        self.form.reset_to(values);
        self.editing_id = Some(staged.id);
        debug!("载入暂存题目 #{} 进行编辑", staged.id);
    }

    pub fn clear_editing_marker(&mut self) {
        self.editing_id = None;
    }

    /// 放弃当前草稿（包括正在进行的编辑），按公共设置重新预填
    pub fn discard(&mut self, shared: Option<&SharedSettings>) {
        self.editing_id = None;
        self.form.reset(shared);
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn editing_id(&self) -> Option<LocalId> {
        self.editing_id
    }

    pub fn current_values(&self) -> &Draft {
        self.form.values()
    }

    pub fn has_unsaved_input(&self) -> bool {
        self.form.has_unsaved_input()
    }

    pub fn state(&self) -> DraftState {
        match self.editing_id {
            Some(id) => DraftState::Editing(id),
            None if self.has_unsaved_input() => DraftState::DirtyNew,
            None => DraftState::Empty,
        }
    }

    /// 校验并转换当前草稿，不修改表单内容
    pub fn validated_wire_record(&mut self) -> StageResult<WireRecord> {
        if let Err(err) = self.form.validate() {
            warn!("草稿校验未通过: {}", err);
            return Err(err.into());
        }
        to_wire_shape(self.form.values(), self.form.schema()).map_err(|err| {
            warn!("草稿无法转换为提交格式: {}", err);
            StageError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DefaultQuestionSchema;
    use serde_json::json;

    fn controller() -> DraftFormController {
        DraftFormController::new(Arc::new(DefaultQuestionSchema::new().unwrap()))
    }

    fn fill_mc(controller: &mut DraftFormController, text: &str) {
        let form = controller.form_mut();
        form.set_field("type", "MC");
        form.set_field("gradeId", 5);
        form.set_field("questionText", text);
        form.set_field("choiceA", "2");
        form.set_field("choiceB", "4");
        form.set_field("correctAnswer", "choiceA");
    }

    #[test]
    fn save_as_new_reseeds_with_classification_fields() {
        let mut controller = controller();
        let mut shared = None;
        fill_mc(&mut controller, "1 + 1 = ?");

        let staged = controller.save_as_new(|| LocalId(1), &mut shared).unwrap();

        assert_eq!(staged.id, LocalId(1));
        assert_eq!(staged.record.get("options").unwrap().as_array().unwrap().len(), 2);

        let settings = shared.unwrap();
        assert_eq!(settings.get("type"), Some(&json!("MC")));
        assert_eq!(settings.get("gradeId"), Some(&json!(5)));

        let values = controller.current_values();
        assert_eq!(values.len(), 2);
        assert_eq!(values.get_str("type"), Some("MC"));
        assert_eq!(values.get("gradeId"), Some(&json!(5)));
        assert_eq!(controller.state(), DraftState::Empty);
    }

    #[test]
    fn failed_validation_keeps_form_and_skips_id_allocation() {
        let mut controller = controller();
        let mut shared = None;
        controller.form_mut().set_field("type", "MC");
        controller.form_mut().set_field("questionText", "缺少选项");

        let mut allocated = false;
        let err = controller
            .save_as_new(
                || {
                    allocated = true;
                    LocalId(1)
                },
                &mut shared,
            )
            .unwrap_err();

        assert!(matches!(err, StageError::Validation(_)));
        assert!(!allocated);
        assert!(shared.is_none());
        assert_eq!(controller.current_values().get_str("questionText"), Some("缺少选项"));
        assert!(controller.form().errors().is_some());
    }

    #[test]
    fn save_as_update_resets_to_current_settings() {
        let mut controller = controller();
        let current: SharedSettings = SharedSettings(
            [("type".to_string(), json!("TF"))].into_iter().collect(),
        );
        fill_mc(&mut controller, "改过的题");

        let staged = controller.save_as_update(LocalId(7), Some(&current)).unwrap();

        assert_eq!(staged.id, LocalId(7));
        assert_eq!(controller.current_values().get_str("type"), Some("TF"));
        assert_eq!(controller.current_values().len(), 1);
    }

    #[test]
    fn load_for_editing_sets_marker_and_form_values() {
        let mut controller = controller();
        let mut shared = None;
        fill_mc(&mut controller, "原题");
        let staged = controller.save_as_new(|| LocalId(3), &mut shared).unwrap();

        controller.load_for_editing(&staged);

        assert_eq!(controller.state(), DraftState::Editing(LocalId(3)));
        assert_eq!(controller.current_values().get_str("questionText"), Some("原题"));
        assert_eq!(controller.current_values().get_str("correctAnswer"), Some("choiceA"));
        assert!(!controller.current_values().contains("id"));
        assert_eq!(controller.form().seed(), controller.current_values());
        assert!(!controller.has_unsaved_input());

        controller.form_mut().set_field("questionText", "改过");
        assert!(controller.has_unsaved_input());

        controller.discard(shared.as_ref());
        assert!(!controller.is_editing());
        assert_eq!(controller.state(), DraftState::Empty);
    }

    #[test]
    fn typing_makes_draft_dirty() {
        let mut controller = controller();
        assert_eq!(controller.state(), DraftState::Empty);

        controller.form_mut().set_field("questionText", "");
        assert_eq!(controller.state(), DraftState::Empty);

        controller.form_mut().set_field("questionText", "新题");
        assert_eq!(controller.state(), DraftState::DirtyNew);
    }
}
