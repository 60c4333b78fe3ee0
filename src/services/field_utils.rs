//! 字段工具 - 业务能力层
//!
//! 纯函数，不持有状态，不接触暂存列表和表单控制器。

use serde_json::Value;

use crate::error::ConversionError;
use crate::models::{Draft, FieldSource, SharedSettings, WireRecord};
use crate::services::question_schema::QuestionSchema;

/// 字段值是否有意义：非 null 且不是空字符串
pub fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// 草稿中是否至少有一个有意义的字段
pub fn has_meaningful_data(draft: &Draft) -> bool {
    draft.iter().any(|(_, value)| is_meaningful(value))
}

/// 与预填值不同的字段
///
/// 表单重置后会预填公共设置，这部分不算用户输入。
pub fn unsaved_fields(draft: &Draft, seed: &Draft) -> Draft {
    draft
        .iter()
        .filter(|(name, value)| seed.get(name) != Some(*value))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// 草稿中是否有用户尚未保存的输入
pub fn has_unsaved_input(draft: &Draft, seed: &Draft) -> bool {
    has_meaningful_data(&unsaved_fields(draft, seed))
}

/// 从记录中提取公共设置
///
/// 只投影 `names` 中列出的字段，记录中缺失的字段直接省略。
pub fn extract_shared_settings(record: &impl FieldSource, names: &[String]) -> SharedSettings {
    SharedSettings(
        names
            .iter()
            .filter_map(|name| record.field(name).map(|v| (name.clone(), v.clone())))
            .collect(),
    )
}

/// 把公共设置写入草稿
///
/// 只覆盖公共设置中存在且非 null 的字段，其余字段保持不变。
pub fn apply_shared_settings(draft: &mut Draft, settings: Option<&SharedSettings>) {
    let Some(settings) = settings else {
        return;
    };
    for (name, value) in settings.iter() {
        if !value.is_null() {
            draft.set(name.clone(), value.clone());
        }
    }
}

/// 草稿 → 提交格式
pub fn to_wire_shape(
    draft: &Draft,
    schema: &dyn QuestionSchema,
) -> Result<WireRecord, ConversionError> {
    schema.to_wire(draft)
}

/// 提交格式 → 草稿
pub fn from_wire_shape(record: &WireRecord, schema: &dyn QuestionSchema) -> Draft {
    schema.to_form(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn meaningful_data_ignores_null_and_empty_strings() {
        let empty: Draft = [("a", json!(null)), ("b", json!(""))].into_iter().collect();
        assert!(!has_meaningful_data(&empty));
        assert!(!has_meaningful_data(&Draft::new()));

        let zero: Draft = [("gradeId", json!(0))].into_iter().collect();
        assert!(has_meaningful_data(&zero));

        let flag: Draft = [("correctAnswer", json!(false))].into_iter().collect();
        assert!(has_meaningful_data(&flag));

        let blank: Draft = [("questionText", json!(" "))].into_iter().collect();
        assert!(has_meaningful_data(&blank));
    }

    #[test]
    fn extract_omits_missing_fields() {
        let record: Draft = [
            ("type", json!("MC")),
            ("gradeId", json!(5)),
            ("questionText", json!("题干")),
        ]
        .into_iter()
        .collect();

        let settings = extract_shared_settings(&record, &names(&["type", "gradeId", "unitId"]));

        assert_eq!(settings.0.len(), 2);
        assert_eq!(settings.get("type"), Some(&json!("MC")));
        assert_eq!(settings.get("unitId"), None);
    }

    #[test]
    fn apply_overwrites_only_present_non_null_fields() {
        let mut draft: Draft = [
            ("type", json!("TF")),
            ("gradeId", json!(3)),
            ("questionText", json!("保留")),
        ]
        .into_iter()
        .collect();
        let settings = SharedSettings(
            [
                ("type".to_string(), json!("MC")),
                ("gradeId".to_string(), json!(null)),
            ]
            .into_iter()
            .collect(),
        );

        apply_shared_settings(&mut draft, Some(&settings));

        assert_eq!(draft.get_str("type"), Some("MC"));
        assert_eq!(draft.get("gradeId"), Some(&json!(3)));
        assert_eq!(draft.get_str("questionText"), Some("保留"));

        let before = draft.clone();
        apply_shared_settings(&mut draft, None);
        assert_eq!(draft, before);
    }

    #[test]
    fn seeded_values_are_not_unsaved_input() {
        let seed: Draft = [("type", json!("MC")), ("gradeId", json!(5))]
            .into_iter()
            .collect();
        let mut draft = seed.clone();
        assert!(!has_unsaved_input(&draft, &seed));

        draft.set("gradeId", 6);
        assert!(has_unsaved_input(&draft, &seed));

        draft.set("gradeId", 5);
        draft.set("questionText", "");
        assert!(!has_unsaved_input(&draft, &seed));

        draft.set("questionText", "新题");
        assert_eq!(unsaved_fields(&draft, &seed).len(), 1);
    }
}
