//! 题型 schema - 业务能力层
//!
//! 只负责"一道题长什么样"：字段校验、表单格式与提交格式之间的互相转换。
//! 不关心暂存列表，也不关心提交流程。

use regex::Regex;
use serde_json::{json, Value};

use crate::error::{ConversionError, ValidationError};
use crate::models::{Draft, QuestionType, WireRecord};

/// 默认的公共设置（分类）字段
pub const DEFAULT_SHARED_FIELDS: &[&str] = &[
    "type",
    "curriculumId",
    "gradeId",
    "subjectId",
    "unitId",
    "lessonId",
];

const TYPE_FIELD: &str = "type";
const TEXT_FIELD: &str = "questionText";
const ANSWER_FIELD: &str = "correctAnswer";
const OPTIONS_FIELD: &str = "options";

/// 题型 schema
///
/// 暂存引擎通过它完成校验与格式转换，不直接认识任何题型。
pub trait QuestionSchema: Send + Sync {
    /// 需要向下一份草稿传递的分类字段
    fn shared_field_names(&self) -> &[String];

    /// 字段级校验
    fn validate(&self, draft: &Draft) -> Result<(), ValidationError>;

    /// 表单格式 → 提交格式
    fn to_wire(&self, draft: &Draft) -> Result<WireRecord, ConversionError>;

    /// 提交格式 → 表单格式（用于把暂存题目载回表单编辑）
    fn to_form(&self, record: &WireRecord) -> Draft;
}

/// 内置题型 schema（单选 / 判断 / 简答）
pub struct DefaultQuestionSchema {
    shared_fields: Vec<String>,
    choice_pattern: Regex,
}

impl DefaultQuestionSchema {
    /// 使用默认分类字段创建
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_shared_fields(DEFAULT_SHARED_FIELDS.iter().map(|s| s.to_string()).collect())
    }

    /// 使用自定义分类字段创建
    pub fn with_shared_fields(shared_fields: Vec<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            shared_fields,
            choice_pattern: Regex::new(r"^choice([A-Z])$")?,
        })
    }

    /// 返回选项字段的标签（`choiceB` → `B`）
    fn choice_label<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.choice_pattern
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// 按标签顺序列出非空选项：(字段名, 标签, 内容)
    ///
    /// 数字选项（如 TOML 中的 `choiceA = 2`）按文本处理。
    fn choices<'a>(&self, draft: &'a Draft) -> Vec<(&'a str, &'a str, String)> {
        draft
            .iter()
            .filter_map(|(name, value)| {
                let label = self.choice_label(name)?;
                let text = choice_text(value)?;
                Some((name.as_str(), label, text))
            })
            .collect()
    }

    fn is_choice_field(&self, name: &str) -> bool {
        self.choice_pattern.is_match(name)
    }
}

impl QuestionSchema for DefaultQuestionSchema {
    fn shared_field_names(&self) -> &[String] {
        &self.shared_fields
    }

    fn validate(&self, draft: &Draft) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();

        if non_empty_str(draft.get(TEXT_FIELD)).is_none() {
            errors.push(TEXT_FIELD, "题干不能为空");
        }

        let question_type = match draft.get_str(TYPE_FIELD) {
            None => {
                errors.push(TYPE_FIELD, "请选择题型");
                return errors.into_result();
            }
            Some(code) => match QuestionType::from_code(code) {
                Some(t) => t,
                None => {
                    errors.push(TYPE_FIELD, format!("未知题型: {}", code));
                    return errors.into_result();
                }
            },
        };

        match question_type {
            QuestionType::MultipleChoice => {
                for (name, value) in draft.iter() {
                    let wrong_type = !matches!(
                        value,
                        Value::Null | Value::String(_) | Value::Number(_)
                    );
                    if self.is_choice_field(name) && wrong_type {
                        errors.push(name.clone(), "选项内容必须是文本或数字");
                    }
                }
                let choices = self.choices(draft);
                if choices.len() < 2 {
                    errors.push("choices", "至少需要填写两个选项");
                }
                match draft.get_str(ANSWER_FIELD) {
                    Some(answer) if choices.iter().any(|(name, _, _)| *name == answer) => {}
                    Some(_) => errors.push(ANSWER_FIELD, "正确答案必须指向一个已填写的选项"),
                    None => errors.push(ANSWER_FIELD, "请选择正确答案"),
                }
            }
            QuestionType::TrueFalse => {
                if parse_bool(draft.get(ANSWER_FIELD)).is_none() {
                    errors.push(ANSWER_FIELD, "请选择正确或错误");
                }
            }
            QuestionType::ShortAnswer => {
                if non_empty_str(draft.get(ANSWER_FIELD)).is_none() {
                    errors.push(ANSWER_FIELD, "参考答案不能为空");
                }
            }
        }

        errors.into_result()
    }

    fn to_wire(&self, draft: &Draft) -> Result<WireRecord, ConversionError> {
        let code = draft.get_str(TYPE_FIELD).ok_or(ConversionError::MissingType)?;
        let question_type = QuestionType::from_code(code)
            .ok_or_else(|| ConversionError::UnknownType(code.to_string()))?;

        // 通用字段原样保留，题型相关字段在下面重新组装
        let mut record = WireRecord::new();
        for (name, value) in draft.iter() {
            if value.is_null() || name == ANSWER_FIELD || self.is_choice_field(name) {
                continue;
            }
            record.insert(name.clone(), value.clone());
        }

        let missing = |field: &str| ConversionError::MissingField {
            question_type: question_type.code().to_string(),
            field: field.to_string(),
        };

        match question_type {
            QuestionType::MultipleChoice => {
                let answer = draft.get_str(ANSWER_FIELD).ok_or_else(|| missing(ANSWER_FIELD))?;
                let choices = self.choices(draft);
                if !choices.iter().any(|(name, _, _)| *name == answer) {
                    return Err(ConversionError::InvalidAnswer {
                        answer: answer.to_string(),
                    });
                }
                let options: Vec<Value> = choices
                    .iter()
                    .map(|(name, label, text)| {
                        json!({ "label": label, "text": text, "isCorrect": *name == answer })
                    })
                    .collect();
                record.insert(OPTIONS_FIELD, options);
            }
            QuestionType::TrueFalse => {
                let answer =
                    parse_bool(draft.get(ANSWER_FIELD)).ok_or_else(|| missing(ANSWER_FIELD))?;
                record.insert(
                    OPTIONS_FIELD,
                    json!([
                        { "label": "T", "text": "True", "isCorrect": answer },
                        { "label": "F", "text": "False", "isCorrect": !answer },
                    ]),
                );
            }
            QuestionType::ShortAnswer => {
                let answer =
                    non_empty_str(draft.get(ANSWER_FIELD)).ok_or_else(|| missing(ANSWER_FIELD))?;
                record.insert("answer", answer);
            }
        }

        Ok(record)
    }

    fn to_form(&self, record: &WireRecord) -> Draft {
        let question_type = record
            .get(TYPE_FIELD)
            .and_then(Value::as_str)
            .and_then(QuestionType::from_code);

        let mut draft = Draft::new();
        for (name, value) in record.0.iter() {
            if name == OPTIONS_FIELD {
                continue;
            }
            if name == "answer" && question_type == Some(QuestionType::ShortAnswer) {
                draft.set(ANSWER_FIELD, value.clone());
                continue;
            }
            draft.set(name.clone(), value.clone());
        }

        let options = record
            .get(OPTIONS_FIELD)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        match question_type {
            Some(QuestionType::MultipleChoice) => {
                for option in options {
                    let (Some(label), Some(text)) = (
                        option.get("label").and_then(Value::as_str),
                        option.get("text").and_then(Value::as_str),
                    ) else {
                        continue;
                    };
                    let field = format!("choice{}", label);
                    if is_correct(option) {
                        draft.set(ANSWER_FIELD, field.clone());
                    }
                    draft.set(field, text);
                }
            }
            Some(QuestionType::TrueFalse) => {
                if let Some(correct) = options.iter().find(|o| is_correct(o)) {
                    let answer = correct.get("label").and_then(Value::as_str) == Some("T");
                    draft.set(ANSWER_FIELD, if answer { "true" } else { "false" });
                }
            }
            Some(QuestionType::ShortAnswer) | None => {}
        }

        draft
    }
}

fn choice_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

fn parse_bool(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn is_correct(option: &Value) -> bool {
    option
        .get("isCorrect")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> DefaultQuestionSchema {
        DefaultQuestionSchema::new().unwrap()
    }

    fn mc_draft() -> Draft {
        [
            ("type", json!("MC")),
            ("gradeId", json!(5)),
            ("questionText", json!("1 + 1 = ?")),
            ("choiceA", json!("2")),
            ("choiceB", json!("4")),
            ("choiceC", json!("")),
            ("correctAnswer", json!("choiceA")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn multiple_choice_converts_to_options_array() {
        let record = schema().to_wire(&mc_draft()).unwrap();

        assert_eq!(
            record.to_json(),
            json!({
                "type": "MC",
                "gradeId": 5,
                "questionText": "1 + 1 = ?",
                "options": [
                    { "label": "A", "text": "2", "isCorrect": true },
                    { "label": "B", "text": "4", "isCorrect": false },
                ],
            })
        );
    }

    #[test]
    fn multiple_choice_round_trips_through_form_shape() {
        let schema = schema();
        let record = schema.to_wire(&mc_draft()).unwrap();
        let form = schema.to_form(&record);

        assert_eq!(form.get_str("choiceA"), Some("2"));
        assert_eq!(form.get_str("choiceB"), Some("4"));
        assert_eq!(form.get_str("correctAnswer"), Some("choiceA"));
        assert!(!form.contains("options"));
        assert_eq!(schema.to_wire(&form).unwrap(), record);
    }

    #[test]
    fn answer_pointing_at_empty_choice_is_rejected() {
        let mut draft = mc_draft();
        draft.set("correctAnswer", "choiceC");

        let err = schema().validate(&draft).unwrap_err();
        assert!(err.fields.contains_key("correctAnswer"));

        assert_eq!(
            schema().to_wire(&draft).unwrap_err(),
            ConversionError::InvalidAnswer {
                answer: "choiceC".to_string()
            }
        );
    }

    #[test]
    fn missing_type_stops_type_specific_checks() {
        let draft: Draft = [("questionText", json!("x"))].into_iter().collect();
        let err = schema().validate(&draft).unwrap_err();

        assert_eq!(err.fields.len(), 1);
        assert!(err.fields.contains_key("type"));
        assert_eq!(schema().to_wire(&draft).unwrap_err(), ConversionError::MissingType);
    }

    #[test]
    fn true_false_accepts_bool_or_string() {
        let schema = schema();
        let mut draft: Draft = [
            ("type", json!("TF")),
            ("questionText", json!("水在 0 度结冰")),
            ("correctAnswer", json!(true)),
        ]
        .into_iter()
        .collect();
        assert!(schema.validate(&draft).is_ok());

        draft.set("correctAnswer", "false");
        let record = schema.to_wire(&draft).unwrap();
        assert_eq!(record.get("options").unwrap()[1]["isCorrect"], json!(true));
        assert_eq!(schema.to_form(&record).get_str("correctAnswer"), Some("false"));

        draft.set("correctAnswer", "maybe");
        assert!(schema.validate(&draft).is_err());
    }

    #[test]
    fn numeric_choices_become_option_text() {
        let schema = schema();
        let mut draft = mc_draft();
        draft.set("choiceA", 2);
        draft.set("choiceB", 4.5);

        assert!(schema.validate(&draft).is_ok());
        let record = schema.to_wire(&draft).unwrap();
        assert_eq!(
            record.get("options").unwrap()[0],
            json!({ "label": "A", "text": "2", "isCorrect": true })
        );
        assert_eq!(record.get("options").unwrap()[1]["text"], json!("4.5"));
    }

    #[test]
    fn non_text_choice_is_reported_on_its_field() {
        let mut draft = mc_draft();
        draft.set("choiceB", true);

        let err = schema().validate(&draft).unwrap_err();
        assert_eq!(err.fields["choiceB"], "选项内容必须是文本或数字");
        assert!(err.fields.contains_key("choices"));
    }

    #[test]
    fn unvalidated_true_false_without_answer_fails_conversion() {
        let draft: Draft = [("type", json!("TF")), ("questionText", json!("x"))]
            .into_iter()
            .collect();

        assert_eq!(
            schema().to_wire(&draft).unwrap_err(),
            ConversionError::MissingField {
                question_type: "TF".to_string(),
                field: "correctAnswer".to_string(),
            }
        );
    }

    #[test]
    fn short_answer_maps_answer_field() {
        let schema = schema();
        let draft: Draft = [
            ("type", json!("SA")),
            ("questionText", json!("简述光合作用")),
            ("correctAnswer", json!("植物利用光能")),
        ]
        .into_iter()
        .collect();

        let record = schema.to_wire(&draft).unwrap();
        assert_eq!(record.get("answer"), Some(&json!("植物利用光能")));
        assert_eq!(schema.to_form(&record), draft);
    }
}
