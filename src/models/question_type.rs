/// 题型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum QuestionType {
    /// 单选题
    MultipleChoice,
    /// 判断题
    TrueFalse,
    /// 简答题
    ShortAnswer,
}

impl QuestionType {
    /// 获取题型代码（草稿中 `type` 字段的取值）
    pub fn code(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "MC",
            QuestionType::TrueFalse => "TF",
            QuestionType::ShortAnswer => "SA",
        }
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "单选题",
            QuestionType::TrueFalse => "判断题",
            QuestionType::ShortAnswer => "简答题",
        }
    }

    /// 从代码解析题型
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MC" => Some(QuestionType::MultipleChoice),
            "TF" => Some(QuestionType::TrueFalse),
            "SA" => Some(QuestionType::ShortAnswer),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
