use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::LocalId;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 暂存引擎错误
///
/// 全部是本地同步错误：触发它的操作在修改暂存列表或发起网络请求之前就会中止。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    /// 草稿未通过字段校验
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// 草稿无法转换为提交格式
    #[error("{0}")]
    Conversion(#[from] ConversionError),
    /// 没有任何可提交的题目
    #[error("没有可提交的题目")]
    EmptyBatch,
    /// 暂存列表中不存在该题目
    #[error("暂存题目不存在: #{0}")]
    NotFound(LocalId),
}

/// 字段级校验失败
///
/// `fields` 保存 字段名 → 错误提示，供表单显示在对应输入框旁。
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("校验失败: {}", summarize(.fields))]
pub struct ValidationError {
    pub fields: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// 单字段错误
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.push(name, message);
        err
    }

    pub fn push(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(name.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 没有错误时返回 `Ok(())`
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn summarize(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(name, message)| format!("{}: {}", name, message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// 草稿转换为提交格式失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// 缺少题型
    #[error("缺少题型字段 `type`")]
    MissingType,
    /// 未知题型
    #[error("未知题型: {0}")]
    UnknownType(String),
    /// 题型要求的字段缺失
    #[error("题型 {question_type} 缺少必要字段 `{field}`")]
    MissingField { question_type: String, field: String },
    /// 正确答案没有指向有效选项
    #[error("正确答案 `{answer}` 不是有效选项")]
    InvalidAnswer { answer: String },
}

/// 单条题目远程创建失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {message}")]
    RequestFailed { endpoint: String, message: String },
    /// 服务端返回错误响应
    #[error("服务端返回错误: code={code:?}, message={message:?}")]
    BadResponse {
        code: Option<u64>,
        message: Option<String>,
    },
    /// 响应中缺少题目ID
    #[error("响应中缺少题目ID")]
    MissingId,
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置项取值非法
    #[error("配置项 {key} 非法: {reason}")]
    InvalidValue { key: String, reason: String },
}

// ========== 从常见错误类型转换 ==========

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::RequestFailed {
            endpoint: err
                .url()
                .map(|url| url.to_string())
                .unwrap_or_default(),
            message: err.to_string(),
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

/// 暂存引擎结果类型
pub type StageResult<T> = Result<T, StageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_keeps_first_message_per_field() {
        let mut err = ValidationError::field("questionText", "题干不能为空");
        err.push("questionText", "重复");
        err.push("type", "未知题型");

        assert_eq!(err.fields.len(), 2);
        assert_eq!(err.fields["questionText"], "题干不能为空");
        assert_eq!(
            err.to_string(),
            "校验失败: questionText: 题干不能为空; type: 未知题型"
        );
    }

    #[test]
    fn empty_validation_error_is_ok() {
        assert!(ValidationError::new().into_result().is_ok());
        assert!(ValidationError::field("a", "b").into_result().is_err());
    }
}
