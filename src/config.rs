use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};
use crate::services::question_schema::DEFAULT_SHARED_FIELDS;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 题库 API 配置 ---
    pub api_base_url: String,
    pub api_token: String,
    /// 创建单道题目的接口路径
    pub create_endpoint: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 暂存配置 ---
    /// 向下一份草稿传递的分类字段
    pub shared_fields: Vec<String>,
    /// 批量题目 TOML 文件
    pub batch_file: String,
    // --- 日志配置 ---
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 提交失败记录文件
    pub failure_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            api_token: String::new(),
            create_endpoint: "questions".to_string(),
            request_timeout_secs: 30,
            shared_fields: DEFAULT_SHARED_FIELDS.iter().map(|s| s.to_string()).collect(),
            batch_file: "questions.toml".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            failure_log_file: "failed_questions.txt".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载，未设置的变量使用默认值
    ///
    /// 已设置但无法解析的数值 / 布尔变量返回 `EnvVarParseFailed`。
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            api_token: std::env::var("API_TOKEN").unwrap_or(default.api_token),
            create_endpoint: std::env::var("CREATE_ENDPOINT").unwrap_or(default.create_endpoint),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(default.request_timeout_secs),
            shared_fields: std::env::var("SHARED_FIELDS")
                .ok()
                .map(|v| parse_field_list(&v))
                .unwrap_or(default.shared_fields),
            batch_file: std::env::var("BATCH_FILE").unwrap_or(default.batch_file),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            failure_log_file: std::env::var("FAILURE_LOG_FILE")
                .unwrap_or(default.failure_log_file),
        })
    }

    /// 从 TOML 文件加载，缺失的配置项使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 检查配置项取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.shared_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "shared_fields".to_string(),
                reason: "字段名不能为空".to_string(),
            });
        }
        Ok(())
    }

    /// 创建接口的完整地址
    pub fn create_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.create_endpoint.trim_start_matches('/')
        )
    }
}

/// 读取并解析环境变量，未设置时返回 `None`
fn env_parse<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => parse_env_value(var_name, &value, expected_type).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_env_value<T: FromStr>(
    var_name: &str,
    value: &str,
    expected_type: &str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}

/// 解析逗号分隔的字段列表
fn parse_field_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_only_given_keys() {
        let config = Config::from_toml_str(
            r#"
            api_base_url = "https://tiku.example.com/api/"
            shared_fields = ["type", "gradeId"]
            verbose_logging = true
            "#,
        )
        .unwrap();

        assert_eq!(config.shared_fields, vec!["type", "gradeId"]);
        assert!(config.verbose_logging);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.create_url(), "https://tiku.example.com/api/questions");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::from_toml_str("request_timeout_secs = 0").unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn malformed_toml_is_a_file_error() {
        let err = Config::from_toml_str("shared_fields = ").unwrap_err();
        assert!(matches!(err, AppError::File(_)));
    }

    #[test]
    fn env_values_parse_or_report_the_variable() {
        let timeout: u64 = parse_env_value("REQUEST_TIMEOUT_SECS", " 45 ", "u64").unwrap();
        assert_eq!(timeout, 45);

        let err = parse_env_value::<u64>("REQUEST_TIMEOUT_SECS", "thirty", "u64").unwrap_err();
        match err {
            ConfigError::EnvVarParseFailed {
                var_name, value, ..
            } => {
                assert_eq!(var_name, "REQUEST_TIMEOUT_SECS");
                assert_eq!(value, "thirty");
            }
            other => panic!("意外的错误: {:?}", other),
        }

        assert!(parse_env_value::<bool>("VERBOSE_LOGGING", "yes", "bool").is_err());
    }

    #[test]
    fn field_list_skips_blanks() {
        assert_eq!(parse_field_list(" type, ,gradeId "), vec!["type", "gradeId"]);
    }
}
