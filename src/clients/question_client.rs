/// 题库 API 客户端
///
/// 封装"创建单道题目"接口的调用逻辑
use crate::config::Config;
use crate::error::RemoteError;
use crate::infrastructure::RecordCreator;
use crate::models::{RemoteId, WireRecord};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// 题库 API 客户端
pub struct HttpQuestionCreator {
    client: reqwest::Client,
    create_url: String,
    token: String,
}

impl HttpQuestionCreator {
    /// 创建新的题库客户端
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            create_url: config.create_url(),
            token: config.api_token.clone(),
        })
    }

    /// 检查 API 响应并取出题目ID
    ///
    /// 成功响应形如 `{"code": 200, "data": {"id": 42}}`，ID 也可能直接放在 `data` 或顶层 `id`。
    pub fn parse_create_response(result: &Value) -> Result<RemoteId, RemoteError> {
        let code = result.get("code").and_then(|v| v.as_u64());
        if code != Some(200) {
            return Err(RemoteError::BadResponse {
                code,
                message: result
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            });
        }

        let data = result.get("data");
        let id = data
            .and_then(|d| d.get("id"))
            .or(data)
            .or_else(|| result.get("id"))
            .and_then(id_to_string)
            .ok_or(RemoteError::MissingId)?;

        Ok(RemoteId(id))
    }
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl RecordCreator for HttpQuestionCreator {
    async fn create(&self, record: &WireRecord) -> Result<RemoteId, RemoteError> {
        debug!("创建题目 Payload: {}", record.to_json());

        let response = self
            .client
            .post(&self.create_url)
            .header("Accept", "application/json, text/plain, */*")
            .header("tikutoken", &self.token)
            .json(record)
            .send()
            .await?;

        let status = response.status();
        let result: Value = response.json().await.map_err(|e| RemoteError::BadResponse {
            code: Some(u64::from(status.as_u16())),
            message: Some(e.to_string()),
        })?;

        debug!("创建题目结果: {}", result);

        Self::parse_create_response(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_is_read_from_nested_data() {
        let id = HttpQuestionCreator::parse_create_response(&json!({
            "code": 200,
            "data": { "id": 42 }
        }))
        .unwrap();
        assert_eq!(id, RemoteId::new("42"));
    }

    #[test]
    fn id_may_be_data_itself_or_top_level() {
        assert_eq!(
            HttpQuestionCreator::parse_create_response(&json!({"code": 200, "data": "q-9"}))
                .unwrap(),
            RemoteId::new("q-9")
        );
        assert_eq!(
            HttpQuestionCreator::parse_create_response(&json!({"code": 200, "id": 7})).unwrap(),
            RemoteId::new("7")
        );
    }

    #[test]
    fn non_200_code_is_bad_response() {
        let err = HttpQuestionCreator::parse_create_response(&json!({
            "code": 600,
            "message": "请求过于频繁"
        }))
        .unwrap_err();

        assert_eq!(
            err,
            RemoteError::BadResponse {
                code: Some(600),
                message: Some("请求过于频繁".to_string()),
            }
        );
    }

    #[test]
    fn success_without_id_is_rejected() {
        assert_eq!(
            HttpQuestionCreator::parse_create_response(&json!({"code": 200, "data": null})),
            Err(RemoteError::MissingId)
        );
    }
}
