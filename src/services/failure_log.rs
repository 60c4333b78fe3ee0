//! 失败记录服务 - 业务能力层
//!
//! 只负责"把提交失败的题目写入日志文件"，不关心流程

use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::WireRecord;
use crate::orchestrator::submission::SubmissionSummary;
use crate::utils::logging::truncate_text;

const RECORD_PREVIEW_LEN: usize = 120;

/// 失败记录服务
///
/// 每条失败写一行：批次位置、错误原因、题目内容预览。
pub struct FailureLog {
    file_path: String,
}

impl FailureLog {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.file_path
    }

    /// 追加本次提交中失败的题目
    ///
    /// `records` 是提交时的批次，按 `failures` 中的位置取出对应题目。
    /// 返回写入的条数。
    pub fn write_failures(
        &self,
        summary: &SubmissionSummary,
        records: &[WireRecord],
    ) -> AppResult<usize> {
        if summary.failures.is_empty() {
            return Ok(0);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .map_err(|e| AppError::file_write_failed(&self.file_path, e))?;

        for failure in &summary.failures {
            let preview = records
                .get(failure.index)
                .map(|r| truncate_text(&r.to_json().to_string(), RECORD_PREVIEW_LEN))
                .unwrap_or_default();
            let line = format!(
                "题目 {} | 原因: {} | 内容: {}\n",
                failure.index + 1,
                failure.error,
                preview
            );
            file.write_all(line.as_bytes())
                .map_err(|e| AppError::file_write_failed(&self.file_path, e))?;
        }

        debug!("写入 {} 条失败记录到 {}", summary.failures.len(), self.file_path);
        Ok(summary.failures.len())
    }
}
