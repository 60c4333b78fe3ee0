//! 顺序提交与结果汇总
//!
//! 逐条调用远程创建接口：第 i+1 条只在第 i 条返回之后才发出，某一条失败不影响后续题目。
//! 每条的结果按其在批次中的位置记录，最后汇总为 [`SubmissionSummary`]。

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::error::RemoteError;
use crate::infrastructure::RecordCreator;
use crate::models::{RemoteId, WireRecord};

/// 单条提交的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    /// 在提交批次中的位置（从 0 开始）
    pub index: usize,
    pub result: Result<RemoteId, RemoteError>,
}

/// 批次结果分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    AllSucceeded,
    Partial,
    AllFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionSuccess {
    pub index: usize,
    pub remote_id: RemoteId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    pub index: usize,
    pub error: RemoteError,
}

/// 一次"全部保存"的汇总
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionSummary {
    pub classification: Classification,
    pub successes: Vec<SubmissionSuccess>,
    pub failures: Vec<SubmissionFailure>,
}

impl SubmissionSummary {
    /// 汇总各条结果；没有任何成功（包括空批次）都视为全部失败
    pub fn from_outcomes(outcomes: Vec<SubmissionOutcome>) -> Self {
        let (successes, failures) = outcomes.into_iter().fold(
            (Vec::new(), Vec::new()),
            |(mut successes, mut failures), outcome| {
                match outcome.result {
                    Ok(remote_id) => successes.push(SubmissionSuccess {
                        index: outcome.index,
                        remote_id,
                    }),
                    Err(error) => failures.push(SubmissionFailure {
                        index: outcome.index,
                        error,
                    }),
                }
                (successes, failures)
            },
        );

        let classification = match (successes.is_empty(), failures.is_empty()) {
            (false, true) => Classification::AllSucceeded,
            (false, false) => Classification::Partial,
            (true, _) => Classification::AllFailed,
        };

        Self {
            classification,
            successes,
            failures,
        }
    }

    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// 用于提示的代表性错误（第一条失败）
    pub fn first_error(&self) -> Option<&RemoteError> {
        self.failures.first().map(|f| &f.error)
    }

    pub fn remote_ids(&self) -> Vec<&RemoteId> {
        self.successes.iter().map(|s| &s.remote_id).collect()
    }
}

/// 逐条顺序提交
pub async fn submit_sequentially(
    creator: &dyn RecordCreator,
    records: Vec<WireRecord>,
) -> Vec<SubmissionOutcome> {
    let total = records.len();

    stream::iter(records.into_iter().enumerate())
        .then(|(index, record)| async move {
            let result = creator.create(&record).await;
            match &result {
                Ok(id) => info!("[题目 {}/{}] ✓ 提交成功，ID: {}", index + 1, total, id),
                Err(e) => warn!("[题目 {}/{}] ⚠️ 提交失败: {}", index + 1, total, e),
            }
            SubmissionOutcome { index, result }
        })
        .collect()
        .await
}
