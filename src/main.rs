use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use question_batch_stage::infrastructure::{AutoConfirmer, TracingNotifier};
use question_batch_stage::models::{load_question_batch, WireRecord};
use question_batch_stage::services::FailureLog;
use question_batch_stage::utils::logging;
use question_batch_stage::{BatchOrchestrator, Config, DefaultQuestionSchema, HttpQuestionCreator};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置：命令行给出 TOML 路径时优先使用，否则读取环境变量
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_toml_file(Path::new(&path))?,
        None => Config::from_env()?,
    };

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::init_log_file(&config.output_log_file)?;

    let drafts = load_question_batch(Path::new(&config.batch_file)).await?;
    if drafts.is_empty() {
        warn!("⚠️ 没有找到待提交的题目，程序结束");
        return Ok(());
    }

    let schema = DefaultQuestionSchema::with_shared_fields(config.shared_fields.clone())
        .context("无法创建题型 schema")?;
    let creator = HttpQuestionCreator::new(&config).context("无法创建题库客户端")?;

    let mut orchestrator = BatchOrchestrator::new(
        Arc::new(schema),
        Arc::new(creator),
        Arc::new(AutoConfirmer::new(true)),
        Arc::new(TracingNotifier),
    );
    orchestrator.open_dialog();

    // 逐题写入表单并暂存
    for (index, draft) in drafts.iter().enumerate() {
        orchestrator.form_mut().write_values(draft);
        if let Err(e) = orchestrator.request_add_or_edit() {
            warn!("[题目 {}] ⚠️ 未能暂存: {}", index + 1, e);
            orchestrator.discard_draft();
        }
    }

    info!(
        "📋 暂存完成: {}/{} 道题目待提交",
        orchestrator.total_pending_count(),
        drafts.len()
    );

    if orchestrator.staged_records().is_empty() {
        warn!("⚠️ 没有题目通过校验，程序结束");
        return Ok(());
    }

    let submitted: Vec<WireRecord> = orchestrator
        .staged_records()
        .iter()
        .map(|r| r.record.clone())
        .collect();

    let summary = orchestrator.save_all(false).await?;

    let failure_log = FailureLog::new(config.failure_log_file.clone());
    failure_log.write_failures(&summary, &submitted)?;
    logging::print_final_stats(&summary, failure_log.path());

    Ok(())
}
