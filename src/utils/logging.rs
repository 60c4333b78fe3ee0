//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::orchestrator::submission::{Classification, SubmissionSummary};

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info 级别。重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n批量题目提交日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录提交开始信息
///
/// # 参数
/// - `total`: 本批题目总数
pub fn log_submission_start(total: usize) {
    info!("{}", "=".repeat(60));
    info!("📤 开始逐条提交，共 {} 道题目", total);
    info!("{}", "=".repeat(60));
}

/// 记录提交完成信息
pub fn log_submission_complete(summary: &SubmissionSummary) {
    let label = match summary.classification {
        Classification::AllSucceeded => "全部成功",
        Classification::Partial => "部分成功",
        Classification::AllFailed => "全部失败",
    };
    info!("{}", "─".repeat(60));
    info!(
        "✓ 提交结束 ({}): 成功 {}/{}",
        label,
        summary.successes.len(),
        summary.total()
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `summary`: 提交汇总
/// - `log_file_path`: 失败日志文件路径
pub fn print_final_stats(summary: &SubmissionSummary, log_file_path: &str) {
    info!("{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", summary.successes.len(), summary.total());
    info!("❌ 失败: {}", summary.failures.len());
    info!("{}", "=".repeat(60));
    if !summary.failures.is_empty() {
        info!("失败记录已保存至: {}", log_file_path);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
