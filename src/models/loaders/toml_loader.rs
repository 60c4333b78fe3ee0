use crate::models::Draft;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 批量题目文件
///
/// ```toml
/// [[questions]]
/// type = "MC"
/// gradeId = 5
/// questionText = "1 + 1 = ?"
/// choiceA = "2"
/// choiceB = "4"
/// correctAnswer = "choiceA"
/// ```
#[derive(Debug, Deserialize)]
struct QuestionBatchFile {
    #[serde(default)]
    questions: Vec<Draft>,
}

/// 从 TOML 文件加载一批草稿
pub async fn load_question_batch(path: &Path) -> Result<Vec<Draft>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", path.display()))?;

    let drafts = parse_question_batch(&content)
        .with_context(|| format!("无法解析TOML文件: {}", path.display()))?;

    tracing::info!(
        "从 {} 加载了 {} 道题目",
        path.file_name().unwrap_or_default().to_string_lossy(),
        drafts.len()
    );

    Ok(drafts)
}

/// 解析批量题目文件内容
pub fn parse_question_batch(content: &str) -> Result<Vec<Draft>> {
    let file: QuestionBatchFile = toml::from_str(content)?;
    Ok(file.questions)
}
