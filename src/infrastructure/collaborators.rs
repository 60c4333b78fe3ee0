//! 外部协作者 - 基础设施层
//!
//! 暂存引擎只通过这些能力接口与外界交互：远程创建题目、确认对话框、消息提示。

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::RemoteError;
use crate::models::{RemoteId, WireRecord};

/// 远程创建单道题目
#[async_trait]
pub trait RecordCreator: Send + Sync {
    async fn create(&self, record: &WireRecord) -> Result<RemoteId, RemoteError>;
}

/// 确认对话框
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Success,
    Warning,
    Error,
}

/// 一条用户可见的提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotifyLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// 消息提示
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// 固定答复的确认器（命令行模式下没有对话框）
pub struct AutoConfirmer {
    answer: bool,
}

impl AutoConfirmer {
    pub fn new(answer: bool) -> Self {
        Self { answer }
    }
}

#[async_trait]
impl Confirmer for AutoConfirmer {
    async fn confirm(&self, message: &str) -> bool {
        info!("确认: {} → {}", message, if self.answer { "是" } else { "否" });
        self.answer
    }
}

/// 把提示写入日志
#[derive(Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotifyLevel::Success => info!("✅ {}", notification.message),
            NotifyLevel::Warning => warn!("⚠️ {}", notification.message),
            NotifyLevel::Error => error!("❌ {}", notification.message),
        }
    }
}
