//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量暂存与提交的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_orchestrator` - 批量暂存编排器
//! - 连接暂存列表与草稿表单控制器
//! - 持有公共设置
//! - 处理"放弃未保存草稿"的确认
//! - 驱动"全部保存"并决定是否清空会话
//!
//! ### `submission` - 顺序提交
//! - 逐条调用远程创建接口
//! - 把每条结果汇总为成功 / 部分成功 / 全部失败
//!
//! ## 层次关系
//!
//! ```text
//! batch_orchestrator (用户操作)
//!     ↓
//! workflow::{StagedListManager, DraftFormController} (暂存列表 / 草稿)
//!     ↓
//! services (能力层：字段工具 / 题型 schema)
//!     ↓
//! infrastructure (外部协作者：远程创建 / 确认 / 提示)
//! ```

pub mod batch_orchestrator;
pub mod submission;

// 重新导出主要类型
pub use batch_orchestrator::{BatchOrchestrator, LoadOutcome, StageOutcome, DISCARD_DRAFT_PROMPT};
pub use submission::{
    submit_sequentially, Classification, SubmissionFailure, SubmissionOutcome, SubmissionSuccess,
    SubmissionSummary,
};
