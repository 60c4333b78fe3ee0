//! # Question Batch Stage
//!
//! 批量录入题目的暂存与提交引擎：用同一个表单连续录入多道题，先暂存在本地列表，
//! 随时可以回头修改任意一道，最后逐条提交到题库，部分失败不会阻塞其余题目。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 外部协作者的能力接口
//! - `RecordCreator` / `Confirmer` / `Notifier`
//! - `clients/` - `HttpQuestionCreator`，基于 reqwest 的远程创建实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 不持有状态的能力
//! - `field_utils` - 有效数据判断、公共设置提取与预填、格式转换
//! - `QuestionSchema` - 题型校验与表单 / 提交格式转换
//! - `FailureLog` - 写失败记录
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 单个状态的持有者
//! - `StagedListManager` - 暂存列表与本地ID
//! - `DraftFormController` - 唯一的草稿及"正在编辑哪道题"
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_orchestrator` - 用户操作入口，持有公共设置
//! - `orchestrator/submission` - 顺序提交与部分失败汇总
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::HttpQuestionCreator;
pub use config::Config;
pub use error::{AppError, AppResult, StageError, StageResult};
pub use models::{Draft, DraftState, LocalId, RemoteId, SharedSettings, StagedRecord, WireRecord};
pub use orchestrator::{BatchOrchestrator, Classification, SubmissionSummary};
pub use services::{DefaultQuestionSchema, QuestionSchema};
pub use workflow::{DraftFormController, StagedListManager};
