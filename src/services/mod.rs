pub mod failure_log;
pub mod field_utils;
pub mod question_schema;

pub use failure_log::FailureLog;
pub use question_schema::{DefaultQuestionSchema, QuestionSchema};
