//! Agent 错误类型
//!
//! Llm 错误对当前查询是致命的；Action 失败与超时在循环内被吸收为空 Observation。

use thiserror::Error;

use crate::llm::LlmError;

/// ReAct 运行过程中可能出现的错误
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Action {action} failed: {reason}")]
    ActionFailed { action: String, reason: String },

    #[error("Action timeout: {0}")]
    ActionTimeout(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Cancelled")]
    Cancelled,
}

impl AgentError {
    /// 是否只影响当前这一步 Action（循环可继续）
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AgentError::ActionFailed { .. } | AgentError::ActionTimeout(_)
        )
    }
}
