//! ReAct 过程事件：用于日志之外的流式/SSE 展示（每轮迭代、模型回复、动作、观察、结束）

use serde::Serialize;

use crate::llm::TokenUsage;
use crate::react::StopReason;

/// 单步过程事件（可序列化为 JSON 供前端展示）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReactEvent {
    /// 开始第几轮（从 1 开始）
    IterationStarted { iteration: usize, max_iterations: usize },
    /// 模型回复（预览）
    ModelReply { preview: String },
    /// 本次调用 token 用量与本次查询累计
    TokenUsage {
        usage: TokenUsage,
        cumulative: TokenUsage,
    },
    /// 解析出 Action 指令，即将调度
    ActionRequested { action: String, argument: String },
    /// 动作返回（预览，避免过长）
    Observation { action: String, preview: String },
    /// 请求了未注册的动作
    UnknownAction { action: String },
    /// 动作失败或超时（以空 Observation 继续）
    ActionFailed { action: String, reason: String },
    /// 回复中没有可识别的指令
    NoDirective,
    /// 模型给出 Answer 指令
    Answer { name: String, text: String },
    /// 查询结束
    Done { iterations: usize, reason: StopReason },
    /// 致命错误
    Error { text: String },
}
