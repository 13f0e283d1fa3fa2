//! ReAct 主循环
//!
//! Prompt -> LLM -> 解析指令 -> 若 Action 则调度并把 `Observation: ...` 作为下一轮 Prompt；
//! 最多 max_iterations 轮。每次查询新建一份 Conversation，查询之间不共享可变状态。
//! 可选 event_tx：向 Web 等前端推送 IterationStarted / ActionRequested / Observation / Done。

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::core::AgentError;
use crate::llm::{LlmClient, TokenUsage};
use crate::memory::{Conversation, Message};
use crate::react::prompt::NUDGE_PROMPT;
use crate::react::{parse_directive, Directive, DirectiveKind, ReactEvent};
use crate::tools::ActionExecutor;

/// 默认最大迭代轮数
pub const DEFAULT_MAX_ITERATIONS: usize = 5;
/// 模型回复预览最大字符数
const REPLY_PREVIEW_CHARS: usize = 800;
/// Observation 预览最大字符数
const OBSERVATION_PREVIEW_CHARS: usize = 200;

/// 回复中找不到指令时的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoDirectivePolicy {
    /// 下一轮重发同一条 Prompt
    #[default]
    Continue,
    /// 结束本次查询
    Stop,
    /// 下一轮发送格式提醒
    Nudge,
}

/// 循环结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    IterationLimit,
    Answer,
    NoDirective,
}

/// 循环参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactOptions {
    pub max_iterations: usize,
    /// 遇到 Answer 指令是否提前结束
    pub stop_on_answer: bool,
    pub no_directive: NoDirectivePolicy,
}

impl Default for ReactOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            stop_on_answer: true,
            no_directive: NoDirectivePolicy::Continue,
        }
    }
}

/// 单次查询结果
#[derive(Debug, Clone)]
pub struct ReactResult {
    /// 非 system 消息文本（按时间顺序，空白已过滤）
    pub transcript: Vec<String>,
    /// 完整对话（含 system）
    pub messages: Vec<Message>,
    pub iterations: usize,
    pub reason: StopReason,
    /// 最后一次出现的 Answer 指令
    pub answer: Option<Directive>,
    /// 本次查询累计 token 用量
    pub usage: TokenUsage,
}

/// 单次查询的可选项：取消令牌、事件通道
#[derive(Default)]
pub struct ReactSession<'a> {
    pub cancel_token: Option<CancellationToken>,
    pub event_tx: Option<&'a UnboundedSender<ReactEvent>>,
}

impl<'a> ReactSession<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    pub fn with_event_tx(mut self, tx: &'a UnboundedSender<ReactEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_token
            .as_ref()
            .map(|t| t.is_cancelled())
            .unwrap_or(false)
    }

    fn send(&self, ev: ReactEvent) {
        if let Some(tx) = self.event_tx {
            let _ = tx.send(ev);
        }
    }
}

/// ReAct Agent：LLM + 动作执行器 + system prompt；只读，可在并发查询间共享
#[derive(Clone)]
pub struct ReactAgent {
    llm: Arc<dyn LlmClient>,
    executor: Arc<ActionExecutor>,
    system_prompt: String,
    options: ReactOptions,
}

impl ReactAgent {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        executor: Arc<ActionExecutor>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            executor,
            system_prompt: system_prompt.into(),
            options: ReactOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReactOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ReactOptions {
        &self.options
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// 跑一次查询，返回非 system 对话文本
    pub async fn run_query(&self, question: &str) -> Result<Vec<String>, AgentError> {
        let result = self.run(&ReactSession::new(), question).await?;
        Ok(result.transcript)
    }

    /// 跑一次查询（带取消 / 事件），返回完整结果
    pub async fn run(
        &self,
        session: &ReactSession<'_>,
        question: &str,
    ) -> Result<ReactResult, AgentError> {
        let span = tracing::info_span!("react_query", session = %Uuid::new_v4());
        self.run_inner(session, question).instrument(span).await
    }

    async fn run_inner(
        &self,
        session: &ReactSession<'_>,
        question: &str,
    ) -> Result<ReactResult, AgentError> {
        let max_iterations = self.options.max_iterations;
        let mut conversation = Conversation::new(self.system_prompt.clone());
        let mut next_prompt = question.to_string();
        let mut usage = TokenUsage::default();
        let mut answer = None;
        let mut reason = StopReason::IterationLimit;
        let mut iterations = 0;

        while iterations < max_iterations {
            if session.is_cancelled() {
                session.send(ReactEvent::Error {
                    text: "Cancelled".to_string(),
                });
                return Err(AgentError::Cancelled);
            }
            iterations += 1;
            tracing::info!(iteration = iterations, "running iteration");
            session.send(ReactEvent::IterationStarted {
                iteration: iterations,
                max_iterations,
            });

            conversation.push_user(next_prompt.clone());
            let completion = match self.llm.complete(conversation.messages()).await {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!("model call failed: {}", e);
                    session.send(ReactEvent::Error {
                        text: e.to_string(),
                    });
                    return Err(e.into());
                }
            };

            tracing::info!(
                input = completion.usage.input_tokens,
                cached = completion.usage.cached_tokens,
                output = completion.usage.output_tokens,
                reasoning = completion.usage.reasoning_tokens,
                "token usage"
            );
            usage += completion.usage;
            session.send(ReactEvent::TokenUsage {
                usage: completion.usage,
                cumulative: usage,
            });

            let reply = completion.content;
            tracing::info!(reply = %reply, "model reply");
            session.send(ReactEvent::ModelReply {
                preview: preview(&reply, REPLY_PREVIEW_CHARS),
            });
            conversation.push_assistant(reply.clone());

            match parse_directive(&reply) {
                Some(d) if d.kind == DirectiveKind::Action => {
                    tracing::info!(action_type = %d.name, action_detail = %d.argument, "action");
                    session.send(ReactEvent::ActionRequested {
                        action: d.name.clone(),
                        argument: d.argument.clone(),
                    });
                    next_prompt = self.observe(session, &d).await?;
                }
                Some(d) => {
                    tracing::info!(name = %d.name, answer = %d.argument, "answer");
                    session.send(ReactEvent::Answer {
                        name: d.name.clone(),
                        text: d.argument.clone(),
                    });
                    answer = Some(d);
                    if self.options.stop_on_answer {
                        reason = StopReason::Answer;
                        break;
                    }
                }
                None => {
                    tracing::warn!(iteration = iterations, "no directive in model reply");
                    session.send(ReactEvent::NoDirective);
                    match self.options.no_directive {
                        NoDirectivePolicy::Continue => {}
                        NoDirectivePolicy::Stop => {
                            reason = StopReason::NoDirective;
                            break;
                        }
                        NoDirectivePolicy::Nudge => next_prompt = NUDGE_PROMPT.to_string(),
                    }
                }
            }
        }

        session.send(ReactEvent::Done { iterations, reason });
        Ok(ReactResult {
            transcript: conversation.non_system_messages(),
            messages: conversation.messages().to_vec(),
            iterations,
            reason,
            answer,
            usage,
        })
    }

    /// 调度一个 Action，返回下一轮 Prompt
    ///
    /// 未知动作与可恢复的动作错误都以空 Observation 继续；其余错误结束本次查询
    async fn observe(
        &self,
        session: &ReactSession<'_>,
        directive: &Directive,
    ) -> Result<String, AgentError> {
        let action = directive.name.as_str();
        let observation = match self.executor.dispatch(action, &directive.argument).await {
            Ok(Some(o)) => {
                session.send(ReactEvent::Observation {
                    action: action.to_string(),
                    preview: preview(&o, OBSERVATION_PREVIEW_CHARS),
                });
                o
            }
            Ok(None) => {
                session.send(ReactEvent::UnknownAction {
                    action: action.to_string(),
                });
                String::new()
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!(action = %action, "action step failed: {}", e);
                session.send(ReactEvent::ActionFailed {
                    action: action.to_string(),
                    reason: e.to_string(),
                });
                String::new()
            }
            Err(e) => return Err(e),
        };
        Ok(format!("Observation: {}", observation))
    }
}

fn preview(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max).collect::<String>())
    } else {
        s.to_string()
    }
}
