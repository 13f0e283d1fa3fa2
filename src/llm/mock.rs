//! Mock LLM 客户端（用于测试与无 API Key 的本地运行）
//!
//! 按顺序回放预设回复；脚本耗尽后回显最后一条 User 消息为 Answer 指令。
//! 每次调用收到的完整消息序列都会被记录，便于测试断言。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{Completion, LlmClient, LlmError, TokenUsage, UsageCounter};
use crate::memory::{Message, Role};

/// Mock 客户端：回放脚本，记录调用
#[derive(Debug, Default)]
pub struct MockLlmClient {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<Vec<Message>>>,
    usage: UsageCounter,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以一组成功回复构造
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        for r in replies {
            mock.push_reply(r);
        }
        mock
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(Ok(reply.into()));
        }
    }

    pub fn push_error(&self, err: LlmError) {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(Err(err));
        }
    }

    /// 每次 complete 收到的消息序列（按调用顺序）
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<Completion, LlmError> {
        if let Ok(mut c) = self.calls.lock() {
            c.push(messages.to_vec());
        }

        let scripted = self.replies.lock().ok().and_then(|mut q| q.pop_front());
        let content = match scripted {
            Some(reply) => reply?,
            None => {
                let last_user = messages
                    .iter()
                    .rev()
                    .find(|m| m.role == Role::User)
                    .map(|m| m.content.as_str())
                    .unwrap_or("(no input)");
                format!("Answer: echo: {}", last_user)
            }
        };

        let usage = TokenUsage {
            input_tokens: messages.iter().map(|m| m.content.len() as u64).sum(),
            output_tokens: content.len() as u64,
            ..TokenUsage::default()
        };
        self.usage.add(&usage);
        Ok(Completion::new(content, usage))
    }

    fn token_usage(&self) -> TokenUsage {
        self.usage.get()
    }
}
