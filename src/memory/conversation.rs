//! 会话存储：单次查询的对话历史
//!
//! 构造时写入唯一一条 system 消息，之后只追加 user / assistant 消息，运行期间不剪枝、不删除。

use serde::{Deserialize, Serialize};

use crate::core::AgentError;

/// 消息角色（与 LLM API 一致；Assistant 即模型回复）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// 单条消息
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// 一次查询的对话历史：首条固定为 system，其余按时间顺序追加
#[derive(Clone, Debug)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// 追加一条消息；system 只能在构造时写入
    pub fn append(&mut self, msg: Message) -> Result<(), AgentError> {
        if msg.role == Role::System {
            return Err(AgentError::InvalidMessage(
                "system message can only be set when the conversation is created".to_string(),
            ));
        }
        self.messages.push(msg);
        Ok(())
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// 完整历史（含 system），每轮整体发送给 LLM
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_prompt(&self) -> &str {
        &self.messages[0].content
    }

    /// 非 system 消息的文本，按顺序，跳过空白内容
    pub fn non_system_messages(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter(|m| m.role != Role::System)
            .filter(|m| !m.content.trim().is_empty())
            .map(|m| m.content.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
