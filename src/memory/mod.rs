//! 记忆层：单次查询内的对话历史（仅内存，不跨会话持久化）

pub mod conversation;

pub use conversation::{Conversation, Message, Role};
