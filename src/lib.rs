//! wiki-react - ReAct（Reason + Act）问答循环
//!
//! 模块划分：
//! - **agent**: 按配置装配 LLM、动作注册表与 ReactAgent
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误分类
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / DeepSeek / Mock）
//! - **memory**: 单次查询的对话历史
//! - **observability**: 日志初始化
//! - **react**: 指令解析、ReAct 主循环、过程事件
//! - **tools**: 动作注册表、执行器与 wikipedia 检索

pub mod agent;
pub mod config;
pub mod core;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod react;
pub mod tools;

pub use agent::{create_agent, create_agent_with_llm};
pub use react::{ReactAgent, ReactOptions, ReactSession};
