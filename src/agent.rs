//! Agent 装配
//!
//! 供 CLI 与 HTTP 前端调用：create_llm_from_config 选择 LLM 后端，
//! create_action_registry 注册内置动作，create_agent 组装可在多会话间共享的 ReactAgent。

use std::sync::Arc;

use crate::config::{load_system_prompt, AppConfig};
use crate::llm::{create_deepseek_client, LlmClient, MockLlmClient, OpenAiClient};
use crate::react::{default_system_prompt, ReactAgent};
use crate::tools::{ActionExecutor, ActionRegistry, WikipediaSearch};

/// 根据配置与环境变量中的 API Key 选择 LLM；都没有时退回 Mock
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    let timeout = cfg.llm.timeouts.request;
    let has_deepseek_key = std::env::var("DEEPSEEK_API_KEY").is_ok();
    let has_openai_key = std::env::var("OPENAI_API_KEY").is_ok();

    if provider == "deepseek" && (has_deepseek_key || has_openai_key) {
        let model = cfg.llm.resolved_model();
        tracing::info!("Using DeepSeek LLM ({})", model);
        Arc::new(
            create_deepseek_client(Some(model), cfg.llm.base_url.as_deref())
                .with_request_timeout(timeout),
        )
    } else if has_openai_key {
        tracing::info!("Using OpenAI LLM ({})", cfg.llm.resolved_model());
        Arc::new(
            OpenAiClient::new(
                cfg.llm.base_url.as_deref(),
                cfg.llm.resolved_model(),
                std::env::var("OPENAI_API_KEY").ok().as_deref(),
            )
            .with_request_timeout(timeout),
        )
    } else {
        tracing::warn!("No API key set or provider unknown, using Mock LLM");
        Arc::new(MockLlmClient::new())
    }
}

/// 注册内置动作（wikipedia）
pub fn create_action_registry(cfg: &AppConfig) -> ActionRegistry {
    let wiki = &cfg.tools.wikipedia;
    let mut registry = ActionRegistry::new();
    registry.register(WikipediaSearch::new(
        wiki.endpoint.clone(),
        wiki.timeout_secs,
        wiki.user_agent.as_deref(),
    ));
    registry
}

/// 用给定 LLM 组装 Agent；system prompt 优先读配置文件，否则按已注册动作生成
pub fn create_agent_with_llm(cfg: &AppConfig, llm: Arc<dyn LlmClient>) -> ReactAgent {
    let registry = create_action_registry(cfg);
    let system_prompt =
        load_system_prompt(cfg).unwrap_or_else(|| default_system_prompt(&registry));
    let executor = Arc::new(ActionExecutor::new(registry, cfg.tools.action_timeout_secs));
    ReactAgent::new(llm, executor, system_prompt).with_options(cfg.react.options())
}

pub fn create_agent(cfg: &AppConfig) -> ReactAgent {
    create_agent_with_llm(cfg, create_llm_from_config(cfg))
}
