//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `WIKI_REACT__*` 覆盖（双下划线表示嵌套，如 `WIKI_REACT__REACT__MAX_ITERATIONS=8`）。
//! API Key 不走配置文件，只从 `OPENAI_API_KEY` / `DEEPSEEK_API_KEY` 读取。

use std::path::PathBuf;

use serde::Deserialize;

use crate::llm::{DEEPSEEK_CHAT, DEFAULT_OPENAI_MODEL};
use crate::react::{NoDirectivePolicy, ReactOptions, DEFAULT_MAX_ITERATIONS};
use crate::tools::DEFAULT_WIKIPEDIA_ENDPOINT;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmSection,
    pub react: ReactSection,
    pub tools: ToolsSection,
    pub server: ServerSection,
}

/// [llm] 段：后端选择与超时
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// 后端：openai / deepseek
    #[serde(default = "default_provider")]
    pub provider: String,
    /// 未设置时按 provider 选默认模型
    pub model: Option<String>,
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeouts: LlmTimeoutsSection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            base_url: None,
            timeouts: LlmTimeoutsSection::default(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

impl LlmSection {
    /// 实际使用的模型：显式配置优先，否则 deepseek 用 deepseek-chat，其余用 gpt-4o-mini
    pub fn resolved_model(&self) -> &str {
        match self.model.as_deref() {
            Some(m) if !m.trim().is_empty() => m,
            _ if self.provider.eq_ignore_ascii_case("deepseek") => DEEPSEEK_CHAT,
            _ => DEFAULT_OPENAI_MODEL,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmTimeoutsSection {
    /// 单次模型请求超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self {
            request: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    60
}

/// [react] 段：迭代上限、Answer 与无指令时的策略、system prompt 文件
#[derive(Debug, Clone, Deserialize)]
pub struct ReactSection {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_stop_on_answer")]
    pub stop_on_answer: bool,
    #[serde(default)]
    pub no_directive: NoDirectivePolicy,
    pub system_prompt_path: Option<PathBuf>,
}

impl Default for ReactSection {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            stop_on_answer: default_stop_on_answer(),
            no_directive: NoDirectivePolicy::default(),
            system_prompt_path: None,
        }
    }
}

impl ReactSection {
    pub fn options(&self) -> ReactOptions {
        ReactOptions {
            max_iterations: self.max_iterations,
            stop_on_answer: self.stop_on_answer,
            no_directive: self.no_directive,
        }
    }
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_stop_on_answer() -> bool {
    true
}

/// [tools] 段：动作超时与各动作配置
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    /// 单次动作调用超时（秒）
    #[serde(default = "default_action_timeout_secs")]
    pub action_timeout_secs: u64,
    #[serde(default)]
    pub wikipedia: WikipediaSection,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            action_timeout_secs: default_action_timeout_secs(),
            wikipedia: WikipediaSection::default(),
        }
    }
}

fn default_action_timeout_secs() -> u64 {
    30
}

/// [tools.wikipedia] 段
#[derive(Debug, Clone, Deserialize)]
pub struct WikipediaSection {
    #[serde(default = "default_wikipedia_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_wikipedia_timeout_secs")]
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for WikipediaSection {
    fn default() -> Self {
        Self {
            endpoint: default_wikipedia_endpoint(),
            timeout_secs: default_wikipedia_timeout_secs(),
            user_agent: None,
        }
    }
}

fn default_wikipedia_endpoint() -> String {
    DEFAULT_WIKIPEDIA_ENDPOINT.to_string()
}

fn default_wikipedia_timeout_secs() -> u64 {
    15
}

/// [server] 段：HTTP 前端监听地址
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// 从 config 目录加载配置，环境变量 WIKI_REACT__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 WIKI_REACT__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("WIKI_REACT")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

/// 读取 system prompt 文件；未配置或读取失败返回 None，由调用方回退到默认 prompt
pub fn load_system_prompt(cfg: &AppConfig) -> Option<String> {
    let path = cfg.react.system_prompt_path.as_ref()?;
    match std::fs::read_to_string(path) {
        Ok(s) if !s.trim().is_empty() => Some(s),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Failed to read system prompt {}: {}", path.display(), e);
            None
        }
    }
}
