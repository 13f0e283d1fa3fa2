//! wiki-react 命令行
//!
//! 入口：初始化日志、加载配置、装配 Agent，对命令行给出的问题跑一次 ReAct 并逐行打印对话。
//! 用法: wiki-react [问题...]（缺省为演示问题）

use anyhow::Context;
use wiki_react::config::{load_config, AppConfig};
use wiki_react::{create_agent, observability};

const DEMO_QUESTION: &str = "How long is a Boeing 757-200?";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });
    let agent = create_agent(&cfg);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let question = if args.is_empty() {
        DEMO_QUESTION.to_string()
    } else {
        args.join(" ")
    };

    let transcript = agent
        .run_query(&question)
        .await
        .context("ReAct query failed")?;

    for line in transcript {
        println!("{}", line);
    }
    Ok(())
}
