//! Wikipedia 全文检索动作
//!
//! 调用 MediaWiki `action=query&list=search` 接口（JSON），按后端返回顺序用换行拼接每条结果的 snippet。
//! 无结果、空响应或 JSON 结构不符时返回空字符串；网络错误与非 2xx 状态码作为动作失败返回。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::tools::Action;

pub const DEFAULT_WIKIPEDIA_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
const DEFAULT_USER_AGENT: &str = concat!("wiki-react/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct WikiResponse {
    query: Option<WikiQuery>,
}

#[derive(Debug, Deserialize)]
struct WikiQuery {
    search: Option<Vec<WikiSearchHit>>,
}

#[derive(Debug, Deserialize)]
struct WikiSearchHit {
    snippet: Option<String>,
}

/// 从响应体中提取 snippet；解析失败视为无结果
fn collect_snippets(body: &str) -> String {
    if body.trim().is_empty() {
        return String::new();
    }
    match serde_json::from_str::<WikiResponse>(body) {
        Ok(resp) => resp
            .query
            .and_then(|q| q.search)
            .map(|hits| {
                hits.into_iter()
                    .map(|h| h.snippet.unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default(),
        Err(e) => {
            tracing::warn!("wikipedia response is not valid search JSON: {}", e);
            String::new()
        }
    }
}

/// Wikipedia 检索：endpoint 可配置（测试时指向本地 mock server）
pub struct WikipediaSearch {
    client: Client,
    endpoint: String,
}

impl WikipediaSearch {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64, user_agent: Option<&str>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn search(&self, q: &str) -> Result<String, String> {
        tracing::info!(endpoint = %self.endpoint, query = %q, "querying wikipedia");
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", q),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| format!("Read body: {}", e))?;

        let joined = collect_snippets(&body);
        tracing::info!(snippets = %joined, "all snippets from wikipedia");
        Ok(joined)
    }
}

impl Default for WikipediaSearch {
    fn default() -> Self {
        Self::new(DEFAULT_WIKIPEDIA_ENDPOINT, 15, None)
    }
}

#[async_trait]
impl Action for WikipediaSearch {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn description(&self) -> &str {
        "e.g. wikipedia: Django\nReturns a summary from searching Wikipedia"
    }

    async fn execute(&self, argument: &str) -> Result<String, String> {
        self.search(argument).await
    }
}
