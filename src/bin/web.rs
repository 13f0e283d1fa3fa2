//! wiki-react HTTP 前端
//!
//! 启动: cargo run --bin wiki-react-web --features web
//! - POST /question  {"query": "..."} -> {"response": [...]}
//! - GET  /demo      跑演示问题
//!
//! 每个请求新建一次会话；ReactAgent 只读，通过 Arc 共享。

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use wiki_react::config::{load_config, AppConfig};
use wiki_react::{create_agent, observability, ReactAgent};

const DEMO_QUESTION: &str = "How long is a Boeing 757-200?";

#[derive(Debug, Deserialize)]
struct Question {
    query: String,
}

#[derive(Debug, Serialize)]
struct Answer {
    response: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

struct AppState {
    agent: ReactAgent,
}

async fn answer(state: &AppState, question: &str) -> Response {
    match state.agent.run_query(question).await {
        Ok(response) => {
            for line in &response {
                tracing::info!(line = %line, "response line");
            }
            Json(Answer { response }).into_response()
        }
        Err(e) => {
            tracing::error!("query failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn question(State(state): State<Arc<AppState>>, Json(q): Json<Question>) -> Response {
    answer(&state, &q.query).await
}

async fn demo(State(state): State<Arc<AppState>>) -> Response {
    answer(&state, DEMO_QUESTION).await
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/question", post(question))
        .route("/demo", get(demo))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });
    let state = Arc::new(AppState {
        agent: create_agent(&cfg),
    });

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.server.bind))?;
    tracing::info!("wiki-react web listening on http://{}", cfg.server.bind);

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;
    Ok(())
}
