//! ReAct 循环集成测试：Mock LLM + 本地 wikipedia mock server

use std::sync::Arc;

use wiki_react::config::AppConfig;
use wiki_react::create_agent_with_llm;
use wiki_react::llm::MockLlmClient;
use wiki_react::memory::{Message, Role};
use wiki_react::react::{ReactEvent, ReactSession, StopReason};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUESTION: &str = "How long is a Boeing 757-200?";

async fn wiki_server(snippets: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    let hits: Vec<serde_json::Value> = snippets
        .iter()
        .map(|s| serde_json::json!({"title": "t", "snippet": s}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("list", "search"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            serde_json::json!({"query": {"search": hits}}).to_string(),
            "application/json",
        ))
        .mount(&server)
        .await;
    server
}

fn config_for(server: &MockServer) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.tools.wikipedia.endpoint = format!("{}/w/api.php", server.uri());
    cfg.tools.wikipedia.timeout_secs = 5;
    cfg
}

fn user_prompts(calls: &[Vec<Message>]) -> Vec<String> {
    calls
        .iter()
        .map(|c| {
            c.iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map(|m| m.content.clone())
                .unwrap_or_default()
        })
        .collect()
}

#[tokio::test]
async fn no_directive_reply_repeats_question() {
    let server = wiki_server(&[]).await;
    let llm = Arc::new(MockLlmClient::with_replies([
        "I believe it is long.",
        "Answer: final: about 47 m",
    ]));
    let agent = create_agent_with_llm(&config_for(&server), llm.clone());

    let transcript = agent.run_query(QUESTION).await.unwrap();

    assert_eq!(user_prompts(&llm.calls()), vec![QUESTION, QUESTION]);
    assert_eq!(
        transcript,
        vec![
            QUESTION,
            "I believe it is long.",
            QUESTION,
            "Answer: final: about 47 m"
        ]
    );
}

#[tokio::test]
async fn wikipedia_action_feeds_snippets_back() {
    let server = wiki_server(&["The 757-200 is 47.3 m long", "First flight 1982"]).await;
    let llm = Arc::new(MockLlmClient::with_replies([
        "Thought: I should look this up\nAction: wikipedia: length of Boeing 757-200\nPAUSE",
        "Answer: final: 47.3 m",
    ]));
    let agent = create_agent_with_llm(&config_for(&server), llm.clone());

    agent.run_query(QUESTION).await.unwrap();

    let prompts = user_prompts(&llm.calls());
    assert_eq!(
        prompts[1],
        "Observation: The 757-200 is 47.3 m long\nFirst flight 1982"
    );
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0]
        .url
        .query_pairs()
        .any(|(k, v)| k == "srsearch" && v == "length of Boeing 757-200"));
}

#[tokio::test]
async fn unregistered_action_gives_empty_observation() {
    let server = wiki_server(&[]).await;
    let llm = Arc::new(MockLlmClient::with_replies([
        "Action: flights: JFK to LHR",
        "Answer: final: no flight data",
    ]));
    let agent = create_agent_with_llm(&config_for(&server), llm.clone());

    agent.run_query("Find me a flight").await.unwrap();

    assert_eq!(user_prompts(&llm.calls())[1], "Observation: ");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_results_give_empty_observation() {
    let server = wiki_server(&[]).await;
    let llm = Arc::new(MockLlmClient::with_replies([
        "Action: wikipedia: qqqzzz nonsense",
        "Answer: final: nothing found",
    ]));
    let agent = create_agent_with_llm(&config_for(&server), llm.clone());

    agent.run_query("?").await.unwrap();

    assert_eq!(user_prompts(&llm.calls())[1], "Observation: ");
}

#[tokio::test]
async fn unreachable_backend_does_not_abort_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let llm = Arc::new(MockLlmClient::with_replies([
        "Action: wikipedia: Boeing 757",
        "Answer: final: unknown",
    ]));
    let agent = create_agent_with_llm(&config_for(&server), llm.clone());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let result = agent
        .run(&ReactSession::new().with_event_tx(&tx), QUESTION)
        .await
        .unwrap();

    assert_eq!(result.reason, StopReason::Answer);
    assert_eq!(user_prompts(&llm.calls())[1], "Observation: ");
    let mut failed = false;
    while let Ok(ev) = rx.try_recv() {
        if matches!(ev, ReactEvent::ActionFailed { .. }) {
            failed = true;
        }
    }
    assert!(failed);
}

#[tokio::test]
async fn stops_after_five_iterations_without_answer() {
    let server = wiki_server(&["snippet"]).await;
    let llm = Arc::new(MockLlmClient::with_replies(
        std::iter::repeat("Thought: need more\nAction: wikipedia: Boeing").take(20),
    ));
    let agent = create_agent_with_llm(&config_for(&server), llm.clone());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let result = agent
        .run(&ReactSession::new().with_event_tx(&tx), QUESTION)
        .await
        .unwrap();

    assert_eq!(llm.call_count(), 5);
    assert_eq!(result.iterations, 5);
    assert_eq!(result.reason, StopReason::IterationLimit);
    assert_eq!(result.transcript.len(), 10);
    assert_eq!(result.transcript[0], QUESTION);
    assert!(!result
        .transcript
        .iter()
        .any(|t| t == agent.system_prompt()));

    let mut last = None;
    while let Ok(ev) = rx.try_recv() {
        last = Some(ev);
    }
    assert_eq!(
        last,
        Some(ReactEvent::Done {
            iterations: 5,
            reason: StopReason::IterationLimit
        })
    );
}

#[tokio::test]
async fn prose_only_replies_stop_at_iteration_ceiling() {
    let server = wiki_server(&[]).await;
    let llm = Arc::new(MockLlmClient::with_replies(
        std::iter::repeat("I think it is long.").take(20),
    ));
    let agent = create_agent_with_llm(&config_for(&server), llm.clone());

    let result = agent.run(&ReactSession::new(), QUESTION).await.unwrap();

    assert_eq!(llm.call_count(), 5);
    assert_eq!(result.iterations, 5);
    assert_eq!(result.reason, StopReason::IterationLimit);
    assert_eq!(result.answer, None);
    assert_eq!(result.transcript.len(), 10);
    assert!(user_prompts(&llm.calls()).iter().all(|p| p == QUESTION));
}

#[tokio::test]
async fn concurrent_queries_have_isolated_histories() {
    let server = wiki_server(&[]).await;
    let cfg = config_for(&server);
    // 脚本耗尽后 Mock 回显最后一条 user 消息为 Answer，两条查询互不影响
    let agent = Arc::new(create_agent_with_llm(&cfg, Arc::new(MockLlmClient::new())));

    let a = {
        let agent = agent.clone();
        tokio::spawn(async move { agent.run_query("question A").await })
    };
    let b = {
        let agent = agent.clone();
        tokio::spawn(async move { agent.run_query("question B").await })
    };

    let a = a.await.unwrap().unwrap();
    let b = b.await.unwrap().unwrap();
    assert_eq!(a, vec!["question A", "Answer: echo: question A"]);
    assert_eq!(b, vec!["question B", "Answer: echo: question B"]);
}
