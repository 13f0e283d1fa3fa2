//! 动作执行器
//!
//! 持有 ActionRegistry 与全局超时。dispatch(name, argument)：
//! - 未注册的动作：记 warn，返回 Ok(None)（"无 Observation" 哨兵），不报错
//! - 动作返回 Err：转为 AgentError::ActionFailed
//! - 超时：转为 AgentError::ActionTimeout
//!
//! 超时为 0 时按 1 秒处理，避免每次调用都立即超时。
//! 每次调用输出结构化审计日志（JSON）。

use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::core::AgentError;
use crate::tools::ActionRegistry;

/// 动作执行器：对每次调用施加超时，并将结果映射为 AgentError
pub struct ActionExecutor {
    registry: ActionRegistry,
    timeout: Duration,
}

impl ActionExecutor {
    pub fn new(registry: ActionRegistry, timeout_secs: u64) -> Self {
        if timeout_secs == 0 {
            tracing::warn!("action_timeout_secs = 0, using 1s");
        }
        Self {
            registry,
            timeout: Duration::from_secs(timeout_secs.max(1)),
        }
    }

    /// 执行指定动作；Ok(None) 表示动作未注册
    pub async fn dispatch(
        &self,
        name: &str,
        argument: &str,
    ) -> Result<Option<String>, AgentError> {
        let Some(action) = self.registry.get(name) else {
            tracing::warn!(action = %name, "unknown action type");
            audit(name, false, "unknown", 0, argument);
            return Ok(None);
        };

        let start = Instant::now();
        let result = timeout(self.timeout, action.execute(argument)).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let (ok, outcome) = match &result {
            Ok(Ok(_)) => (true, "ok"),
            Ok(Err(_)) => (false, "error"),
            Err(_) => (false, "timeout"),
        };
        audit(name, ok, outcome, duration_ms, argument);

        match result {
            Ok(Ok(observation)) => Ok(Some(observation)),
            Ok(Err(reason)) => Err(AgentError::ActionFailed {
                action: name.to_string(),
                reason,
            }),
            Err(_) => Err(AgentError::ActionTimeout(name.to_string())),
        }
    }

}

fn audit(action: &str, ok: bool, outcome: &str, duration_ms: u64, argument: &str) {
    let audit = serde_json::json!({
        "event": "action_audit",
        "action": action,
        "ok": ok,
        "outcome": outcome,
        "duration_ms": duration_ms,
        "argument_preview": argument_preview(argument),
    });
    tracing::info!(audit = %audit.to_string(), "action");
}

fn argument_preview(argument: &str) -> String {
    if argument.chars().count() > 200 {
        format!("{}...", argument.chars().take(200).collect::<String>())
    } else {
        argument.to_string()
    }
}
