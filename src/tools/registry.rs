//! 动作注册表
//!
//! 所有动作实现 Action trait（name / description / execute），由 ActionRegistry 按小写名称注册与查找。
//! 注册表在启动后只读，可通过 Arc 在并发会话间共享。

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

/// 动作 trait：输入一段自由文本参数，异步返回 Observation 文本或失败原因
#[async_trait]
pub trait Action: Send + Sync {
    /// 动作名称（对应 `Action: <name>: ...` 中的 name）
    fn name(&self) -> &str;

    /// 动作描述（写入 system prompt，供 LLM 理解）
    fn description(&self) -> &str;

    async fn execute(&self, argument: &str) -> Result<String, String>;
}

/// 动作注册表：名称大小写不敏感
#[derive(Default, Clone)]
pub struct ActionRegistry {
    actions: BTreeMap<String, Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册动作；同名（忽略大小写）后注册者覆盖先注册者
    pub fn register(&mut self, action: impl Action + 'static) {
        let name = action.name().to_lowercase();
        self.actions.insert(name, Arc::new(action));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(&name.to_lowercase()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(&name.to_lowercase())
    }

    /// 每行一个 `name: description`，用于拼 system prompt 中的可用动作列表
    pub fn describe(&self) -> String {
        self.actions
            .iter()
            .map(|(name, a)| format!("{}: {}", name, a.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    #[async_trait]
    impl Action for Upper {
        fn name(&self) -> &str {
            "Upper"
        }

        fn description(&self) -> &str {
            "Uppercase the argument"
        }

        async fn execute(&self, argument: &str) -> Result<String, String> {
            Ok(argument.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let mut reg = ActionRegistry::new();
        reg.register(Upper);
        assert!(reg.contains("upper"));
        assert!(reg.contains("UPPER"));
        let action = reg.get("uPpEr").unwrap();
        assert_eq!(action.execute("abc").await.unwrap(), "ABC");
        assert!(reg.get("lower").is_none());
    }

    #[test]
    fn test_describe_lists_registered_actions() {
        let mut reg = ActionRegistry::new();
        assert!(reg.is_empty());
        reg.register(Upper);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.describe(), "upper: Uppercase the argument");
    }
}
