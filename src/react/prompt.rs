//! 默认 system prompt：教模型使用 `Action:` / `Answer:` 行格式

use crate::tools::ActionRegistry;

/// 回复中没有指令且策略为 Nudge 时，下一轮发送的提示
pub const NUDGE_PROMPT: &str = "Your last reply contained no directive. \
Reply with exactly one line `Action: <action>: <input>` to run an action, \
or `Answer: final: <answer>` when you are done.";

const PROMPT_HEAD: &str = "You run in a loop of Thought, Action, PAUSE, Observation.
At the end of the loop you output an Answer.
Use Thought to describe your thoughts about the question you have been asked.
Use Action to run one of the actions available to you - then return PAUSE.
Observation will be the result of running those actions.
An Action line must look exactly like `Action: <action>: <input>`.
An Answer line must look exactly like `Answer: final: <answer>`.

Your available actions are:
";

const PROMPT_EXAMPLE: &str = "
Always look things up on Wikipedia if you have the opportunity to do so.

Example session:

Question: What is the capital of France?
Thought: I should look up France on Wikipedia
Action: wikipedia: France
PAUSE

You will be called again with this:

Observation: France is a country. The capital is Paris.

You then output:

Answer: final: The capital of France is Paris";

/// 根据已注册动作生成 system prompt
pub fn default_system_prompt(registry: &ActionRegistry) -> String {
    format!("{}\n{}\n{}", PROMPT_HEAD, registry.describe(), PROMPT_EXAMPLE)
}
