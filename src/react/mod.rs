//! 认知层：指令解析、ReAct 主循环、过程事件、默认 prompt

pub mod directive;
pub mod events;
pub mod loop_;
pub mod prompt;

pub use directive::{parse_directive, parse_line, Directive, DirectiveKind};
pub use events::ReactEvent;
pub use loop_::{
    NoDirectivePolicy, ReactAgent, ReactOptions, ReactResult, ReactSession, StopReason,
    DEFAULT_MAX_ITERATIONS,
};
pub use prompt::{default_system_prompt, NUDGE_PROMPT};
