//! 指令解析：从模型回复中找出第一行 `Action: <name>: <detail>` 或 `Answer: <name>: <detail>`
//!
//! 逐行扫描（跳过空白行），每行先试 Action 再试 Answer，命中即停止。
//! 关键字大小写严格匹配；name 的大小写由调度方忽略。

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// 指令种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    /// 请求执行外部动作
    Action,
    /// 模型给出最终答案
    Answer,
}

/// 从一行回复中解析出的指令
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub name: String,
    pub argument: String,
}

impl Directive {
    pub fn action(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            kind: DirectiveKind::Action,
            name: name.into(),
            argument: argument.into(),
        }
    }

    pub fn answer(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            kind: DirectiveKind::Answer,
            name: name.into(),
            argument: argument.into(),
        }
    }
}

static ACTION_RE: OnceLock<Regex> = OnceLock::new();
static ANSWER_RE: OnceLock<Regex> = OnceLock::new();

fn action_re() -> &'static Regex {
    ACTION_RE.get_or_init(|| Regex::new(r"^Action: (\w+): (.*)$").unwrap())
}

fn answer_re() -> &'static Regex {
    ANSWER_RE.get_or_init(|| Regex::new(r"^Answer: (\w+): (.*)$").unwrap())
}

fn match_line(re: &Regex, line: &str, kind: DirectiveKind) -> Option<Directive> {
    let caps = re.captures(line)?;
    Some(Directive {
        kind,
        name: caps.get(1)?.as_str().to_string(),
        argument: caps.get(2)?.as_str().to_string(),
    })
}

/// 解析一行；Action 优先于 Answer
pub fn parse_line(line: &str) -> Option<Directive> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    match_line(action_re(), line, DirectiveKind::Action)
        .or_else(|| match_line(answer_re(), line, DirectiveKind::Answer))
}

/// 解析整段回复，返回第一条命中的指令；无命中返回 None（不是错误）
pub fn parse_directive(reply: &str) -> Option<Directive> {
    for line in reply.split('\n').filter(|l| !l.trim().is_empty()) {
        if let Some(d) = parse_line(line) {
            return Some(d);
        }
        tracing::debug!(line = %preview(line, 5), "no directive on line");
    }
    None
}

fn preview(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
