//! Candid text arguments for the roadmap canister methods

use crate::dataset::TaskStatus;

/// Quote `value` as a Candid text literal
#[must_use]
pub fn text_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `("<period>", "<title>", "<description>")`
#[must_use]
pub fn add_milestone_args(period: &str, title: &str, description: &str) -> String {
    format!(
        "({}, {}, {})",
        text_literal(period),
        text_literal(title),
        text_literal(description)
    )
}

/// `(<milestone_id>, "<title>", "<description>", variant { <Status> })`
#[must_use]
pub fn add_task_args(milestone_id: u64, title: &str, description: &str, status: &TaskStatus) -> String {
    format!(
        "({milestone_id}, {}, {}, variant {{ {status} }})",
        text_literal(title),
        text_literal(description)
    )
}
