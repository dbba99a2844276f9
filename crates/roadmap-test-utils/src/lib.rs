//! Testing utilities for the roadmap tools workspace
//!
//! Shared test doubles and fixtures.

#![allow(missing_docs)]

use roadmap_seeder::{
    CanisterCall, CommandError, CommandOutput, CommandRunner, Milestone, Pacer,
    Quarter, Roadmap, Task, ADD_MILESTONE, ADD_TASK, GET_MILESTONES,
};
use std::time::Duration;

/// In-memory stand-in for the roadmap canister behind `dfx`
///
/// Milestone ids are assigned sequentially from `first_id`. The listing
/// prints the newest milestone first, which is what the scrape relies on.
#[derive(Debug, Clone)]
pub struct ScriptedRunner {
    calls: Vec<CanisterCall>,
    milestone_ids: Vec<u64>,
    next_id: u64,
    reply_with_id: bool,
    failure: Option<String>,
}

impl ScriptedRunner {
    /// Canister assigning ids from `first_id`, replying `()` to creates
    pub fn sequential(first_id: u64) -> Self {
        Self {
            calls: Vec::new(),
            milestone_ids: Vec::new(),
            next_id: first_id,
            reply_with_id: false,
            failure: None,
        }
    }

    /// Every call exits non-zero with `stderr`
    pub fn failing(stderr: impl Into<String>) -> Self {
        Self {
            failure: Some(stderr.into()),
            ..Self::sequential(1)
        }
    }

    /// Reply to `addMilestone` with `(<id> : nat)`
    #[must_use]
    pub fn with_reply_ids(mut self) -> Self {
        self.reply_with_id = true;
        self
    }

    /// Every call received, in order
    pub fn calls(&self) -> &[CanisterCall] {
        &self.calls
    }

    /// Calls that change canister state
    pub fn mutations(&self) -> Vec<&CanisterCall> {
        self.calls.iter().filter(|c| c.is_mutation()).collect()
    }

    /// Calls to `method`
    pub fn calls_to(&self, method: &str) -> Vec<&CanisterCall> {
        self.calls.iter().filter(|c| c.method() == method).collect()
    }

    /// Milestone id referenced by each `addTask` call, in order
    pub fn task_milestone_ids(&self) -> Vec<u64> {
        self.calls_to(ADD_TASK)
            .into_iter()
            .filter_map(CanisterCall::argument)
            .filter_map(|arg| arg.strip_prefix('(')?.split(',').next()?.trim().parse().ok())
            .collect()
    }

    fn listing(&self) -> String {
        let records: Vec<String> = self
            .milestone_ids
            .iter()
            .rev()
            .map(|id| format!("    record {{ id = {id} : nat; period = \"2025-Q2\" }};"))
            .collect();
        format!("(\n  vec {{\n{}\n  }},\n)\n", records.join("\n"))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&mut self, call: &CanisterCall) -> Result<CommandOutput, CommandError> {
        self.calls.push(call.clone());

        if let Some(stderr) = &self.failure {
            return Ok(CommandOutput::failed(stderr.clone()));
        }

        let output = match call.method() {
            ADD_MILESTONE => {
                let id = self.next_id;
                self.next_id += 1;
                self.milestone_ids.push(id);
                if self.reply_with_id {
                    CommandOutput::ok(format!("({id} : nat)\n"))
                } else {
                    CommandOutput::ok("()\n")
                }
            }
            GET_MILESTONES => CommandOutput::ok(self.listing()),
            _ => CommandOutput::ok("()\n"),
        };
        Ok(output)
    }
}

/// Pacer recording requested pauses without sleeping
#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    pub pauses: Vec<Duration>,
}

impl RecordingPacer {
    pub fn total(&self) -> Duration {
        self.pauses.iter().sum()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

/// One quarter, one milestone, two tasks
pub fn single_milestone_roadmap() -> Roadmap {
    Roadmap::new(vec![Quarter::new(
        "Q2 2025",
        "2025-Q2",
        vec![Milestone::new(
            "Platform Identification & Research",
            "Identify key web game platforms and their requirements.",
            vec![
                Task::todo("Identify Key Platforms", "List platforms like CrazyGames, Poki, Kongregate."),
                Task::todo("Research Platform Requirements", "Document WebGL specs, SDKs, policies."),
            ],
        )],
    )])
}

/// Two quarters with uneven milestone and task counts
pub fn uneven_roadmap() -> Roadmap {
    Roadmap::new(vec![
        Quarter::new(
            "Q3 2026",
            "2026-Q3",
            vec![
                Milestone::new("Alpha", "First cut.", vec![Task::todo("A1", "One.")]),
                Milestone::new("Empty", "No tasks yet.", vec![]),
            ],
        ),
        Quarter::new(
            "Q4 2026",
            "2026-Q4",
            vec![Milestone::new(
                "Beta",
                "Second cut.",
                vec![
                    Task::todo("B1", "One."),
                    Task::todo("B2", "Two."),
                    Task::todo("B3", "Three."),
                ],
            )],
        ),
    ])
}
