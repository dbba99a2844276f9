//! Canister calls and the runner seam
//!
//! A [`CanisterCall`] is an argv vector, never a shell string, so dataset
//! text cannot break out of its argument. The shell-quoted form is only
//! used for display.

use crate::candid::{add_milestone_args, add_task_args};
use crate::dataset::{Milestone, Task};
use crate::error::CommandError;
use std::fmt;
use std::process::{Command, Stdio};
use tracing::debug;

/// Canister method creating a milestone
pub const ADD_MILESTONE: &str = "addMilestone";
/// Canister method creating a task
pub const ADD_TASK: &str = "addTask";
/// Canister method listing milestones
pub const GET_MILESTONES: &str = "getMilestones";

/// Where canister calls are sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanisterTarget {
    program: String,
    canister: String,
    network: Option<String>,
}

impl CanisterTarget {
    /// Target `canister` through `dfx` on the default network
    #[must_use]
    pub fn new(canister: impl Into<String>) -> Self {
        Self {
            program: "dfx".to_string(),
            canister: canister.into(),
            network: None,
        }
    }

    /// With the `dfx` executable to run
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// With a `--network` flag
    #[must_use]
    pub fn with_network(mut self, network: Option<String>) -> Self {
        self.network = network;
        self
    }

    /// Canister name
    #[inline]
    #[must_use]
    pub fn canister(&self) -> &str {
        &self.canister
    }

    /// Generic call of `method` with optional Candid argument text
    #[must_use]
    pub fn call(&self, method: &str, argument: Option<String>) -> CanisterCall {
        CanisterCall {
            program: self.program.clone(),
            network: self.network.clone(),
            canister: self.canister.clone(),
            method: method.to_string(),
            argument,
        }
    }

    /// `addMilestone` for `milestone` in `period`
    #[must_use]
    pub fn add_milestone(&self, period: &str, milestone: &Milestone) -> CanisterCall {
        self.call(
            ADD_MILESTONE,
            Some(add_milestone_args(period, &milestone.title, &milestone.description)),
        )
    }

    /// `addTask` for `task` under milestone `milestone_id`
    #[must_use]
    pub fn add_task(&self, milestone_id: u64, task: &Task) -> CanisterCall {
        self.call(
            ADD_TASK,
            Some(add_task_args(milestone_id, &task.title, &task.description, &task.status)),
        )
    }

    /// `getMilestones`
    #[must_use]
    pub fn list_milestones(&self) -> CanisterCall {
        self.call(GET_MILESTONES, None)
    }
}

impl Default for CanisterTarget {
    fn default() -> Self {
        Self::new("roadmap")
    }
}

/// `dfx [--network N] canister call <canister> <method> [<args>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanisterCall {
    program: String,
    network: Option<String>,
    canister: String,
    method: String,
    argument: Option<String>,
}

impl CanisterCall {
    /// Executable
    #[inline]
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Canister method
    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Candid argument text, if any
    #[inline]
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// Whether the call changes canister state
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        self.method != GET_MILESTONES
    }

    /// Arguments after the program name
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(7);
        if let Some(network) = &self.network {
            args.push("--network".to_string());
            args.push(network.clone());
        }
        args.extend(["canister", "call"].map(String::from));
        args.push(self.canister.clone());
        args.push(self.method.clone());
        if let Some(argument) = &self.argument {
            args.push(argument.clone());
        }
        args
    }
}

impl fmt::Display for CanisterCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self.args();
        let words = std::iter::once(self.program.as_str()).chain(args.iter().map(String::as_str));
        match shlex::try_join(words.clone()) {
            Ok(line) => f.write_str(&line),
            Err(_) => f.write_str(&words.collect::<Vec<_>>().join(" ")),
        }
    }
}

/// Captured result of a call that ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Zero exit status
    pub success: bool,
}

impl CommandOutput {
    /// Successful output with `stdout`
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            success: true,
        }
    }

    /// Failed output with `stderr`
    #[must_use]
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            success: false,
        }
    }
}

/// Executes canister calls
///
/// A non-zero exit is `Ok` with `success == false`; `Err` means the call
/// never ran.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run `call` to completion and capture its output
    fn run(&mut self, call: &CanisterCall) -> Result<CommandOutput, CommandError>;
}

/// Runs calls as child processes, synchronously
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&mut self, call: &CanisterCall) -> Result<CommandOutput, CommandError> {
        debug!(command = %call, "spawning");
        let output = Command::new(call.program())
            .args(call.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CommandError::Spawn {
                program: call.program().to_string(),
                source,
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        })
    }
}

/// Prints calls instead of running them
#[derive(Debug, Default, Clone)]
pub struct DryRunRunner {
    issued: Vec<CanisterCall>,
}

impl DryRunRunner {
    /// Runner with no calls recorded
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls seen so far
    #[must_use]
    pub fn issued(&self) -> &[CanisterCall] {
        &self.issued
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&mut self, call: &CanisterCall) -> Result<CommandOutput, CommandError> {
        println!("[dry-run] {call}");
        self.issued.push(call.clone());
        Ok(CommandOutput::ok(String::new()))
    }
}
