//! Roadmap dataset model
//!
//! Quarters own milestones, milestones own tasks. Order is significant
//! everywhere: it is the order commands are issued in, and the only link
//! between a task and its milestone's remote identifier.

use crate::error::DatasetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Task status label, sent as a Candid variant tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskStatus(String);

impl TaskStatus {
    /// Status for work not started yet
    pub const TODO: &'static str = "ToDo";

    /// Validate a status label
    ///
    /// # Errors
    /// `DatasetError::InvalidStatus` unless the label is an identifier.
    pub fn new(label: impl Into<String>) -> Result<Self, DatasetError> {
        let label = label.into();
        if is_identifier(&label) {
            Ok(Self(label))
        } else {
            Err(DatasetError::InvalidStatus(label))
        }
    }

    /// `ToDo`
    #[must_use]
    pub fn todo() -> Self {
        Self(Self::TODO.to_string())
    }

    /// Label text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::todo()
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = DatasetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.0
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_identifier(label: &str) -> bool {
    let mut chars = label.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A unit of work under a milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task title
    pub title: String,
    /// Task description
    pub description: String,
    /// Status variant, `ToDo` when omitted
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    /// Task with an explicit status
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status,
        }
    }

    /// Task with `ToDo` status
    #[must_use]
    pub fn todo(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, TaskStatus::todo())
    }
}

/// A milestone and its ordered tasks
///
/// The remote identifier is not part of the dataset; it is discovered
/// after the milestone is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone title
    pub title: String,
    /// Milestone description
    pub description: String,
    /// Tasks in creation order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Milestone {
    /// Milestone with its tasks
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tasks,
        }
    }
}

/// A quarter label, its period and ordered milestones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quarter {
    /// Display label, e.g. `Q2 2025`
    pub label: String,
    /// Period sent to the canister, e.g. `2025-Q2`
    pub period: String,
    /// Milestones in creation order
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Quarter {
    /// Quarter with its milestones
    #[must_use]
    pub fn new(label: impl Into<String>, period: impl Into<String>, milestones: Vec<Milestone>) -> Self {
        Self {
            label: label.into(),
            period: period.into(),
            milestones,
        }
    }
}

/// Complete roadmap dataset
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Roadmap {
    /// Quarters in creation order
    pub quarters: Vec<Quarter>,
}

impl Roadmap {
    /// Roadmap from quarters
    #[must_use]
    pub fn new(quarters: Vec<Quarter>) -> Self {
        Self { quarters }
    }

    /// Quarters in declared order
    pub fn quarters(&self) -> impl Iterator<Item = &Quarter> {
        self.quarters.iter()
    }

    /// Number of milestones across all quarters
    #[must_use]
    pub fn milestone_count(&self) -> usize {
        self.quarters.iter().map(|q| q.milestones.len()).sum()
    }

    /// Number of tasks across all milestones
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.quarters
            .iter()
            .flat_map(|q| &q.milestones)
            .map(|m| m.tasks.len())
            .sum()
    }

    /// Load a dataset from a `.json`, `.yaml` or `.yml` file
    ///
    /// # Errors
    /// I/O, parse, status validation or unsupported extension.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&text)?),
            Some("yaml" | "yml") => Ok(serde_yaml::from_str(&text)?),
            _ => Err(DatasetError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// The four-quarter web launch roadmap
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            Quarter::new(
                "Q2 2025",
                "2025-Q2",
                vec![
                    Milestone::new(
                        "Platform Identification & Research",
                        "Identify key web game platforms and their requirements.",
                        vec![
                            Task::todo("Identify Key Platforms", "List platforms like CrazyGames, Poki, Kongregate."),
                            Task::todo("Research Platform Requirements", "Document WebGL specs, SDKs, policies."),
                        ],
                    ),
                    Milestone::new(
                        "Technical Assessment & Planning",
                        "Assess WebGL performance and plan multiplayer architecture.",
                        vec![
                            Task::todo("WebGL Performance Profiling", "Test performance across browsers."),
                            Task::todo("Multiplayer WebSocket Design", "Define WebSocket integration with canisters."),
                        ],
                    ),
                ],
            ),
            Quarter::new(
                "Q3 2025",
                "2025-Q3",
                vec![
                    Milestone::new(
                        "WebGL Optimization",
                        "Optimize asset sizes and rendering for faster performance.",
                        vec![
                            Task::todo("Reduce Texture Sizes", "Optimize textures for faster load times."),
                            Task::todo("Script Performance Review", "Review scripts and optimize performance."),
                        ],
                    ),
                    Milestone::new(
                        "Multiplayer Infrastructure Setup",
                        "Implement WebSocket servers and connect with canisters.",
                        vec![
                            Task::todo("WebSocket Server Deployment", "Deploy WebSocket servers for real-time gameplay."),
                            Task::todo("Canister Integration Testing", "Test real-time data exchange between WebSockets and canisters."),
                        ],
                    ),
                ],
            ),
            Quarter::new(
                "Q4 2025",
                "2025-Q4",
                vec![
                    Milestone::new(
                        "Platform SDK Integration",
                        "Integrate SDKs from target web platforms.",
                        vec![
                            Task::todo("Integrate CrazyGames SDK", "Embed and configure CrazyGames SDK."),
                            Task::todo("Implement Ads & Analytics", "Integrate ads and analytics tools from platforms."),
                        ],
                    ),
                    Milestone::new(
                        "Off-Chain Data Integration",
                        "Configure canisters to gather data from external sources.",
                        vec![
                            Task::todo("Set Up HTTPS Outcalls", "Configure HTTPS outcalls for analytics and platform events."),
                            Task::todo("Implement Off-Chain Data Handlers", "Handle incoming data in game logic."),
                        ],
                    ),
                ],
            ),
            Quarter::new(
                "Q1 2026",
                "2026-Q1",
                vec![
                    Milestone::new(
                        "Compliance & Performance Testing",
                        "Ensure the game meets platform requirements.",
                        vec![
                            Task::todo("Platform Compatibility Testing", "Test across different platforms for performance and compatibility."),
                            Task::todo("Latency and Load Time Optimization", "Optimize network latency and load times."),
                        ],
                    ),
                    Milestone::new(
                        "Final Launch Preparations",
                        "Prepare the game for public launch on web platforms.",
                        vec![
                            Task::todo("Submission to Platforms", "Submit the game to all selected web platforms."),
                            Task::todo("Marketing & Community Engagement", "Launch marketing campaigns and engage with the gaming community."),
                        ],
                    ),
                ],
            ),
        ])
    }
}
