//! Roadmap seeder
//!
//! Replays a [`Roadmap`] into the canister one call at a time:
//! milestone create, settle pause, id discovery, then each task create
//! tagged with that id. Failed calls are printed and skipped; a run always
//! reaches the end of the dataset.

use crate::command::{CanisterCall, CanisterTarget, CommandRunner};
use crate::dataset::Roadmap;
use crate::discovery::{parse_listing_id, parse_reply_id, IdSource};
use crate::pacing::{Pacer, Pacing, ThreadPacer};
use std::fmt;
use std::io::{self, Write};
use tracing::{debug, info, warn};

/// Milestone as seeded, with the id its tasks were attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededMilestone {
    /// Quarter label
    pub quarter: String,
    /// Milestone title
    pub title: String,
    /// Id passed to its `addTask` calls
    pub id: u64,
    /// Tasks issued
    pub tasks: usize,
}

/// Summary of a seeding run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Milestones in the order they were created
    pub milestones: Vec<SeededMilestone>,
    /// Mutating calls issued
    pub commands_issued: usize,
    /// Mutating calls that failed
    pub failed_commands: usize,
}

impl SeedReport {
    /// Tasks issued across all milestones
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.milestones.iter().map(|m| m.tasks).sum()
    }

    /// No call failed
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed_commands == 0
    }

    fn record(&mut self, ok: bool) {
        self.commands_issued += 1;
        if !ok {
            self.failed_commands += 1;
        }
    }
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} milestones, {} tasks, {} of {} calls failed",
            self.milestones.len(),
            self.task_count(),
            self.failed_commands,
            self.commands_issued
        )
    }
}

/// Sequential roadmap seeder
///
/// `R` runs canister calls, `P` implements the pauses and `W` receives the
/// human-readable progress lines.
pub struct RoadmapSeeder<R, P = ThreadPacer, W = io::Stdout> {
    target: CanisterTarget,
    runner: R,
    pacer: P,
    out: W,
    pacing: Pacing,
    id_source: IdSource,
}

impl<R: CommandRunner> RoadmapSeeder<R> {
    /// Seeder printing to stdout with fixed delays and listing discovery
    pub fn new(target: CanisterTarget, runner: R) -> Self {
        Self {
            target,
            runner,
            pacer: ThreadPacer,
            out: io::stdout(),
            pacing: Pacing::fixed_delay(),
            id_source: IdSource::Listing,
        }
    }
}

impl<R, P, W> RoadmapSeeder<R, P, W> {
    /// With a different pacer
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> RoadmapSeeder<R, Q, W> {
        RoadmapSeeder {
            target: self.target,
            runner: self.runner,
            pacer,
            out: self.out,
            pacing: self.pacing,
            id_source: self.id_source,
        }
    }

    /// With a different progress sink
    pub fn with_output<V: Write>(self, out: V) -> RoadmapSeeder<R, P, V> {
        RoadmapSeeder {
            target: self.target,
            runner: self.runner,
            pacer: self.pacer,
            out,
            pacing: self.pacing,
            id_source: self.id_source,
        }
    }

    /// With pacing
    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// With id discovery strategy
    #[must_use]
    pub fn with_id_source(mut self, id_source: IdSource) -> Self {
        self.id_source = id_source;
        self
    }

    /// Command runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Take the runner, pacer and output sink back
    pub fn into_parts(self) -> (R, P, W) {
        (self.runner, self.pacer, self.out)
    }
}

impl<R: CommandRunner, P: Pacer, W: Write> RoadmapSeeder<R, P, W> {
    /// Run `call`, print its stdout or its error, report success
    ///
    /// Failures are printed as `Error: ...` and never propagated.
    pub fn run_command(&mut self, call: &CanisterCall) -> (String, bool) {
        debug!(command = %call, "running canister call");
        match self.runner.run(call) {
            Ok(output) if output.success => {
                self.emit(format_args!("{}", output.stdout));
                (output.stdout, true)
            }
            Ok(output) => {
                warn!(command = %call, "canister call exited with failure");
                self.emit(format_args!("Error: {}", output.stderr));
                (output.stdout, false)
            }
            Err(err) => {
                warn!(command = %call, error = %err, "canister call did not run");
                self.emit(format_args!("Error: {err}"));
                (String::new(), false)
            }
        }
    }

    /// Id of the first record in the milestone listing, 0 if none
    ///
    /// The listing's exit status is not checked; whatever stdout was
    /// captured is scanned.
    pub fn latest_milestone_id(&mut self) -> u64 {
        let call = self.target.list_milestones();
        let stdout = match self.runner.run(&call) {
            Ok(output) => output.stdout,
            Err(err) => {
                warn!(error = %err, "milestone listing did not run");
                String::new()
            }
        };
        parse_listing_id(&stdout)
    }

    /// Seed every quarter, milestone and task in declared order
    pub fn populate(&mut self, roadmap: &Roadmap) -> SeedReport {
        let mut report = SeedReport::default();

        for quarter in roadmap.quarters() {
            self.emit(format_args!("\n🚀 Adding Quarter: {}", quarter.label));

            for milestone in &quarter.milestones {
                self.emit(format_args!("Adding milestone: {}", milestone.title));
                let create = self.target.add_milestone(&quarter.period, milestone);
                let (reply, ok) = self.run_command(&create);
                report.record(ok);
                self.pacer.pause(self.pacing.milestone_settle);

                let milestone_id = self.discover_milestone_id(ok.then_some(reply.as_str()));
                info!(milestone = %milestone.title, id = milestone_id, "milestone id resolved");

                for task in &milestone.tasks {
                    self.emit(format_args!("  Adding task: {}", task.title));
                    let call = self.target.add_task(milestone_id, task);
                    let (_, ok) = self.run_command(&call);
                    report.record(ok);
                    self.pacer.pause(self.pacing.task_gap);
                }

                report.milestones.push(SeededMilestone {
                    quarter: quarter.label.clone(),
                    title: milestone.title.clone(),
                    id: milestone_id,
                    tasks: milestone.tasks.len(),
                });
            }
        }

        info!(%report, "roadmap seeding finished");
        report
    }

    fn discover_milestone_id(&mut self, create_reply: Option<&str>) -> u64 {
        match self.id_source {
            IdSource::Listing => self.latest_milestone_id(),
            IdSource::CreateReply => {
                if let Some(id) = create_reply.and_then(parse_reply_id) {
                    return id;
                }
                warn!("create reply carried no milestone id, falling back to listing");
                if self.pacing.milestone_settle.is_zero() {
                    self.pacer.pause(Pacing::fixed_delay().milestone_settle);
                }
                self.latest_milestone_id()
            }
        }
    }

    fn emit(&mut self, line: fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{line}") {
            warn!(error = %err, "failed to write progress line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandOutput, MockCommandRunner, ADD_MILESTONE, ADD_TASK, GET_MILESTONES};
    use crate::dataset::{Milestone, Quarter, Task};
    use crate::error::CommandError;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordedPauses(Vec<Duration>);

    impl Pacer for RecordedPauses {
        fn pause(&mut self, duration: Duration) {
            self.0.push(duration);
        }
    }

    fn one_milestone() -> Roadmap {
        Roadmap::new(vec![Quarter::new(
            "Q2 2025",
            "2025-Q2",
            vec![Milestone::new(
                "Research",
                "Find platforms.",
                vec![Task::todo("List", "List them."), Task::todo("Rank", "Rank them.")],
            )],
        )])
    }

    fn seeder(mock: MockCommandRunner) -> RoadmapSeeder<MockCommandRunner, RecordedPauses, Vec<u8>> {
        RoadmapSeeder::new(CanisterTarget::default(), mock)
            .with_pacer(RecordedPauses::default())
            .with_output(Vec::new())
    }

    #[test]
    fn run_command_prints_stdout_on_success() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("(5 : nat)")));

        let mut seeder = seeder(mock);
        let call = CanisterTarget::default().list_milestones();
        assert_eq!(seeder.run_command(&call), ("(5 : nat)".to_string(), true));

        let (_, _, out) = seeder.into_parts();
        assert_eq!(String::from_utf8(out).unwrap(), "(5 : nat)\n");
    }

    #[test]
    fn run_command_prints_stderr_on_failure() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .returning(|_| Ok(CommandOutput::failed("canister not found")));

        let mut seeder = seeder(mock);
        let (_, ok) = seeder.run_command(&CanisterTarget::default().list_milestones());
        assert!(!ok);

        let (_, _, out) = seeder.into_parts();
        assert_eq!(String::from_utf8(out).unwrap(), "Error: canister not found\n");
    }

    #[test]
    fn run_command_absorbs_spawn_errors() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run().returning(|call| {
            Err(CommandError::Spawn {
                program: call.program().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            })
        });

        let mut seeder = seeder(mock);
        let (stdout, ok) = seeder.run_command(&CanisterTarget::default().list_milestones());
        assert!(!ok);
        assert!(stdout.is_empty());

        let (_, _, out) = seeder.into_parts();
        assert!(String::from_utf8(out).unwrap().starts_with("Error: failed to spawn `dfx`"));
    }

    #[test]
    fn latest_id_scrapes_listing() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(|call| call.method() == GET_MILESTONES)
            .returning(|_| Ok(CommandOutput::ok("(vec { record { id = 7 : nat } })")));

        assert_eq!(seeder(mock).latest_milestone_id(), 7);
    }

    #[test]
    fn latest_id_is_zero_when_listing_fails_to_run() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run().returning(|call| {
            Err(CommandError::Spawn {
                program: call.program().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            })
        });

        assert_eq!(seeder(mock).latest_milestone_id(), 0);
    }

    #[test]
    fn latest_id_scans_stdout_of_failed_listing() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run().returning(|_| {
            Ok(CommandOutput {
                stdout: "record { id = 4 : nat }".to_string(),
                stderr: "warning".to_string(),
                success: false,
            })
        });

        assert_eq!(seeder(mock).latest_milestone_id(), 4);
    }

    #[test]
    fn populate_tags_tasks_with_listed_id() {
        let mut mock = MockCommandRunner::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_run()
            .withf(|call| call.method() == ADD_MILESTONE)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::ok("()")));
        mock.expect_run()
            .withf(|call| call.method() == GET_MILESTONES)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::ok("(vec { record { id = 11 : nat } })")));
        mock.expect_run()
            .withf(|call| call.method() == ADD_TASK && call.argument().is_some_and(|a| a.starts_with("(11, ")))
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::ok("()")));

        let mut seeder = seeder(mock);
        let report = seeder.populate(&one_milestone());

        assert_eq!(report.commands_issued, 3);
        assert!(report.is_clean());
        assert_eq!(report.milestones[0].id, 11);

        let (_, pacer, _) = seeder.into_parts();
        assert_eq!(
            pacer.0,
            [Duration::from_secs(1), Duration::from_millis(500), Duration::from_millis(500)]
        );
    }

    #[test]
    fn create_reply_skips_listing() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(|call| call.method() == ADD_MILESTONE)
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("(21 : nat)")));
        mock.expect_run()
            .withf(|call| call.method() == GET_MILESTONES)
            .never();
        mock.expect_run()
            .withf(|call| call.method() == ADD_TASK)
            .times(2)
            .returning(|_| Ok(CommandOutput::ok("()")));

        let mut seeder = seeder(mock)
            .with_id_source(IdSource::CreateReply)
            .with_pacing(Pacing::acknowledged());
        let report = seeder.populate(&one_milestone());

        assert_eq!(report.milestones[0].id, 21);
        let (_, pacer, _) = seeder.into_parts();
        assert!(pacer.0.iter().all(Duration::is_zero));
    }

    #[test]
    fn create_reply_falls_back_to_listing() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(|call| call.method() == ADD_MILESTONE)
            .returning(|_| Ok(CommandOutput::ok("()")));
        mock.expect_run()
            .withf(|call| call.method() == GET_MILESTONES)
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("record { id = 3 : nat }")));
        mock.expect_run()
            .withf(|call| call.method() == ADD_TASK)
            .returning(|_| Ok(CommandOutput::ok("()")));

        let mut seeder = seeder(mock).with_id_source(IdSource::CreateReply);
        assert_eq!(seeder.populate(&one_milestone()).milestones[0].id, 3);
    }

    #[test]
    fn create_reply_fallback_settles_before_listing() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(|call| call.method() == ADD_MILESTONE)
            .returning(|_| Ok(CommandOutput::ok("()")));
        mock.expect_run()
            .withf(|call| call.method() == GET_MILESTONES)
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("record { id = 3 : nat }")));
        mock.expect_run()
            .withf(|call| call.method() == ADD_TASK)
            .returning(|_| Ok(CommandOutput::ok("()")));

        let mut seeder = seeder(mock)
            .with_id_source(IdSource::CreateReply)
            .with_pacing(Pacing::acknowledged());
        seeder.populate(&one_milestone());

        let (_, pacer, _) = seeder.into_parts();
        assert_eq!(
            pacer.0,
            [Duration::ZERO, Duration::from_secs(1), Duration::ZERO, Duration::ZERO]
        );
    }

    #[test]
    fn create_reply_with_configured_settle_does_not_pause_twice() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(|call| call.method() == ADD_MILESTONE)
            .returning(|_| Ok(CommandOutput::ok("()")));
        mock.expect_run()
            .withf(|call| call.method() == GET_MILESTONES)
            .returning(|_| Ok(CommandOutput::ok("record { id = 3 : nat }")));
        mock.expect_run()
            .withf(|call| call.method() == ADD_TASK)
            .returning(|_| Ok(CommandOutput::ok("()")));

        let mut seeder = seeder(mock).with_id_source(IdSource::CreateReply);
        seeder.populate(&one_milestone());

        let (_, pacer, _) = seeder.into_parts();
        assert_eq!(pacer.0.len(), 3);
    }

    #[test]
    fn create_reply_failed_create_uses_listed_id() {
        let mut mock = MockCommandRunner::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_run()
            .withf(|call| call.method() == ADD_MILESTONE)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::failed("(42 : nat) rejected")));
        mock.expect_run()
            .withf(|call| call.method() == GET_MILESTONES)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::ok("(vec { record { id = 8 : nat } })")));
        mock.expect_run()
            .withf(|call| call.method() == ADD_TASK && call.argument().is_some_and(|a| a.starts_with("(8, ")))
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::ok("()")));

        let mut seeder = seeder(mock)
            .with_id_source(IdSource::CreateReply)
            .with_pacing(Pacing::acknowledged());
        let report = seeder.populate(&one_milestone());

        assert_eq!(report.milestones[0].id, 8);
        assert_eq!(report.failed_commands, 1);
        assert_eq!(report.commands_issued, 3);
    }

    #[test]
    fn report_display_summarizes() {
        let report = SeedReport {
            milestones: vec![SeededMilestone {
                quarter: "Q2 2025".to_string(),
                title: "Research".to_string(),
                id: 1,
                tasks: 2,
            }],
            commands_issued: 3,
            failed_commands: 1,
        };
        assert_eq!(report.to_string(), "1 milestones, 2 tasks, 1 of 3 calls failed");
        assert!(!report.is_clean());
    }
}
