//! The patch task: resolve, then replace, on one background worker
//!
//! # Event Flow
//!
//! ```text
//! TaskRunner::start ──spawn──► worker: resolve ─► replace
//!        ▲                          │
//!        │                     TaskEvent (Progress* , Failed?, Finished)
//!        └──── handle_event ◄──────┘   (delivered by the invoking layer)
//! ```
//!
//! The worker reports over a channel: zero or more `Progress` events, at most
//! one `Failed`, then exactly one `Finished`. The runner's state only changes
//! when the invoking layer calls [`TaskRunner::start`] or feeds a received
//! event back through [`TaskRunner::handle_event`]; the worker never touches
//! it. While a task is running, `start` is a no-op.

use crate::error::Result;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::replacer::{FileReplacer, ReplaceOutcome};
use crate::resolver::InstallPathResolver;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use tracing::{error, info, warn};

/// Capacity of the worker → invoking layer channel
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// What to patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchJob {
    /// Application whose install directory receives the file
    pub app_name: String,
    /// Replacement file, already resolved against the resource root
    pub source_file: PathBuf,
}

/// Signals sent from the worker to the invoking layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    /// A progress line
    Progress(ProgressEvent),
    /// The task failed; sent at most once, before `Finished`
    Failed(String),
    /// The task ended; always sent exactly once, last
    Finished,
}

/// How a completed task ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The target file was replaced
    Success,
    /// The task failed with this message
    Failure(String),
}

/// Lifecycle of the patch task
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TaskState {
    /// Never started
    #[default]
    Idle,
    /// A worker is running
    Running,
    /// The last run has ended
    Done(TaskOutcome),
}

/// Resolve the install directory of `job.app_name` and drop `job.source_file` into it
pub fn run_job(
    job: &PatchJob,
    resolver: &InstallPathResolver,
    sink: &mut dyn ProgressSink,
) -> Result<ReplaceOutcome> {
    let install_dir = resolver.resolve(&job.app_name, sink)?;
    FileReplacer::replace(&install_dir, &job.source_file, sink)
}

/// Forwards progress events into the task channel
struct ChannelSink {
    sender: mpsc::SyncSender<TaskEvent>,
}

impl ProgressSink for ChannelSink {
    fn emit(&mut self, event: ProgressEvent) {
        // The receiver only goes away when the invoking layer shuts down
        let _ = self.sender.send(TaskEvent::Progress(event));
    }
}

/// Owns the task state machine and starts workers
#[derive(Debug, Default)]
pub struct TaskRunner {
    state: TaskState,
    failure: Option<String>,
}

impl TaskRunner {
    /// Create an idle runner
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &TaskState {
        &self.state
    }

    /// Whether a worker is currently running
    pub fn is_running(&self) -> bool {
        self.state == TaskState::Running
    }

    /// Start `job` on a fresh worker thread
    ///
    /// Returns the receiving end of the worker's event channel and the
    /// worker's handle, or `None` without doing anything if a task is
    /// already running.
    pub fn start(
        &mut self,
        job: PatchJob,
        resolver: InstallPathResolver,
    ) -> Option<(mpsc::Receiver<TaskEvent>, JoinHandle<()>)> {
        if self.is_running() {
            warn!("Patch task already running; start ignored");
            return None;
        }

        self.state = TaskState::Running;
        self.failure = None;

        let (sender, receiver) = mpsc::sync_channel(EVENT_CHANNEL_CAPACITY);
        info!("Starting patch task for {}", job.app_name);

        let handle = thread::spawn(move || {
            let mut sink = ChannelSink {
                sender: sender.clone(),
            };

            match run_job(&job, &resolver, &mut sink) {
                Ok(outcome) => info!("Patch task succeeded: {}", outcome.target.display()),
                Err(e) => {
                    error!("Patch task failed: {e}");
                    let _ = sender.send(TaskEvent::Failed(e.to_string()));
                }
            }

            let _ = sender.send(TaskEvent::Finished);
        });

        Some((receiver, handle))
    }

    /// Apply an event received from the worker
    ///
    /// `Failed` records the failure; `Finished` moves the runner to `Done`.
    pub fn handle_event(&mut self, event: &TaskEvent) {
        if !self.is_running() {
            return;
        }

        match event {
            TaskEvent::Progress(_) => {}
            TaskEvent::Failed(message) => self.failure = Some(message.clone()),
            TaskEvent::Finished => {
                let outcome = self
                    .failure
                    .take()
                    .map_or(TaskOutcome::Success, TaskOutcome::Failure);
                self.state = TaskState::Done(outcome);
            }
        }
    }
}
