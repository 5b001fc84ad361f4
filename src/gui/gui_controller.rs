//! Main window controller
//!
//! Wires the Slint window to a [`TaskRunner`]. The button starts the patch
//! task; progress lines from the worker are appended to the log pane on the
//! UI thread via `slint::invoke_from_event_loop`. After a successful run the
//! button closes the window, after a failed one it retries.

use crate::{LogLine, LogSeverity, MainWindow};
use anyhow::{Context, Result};
use easypatch::{
    config::PatchConfig,
    progress::Severity,
    resolver::InstallPathResolver,
    resources,
    task::{PatchJob, TaskEvent, TaskOutcome, TaskRunner, TaskState},
};
use parking_lot::Mutex;
use slint::{ComponentHandle, Model, ModelRc, VecModel, Weak};
use std::rc::Rc;
use std::sync::{Arc, mpsc};
use tracing::{error, info, warn};

/// First line shown in the log pane
const READY_MESSAGE: &str = "Ready. Click \"Patch\" to start.";

/// Owns the main window and its callbacks
pub struct GuiController {
    window: MainWindow,
}

impl GuiController {
    /// Build the main window for `config`
    pub fn new(config: PatchConfig) -> Result<Self> {
        let window = MainWindow::new().context("Failed to create main window")?;

        let log_lines = Rc::new(VecModel::<LogLine>::default());
        window.set_log_lines(ModelRc::from(log_lines));
        append_line(&window, READY_MESSAGE, Severity::Normal);

        #[expect(
            clippy::cast_precision_loss,
            reason = "Window dimensions are small enough to be exact in f32"
        )]
        window.window().set_size(slint::LogicalSize::new(
            config.window.width as f32,
            config.window.height as f32,
        ));

        let runner = Arc::new(Mutex::new(TaskRunner::new()));
        let weak = window.as_weak();
        window.on_action_clicked(move || handle_action(&weak, &runner, &config));

        Ok(Self { window })
    }

    /// Show the window and run the event loop until it closes
    pub fn run(&self) -> Result<()> {
        self.window.run().context("Slint event loop failed")
    }
}

fn handle_action(weak: &Weak<MainWindow>, runner: &Arc<Mutex<TaskRunner>>, config: &PatchConfig) {
    let Some(window) = weak.upgrade() else {
        return;
    };

    let mut guard = runner.lock();
    match guard.state() {
        TaskState::Running => return,
        TaskState::Done(TaskOutcome::Success) => {
            info!("Closing after successful run");
            if let Err(e) = slint::quit_event_loop() {
                warn!("Failed to quit event loop: {e}");
            }
            return;
        }
        TaskState::Idle | TaskState::Done(TaskOutcome::Failure(_)) => {}
    }

    let source_file = match resources::resolve_resource(&config.source_file) {
        Ok(path) => path,
        Err(e) => {
            error!("Failed to resolve resource root: {e}");
            append_line(&window, &format!("Error: {e}"), Severity::Error);
            return;
        }
    };
    let job = PatchJob {
        app_name: config.app_name.clone(),
        source_file,
    };

    let Some((receiver, _worker)) = guard.start(job, InstallPathResolver::system()) else {
        return;
    };
    drop(guard);

    clear_lines(&window);
    window.set_action_enabled(false);

    forward_events(receiver, weak.clone(), Arc::clone(runner));
}

/// Relay worker events onto the UI thread, in order
fn forward_events(
    receiver: mpsc::Receiver<TaskEvent>,
    weak: Weak<MainWindow>,
    runner: Arc<Mutex<TaskRunner>>,
) {
    std::thread::spawn(move || {
        for event in receiver {
            let weak = weak.clone();
            let runner = Arc::clone(&runner);
            if let Err(e) = slint::invoke_from_event_loop(move || apply_event(&weak, &runner, event))
            {
                warn!("Event loop gone, dropping task events: {e}");
                break;
            }
        }
    });
}

fn apply_event(weak: &Weak<MainWindow>, runner: &Arc<Mutex<TaskRunner>>, event: TaskEvent) {
    let state = {
        let mut guard = runner.lock();
        guard.handle_event(&event);
        guard.state().clone()
    };

    let Some(window) = weak.upgrade() else {
        return;
    };

    match event {
        TaskEvent::Progress(progress) => append_line(&window, &progress.message, progress.severity),
        TaskEvent::Failed(message) => {
            append_line(&window, &format!("Error: {message}"), Severity::Error);
        }
        TaskEvent::Finished => {
            let label = match state {
                TaskState::Done(TaskOutcome::Success) => "Close",
                _ => "Retry",
            };
            window.set_action_label(label.into());
            window.set_action_enabled(true);
        }
    }
}

fn log_severity(severity: Severity) -> LogSeverity {
    match severity {
        Severity::Normal => LogSeverity::Normal,
        Severity::Success => LogSeverity::Success,
        Severity::Warning => LogSeverity::Warning,
        Severity::Error => LogSeverity::Error,
    }
}

fn append_line(window: &MainWindow, text: &str, severity: Severity) {
    let lines = window.get_log_lines();
    if let Some(lines) = lines.as_any().downcast_ref::<VecModel<LogLine>>() {
        lines.push(LogLine {
            text: text.into(),
            severity: log_severity(severity),
        });
    }
}

fn clear_lines(window: &MainWindow) {
    let lines = window.get_log_lines();
    if let Some(lines) = lines.as_any().downcast_ref::<VecModel<LogLine>>() {
        lines.set_vec(Vec::new());
    }
}
