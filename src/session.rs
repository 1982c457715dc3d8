//! Session driver: one event loop that owns every piece of scene state.
//!
//! DESIGN
//! ======
//! A single tokio task receives [`Command`]s over a bounded channel and owns
//! the interpreter, the preview editor, and the render machine. Nothing else
//! touches that state, so no locks are needed. The only asynchronous work is
//! timers: the simulated processing stages and the render phase advance. Each
//! runs as its own small task that posts a generation-tagged event back into
//! the loop, and each lives in a [`TaskSlot`] so starting a replacement
//! aborts the old one. Starting a new analysis tears down the committed
//! scene, so its phase timer cannot fire while the next request is still
//! processing.
//!
//! Aborting is the first line; the generation tag is the second. An event
//! that was already queued when its task was aborted still arrives, and is
//! dropped because its generation no longer matches.
//!
//! ERROR HANDLING
//! ==============
//! Invalid input surfaces as [`Update::Rejected`] carrying the error code.
//! Invalid edits and interactions on missing state are logged and ignored.
//! A dropped update receiver never stops the loop; only `Shutdown` or a
//! closed command channel does.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::time::Duration;

use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::SceneConfig;
use crate::confidence::{self, ConfidenceBand, ConfidenceScore, ConfidenceSource};
use crate::error::ErrorCode;
use crate::intake::Intake;
use crate::interpret::{InterpretError, Interpreter};
use crate::model::SceneGraph;
use crate::preview::PreviewEditor;
use crate::render::{CategoryFilter, Phase, PhaseTimer, RenderMachine, SceneView};

/// Progress labels shown while an analysis runs, in order.
pub const STAGES: [&str; 4] =
    ["Analyzing description", "Identifying elements", "Mapping relationships", "Building visualization"];

const COMMAND_QUEUE_CAPACITY: usize = 64;

// =============================================================================
// TaskSlot
// =============================================================================

/// Holds at most one running task. Replacing or dropping the slot aborts
/// whatever was in it.
#[derive(Debug, Default)]
pub struct TaskSlot {
    handle: Option<JoinHandle<()>>,
}

impl TaskSlot {
    /// Install `handle`, aborting the previous task if any.
    pub fn replace(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.handle.replace(handle) {
            previous.abort();
        }
    }

    /// Abort the current task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether a task is installed and still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

// =============================================================================
// Protocol
// =============================================================================

/// Requests accepted by a session.
#[derive(Debug, Clone)]
pub enum Command {
    /// Start a new analysis, superseding any in flight.
    Analyze(Intake),
    AddElement { name: String, classification: String },
    RemoveElement { index: usize },
    BeginEdit,
    CancelEdit,
    /// Commit the previewed graph to the renderer.
    Approve,
    Hover(Option<String>),
    Select(String),
    SetFilter(CategoryFilter),
    /// Drop everything and return to idle.
    Unmount,
    Shutdown,
}

/// Notifications emitted by a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// A processing stage started.
    Stage { analysis: u64, index: usize, label: &'static str },
    /// The graph under review changed.
    Preview { analysis: u64, graph: SceneGraph, confidence: ConfidenceScore, band: ConfidenceBand, editing: bool },
    /// A command could not be carried out.
    Rejected { code: &'static str, message: String },
    /// A graph became canonical.
    Committed { graph: SceneGraph },
    /// The render machine entered a phase.
    Phase { generation: u64, phase: Phase },
    /// Derived render state after any visible change.
    Frame(SceneView),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session is closed")]
    Closed,
    #[error("session task failed: {0}")]
    Join(String),
}

impl ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Closed => "E_SESSION_CLOSED",
            Self::Join(_) => "E_SESSION_JOIN",
        }
    }
}

/// Timer and stage events posted back into the loop.
#[derive(Debug)]
enum Event {
    Stage { analysis: u64, index: usize },
    StagesDone { analysis: u64 },
    PhaseDue(PhaseTimer),
}

// =============================================================================
// Handle
// =============================================================================

/// Caller side of a running session.
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands.send(command).await.map_err(|_| SessionError::Closed)
    }

    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(self) -> Result<(), SessionError> {
        if self.commands.send(Command::Shutdown).await.is_err() {
            debug!("session: loop already stopped");
        }
        self.task.await.map_err(|e| SessionError::Join(e.to_string()))
    }
}

/// Start a session on the current runtime.
#[must_use]
pub fn spawn(config: &SceneConfig) -> (SessionHandle, mpsc::UnboundedReceiver<Update>) {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    info!(
        stage_delay_ms = config.stage_delay.as_millis(),
        connect_delay_ms = config.timings.connect.as_millis(),
        connection_probability = config.connection_probability,
        seeded = config.seed.is_some(),
        "session configured"
    );

    let session = Session {
        interpreter: config.interpreter(),
        stage_delay: config.stage_delay,
        rng: config.rng(),
        analysis: 0,
        pending: None,
        editor: None,
        render: RenderMachine::new(config.timings),
        stages: TaskSlot::default(),
        phase_timer: TaskSlot::default(),
        events: event_tx,
        updates: update_tx,
    };
    let task = tokio::spawn(session.run(command_rx, event_rx));
    (SessionHandle { commands: command_tx, task }, update_rx)
}

// =============================================================================
// Loop
// =============================================================================

struct Session {
    interpreter: Interpreter,
    stage_delay: Duration,
    rng: StdRng,
    /// Bumped by every `Analyze` and `Unmount`.
    analysis: u64,
    pending: Option<(String, ConfidenceSource)>,
    editor: Option<PreviewEditor>,
    render: RenderMachine,
    stages: TaskSlot,
    phase_timer: TaskSlot,
    events: mpsc::UnboundedSender<Event>,
    updates: mpsc::UnboundedSender<Update>,
}

impl Session {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>, mut events: mpsc::UnboundedReceiver<Event>) {
        info!("session started");
        loop {
            tokio::select! {
                biased;
                maybe_command = commands.recv() => match maybe_command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(event) = events.recv() => self.handle_event(event),
            }
        }
        self.stages.cancel();
        self.phase_timer.cancel();
        info!(analysis = self.analysis, generation = self.render.generation(), "session stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Analyze(intake) => self.analyze(intake),
            Command::AddElement { name, classification } => {
                let Some(editor) = self.editor.as_mut() else {
                    debug!(%name, "session: no preview open; ignoring add");
                    return;
                };
                if editor.add_element(&name, &classification, &mut self.rng) {
                    self.emit_preview();
                }
            }
            Command::RemoveElement { index } => {
                let Some(editor) = self.editor.as_mut() else {
                    debug!(index, "session: no preview open; ignoring remove");
                    return;
                };
                if editor.remove_element(index) {
                    self.emit_preview();
                }
            }
            Command::BeginEdit => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.begin_edit();
                    self.emit_preview();
                }
            }
            Command::CancelEdit => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.cancel_edit();
                    self.emit_preview();
                }
            }
            Command::Approve => {
                let Some(mut editor) = self.editor.take() else {
                    debug!("session: nothing to approve");
                    return;
                };
                let graph = editor.approve();
                self.emit(Update::Committed { graph: graph.clone() });
                self.commit(graph);
            }
            Command::Hover(name) => {
                if self.render.hover(name.as_deref()) {
                    self.emit_frame();
                }
            }
            Command::Select(name) => {
                if self.render.phase() != Phase::Idle {
                    self.render.select(&name);
                    self.emit_frame();
                }
            }
            Command::SetFilter(filter) => {
                self.render.set_filter(filter);
                self.emit_frame();
            }
            Command::Unmount => self.unmount(),
            // Handled by the loop itself.
            Command::Shutdown => {}
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Stage { analysis, index } => {
                if analysis != self.analysis {
                    debug!(analysis, current = self.analysis, "session: dropping stale stage");
                    return;
                }
                let Some(label) = STAGES.get(index) else {
                    return;
                };
                self.emit(Update::Stage { analysis, index, label: *label });
            }
            Event::StagesDone { analysis } => {
                if analysis != self.analysis {
                    debug!(analysis, current = self.analysis, "session: dropping stale analysis result");
                    return;
                }
                if let Some((text, source)) = self.pending.take() {
                    self.finish_analysis(&text, source);
                }
            }
            Event::PhaseDue(timer) => {
                let phases = self.render.advance(timer);
                if phases.is_empty() {
                    return;
                }
                for phase in phases {
                    self.emit(Update::Phase { generation: timer.generation, phase });
                }
                self.emit_frame();
            }
        }
    }

    fn analyze(&mut self, intake: Intake) {
        self.analysis += 1;
        self.stages.cancel();
        self.editor = None;
        self.pending = None;
        if self.render.phase() != Phase::Idle {
            self.clear_scene();
        }

        let (text, source) = intake.resolve();
        if text.trim().is_empty() {
            let err = InterpretError::EmptyInput;
            debug!(analysis = self.analysis, code = err.error_code(), "session: rejecting analysis");
            self.emit(Update::Rejected { code: err.error_code(), message: err.to_string() });
            return;
        }

        info!(analysis = self.analysis, chars = text.chars().count(), "analysis started");
        self.pending = Some((text, source));

        let analysis = self.analysis;
        let delay = self.stage_delay;
        let events = self.events.clone();
        self.stages.replace(tokio::spawn(async move {
            for index in 0..STAGES.len() {
                if events.send(Event::Stage { analysis, index }).is_err() {
                    return;
                }
                tokio::time::sleep(delay).await;
            }
            if events.send(Event::StagesDone { analysis }).is_err() {
                debug!(analysis, "session: loop gone before analysis finished");
            }
        }));
    }

    fn finish_analysis(&mut self, text: &str, source: ConfidenceSource) {
        match self.interpreter.interpret(text, &mut self.rng) {
            Ok(graph) => {
                let score = confidence::estimate(&graph, source, &mut self.rng);
                info!(
                    analysis = self.analysis,
                    elements = graph.elements.len(),
                    connections = graph.connections.len(),
                    confidence = score.value(),
                    "analysis finished"
                );
                self.editor = Some(PreviewEditor::new(graph, score));
                self.emit_preview();
            }
            Err(err) => {
                self.emit(Update::Rejected { code: err.error_code(), message: err.to_string() });
            }
        }
    }

    fn commit(&mut self, graph: SceneGraph) {
        let timer = self.render.submit(graph);
        self.emit(Update::Phase { generation: timer.generation, phase: self.render.phase() });
        self.emit_frame();

        let events = self.events.clone();
        self.phase_timer.replace(tokio::spawn(async move {
            tokio::time::sleep(timer.delay).await;
            if events.send(Event::PhaseDue(timer)).is_err() {
                debug!(generation = timer.generation, "session: loop gone before phase advance");
            }
        }));
    }

    fn unmount(&mut self) {
        self.analysis += 1;
        self.stages.cancel();
        self.pending = None;
        self.editor = None;
        self.clear_scene();
    }

    /// Abort the phase timer and return the render machine to Idle.
    fn clear_scene(&mut self) {
        self.phase_timer.cancel();
        self.render.unmount();
        info!(generation = self.render.generation(), "scene unmounted");
        self.emit(Update::Phase { generation: self.render.generation(), phase: Phase::Idle });
    }

    fn emit_preview(&self) {
        let Some(editor) = &self.editor else {
            return;
        };
        let confidence = editor.confidence();
        self.emit(Update::Preview {
            analysis: self.analysis,
            graph: editor.graph().clone(),
            confidence,
            band: confidence.band(),
            editing: editor.is_editing(),
        });
    }

    fn emit_frame(&self) {
        self.emit(Update::Frame(self.render.view()));
    }

    fn emit(&self, update: Update) {
        if self.updates.send(update).is_err() {
            debug!("session: update receiver dropped");
        }
    }
}
