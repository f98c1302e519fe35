//! The render loop.
//!
//! A single named thread owns the [`TerminalWriter`] and the
//! [`RenderState`]. It blocks on the queue until a record or a stop signal
//! arrives, so an idle logger costs no CPU. On stop it drains whatever is
//! still queued, closes the queue and exits.

use std::io;
use std::io::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, select};

use crate::error::RenderError;
use crate::level::Severity;
use crate::logging::targets;
use crate::queue::MessageQueue;
use crate::record::LogRecord;
use crate::render::{RenderState, plan_frame};
use crate::terminal::TerminalWriter;

/// Name of the render thread.
pub const WORKER_THREAD_NAME: &str = "overprint-render";

/// Lifecycle of a render worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    /// The thread is being spawned.
    Starting = 0,
    /// Steady state: rendering records as they arrive.
    Running = 1,
    /// Stop requested; rendering what is left in the queue.
    Draining = 2,
    /// The thread has exited.
    Stopped = 3,
}

impl WorkerState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Running,
            2 => Self::Draining,
            _ => Self::Stopped,
        }
    }
}

/// State shared between the logger handle and its worker.
#[derive(Debug)]
pub(crate) struct Shared {
    min_level: AtomicU8,
    state: AtomicU8,
    rendered: AtomicU64,
    failed: AtomicU64,
}

impl Shared {
    pub(crate) fn new(min_level: Severity) -> Self {
        Self {
            min_level: AtomicU8::new(min_level as u8),
            state: AtomicU8::new(WorkerState::Starting as u8),
            rendered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    pub(crate) fn min_level(&self) -> Severity {
        Severity::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    pub(crate) fn set_min_level(&self, level: Severity) {
        self.min_level.store(level as u8, Ordering::Relaxed);
    }

    pub(crate) fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: WorkerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub(crate) fn rendered(&self) -> u64 {
        self.rendered.load(Ordering::Relaxed)
    }

    pub(crate) fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// What happened to one dequeued record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    Filtered,
}

/// Renders records one at a time, keeping overwrite bookkeeping.
#[derive(Debug)]
pub struct RenderLoop {
    writer: TerminalWriter,
    state: RenderState,
}

impl RenderLoop {
    #[must_use]
    pub fn new(writer: TerminalWriter) -> Self {
        Self {
            writer,
            state: RenderState::default(),
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Render one record, or discard it when below `min_level`.
    ///
    /// On failure the render state is left as it was.
    pub fn render(
        &mut self,
        record: &LogRecord,
        min_level: Severity,
    ) -> Result<RenderOutcome, RenderError> {
        if record.severity() < min_level {
            return Ok(RenderOutcome::Filtered);
        }
        let (frame, next) = plan_frame(record, self.state, self.writer.strategy());
        self.writer.write_frame(&frame)?;
        self.state = next;
        Ok(RenderOutcome::Rendered)
    }

    fn render_reporting(&mut self, record: &LogRecord, shared: &Shared) {
        match self.render(record, shared.min_level()) {
            Ok(RenderOutcome::Rendered) => {
                shared.rendered.fetch_add(1, Ordering::Relaxed);
            }
            Ok(RenderOutcome::Filtered) => {}
            Err(err) => {
                shared.failed.fetch_add(1, Ordering::Relaxed);
                report_failure(&err);
            }
        }
    }
}

/// Best-effort diagnostic for a record that could not be written.
fn report_failure(err: &RenderError) {
    log::warn!(target: targets::RENDER, "{err}");
    // Ignore a failure here too: there is nowhere left to report it.
    let _ = writeln!(io::stderr(), "overprint: {err}");
}

/// Handle used to stop and join a running worker.
#[derive(Debug)]
pub(crate) struct WorkerHandle {
    stop_tx: Sender<()>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Ask the worker to drain and exit, then wait for it.
    pub(crate) fn stop(self, shared: &Shared) {
        if shared.state() != WorkerState::Stopped {
            shared.set_state(WorkerState::Draining);
        }
        // A send error means the worker already exited.
        let _ = self.stop_tx.send(());
        if self.join.join().is_err() {
            log::error!(target: targets::WORKER, "render worker panicked");
            shared.set_state(WorkerState::Stopped);
        }
    }
}

/// Spawn the render thread.
pub(crate) fn spawn(
    queue: Arc<MessageQueue>,
    shared: Arc<Shared>,
    writer: TerminalWriter,
) -> io::Result<WorkerHandle> {
    let (stop_tx, stop_rx) = bounded(1);
    let join = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || run(&queue, &shared, &stop_rx, RenderLoop::new(writer)))?;
    Ok(WorkerHandle { stop_tx, join })
}

fn run(queue: &MessageQueue, shared: &Shared, stop_rx: &Receiver<()>, mut render_loop: RenderLoop) {
    // Draining may already be set if shutdown raced the spawn.
    let _ = shared.state.compare_exchange(
        WorkerState::Starting as u8,
        WorkerState::Running as u8,
        Ordering::AcqRel,
        Ordering::Acquire,
    );
    log::debug!(target: targets::WORKER, "render worker started");

    loop {
        select! {
            recv(queue.receiver()) -> msg => match msg {
                Ok(record) => render_loop.render_reporting(&record, shared),
                Err(_) => break,
            },
            recv(stop_rx) -> _ => break,
        }
    }

    shared.set_state(WorkerState::Draining);
    let mut drained = 0usize;
    while let Some(record) = queue.try_dequeue() {
        render_loop.render_reporting(&record, shared);
        drained += 1;
    }
    queue.close();
    // Records that slipped in between the last pop and close().
    while let Some(record) = queue.try_dequeue() {
        render_loop.render_reporting(&record, shared);
        drained += 1;
    }

    if let Err(err) = render_loop.writer.flush() {
        log::debug!(target: targets::WORKER, "final flush failed: {err}");
    }
    shared.set_state(WorkerState::Stopped);
    log::debug!(target: targets::WORKER, "render worker stopped after draining {drained} records");
}
