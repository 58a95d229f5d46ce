//! Tail view: the status-polling and log-tailing state machine.
//!
//! One [`TailView`] keeps the status and log of a single run or step in sync
//! with the service. All state mutation happens inside [`TailView::refresh`];
//! auto-refresh is a repeating timer calling `refresh`, disarmed permanently
//! the moment a poll observes a terminal status or fails. A failed poll is
//! never retried: the view fails closed rather than hammering a service that
//! just errored, and a page reload (or a fresh view) starts over cleanly.

mod display;

pub use display::{LOADING_MARKER, TRUNCATED_MARKER};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use runtail_protocol::{Cursor, EntityRef, ProtocolError, Status};

use crate::config::{ConfigError, TailConfig};
use crate::provider::{Transport, TransportError};
use crate::schedule::{CancelHandle, Scheduler};
use crate::sink::RenderSink;

/// Poll cycle failures. Either kind disarms auto-refresh.
#[derive(Debug, thiserror::Error)]
pub enum TailError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Mutable polling state, owned exclusively by the view and touched only
/// inside a poll cycle.
#[derive(Debug, Default)]
struct TailState {
    /// Last rendered status, None before the first successful status fetch.
    status: Option<Status>,

    /// Concatenation, in server order, of every chunk text received. Display
    /// truncation never shortens this buffer.
    log_text: String,

    /// Cursor of the last applied chunk, None before the first chunk.
    cursor: Option<Cursor>,
}

/// Live view over one run or step: polls status, tails the log, renders both
/// through the injected sink.
pub struct TailView {
    transport: Arc<dyn Transport>,
    entity: EntityRef,
    config: TailConfig,
    sink: Arc<dyn RenderSink>,
    scheduler: Arc<dyn Scheduler>,

    state: Mutex<TailState>,
    is_polling: AtomicBool,
    /// Latched on the first failed poll; automatic polling never resumes.
    halted: AtomicBool,
    timer: Mutex<Option<Box<dyn CancelHandle>>>,
}

impl TailView {
    /// Create a view with injected collaborators. Fails on invalid config.
    pub fn new(
        transport: Arc<dyn Transport>,
        entity: EntityRef,
        config: TailConfig,
        sink: Arc<dyn RenderSink>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            transport,
            entity,
            config,
            sink,
            scheduler,
            state: Mutex::new(TailState::default()),
            is_polling: AtomicBool::new(false),
            halted: AtomicBool::new(false),
            timer: Mutex::new(None),
        })
    }

    /// The entity this view observes.
    pub fn entity(&self) -> &EntityRef {
        &self.entity
    }

    /// Last fetched status, None before the first successful poll.
    pub fn status(&self) -> Option<Status> {
        self.state.lock().unwrap().status
    }

    /// The full retained log buffer.
    pub fn log_text(&self) -> String {
        self.state.lock().unwrap().log_text.clone()
    }

    /// Cursor of the last applied chunk.
    pub fn cursor(&self) -> Option<Cursor> {
        self.state.lock().unwrap().cursor.clone()
    }

    /// Whether the entity has reached a status it will never leave.
    pub fn is_completed(&self) -> bool {
        match self.status() {
            Some(status) => self.entity.is_terminal(status),
            None => false,
        }
    }

    /// Whether the auto-refresh timer is currently armed.
    pub fn is_auto_refresh_armed(&self) -> bool {
        self.timer.lock().unwrap().is_some()
    }

    /// Whether a failed poll has permanently stopped automatic polling.
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Perform the initial poll and arm auto-refresh if the entity is still
    /// live. This is the bootstrap entry point.
    pub fn start(self: &Arc<Self>) {
        self.refresh();
        if !self.is_completed() {
            self.resume_auto_refresh();
        }
    }

    /// Run one poll cycle: status first, then the log, then terminal
    /// detection. A call while another cycle is in flight is dropped, not
    /// queued; the next timer tick recovers a dropped one.
    pub fn refresh(&self) {
        if self.is_polling.swap(true, Ordering::SeqCst) {
            debug!("{}: poll already in flight, dropping refresh", self.entity);
            return;
        }

        if let Err(error) = self.poll_cycle() {
            warn!(
                "{}: poll failed, auto-refresh disarmed: {}",
                self.entity, error
            );
            self.halted.store(true, Ordering::SeqCst);
            self.pause_auto_refresh();
        }

        self.is_polling.store(false, Ordering::SeqCst);
    }

    /// Arm the auto-refresh timer. Idempotent; refuses to arm once the
    /// entity is terminal or a poll has failed.
    pub fn resume_auto_refresh(self: &Arc<Self>) {
        if self.is_completed() || self.is_halted() {
            return;
        }

        let mut timer = self.timer.lock().unwrap();
        if timer.is_some() {
            return;
        }

        let view = Arc::downgrade(self);
        let handle = self.scheduler.schedule_repeating(
            self.config.poll_interval,
            Box::new(move || {
                if let Some(view) = view.upgrade() {
                    view.refresh();
                }
            }),
        );
        *timer = Some(handle);
    }

    /// Disarm the auto-refresh timer. Idempotent.
    pub fn pause_auto_refresh(&self) {
        if let Some(handle) = self.timer.lock().unwrap().take() {
            handle.cancel();
        }
    }

    fn poll_cycle(&self) -> Result<(), TailError> {
        let mut state = self.state.lock().unwrap();

        // Status before log: a terminal status observed this cycle still
        // gets one final log drain below.
        self.refresh_status(&mut state)?;
        self.refresh_log(&mut state)?;

        if matches!(state.status, Some(status) if self.entity.is_terminal(status)) {
            self.pause_auto_refresh();
        }

        Ok(())
    }

    fn refresh_status(&self, state: &mut TailState) -> Result<(), TailError> {
        let record = self.transport.fetch_status(&self.entity)?;

        if state.status != Some(record.status) {
            let previous = state.status;
            state.status = Some(record.status);
            self.sink.render_status(previous, record.status);
        }

        Ok(())
    }

    /// Fetch chunks at the current cursor until caught up with the live tail
    /// or the length cap is reached.
    fn refresh_log(&self, state: &mut TailState) -> Result<(), TailError> {
        if let Some(cap) = self.config.log_length_limit {
            // Hard cap: once the buffer reached it, stop fetching for good.
            if state.log_text.len() >= cap {
                return Ok(());
            }
            if state.log_text.is_empty() {
                self.sink.replace_log(display::LOADING_MARKER);
            }
        }

        loop {
            let requested = self.request_size(state);
            let chunk =
                self.transport
                    .fetch_log_chunk(&self.entity, state.cursor.as_ref(), Some(requested))?;

            if state.cursor.as_ref() == Some(&chunk.cursor) {
                if chunk.text.is_empty() {
                    // Nothing new past our position: the buffer is the live
                    // tail, so any loading marker comes off the display.
                    if self.config.log_length_limit.is_some() {
                        self.sink.replace_log(&state.log_text);
                    }
                    break;
                }
                // A non-advancing cursor with new text would make the next
                // request re-fetch the same bytes forever.
                return Err(ProtocolError::StalledCursor {
                    cursor: chunk.cursor.as_str().to_string(),
                    bytes: chunk.text.len(),
                }
                .into());
            }

            let received = chunk.text.len();
            state.log_text.push_str(&chunk.text);
            state.cursor = Some(chunk.cursor);

            let capped = self
                .config
                .log_length_limit
                .is_some_and(|cap| state.log_text.len() >= cap);
            let caught_up = received < requested;

            self.render_log(state, &chunk.text, capped, caught_up);

            let done = match self.config.log_length_limit {
                // A chunk exactly as large as requested means more may be
                // immediately available; anything smaller means wait for the
                // next tick.
                Some(_) => capped || caught_up,
                None => received == 0,
            };
            if done {
                break;
            }
        }

        Ok(())
    }

    /// Bytes to request for the next chunk: the configured chunk size, shrunk
    /// near the cap so the buffer never grows past it.
    fn request_size(&self, state: &TailState) -> usize {
        match self.config.log_length_limit {
            Some(cap) => self
                .config
                .chunk_size
                .min(cap.saturating_sub(state.log_text.len())),
            None => self.config.chunk_size,
        }
    }

    fn render_log(&self, state: &TailState, chunk_text: &str, capped: bool, caught_up: bool) {
        match self.config.log_length_limit {
            Some(cap) => {
                let text = if capped {
                    display::truncated_text(&state.log_text, cap)
                } else if !caught_up {
                    display::loading_text(&state.log_text, cap)
                } else {
                    state.log_text.clone()
                };
                self.sink.replace_log(&text);
            }
            // Unbounded tailing renders append-only, with no re-derivation
            // of the whole buffer.
            None => self.sink.append_log(chunk_text),
        }
    }
}

impl Drop for TailView {
    fn drop(&mut self) {
        self.pause_auto_refresh();
    }
}
