//! Render sink: the tail view's output boundary.

use std::sync::Mutex;

use runtail_protocol::Status;

/// Receives rendering updates from a tail view.
///
/// Implementations own the actual display surface; the view only decides what
/// to show. All calls arrive serialized from within a single poll cycle.
pub trait RenderSink: Send + Sync {
    /// The entity's status changed. `previous` is `None` on the first poll.
    fn render_status(&self, previous: Option<Status>, current: Status);

    /// Replace the whole rendered log. Used when a display cap is configured.
    fn replace_log(&self, text: &str);

    /// Append text to the rendered log. Used when tailing without a cap.
    fn append_log(&self, text: &str);
}

/// Sink that records every update, for tests.
#[derive(Default)]
pub struct CaptureSink {
    state: Mutex<CaptureState>,
}

#[derive(Default)]
struct CaptureState {
    statuses: Vec<Status>,
    rendered: String,
    replace_calls: usize,
    append_calls: usize,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The log text as currently rendered.
    pub fn rendered(&self) -> String {
        self.state.lock().unwrap().rendered.clone()
    }

    /// Every status rendered, in order.
    pub fn statuses(&self) -> Vec<Status> {
        self.state.lock().unwrap().statuses.clone()
    }

    pub fn replace_calls(&self) -> usize {
        self.state.lock().unwrap().replace_calls
    }

    pub fn append_calls(&self) -> usize {
        self.state.lock().unwrap().append_calls
    }
}

impl RenderSink for CaptureSink {
    fn render_status(&self, _previous: Option<Status>, current: Status) {
        self.state.lock().unwrap().statuses.push(current);
    }

    fn replace_log(&self, text: &str) {
        let mut state = self.state.lock().unwrap();
        state.rendered = text.to_string();
        state.replace_calls += 1;
    }

    fn append_log(&self, text: &str) {
        let mut state = self.state.lock().unwrap();
        state.rendered.push_str(text);
        state.append_calls += 1;
    }
}
