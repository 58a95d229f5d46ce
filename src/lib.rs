//! Incremental status polling and log tailing for orchestration runs.
//!
//! `runtail` keeps a local view of one run (or one step of a run) in sync with
//! the orchestration service. Status is re-fetched whole on every poll; the
//! execution log is tailed incrementally through the cursor-based chunk
//! protocol; rendering goes through an injected sink. The view owns all
//! polling state and decides when to stop: auto-refresh is disarmed once the
//! entity reaches a terminal status or the first poll fails.
//!
//! The service, the timer facility, and the display are all injected
//! ([`provider::Transport`], [`schedule::Scheduler`], [`sink::RenderSink`]),
//! so the whole state machine runs under test without a network or a clock.

pub mod config;
pub mod provider;
pub mod schedule;
pub mod sink;
pub mod view;

pub use config::TailConfig;
pub use provider::{HttpTransport, ScriptedTransport, Transport, TransportError};
pub use schedule::{CancelHandle, ManualScheduler, Scheduler, ThreadScheduler};
pub use sink::{CaptureSink, RenderSink};
pub use view::{TailError, TailView};

pub use runtail_protocol::{Cursor, EntityRef, LogChunk, ProtocolError, Status, StatusRecord};
