//! runtail CLI
//!
//! Terminal viewer for one orchestration run or step: polls the status,
//! tails the execution log to stdout, and exits once the entity reaches a
//! terminal status. The terminal scrolls, so the viewer always tails
//! unbounded; the display cap exists for fixed viewports.

use std::io::Write;
use std::process;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use runtail::provider::HttpTransport;
use runtail::schedule::ThreadScheduler;
use runtail::sink::RenderSink;
use runtail::view::TailView;
use runtail::{EntityRef, Status, TailConfig};

#[derive(Parser)]
#[command(name = "runtail")]
#[command(about = "Tail the status and log of an orchestration run", version)]
struct Cli {
    /// Base URL of the orchestration service
    service_url: String,

    /// Run identifier
    run_id: String,

    /// Step index within the run (tails the run itself when omitted)
    #[arg(long)]
    step: Option<usize>,

    /// Auto-refresh period in seconds
    #[arg(long, default_value = "5")]
    interval_seconds: u64,
}

/// Sink that writes the log to stdout and status transitions to stderr.
struct ConsoleSink;

impl RenderSink for ConsoleSink {
    fn render_status(&self, previous: Option<Status>, current: Status) {
        match previous {
            Some(previous) => eprintln!("Status: {} -> {}", previous, current),
            None => eprintln!("Status: {}", current),
        }
    }

    fn replace_log(&self, _text: &str) {
        // The console tails unbounded; capped re-rendering never fires.
    }

    fn append_log(&self, text: &str) {
        print!("{}", text);
        let _ = std::io::stdout().flush();
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let entity = match cli.step {
        Some(index) => EntityRef::step(cli.run_id, index),
        None => EntityRef::run(cli.run_id),
    };

    let transport = match HttpTransport::new(cli.service_url) {
        Ok(transport) => transport,
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    };

    let config = TailConfig {
        poll_interval: Duration::from_secs(cli.interval_seconds),
        ..TailConfig::unbounded()
    };

    let view = match TailView::new(
        Arc::new(transport),
        entity,
        config,
        Arc::new(ConsoleSink),
        Arc::new(ThreadScheduler),
    ) {
        Ok(view) => Arc::new(view),
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    };

    view.start();

    let (stop_tx, stop_rx) = mpsc::channel();
    let handler_tx = stop_tx.clone();
    if ctrlc::set_handler(move || {
        let _ = handler_tx.send(());
    })
    .is_err()
    {
        eprintln!("Warning: could not install Ctrl-C handler");
    }

    let exit_code = loop {
        match stop_rx.recv_timeout(Duration::from_millis(500)) {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                view.pause_auto_refresh();
                eprintln!("Stopped.");
                break 0;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if view.is_completed() {
                    break 0;
                }
                if view.is_halted() {
                    break 1;
                }
            }
        }
    };

    process::exit(exit_code);
}
