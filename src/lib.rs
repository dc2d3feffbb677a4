// ZenFlow - ambient radio player core
// Module declarations
pub mod audio;
pub mod commands;
pub mod error;
pub mod locale;
pub mod runtime;
pub mod scene;
pub mod settings;
pub mod state;
pub mod timer;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::Command;
use runtime::{AppEvent, Runtime};
use settings::AppSettings;

/// Install the stderr log subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("zenflow_lib=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run a headless session driven by line gestures on stdin, printing the
/// status line to stdout whenever the view changes.
pub async fn run(settings: AppSettings) -> Result<()> {
    let runtime = Runtime::headless(&settings).context("Failed to build scene catalog")?;
    let mut snapshots = runtime.subscribe();
    let (tx, rx) = mpsc::unbounded_channel();

    let printer = tokio::spawn(async move {
        println!("{}", snapshots.borrow_and_update().status_line());
        while snapshots.changed().await.is_ok() {
            println!("{}", snapshots.borrow_and_update().status_line());
        }
    });
    let reader = tokio::spawn(read_gestures(tx));

    let last = runtime.run(rx).await;
    info!(view = ?last.view, "session ended");

    // The snapshot sender is gone now, so the printer drains and exits
    if let Err(e) = printer.await {
        warn!("status printer failed: {}", e);
    }
    reader
        .await
        .context("Gesture reader panicked")?
        .context("Failed to read gestures")?;
    Ok(())
}

async fn read_gestures(tx: UnboundedSender<AppEvent>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        match Command::parse_line(line) {
            Ok(command) => {
                if tx.send(AppEvent::Command(command)).is_err() {
                    return Ok(());
                }
            }
            Err(e) => warn!("{}", e),
        }
    }

    // The loop may already be gone; nothing left to tell it
    let _ = tx.send(AppEvent::Shutdown);
    Ok(())
}
