//! Auto mode: analyse the case on its own once the form settles.
//!
//! Off by default. When enabled, every form change restarts a debounce
//! timer; when the timer runs out and the form has sufficient context, the
//! previous auto-analysis messages are removed and a fresh analysis is
//! dispatched.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use medconnect_core::models::chat::MessageSource;
use medconnect_core::models::command::Command;
use medconnect_core::models::form::FormSnapshot;

use crate::dispatcher::{DispatchOutcome, Dispatcher};

/// Default quiet period after the last form change.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Spawn the auto-analysis loop. It runs until the returned handle is aborted.
pub fn spawn(
    dispatcher: Arc<Dispatcher>,
    changes: watch::Receiver<FormSnapshot>,
    debounce: Duration,
) -> JoinHandle<()> {
    tokio::spawn(run(dispatcher, changes, debounce))
}

async fn run(
    dispatcher: Arc<Dispatcher>,
    mut changes: watch::Receiver<FormSnapshot>,
    debounce: Duration,
) {
    while changes.changed().await.is_ok() {
        // Wait for the form to stay quiet for a full debounce period.
        loop {
            tokio::select! {
                changed = changes.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(debounce) => break,
            }
        }

        if !changes.borrow_and_update().is_sufficient() {
            debug!("auto analysis skipped, form context incomplete");
            continue;
        }

        let removed = dispatcher
            .transcript()
            .remove_by_source(MessageSource::AutoAnalysis)
            .await;
        info!(removed, "running auto analysis");

        let outcome = dispatcher
            .dispatch(&Command::Analyze, "", MessageSource::AutoAnalysis)
            .await;
        debug!(outcome = ?outcome, "auto analysis finished");
        if outcome == DispatchOutcome::Busy {
            // The busy notice is noise for an automatic trigger.
            dispatcher
                .transcript()
                .remove_by_source(MessageSource::AutoAnalysis)
                .await;
        }
    }
}
