//! Debounced autosave
//!
//! [`Autosave::spawn`] starts a tokio task bound to one shared builder. After
//! each edit it waits until no further edit arrives for the configured delay,
//! then saves whatever the builder holds at that moment. A save that fails
//! with a transient store error is retried after another delay. Dropping or
//! shutting down the handle aborts the task, including any pending timer.

use crate::builder::FormBuilder;
use formwright_store::KeyValueStore;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Builder shared between the editing side and the autosave task
pub type SharedBuilder<S> = Arc<Mutex<FormBuilder<S>>>;

/// Handle of a running autosave task
#[derive(Debug)]
pub struct Autosave {
    handle: JoinHandle<()>,
}

impl Autosave {
    /// Spawn the autosave task on the current tokio runtime
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime
    pub fn spawn<S>(builder: SharedBuilder<S>, delay: Duration) -> Self
    where
        S: KeyValueStore + 'static,
    {
        let revisions = builder.lock().subscribe();
        let handle = tokio::spawn(run(builder, revisions, delay));
        Self { handle }
    }

    /// Stop the task, discarding any pending save
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run<S: KeyValueStore>(
    builder: SharedBuilder<S>,
    mut revisions: watch::Receiver<u64>,
    delay: Duration,
) {
    while revisions.changed().await.is_ok() {
        loop {
            if !quiet_period(&mut revisions, delay).await {
                return;
            }
            if !flush(&builder) {
                break;
            }
        }
    }
}

/// Wait until `delay` passes with no further edit; false once the sender is gone
async fn quiet_period(revisions: &mut watch::Receiver<u64>, delay: Duration) -> bool {
    loop {
        tokio::select! {
            () = tokio::time::sleep(delay) => return true,
            changed = revisions.changed() => {
                if changed.is_err() {
                    return false;
                }
            }
        }
    }
}

/// Save a dirty builder; returns true when a transient failure should be retried
fn flush<S: KeyValueStore>(builder: &Mutex<FormBuilder<S>>) -> bool {
    let mut guard = builder.lock();
    if !guard.is_dirty() {
        return false;
    }
    match guard.save() {
        Ok(()) => false,
        Err(e) if e.is_transient() => {
            tracing::warn!(form_id = %guard.form_id(), error = %e, "autosave failed, retrying after delay");
            true
        }
        Err(e) => {
            tracing::warn!(form_id = %guard.form_id(), error = %e, "autosave failed, will retry after next edit");
            false
        }
    }
}
