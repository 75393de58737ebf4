//! One-shot stop timers on background threads.

use clipmark_editor::{EditorEvent, SessionId, StopScheduler};
use crossbeam_channel::{bounded, select, Sender};
use std::collections::HashMap;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error};

/// `StopScheduler` that sleeps on a thread per timer and posts
/// `EditorEvent::StopTimerFired` when due. Cancelling wakes the thread
/// without posting.
pub struct ThreadScheduler {
    events: Sender<EditorEvent>,
    pending: HashMap<SessionId, (Sender<()>, JoinHandle<()>)>,
}

impl ThreadScheduler {
    pub fn new(events: Sender<EditorEvent>) -> Self {
        Self {
            events,
            pending: HashMap::new(),
        }
    }

    /// Timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.pending.values().filter(|(_, t)| !t.is_finished()).count()
    }
}

impl StopScheduler for ThreadScheduler {
    fn schedule(&mut self, session: SessionId, after: Duration) {
        self.pending.retain(|_, (_, thread)| !thread.is_finished());
        self.cancel(session);
        let (cancel_tx, cancel_rx) = bounded::<()>(1);
        let events = self.events.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("clipmark-stop-{}", session.raw()))
            .spawn(move || {
                select! {
                    recv(cancel_rx) -> _ => debug!(%session, "Stop timer cancelled"),
                    default(after) => {
                        debug!(%session, ?after, "Stop timer fired");
                        let _ = events.send(EditorEvent::StopTimerFired(session));
                    }
                }
            });
        match spawned {
            Ok(thread) => {
                self.pending.insert(session, (cancel_tx, thread));
            }
            Err(e) => error!(%session, error = %e, "Failed to spawn stop timer"),
        }
    }

    fn cancel(&mut self, session: SessionId) {
        if let Some((cancel, _)) = self.pending.remove(&session) {
            let _ = cancel.try_send(());
        }
    }
}
