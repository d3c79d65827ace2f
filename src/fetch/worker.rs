use std::sync::Arc;

use tokio::sync::mpsc;

use crate::event::Event;
use crate::git::types::EntryKey;
use crate::git::ChangeSource;

use super::channel::{DiffResult, ListResult};

/// Runs change-source calls on the blocking pool. Each call posts exactly
/// one completion event, tagged with a sequence number taken at dispatch.
pub struct FetchWorker {
    source: Arc<dyn ChangeSource>,
    event_tx: mpsc::UnboundedSender<Event>,
    next_seq: u64,
}

impl FetchWorker {
    pub fn new(source: Arc<dyn ChangeSource>, event_tx: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            source,
            event_tx,
            next_seq: 0,
        }
    }

    pub fn fetch_list(&mut self) -> u64 {
        let seq = self.bump();
        let source = Arc::clone(&self.source);
        let tx = self.event_tx.clone();
        tracing::debug!(seq, "fetching file list");

        tokio::task::spawn_blocking(move || {
            let entries = source.list_changes().map_err(|e| format!("{e:#}"));
            let _ = tx.send(Event::FilesFetched(ListResult { seq, entries }));
        });
        seq
    }

    pub fn fetch_diff(&mut self, key: EntryKey) -> u64 {
        let seq = self.bump();
        let source = Arc::clone(&self.source);
        let tx = self.event_tx.clone();
        tracing::debug!(seq, %key, "fetching diff");

        tokio::task::spawn_blocking(move || {
            let diff = source.diff(&key).map_err(|e| format!("{e:#}"));
            let _ = tx.send(Event::DiffFetched(DiffResult { seq, key, diff }));
        });
        seq
    }

    fn bump(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}
