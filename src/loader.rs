//! Background load coordinator.
//!
//! A folder load runs `read_and_merge_with` on a tokio blocking thread. The worker
//! never touches UI state: everything it has to say travels as `LoadMessage`s
//! over an unbounded channel that the UI thread drains once per frame.

use crate::{MergeEvent, Table, ViewerError, read_and_merge_with};

use std::{ops::ControlFlow, path::PathBuf};
use tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError},
};
use tracing::error;

/// Message sent from the worker to the UI thread.
#[derive(Debug)]
pub enum LoadMessage {
    /// The worker started reading this file.
    Progress(PathBuf),
    /// A file was skipped; the load goes on.
    Warning(ViewerError),
    /// Last message of a load. `None` when no file could be read.
    Done(Option<Table>),
    /// The worker stopped without sending `Done`.
    Failed(String),
}

/// Runs one folder load at a time and hands its messages to the UI thread.
///
/// There is no cancellation. Starting a new load while one is running drops the
/// old receiver: the old worker finishes the file in hand, sees the closed
/// channel and stops.
#[derive(Debug, Default)]
pub struct BackgroundLoader {
    receiver: Option<UnboundedReceiver<LoadMessage>>,
}

impl BackgroundLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns the worker for `paths` on `handle`.
    ///
    /// `notify` runs on the worker thread after every message, typically to
    /// request a repaint of the UI.
    pub fn start<N>(&mut self, handle: &Handle, paths: Vec<PathBuf>, notify: N)
    where
        N: Fn() + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<LoadMessage>();
        self.receiver = Some(rx);

        tracing::info!("Background load started: {} files", paths.len());

        // The JoinHandle is dropped: a panicking worker shows up as a closed channel.
        drop(handle.spawn_blocking(move || run_load(paths, tx, notify)));
    }

    /// `true` between `start` and the delivery of `Done` (or `Failed`).
    pub fn is_running(&self) -> bool {
        self.receiver.is_some()
    }

    /// Drains every pending message without blocking.
    pub fn poll(&mut self) -> Vec<LoadMessage> {
        let mut messages = Vec::new();

        // Attempt to take ownership of the receiver. If it's None (no pending load), return.
        let Some(mut receiver) = self.receiver.take() else {
            return messages;
        };

        loop {
            match receiver.try_recv() {
                Ok(message) => {
                    let finished = matches!(message, LoadMessage::Done(_));
                    messages.push(message);
                    if finished {
                        return messages;
                    }
                }
                // Nothing more for now: put the receiver back to check again later.
                Err(TryRecvError::Empty) => {
                    self.receiver = Some(receiver);
                    return messages;
                }
                // The sender was dropped before `Done`: the worker panicked.
                Err(TryRecvError::Disconnected) => {
                    let err_msg = "Data operation terminated without response.".to_string();
                    error!("{}", err_msg);
                    messages.push(LoadMessage::Failed(err_msg));
                    return messages;
                }
            }
        }
    }
}

/// Worker body: reads and merges `paths`, reporting every step over `tx`.
fn run_load<N>(paths: Vec<PathBuf>, tx: UnboundedSender<LoadMessage>, notify: N)
where
    N: Fn(),
{
    let send = |message: LoadMessage| -> ControlFlow<()> {
        if tx.send(message).is_err() {
            // Receiver dropped (a newer load replaced this one, or the UI closed).
            tracing::debug!("Load receiver dropped; stopping worker.");
            return ControlFlow::Break(());
        }
        notify();
        ControlFlow::Continue(())
    };

    let mut skipped = 0;
    let table = read_and_merge_with(&paths, |event| match event {
        MergeEvent::Reading(path) => send(LoadMessage::Progress(path.to_path_buf())),
        MergeEvent::Failed(err) => {
            skipped += 1;
            send(LoadMessage::Warning(err))
        }
    });

    tracing::info!(
        "Background load finished: {} rows, {skipped} files skipped",
        table.as_ref().map_or(0, Table::height)
    );

    let _ = send(LoadMessage::Done(table));
}
