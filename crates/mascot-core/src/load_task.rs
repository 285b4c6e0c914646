use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use mascot_types::Theme;

use crate::error::ThemeError;
use crate::loader::{LoadProgress, SessionResources, ThemeLoader};
use crate::traits::decoder::AssetDecoder;

/// Result of a finished theme switch, handing the session resources back.
#[derive(Debug)]
pub struct LoadOutcome {
    pub theme: Arc<Theme>,
    pub resources: SessionResources,
    pub result: Result<(), ThemeError>,
}

/// Message streamed from the loader thread.
#[derive(Debug)]
pub enum LoadMessage {
    Progress(LoadProgress),
    Finished(LoadOutcome),
}

/// Background task running one theme switch.
///
/// The task owns the session's cache and sequencer until it finishes, so no
/// other eviction or load can touch them in the meantime.
pub struct ThemeLoadTask {
    theme: Arc<Theme>,
    receiver: Receiver<LoadMessage>,
    handle: Option<JoinHandle<()>>,
    finished: bool,
}

impl ThemeLoadTask {
    /// Start loading `next` on a worker thread.
    pub fn start(
        mut resources: SessionResources,
        previous: Option<Arc<Theme>>,
        next: Arc<Theme>,
        decoder: Arc<dyn AssetDecoder>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        let theme = Arc::clone(&next);

        let handle = thread::spawn(move || {
            let loader = ThemeLoader::new(decoder.as_ref());
            let result = loader.switch_theme(
                &mut resources,
                previous.as_deref(),
                &next,
                &mut |p| {
                    // The receiver only disappears when the task is dropped.
                    let _ = sender.send(LoadMessage::Progress(p));
                },
            );
            let _ = sender.send(LoadMessage::Finished(LoadOutcome {
                theme: next,
                resources,
                result,
            }));
        });

        Self {
            theme,
            receiver,
            handle: Some(handle),
            finished: false,
        }
    }

    pub fn theme(&self) -> &Arc<Theme> {
        &self.theme
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain the messages available right now without blocking.
    pub fn poll(&mut self) -> Vec<LoadMessage> {
        let mut messages = Vec::new();
        while !self.finished {
            match self.receiver.try_recv() {
                Ok(msg) => self.push(msg, &mut messages),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    let lost = self.lost();
                    self.push(lost, &mut messages);
                }
            }
        }
        messages
    }

    /// Block until the load finishes, returning every remaining message.
    pub fn wait(&mut self) -> Vec<LoadMessage> {
        let mut messages = Vec::new();
        while !self.finished {
            match self.receiver.recv() {
                Ok(msg) => self.push(msg, &mut messages),
                Err(_) => {
                    let lost = self.lost();
                    self.push(lost, &mut messages);
                }
            }
        }
        messages
    }

    fn push(&mut self, msg: LoadMessage, messages: &mut Vec<LoadMessage>) {
        if matches!(msg, LoadMessage::Finished(_)) {
            self.finished = true;
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        }
        messages.push(msg);
    }

    // The worker died without reporting; its resources are gone with it.
    fn lost(&self) -> LoadMessage {
        log::error!("Loader thread for theme {} exited unexpectedly", self.theme.id);
        LoadMessage::Finished(LoadOutcome {
            theme: Arc::clone(&self.theme),
            resources: SessionResources::default(),
            result: Err(ThemeError::Interrupted(self.theme.id.clone())),
        })
    }
}
