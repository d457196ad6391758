use std::sync::{Arc, OnceLock};
use std::time::Instant;

use tokio::sync::mpsc;

use crate::bar::State;
use crate::{CompletionCounter, Signal};

/// Requests processed by the actor, in the order they are accepted
pub(crate) enum Command {
    Increment(i64),
    ResumeFill(char, i64),
    RemoveAllPrependers,
    RemoveAllAppenders,
    /// Read the state (used for queries that reply through a channel)
    Inspect(Box<dyn FnOnce(&State) + Send>),
    /// Copy the state for rendering. If the bar is completed, the actor
    /// waits for `flushed` after replying, then requests completion
    /// (unless the bar is already terminating).
    Snapshot {
        reply: oneshot::Sender<State>,
        flushed: Signal,
    },
}

/// Data shared between the actor and the handles
pub(crate) struct Shared {
    /// Set by the first completion request
    pub complete_request: Signal,
    /// Set after the actor has terminated and frozen its state
    pub done: Signal,
    /// The final state, written once before `done` is set
    pub frozen: OnceLock<State>,
}

impl Shared {
    pub fn new() -> Self {
        Self {
            complete_request: Signal::new(),
            done: Signal::new(),
            frozen: OnceLock::new(),
        }
    }
}

/// The only owner of a bar's state
pub(crate) struct Actor {
    pub state: State,
    pub commands: mpsc::Receiver<Command>,
    pub shared: Arc<Shared>,
    /// Cancellation is observed at most once, then set to `None`
    pub cancel: Option<Signal>,
    pub counter: Option<CompletionCounter>,
}

impl Actor {
    pub async fn serve(mut self) {
        crate::trace!("bar {}: started, total={}", self.state.id, self.state.total);
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => {
                        crate::trace!("bar {}: all handles dropped", self.state.id);
                        self.shared.complete_request.signal();
                        break;
                    }
                },
                _ = self.shared.complete_request.co_wait() => break,
                _ = wait_cancel(self.cancel.as_ref()), if self.cancel.is_some() => {
                    crate::debug!("bar {}: cancelled", self.state.id);
                    self.state.aborted = true;
                    self.cancel = None;
                    self.shared.complete_request.signal();
                }
            }
        }
        self.drain();
        self.state.completed = true;
        self.finish();
    }

    async fn handle(&mut self, command: Command) {
        if let Some(flushed) = self.apply(command) {
            // the last frame must be out before the bar goes away
            flushed.co_wait().await;
            self.shared.complete_request.signal();
        }
    }

    /// Apply one command. Returns the flushed signal of a frame taken
    /// from a completed bar.
    fn apply(&mut self, command: Command) -> Option<Signal> {
        let state = &mut self.state;
        match command {
            Command::Increment(amount) => state.increment(amount, Instant::now()),
            Command::ResumeFill(glyph, till) => state.resume_fill(glyph, till),
            Command::RemoveAllPrependers => state.prepend_funcs.clear(),
            Command::RemoveAllAppenders => state.append_funcs.clear(),
            Command::Inspect(f) => f(state),
            Command::Snapshot { reply, flushed } => {
                // the frame keeps the current glyph, the actor moves on to the next
                let frame = state.clone();
                if let Some(spinner) = &mut state.spinner {
                    spinner.advance();
                }
                let _: Result<_, _> = reply.send(frame);
                if state.completed {
                    return Some(flushed);
                }
            }
        }
        None
    }

    /// Stop accepting commands and apply the ones already accepted
    fn drain(&mut self) {
        self.commands.close();
        let mut count = 0;
        while let Ok(command) = self.commands.try_recv() {
            // the bar is terminating, frames are not waited for
            let _ = self.apply(command);
            count += 1;
        }
        if count > 0 {
            crate::trace!("bar {}: drained {count} commands", self.state.id);
        }
    }

    fn finish(self) {
        let Self {
            state,
            commands,
            shared,
            counter,
            ..
        } = self;
        let id = state.id;
        let aborted = state.aborted;
        // handles that fail to send wait for `done`, then read this
        let _ = shared.frozen.set(state);
        drop(commands);
        if let Some(counter) = counter {
            counter.done();
        }
        if shared.done.signal() {
            crate::trace!("bar {id}: terminated, aborted={aborted}");
        }
    }
}

async fn wait_cancel(cancel: Option<&Signal>) {
    match cancel {
        Some(cancel) => cancel.co_wait().await,
        None => std::future::pending().await,
    }
}
