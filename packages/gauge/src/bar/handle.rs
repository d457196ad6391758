use std::io::Read;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::Signal;
use crate::bar::{Command, ProxyReader, Shared, State, Statistics, WidthSync, render_line};

/// Handle to a progress bar
///
/// The bar's state is owned by a background actor. Every method on the handle
/// is a request to that actor, and requests are applied one at a time in the
/// order they are accepted, so a render always reflects every update accepted
/// before it.
///
/// Methods come in 2 flavors:
/// - Blocking methods (`increment`, `statistics`, `render`, ...) park the
///   calling thread until the actor accepts the request. These must not be
///   called from an async context.
/// - `co_*` methods are the async equivalents, for use inside a runtime.
///
/// After the bar has terminated, updates are ignored and queries read the
/// final state.
///
/// Handles are cheap to clone. When every handle is dropped, the bar
/// completes on its own.
///
/// See [Progress Bars](fn@crate::bar)
#[derive(Clone)]
pub struct Bar {
    pub(crate) commands: mpsc::Sender<Command>,
    pub(crate) shared: Arc<Shared>,
}

impl Bar {
    /// Add `n` to the progress. Ignored if `n < 1`.
    ///
    /// Reaching the total marks the bar as completed. Further increments
    /// have no effect.
    pub fn increment(&self, n: i64) {
        if n < 1 {
            return;
        }
        self.send(Command::Increment(n));
    }

    /// Async version of [`increment`](Self::increment)
    pub async fn co_increment(&self, n: i64) {
        if n < 1 {
            return;
        }
        self.co_send(Command::Increment(n)).await;
    }

    /// Fill the bar with `glyph` from the start up to `till`, on top of the
    /// regular fill. Takes effect from the next render. Ignored if `till < 1`.
    ///
    /// This is useful to show progress that was already done before,
    /// for example a resumed download.
    pub fn resume_fill(&self, glyph: char, till: i64) {
        if till < 1 {
            return;
        }
        self.send(Command::ResumeFill(glyph, till));
    }

    /// Async version of [`resume_fill`](Self::resume_fill)
    pub async fn co_resume_fill(&self, glyph: char, till: i64) {
        if till < 1 {
            return;
        }
        self.co_send(Command::ResumeFill(glyph, till)).await;
    }

    /// Request the bar to terminate.
    ///
    /// This needs to be called if the total is unknown, and can be used to
    /// stop a bar early. Only the first call has effect. Never blocks.
    pub fn complete(&self) {
        if self.shared.complete_request.signal() {
            crate::trace!("bar: completion requested");
        }
    }

    /// `true` until a completion request has been made, which
    /// does not mean the bar has terminated yet (see [`is_done`](Self::is_done)).
    ///
    /// Can be used as a loop condition. Never blocks.
    pub fn in_progress(&self) -> bool {
        !self.shared.complete_request.signaled()
    }

    /// Check if the bar has terminated, without waiting
    pub fn is_done(&self) -> bool {
        self.shared.done.signaled()
    }

    /// Block until the bar has terminated
    pub fn wait(&self) {
        self.shared.done.wait()
    }

    /// Wait until the bar has terminated
    pub async fn co_wait(&self) {
        self.shared.done.co_wait().await
    }

    /// Get the id of the bar
    pub fn id(&self) -> usize {
        self.query(|s| s.id)
    }

    pub async fn co_id(&self) -> usize {
        self.co_query(|s| s.id).await
    }

    /// Get a snapshot of the bar's statistics
    pub fn statistics(&self) -> Statistics {
        self.query(|s| Statistics::from(s))
    }

    pub async fn co_statistics(&self) -> Statistics {
        self.co_query(|s| Statistics::from(s)).await
    }

    /// Number of decorators rendered after the bar body
    pub fn num_appenders(&self) -> usize {
        self.query(|s| s.append_funcs.len())
    }

    pub async fn co_num_appenders(&self) -> usize {
        self.co_query(|s| s.append_funcs.len()).await
    }

    /// Number of decorators rendered before the bar body
    pub fn num_prependers(&self) -> usize {
        self.query(|s| s.prepend_funcs.len())
    }

    pub async fn co_num_prependers(&self) -> usize {
        self.co_query(|s| s.prepend_funcs.len()).await
    }

    /// Remove all decorators before the bar body. Ignored after the bar has terminated.
    pub fn remove_all_prependers(&self) {
        self.send(Command::RemoveAllPrependers);
    }

    pub async fn co_remove_all_prependers(&self) {
        self.co_send(Command::RemoveAllPrependers).await;
    }

    /// Remove all decorators after the bar body. Ignored after the bar has terminated.
    pub fn remove_all_appenders(&self) {
        self.send(Command::RemoveAllAppenders);
    }

    pub async fn co_remove_all_appenders(&self) {
        self.co_send(Command::RemoveAllAppenders).await;
    }

    /// Wrap a reader so that every read of `n` bytes increments the bar by `n`
    pub fn proxy_reader<R: Read>(&self, reader: R) -> ProxyReader<R> {
        ProxyReader::new(reader, self.clone())
    }

    /// Render the bar as one line of text (including the `'\n'`) at `width`.
    /// If `width` is 0, the width configured on the bar is used instead.
    ///
    /// `flushed` is the display's acknowledgment that this frame has been
    /// written out. If the bar is completed, it terminates once `flushed`
    /// is signaled, so the last frame is never lost.
    ///
    /// The line is empty if the decorators of the bar don't match the columns
    /// of `prepend` and `append`. If a decorator panics, the line is the panic
    /// message.
    ///
    /// # Panics in decorators
    /// The panic is caught, but the panic hook still runs before that, and
    /// the default hook prints the message to stderr, in the middle of
    /// whatever the display is drawing. A display that redraws in place
    /// should install a hook that stays quiet (or logs) instead.
    ///
    /// ```rust
    /// std::panic::set_hook(Box::new(|info| gauge::debug!("{info}")));
    /// let bar = gauge::bar(10)
    ///     .append(|_, _, _| panic!("no network"))
    ///     .spawn();
    /// let flushed = gauge::Signal::new();
    /// let line = bar.render(80, &flushed, &gauge::WidthSync::new(0), &gauge::WidthSync::new(1));
    /// assert_eq!(line, "no network\n");
    /// ```
    pub fn render(
        &self,
        width: usize,
        flushed: &Signal,
        prepend: &WidthSync,
        append: &WidthSync,
    ) -> String {
        let (reply, recv) = oneshot::channel();
        let sent = self.send(Command::Snapshot {
            reply,
            flushed: flushed.clone(),
        });
        // decorators run here, outside of the actor
        match recv.recv() {
            Ok(frame) if sent => render_line(&frame, width, prepend, append),
            _ => render_or_blank(self.frozen(), width, prepend, append),
        }
    }

    /// Async version of [`render`](Self::render)
    pub async fn co_render(
        &self,
        width: usize,
        flushed: &Signal,
        prepend: &WidthSync,
        append: &WidthSync,
    ) -> String {
        let (reply, recv) = oneshot::channel();
        let sent = self
            .co_send(Command::Snapshot {
                reply,
                flushed: flushed.clone(),
            })
            .await;
        match recv.await {
            Ok(frame) if sent => render_line(&frame, width, prepend, append),
            _ => render_or_blank(self.co_frozen().await, width, prepend, append),
        }
    }

    /// Send a command, returns `false` if the actor has terminated
    #[inline(always)]
    fn send(&self, command: Command) -> bool {
        self.commands.blocking_send(command).is_ok()
    }

    #[inline(always)]
    async fn co_send(&self, command: Command) -> bool {
        self.commands.send(command).await.is_ok()
    }

    fn query<T: Send + Default + 'static>(&self, f: fn(&State) -> T) -> T {
        let (send, recv) = oneshot::channel();
        let command = Command::Inspect(Box::new(move |s| {
            let _: Result<_, _> = send.send(f(s));
        }));
        if self.send(command)
            && let Ok(value) = recv.recv()
        {
            return value;
        }
        self.frozen().map(f).unwrap_or_default()
    }

    async fn co_query<T: Send + Default + 'static>(&self, f: fn(&State) -> T) -> T {
        let (send, recv) = oneshot::channel();
        let command = Command::Inspect(Box::new(move |s| {
            let _: Result<_, _> = send.send(f(s));
        }));
        if self.co_send(command).await
            && let Ok(value) = recv.await
        {
            return value;
        }
        self.co_frozen().await.map(f).unwrap_or_default()
    }

    /// The final state, once the actor has terminated
    fn frozen(&self) -> Option<&State> {
        // frozen before `done` is set
        self.shared.done.wait();
        self.shared.frozen.get()
    }

    async fn co_frozen(&self) -> Option<&State> {
        self.shared.done.co_wait().await;
        self.shared.frozen.get()
    }
}

fn render_or_blank(
    state: Option<&State>,
    width: usize,
    prepend: &WidthSync,
    append: &WidthSync,
) -> String {
    match state {
        Some(state) => render_line(state, width, prepend, append),
        None => String::from("\n"),
    }
}
