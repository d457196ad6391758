use std::sync::Arc;

use tokio::sync::mpsc;

use crate::bar::{Actor, Bar, BarFormat, Decorator, Shared, State, Statistics, WidthSlot};
use crate::{CompletionCounter, Signal};

/// Builder for a progress bar
#[derive(Clone)] // Clone to spawn several bars with the same options
pub struct BarBuilder {
    /// Total steps (`<= 0` = unknown, displays a spinner)
    total: i64,
    /// None = allocate a new id when spawning
    id: Option<usize>,
    /// Fallback width when rendering without a terminal width
    width: usize,
    /// Glyphs to draw the bar with
    format: BarFormat,
    trim_left_space: bool,
    trim_right_space: bool,
    /// Smoothing factor for the ETA
    eta_alpha: f64,
    prepend: Vec<Decorator>,
    append: Vec<Decorator>,
    /// Shared cancellation signal
    cancel: Option<Signal>,
    /// Shared counter of unfinished bars
    counter: Option<CompletionCounter>,
}

impl BarBuilder {
    /// Start building a bar. Note [`gauge::bar`](fn@crate::bar) is the canonical shorthand
    pub fn new(total: i64) -> Self {
        Self {
            total,
            id: None,
            width: crate::bar::DEFAULT_WIDTH,
            format: BarFormat::default(),
            trim_left_space: false,
            trim_right_space: false,
            eta_alpha: crate::bar::DEFAULT_ETA_ALPHA,
            prepend: vec![],
            append: vec![],
            cancel: None,
            counter: None,
        }
    }

    /// Set the id of the bar. By default, a unique id is allocated
    ///
    /// ```rust
    /// gauge::bar(10).id(42);
    /// ```
    #[inline(always)]
    pub fn id(mut self, id: usize) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the width used when rendering without a terminal width,
    /// which is also the widest the bar body gets. Default is `70`
    #[inline(always)]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Set the glyphs of the bar body: left cap, fill, tip, empty, right cap.
    /// Default is `"[=>-]"`.
    ///
    /// A format without exactly 5 characters is ignored with a warning.
    /// Parse a [`BarFormat`] directly to handle the error.
    ///
    /// ```rust
    /// gauge::bar(10).format("╢▌▌░╟");
    /// ```
    pub fn format(mut self, format: &str) -> Self {
        match format.parse() {
            Ok(format) => self.format = format,
            Err(e) => crate::warn!("ignoring bar format: {e}"),
        }
        self
    }

    /// Set the glyphs of the bar body from a parsed format
    #[inline(always)]
    pub fn bar_format(mut self, format: BarFormat) -> Self {
        self.format = format;
        self
    }

    /// Don't put a space between the prepended decorators and the bar body
    #[inline(always)]
    pub fn trim_left_space(mut self) -> Self {
        self.trim_left_space = true;
        self
    }

    /// Don't put a space between the bar body and the appended decorators
    #[inline(always)]
    pub fn trim_right_space(mut self) -> Self {
        self.trim_right_space = true;
        self
    }

    /// Set the smoothing factor of the ETA moving average, in `(0, 1]`.
    /// Higher values follow recent speed more closely. Default is `0.25`
    pub fn eta_alpha(mut self, alpha: f64) -> Self {
        if alpha > 0.0 && alpha <= 1.0 {
            self.eta_alpha = alpha;
        } else {
            crate::warn!("ignoring eta alpha outside of (0, 1]: {alpha}");
        }
        self
    }

    /// Add a decorator before the bar body. Decorators are rendered in the
    /// order they are added.
    ///
    /// ```rust
    /// gauge::bar(10).prepend(|stats, width, slot| {
    ///     let text = format!("{}/{}", stats.current, stats.total);
    ///     slot.publish(text.len());
    ///     format!("{text:>width$}")
    /// });
    /// ```
    pub fn prepend<F>(mut self, f: F) -> Self
    where
        F: Fn(&Statistics, usize, &WidthSlot) -> String + Send + Sync + 'static,
    {
        self.prepend.push(Arc::new(f));
        self
    }

    /// Add a decorator after the bar body. Decorators are rendered in the
    /// order they are added.
    pub fn append<F>(mut self, f: F) -> Self
    where
        F: Fn(&Statistics, usize, &WidthSlot) -> String + Send + Sync + 'static,
    {
        self.append.push(Arc::new(f));
        self
    }

    /// Abort the bar when `signal` is set. The bar is then completed with
    /// `aborted` in its statistics
    pub fn cancel(mut self, signal: &Signal) -> Self {
        self.cancel = Some(signal.clone());
        self
    }

    /// Count the bar in `counter` until it terminates
    pub fn counter(mut self, counter: &CompletionCounter) -> Self {
        self.counter = Some(counter.clone());
        self
    }

    /// Build the bar and start its actor
    pub fn spawn(self) -> Bar {
        let mut state = State::new(self.id.unwrap_or_else(crate::next_id), self.total);
        state.width = self.width;
        state.format = self.format;
        state.trim_left_space = self.trim_left_space;
        state.trim_right_space = self.trim_right_space;
        state.eta = crate::bar::Estimater::new(self.eta_alpha);
        state.prepend_funcs = self.prepend;
        state.append_funcs = self.append;

        if let Some(counter) = &self.counter {
            counter.add(1);
        }
        // a bounded channel, so fast producers wait for the actor
        let (send, recv) = mpsc::channel(1);
        let shared = Arc::new(Shared::new());
        let actor = Actor {
            state,
            commands: recv,
            shared: Arc::clone(&shared),
            cancel: self.cancel,
            counter: self.counter,
        };
        crate::co::spawn(actor.serve());

        Bar {
            commands: send,
            shared,
        }
    }
}
