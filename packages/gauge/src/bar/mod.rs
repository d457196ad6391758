/// # Progress Bars
/// A bar tracks the progress of one task. Its state is owned by an actor
/// running in the background: producers send updates, a display driver asks
/// for a rendered line at whatever width the terminal has, and every request
/// is applied one at a time.
///
/// ## Components
/// A rendered line has the following components
/// - Prepended decorators: text rendered before the bar body, for example
///   a `[42/100]` counter.
/// - Bar body: for example `[=====>----]`. The glyphs are configurable with
///   [`BarBuilder::format`]. If the total is unknown (`<= 0`), the body is a
///   spinner instead, which moves one step per render.
/// - Appended decorators: text rendered after the bar body, for example
///   an ETA.
///
/// With a counter and an ETA, it looks something like this:
/// ```text
/// 42/100 [===========>----------------] ETA 3s
/// ```
///
/// When the line does not fit in the width, only the bar body shrinks.
/// Decorators are never truncated.
///
/// ## Decorators and columns
/// A decorator is a function of the bar's [`Statistics`], the width its
/// column should have and a [`WidthSlot`] to publish the width it needs.
/// When multiple bars are displayed together, each decorator position is a
/// column shared by all bars through a [`WidthSync`], so columns can line up.
///
/// ## State
/// A bar is in progress until it is completed, either by reaching its total,
/// by [`Bar::complete`], or by the cancel signal (which also marks it as aborted).
/// Once completed and its last frame is flushed, the actor terminates. All
/// further updates are ignored and queries read the final state.
///
/// ## Building the bar
/// This function `gauge::bar` will make a [`BarBuilder`]
/// with these default configs:
/// - Width: `70`
/// - Format: `"[=>-]"`
/// - ETA smoothing: `0.25`
/// - No decorators, no cancel signal, no completion counter
///
/// ```rust
/// let bar = gauge::bar(10)
///     .append(|stats, _, _| format!("{}/{}", stats.current, stats.total))
///     .spawn();
/// for _ in 0..10 {
///     bar.increment(1);
/// }
/// let flushed = gauge::Signal::new_signaled();
/// let append = gauge::WidthSync::new(1);
/// let line = bar.render(30, &flushed, &gauge::WidthSync::new(0), &append);
/// assert_eq!(line, " [=====================] 10/10\n");
/// bar.wait();
/// ```
#[inline(always)]
pub fn bar(total: i64) -> BarBuilder {
    BarBuilder::new(total)
}

/// Default fallback width of a bar
pub const DEFAULT_WIDTH: usize = 70;

mod eta;
pub use eta::{DEFAULT_ETA_ALPHA, Estimater};
mod spinner;
use spinner::Spinner;
mod state;
pub use state::{BarFormat, Decorator, Refill};
pub(crate) use state::State;
mod stats;
pub use stats::Statistics;
mod sync;
pub use sync::{WidthSlot, WidthSync};
mod draw;
pub use draw::{fill_bar, percentage};
use draw::render_line;
mod actor;
use actor::{Actor, Command, Shared};
mod builder;
pub use builder::BarBuilder;
mod handle;
pub use handle::Bar;
mod reader;
pub use reader::ProxyReader;
