//! Single progress bar core
//!
//! # General Principal
//! `gauge` answers one question: what does this bar look like right now,
//! at this width, with these columns? Deciding when to render, detecting the
//! terminal width and writing to the terminal are left to the display that
//! uses it.
//!
//! A bar is created with [`bar`] and updated through its [`Bar`] handle
//! from any thread. All updates and queries of one bar are processed by a
//! single actor task, so there is exactly one mutator of the bar's state
//! and no locks.
//!
//! ```rust
//! let cancel = gauge::Signal::new();
//! let bar = gauge::bar(100).cancel(&cancel).spawn();
//! bar.increment(30);
//! assert_eq!(bar.statistics().current, 30);
//! assert!(bar.in_progress());
//! cancel.signal();
//! bar.wait();
//! assert!(bar.statistics().aborted);
//! ```
//!
//! # Sync and async
//! Operations that wait for the actor have a blocking version and an
//! async `co_*` version. See [`co`] for the runtime that drives the actors.
//!
//! # Error handling
//! Updating a bar never fails. Invalid arguments (like incrementing by 0)
//! and updates after the bar has terminated are silently ignored. Panics in
//! decorators are caught when rendering and replaced by the panic message
//! (see [`Bar::render`] about the panic hook).
//!
//! The few fallible operations return [`gauge::Result`](Result), re-exported
//! from [`anyhow`](https://docs.rs/anyhow).
//!
//! # `log` integration
//! The actor logs its lifecycle at `trace` level and problems at `warn` level
//! through the [`log`](https://docs.rs/log) facade, whose macros are
//! re-exported. Use [`log_init`] to quickly print logs to stderr,
//! which also respects the `RUST_LOG` environment variable in the same
//! way as in [`env_logger`](https://docs.rs/env_logger/latest/env_logger/#enabling-logging).

pub mod co;

mod bar;
pub use bar::{
    Bar, BarBuilder, BarFormat, DEFAULT_ETA_ALPHA, DEFAULT_WIDTH, Decorator, Estimater,
    ProxyReader, Refill, Statistics, WidthSlot, WidthSync, bar, fill_bar, percentage,
};

mod signal;
pub use signal::{CompletionCounter, Signal};

mod fmt;
pub use fmt::display_width;

mod log_init;
pub use log_init::log_init;

mod misc;
pub use misc::best_effort_panic_info;
pub(crate) use misc::next_id;

// re-exports from libraries
pub use anyhow::{Context, Error, Ok, Result, bail};
pub use log::{debug, error, info, trace, warn};
