//! `gauge::co::` runtime that drives bar actors
//!
//! Every bar is served by one task on a shared background runtime, so bars
//! can be created and updated from plain synchronous code. The runtime is
//! created the first time a bar is spawned and lives for the rest of the
//! process.
//!
//! Blocking APIs in this crate (`increment`, `render`, `wait`, ...) park the
//! calling thread until the actor responds. They must not be called from
//! inside an async runtime; use the `co_*` variants there instead, otherwise
//! tokio will detect the blocking call and panic.
use std::sync::LazyLock;

use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

/// the multi-threaded, background runtime hosting the actors
static BACKGROUND_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    // actors only shuffle messages, one worker is enough
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("gauge-actor")
        .enable_all()
        .build()
        .expect("cannot create background tokio runtime")
});

/// the current-thread runtime used to block on futures from sync code
static RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("cannot create current-thread tokio runtime")
});

/// Spawn a task onto the background runtime
#[inline(always)]
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    BACKGROUND_RUNTIME.spawn(future)
}

/// Run a future to completion on the current thread.
///
/// Panics if called from inside an async runtime.
#[inline(always)]
pub fn block<F>(future: F) -> F::Output
where
    F: Future,
{
    RUNTIME.block_on(future)
}
