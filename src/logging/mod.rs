//! Console and log file output.
//!
//! Everything is routed through [`tracing`]: [`init_subscriber`] installs a
//! console formatter and a per-command log file, and [`Logger`] wraps the
//! macros and collects per-template outcomes for the closing summary.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{FileEntry, FileStatus};

/// Serializes `XDG_CACHE_HOME` changes across test threads.
#[cfg(test)]
static TEST_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Run `f` with `XDG_CACHE_HOME` pointing at `dir`.
#[cfg(test)]
#[allow(unsafe_code)]
fn with_cache_home<T>(dir: &std::path::Path, f: impl FnOnce() -> T) -> T {
    let _lock = TEST_ENV_MUTEX
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    // SAFETY: Protected by TEST_ENV_MUTEX; restored before the lock is released.
    unsafe {
        std::env::set_var("XDG_CACHE_HOME", dir);
    }
    let out = f();
    // SAFETY: as above.
    unsafe {
        std::env::remove_var("XDG_CACHE_HOME");
    }
    out
}

/// A [`Logger`] whose events reach a log file in a fresh temporary cache
/// directory, through a subscriber scoped to the current thread.
///
/// Keep the guard alive for the duration of the test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};

    let tmp = tempfile::tempdir().expect("create cache dir");
    let (layer, log) = with_cache_home(tmp.path(), || {
        (subscriber::FileLayer::new("test"), Logger::new("test"))
    });
    let layer = layer.expect("create log file");
    let dispatch =
        tracing::Dispatch::new(tracing_subscriber::registry().with(layer.with_filter(LevelFilter::DEBUG)));
    (log, tmp, tracing::dispatcher::set_default(&dispatch))
}
