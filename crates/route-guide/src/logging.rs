//! Logging initialisation
//!
//! Installs a `fmt` layer filtered by `RUST_LOG`. When `RUST_LOG` is unset a
//! default is chosen per build profile. With the `profiling` feature the
//! `profiling` crate emits its scopes as tracing spans, so they show up in
//! the same output at trace level.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter for debug builds
const DEBUG_FILTER: &str = "debug";

/// Default filter for release builds
const RELEASE_FILTER: &str = "info,route_guide_lib=info";

/// Filter used when `RUST_LOG` is unset
pub fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        DEBUG_FILTER
    } else {
        RELEASE_FILTER
    }
}

/// Initialize logging once for the whole process
///
/// `verbose` raises the default to `debug` even in release builds; an explicit
/// `RUST_LOG` always wins.
pub fn setup_logging(verbose: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(if verbose {
            DEBUG_FILTER
        } else {
            default_filter()
        }),
    };

    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_filter(filter);
    let registry = tracing_subscriber::registry().with(fmt_layer);
    if registry.try_init().is_err() {
        tracing::debug!("Logging already initialized");
        return;
    }

    #[cfg(feature = "profiling")]
    tracing::info!("Logging initialized (profiling scopes enabled)");
    #[cfg(not(feature = "profiling"))]
    tracing::debug!("Logging initialized (profiling disabled in this build)");
}
