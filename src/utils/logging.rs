use std::str::FromStr;

use tracing::Level;

/// Installs the global `tracing` subscriber at `level` (`error` through
/// `trace`, case-insensitive). Unknown names fall back to `info`.
///
/// Repeated calls are no-ops, so tests may call this freely.
pub fn init(level: &str) {
    let max_level = Level::from_str(level.trim()).unwrap_or(Level::INFO);

    let _ = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(false)
        .try_init();
}
