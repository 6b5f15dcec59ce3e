//! Process-wide tracing setup and the contract-violation macro.
//!
//! Severity ladder: `info!` < `warn!` < `error!` < [`fatal!`]. Verbose
//! logging (`debug!`/`trace!`) is gated per module through the standard
//! `RUST_LOG` environment filter.
//!
//! [`fatal!`]: crate::fatal

use tracing_subscriber::EnvFilter;

/// Install the default subscriber: stderr output, `RUST_LOG`-driven
/// filtering. Safe to call more than once; later calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Log at ERROR and terminate. For documented contract violations
/// (singular inversion, wrong channel count) — programmer errors, not
/// recoverable runtime conditions.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {{
        ::tracing::error!($($arg)*);
        panic!($($arg)*);
    }};
}
