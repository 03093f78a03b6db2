//! Shared tracing bootstrap for ringmend hosts

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Install a fmt subscriber honoring `RUST_LOG`, falling back to the
/// given default directive. Safe to call more than once; only the
/// first call installs a subscriber.
pub fn init(default_directive: &str) {
    let directive = default_directive.to_string();
    INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(directive));
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
