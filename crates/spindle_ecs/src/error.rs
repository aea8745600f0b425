// error.rs - Two-tier failure reporting
//
// Expected negative outcomes (absent components, no-op removals) are plain
// `bool` returns on the storage types. Contract violations are caller bugs,
// not runtime conditions: they are fatal and routed through a process-wide
// handler that the integrating application may replace.

use once_cell::sync::Lazy;
use std::sync::RwLock;
use thiserror::Error;

/// Errors that can occur while constructing a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Capacities below 2 cannot hold both the sentinel slot and a usable id.
    #[error("registry capacity must be at least 2, got {requested}")]
    CapacityTooSmall { requested: usize },

    /// The sentinel `max_entities - 1` must be representable as an
    /// [`EntityId`](crate::EntityId).
    #[error("registry capacity {requested} exceeds the entity id range")]
    CapacityOverflow { requested: usize },
}

/// Handler invoked on contract violations. Must not return.
pub type FatalHandler = fn(&str) -> !;

fn default_fatal(message: &str) -> ! {
    panic!("{message}");
}

static FATAL_HANDLER: Lazy<RwLock<FatalHandler>> =
    Lazy::new(|| RwLock::new(default_fatal as FatalHandler));

/// Replace the process-wide contract-violation handler.
///
/// The default handler panics. An application that terminates through its
/// own fatal-error path (crash reporting, custom abort) installs it here
/// once at startup.
pub fn set_fatal_handler(handler: FatalHandler) {
    *FATAL_HANDLER.write().unwrap() = handler;
}

/// Report a contract violation through the installed handler.
pub(crate) fn fatal(message: &str) -> ! {
    let handler = *FATAL_HANDLER.read().unwrap();
    handler(message)
}

/// Check a caller contract, reporting through the fatal handler on failure.
macro_rules! contract {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::error::fatal(&format!($($arg)+));
        }
    };
}

pub(crate) use contract;
