//! Verbosity-gated logging macros for the compute pass.
//!
//! Nothing is formatted when the level is disabled.
//! Levels:
//! - 0: SILENT (nothing)
//! - 1: WARNINGS (pruned edges, cycles, solver fallback)
//! - 2: PASSES (one line per pass: ordering, strategy, extraction)
//! - 3: DEBUG (solver propagation sweeps and per-task timings)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_WARNINGS: u8 = 1;
pub const VERBOSITY_PASSES: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at WARNINGS level (verbosity >= 1).
///
/// Used for: recovered data-quality problems and strategy switches.
#[macro_export]
macro_rules! log_warn {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_WARNINGS {
            eprintln!("warning: {}", format_args!($($arg)*));
        }
    };
}

/// Log at PASSES level (verbosity >= 2).
#[macro_export]
macro_rules! log_passes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_PASSES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: solver internals, per-task forward/backward values.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_WARNINGS);
        assert!(VERBOSITY_WARNINGS < VERBOSITY_PASSES);
        assert!(VERBOSITY_PASSES < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_log_macros_compile() {
        let verbosity = VERBOSITY_SILENT;
        log_warn!(verbosity, "dropped {} edges", 2);
        log_passes!(verbosity, "pass {}", 1);
        log_debug!(verbosity, "sweep {}", 3);
    }
}
