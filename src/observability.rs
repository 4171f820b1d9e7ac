// In: src/observability.rs

//! Logging hooks for the combinator layer.
//!
//! The crate logs through the `log` facade only: best-of trial scores and
//! frame parsing diagnostics are emitted at debug level, and it is the
//! embedding application's job to install a logger. For ad-hoc debugging and
//! tests, `enable_verbose_logging` installs an `env_logger` that defaults to
//! debug verbosity (overridable through `RUST_LOG`).

/// Installs a default `env_logger` at debug verbosity. Safe to call more
/// than once; later calls are no-ops.
pub fn enable_verbose_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("debug"),
    )
    .is_test(true)
    .try_init();
}
