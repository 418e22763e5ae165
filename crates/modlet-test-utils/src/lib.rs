//! Shared test utilities for the modlet workspace.
//!
//! This crate provides a [`Workspace`] fixture: a temporary search root
//! with helpers for writing provider lists, modlet documents,
//! transformation programs and the platform override file. It is a
//! dev-dependency only — never published.

pub mod workspace;

pub use workspace::Workspace;

/// Initialise a `tracing` subscriber for a test run, honoring
/// `RUST_LOG`. Repeated calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
