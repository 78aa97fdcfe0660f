//! Tracing bootstrap for hosts embedding `livechart`.
//!
//! Setup stays explicit and opt-in: call [`init_default_tracing`] for a
//! compact stderr subscriber honoring `RUST_LOG`, or install your own
//! `tracing` subscriber and ignore this module.

/// Installs a default `tracing` subscriber when the `telemetry` feature is
/// enabled.
///
/// Returns `true` on success, `false` when the feature is disabled or a
/// global subscriber is already registered in this process.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
