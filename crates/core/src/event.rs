use crate::metric::MetricKind;

/// All messages (events) that can flow through the application event bus.
///
/// Sources:
/// - Sampling worker       → `SamplesUpdated`
/// - Config watcher task   → `ConfigReloaded`
/// - Window host           → `Shutdown`
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ── Sampling ──────────────────────────────────────────────────────────────
    /// New readings were pushed for these kinds; their graphs are stale.
    SamplesUpdated(Vec<MetricKind>),

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk; triggers a live reload.
    ConfigReloaded,

    // ── Internal ──────────────────────────────────────────────────────────────
    /// Graceful shutdown requested.
    Shutdown,
}
