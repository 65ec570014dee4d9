//! Telemetry metric name constants.
//!
//! Centralised metric names for cache operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mimir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `lookup` — how a `get` was resolved: "exact" or "semantic"
//! - `partition` — storage partition touched: "exact" or "semantic"
//! - `operation` — scan kind: "semantic" (similarity search) or "scan"
//!   (`queries` / `prune`)

/// Total cache hits.
///
/// Labels: `lookup`.
pub const CACHE_HITS_TOTAL: &str = "mimir_cache_hits_total";

/// Total cache misses.
///
/// Labels: `lookup`.
pub const CACHE_MISSES_TOTAL: &str = "mimir_cache_misses_total";

/// Total entry files written.
///
/// Labels: `partition`.
pub const ENTRIES_WRITTEN_TOTAL: &str = "mimir_entries_written_total";

/// Total entry files deleted because their TTL had elapsed.
///
/// Labels: `partition`.
pub const ENTRIES_EXPIRED_TOTAL: &str = "mimir_entries_expired_total";

/// Duration of full partition scans in seconds.
///
/// Labels: `operation`.
pub const SCAN_DURATION_SECONDS: &str = "mimir_scan_duration_seconds";
