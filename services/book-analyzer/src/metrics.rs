//! Processing metrics and latency tracking
//!
//! Counts what happened to every input record and keeps an HDR histogram
//! of per-event processing time.

use crate::events::OrderEvent;
use crate::tradability::Transition;
use hdrhistogram::Histogram;
use std::fmt::Write as _;
use std::time::Duration;
use tracing::warn;

/// Counters for one processing run
#[derive(Debug)]
pub struct ProcessingMetrics {
    adds_applied: u64,
    reduces_applied: u64,
    events_rejected: u64,
    decode_failures: u64,
    priced_emissions: u64,
    na_emissions: u64,
    suppressed_repricings: u64,
    latency: LatencyTracker,
}

impl Default for ProcessingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingMetrics {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self {
            adds_applied: 0,
            reduces_applied: 0,
            events_rejected: 0,
            decode_failures: 0,
            priced_emissions: 0,
            na_emissions: 0,
            suppressed_repricings: 0,
            latency: LatencyTracker::new(),
        }
    }

    /// Record an event that was applied to the book
    #[inline]
    pub fn record_applied(&mut self, event: &OrderEvent, transition: Transition) {
        match event {
            OrderEvent::Add { .. } => self.adds_applied += 1,
            OrderEvent::Reduce { .. } => self.reduces_applied += 1,
        }
        match transition {
            Transition::Opened(_) | Transition::Repriced(_) => self.priced_emissions += 1,
            Transition::Closed => self.na_emissions += 1,
            Transition::Suppressed => self.suppressed_repricings += 1,
            Transition::Idle => {}
        }
    }

    /// Record an event the book refused
    #[inline]
    pub fn record_rejected(&mut self) {
        self.events_rejected += 1;
    }

    /// Record a record that could not be decoded
    #[inline]
    pub fn record_decode_failure(&mut self) {
        self.decode_failures += 1;
    }

    /// Record processing time of one event
    #[inline]
    pub fn record_latency(&mut self, elapsed: Duration) {
        self.latency.record(elapsed);
    }

    /// Snapshot the counters; `elapsed` is the wall time of the run
    #[must_use]
    pub fn snapshot(&self, elapsed: Duration) -> MetricsSnapshot {
        MetricsSnapshot {
            adds_applied: self.adds_applied,
            reduces_applied: self.reduces_applied,
            events_rejected: self.events_rejected,
            decode_failures: self.decode_failures,
            priced_emissions: self.priced_emissions,
            na_emissions: self.na_emissions,
            suppressed_repricings: self.suppressed_repricings,
            latency: self.latency.stats(),
            elapsed,
        }
    }
}

/// Per-event latency histogram in nanoseconds
pub struct LatencyTracker {
    histogram: Histogram<u64>,
    /// Samples the histogram refused
    dropped: u64,
}

impl std::fmt::Debug for LatencyTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatencyTracker")
            .field("samples", &self.histogram.len())
            .field("dropped", &self.dropped)
            .finish()
    }
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LatencyTracker {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        // 3 significant figures keeps 0.1% resolution; the histogram
        // auto-resizes as slower samples arrive
        let histogram = Histogram::new(3).unwrap_or_else(|e| {
            warn!(error = %e, "latency histogram unavailable at 3 sigfigs, falling back");
            Histogram::new(2).unwrap_or_else(|_| Histogram::new(1).unwrap_or_default())
        });
        Self {
            histogram,
            dropped: 0,
        }
    }

    /// Record one sample
    #[inline]
    pub fn record(&mut self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        if self.histogram.record(nanos).is_err() {
            self.dropped += 1;
        }
    }

    /// Samples that could not be recorded
    #[inline]
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Current statistics, `None` before the first sample
    #[must_use]
    pub fn stats(&self) -> Option<LatencyStats> {
        let h = &self.histogram;
        if h.is_empty() {
            return None;
        }
        Some(LatencyStats {
            count: h.len(),
            min: h.min(),
            max: h.max(),
            mean: h.mean() as u64,
            p50: h.value_at_quantile(0.50),
            p90: h.value_at_quantile(0.90),
            p99: h.value_at_quantile(0.99),
            p999: h.value_at_quantile(0.999),
            dropped: self.dropped,
        })
    }
}

/// Latency statistics in nanoseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyStats {
    /// Samples recorded
    pub count: u64,
    /// Fastest event
    pub min: u64,
    /// Slowest event
    pub max: u64,
    /// Mean
    pub mean: u64,
    /// Median
    pub p50: u64,
    /// 90th percentile
    pub p90: u64,
    /// 99th percentile
    pub p99: u64,
    /// 99.9th percentile
    pub p999: u64,
    /// Samples the histogram refused
    pub dropped: u64,
}

/// Point-in-time view of a run
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    /// Adds applied to the book
    pub adds_applied: u64,
    /// Reduces applied to the book
    pub reduces_applied: u64,
    /// Duplicate adds and reduces of unknown ids
    pub events_rejected: u64,
    /// Records that failed to decode
    pub decode_failures: u64,
    /// Priced report lines
    pub priced_emissions: u64,
    /// `NA` report lines
    pub na_emissions: u64,
    /// Re-pricings that matched the last reported total
    pub suppressed_repricings: u64,
    /// Per-event latency, if tracked
    pub latency: Option<LatencyStats>,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl MetricsSnapshot {
    /// Events applied to the book
    #[must_use]
    pub const fn events_applied(&self) -> u64 {
        self.adds_applied + self.reduces_applied
    }

    /// Report lines written
    #[must_use]
    pub const fn emissions(&self) -> u64 {
        self.priced_emissions + self.na_emissions
    }

    /// Format metrics as a report
    #[must_use]
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        let _ = writeln!(report, "=== Book Analyzer Metrics ===");
        let _ = writeln!(
            report,
            "Events: {} adds, {} reduces, {} rejected, {} undecodable",
            self.adds_applied, self.reduces_applied, self.events_rejected, self.decode_failures
        );
        let _ = writeln!(
            report,
            "Emissions: {} priced, {} NA, {} suppressed",
            self.priced_emissions, self.na_emissions, self.suppressed_repricings
        );
        if let Some(latency) = self.latency {
            let _ = writeln!(
                report,
                "Event latency (ns): p50: {}, p90: {}, p99: {}, p99.9: {}, max: {}",
                latency.p50, latency.p90, latency.p99, latency.p999, latency.max
            );
            if latency.dropped > 0 {
                let _ = writeln!(report, "Latency samples dropped: {}", latency.dropped);
            }
        }
        let _ = write!(report, "Execution took {:?}", self.elapsed);
        report
    }
}
