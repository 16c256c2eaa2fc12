//! Stream replay: decode, apply and report, one record at a time
//!
//! Malformed records and events the book refuses are logged and skipped.
//! Only a broken book invariant or an I/O failure stops the run.

use crate::analyzer::BookAnalyzer;
use crate::config::AnalyzerConfig;
use crate::decoder::decode_line;
use crate::events::{Direction, Emission};
use crate::metrics::{MetricsSnapshot, ProcessingMetrics};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Configuration for the replay engine
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Measure per-event processing time
    pub track_latency: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            track_latency: true,
        }
    }
}

/// Drives an analyzer over a line-oriented feed
#[derive(Debug)]
pub struct ReplayEngine {
    config: ReplayConfig,
    analyzer: BookAnalyzer,
    metrics: ProcessingMetrics,
}

impl ReplayEngine {
    /// Create a replay engine around a fresh analyzer
    #[must_use]
    pub fn new(analyzer_config: AnalyzerConfig, config: ReplayConfig) -> Self {
        Self {
            config,
            analyzer: BookAnalyzer::new(analyzer_config),
            metrics: ProcessingMetrics::new(),
        }
    }

    /// Process one record.
    ///
    /// Returns the report line it produced. Undecodable records and
    /// rejected events yield `Ok(None)`.
    pub fn process_line(&mut self, line_no: usize, line: &str) -> Result<Option<Emission>> {
        let event = match decode_line(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping undecodable record");
                self.metrics.record_decode_failure();
                return Ok(None);
            }
        };

        let started = self.config.track_latency.then(Instant::now);
        let applied = match self.analyzer.apply_event(&event) {
            Ok(applied) => applied,
            Err(e) if e.is_fatal() => {
                return Err(e).with_context(|| format!("book invariant broken at line {line_no}"));
            }
            Err(e) => {
                warn!(line = line_no, error = %e, "dropping event");
                self.metrics.record_rejected();
                return Ok(None);
            }
        };
        if let Some(started) = started {
            self.metrics.record_latency(started.elapsed());
        }

        self.metrics.record_applied(&event, applied.transition);
        let direction = Direction::fed_by(applied.side);
        Ok(applied.transition.emission(event.timestamp(), direction))
    }

    /// Run over every record in `reader`, writing report lines to `writer`.
    pub fn run<R: BufRead, W: Write>(&mut self, mut reader: R, mut writer: W) -> Result<MetricsSnapshot> {
        let started = Instant::now();
        info!(target_size = self.analyzer.config().target_size(), "replay started");

        let mut buf = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("failed to read line {}", line_no + 1))?;
            if read == 0 {
                break;
            }
            line_no += 1;

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    warn!(line = line_no, error = %e, "skipping record that is not UTF-8");
                    self.metrics.record_decode_failure();
                    continue;
                }
            };
            if line.trim().is_empty() {
                debug!(line = line_no, "blank line");
                continue;
            }
            if let Some(emission) = self.process_line(line_no, line)? {
                writeln!(writer, "{emission}").context("failed to write report line")?;
            }
        }
        writer.flush().context("failed to flush report")?;

        let snapshot = self.metrics.snapshot(started.elapsed());
        info!(
            applied = snapshot.events_applied(),
            emissions = snapshot.emissions(),
            rejected = snapshot.events_rejected,
            undecodable = snapshot.decode_failures,
            elapsed = ?snapshot.elapsed,
            "replay finished"
        );
        Ok(snapshot)
    }

    /// Analyzer state
    #[inline]
    #[must_use]
    pub const fn analyzer(&self) -> &BookAnalyzer {
        &self.analyzer
    }
}
