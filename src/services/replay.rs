//! Offline replay of recorded violation events.
//!
//! Feeds a JSON-lines event log through a tracker whose clock follows the
//! events' own `detected_at` timestamps, so a day of detector output can be
//! re-evaluated in milliseconds with exactly the decisions production would
//! have made.
//!
//! The clock only moves forward: an event stamped earlier than its
//! predecessor, or carrying no timestamp, is evaluated at the predecessor's
//! instant.

use crate::models::{ViolationCategory, ViolationEvent};
use crate::services::deduplication::{
    Clock, DeduplicationConfig, DeduplicationService, ManualClock,
};
use crate::{Error, Result};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

/// Decision for one replayed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayDecision {
    /// 1-based line number in the input.
    pub line: usize,
    /// Violation classification.
    pub category: ViolationCategory,
    /// Subject as given in the input.
    pub subject_name: String,
    /// Location as given in the input.
    pub location: String,
    /// Whether the alert would have been sent.
    pub allowed: bool,
    /// Remaining suppression time for duplicates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
}

/// Totals for a replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Events processed.
    pub total: usize,
    /// Events that would have been sent.
    pub allowed: usize,
    /// Events suppressed as duplicates.
    pub suppressed: usize,
}

/// Replay state: a sweep-less service driven by a manual clock.
#[derive(Debug)]
pub struct ReplaySession {
    service: DeduplicationService,
    clock: ManualClock,
    summary: ReplaySummary,
}

impl ReplaySession {
    /// Creates a session with `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: DeduplicationConfig) -> Result<Self> {
        let clock = ManualClock::new(0);
        let service = DeduplicationService::without_sweeper(config, Arc::new(clock.clone()))?;

        Ok(Self {
            service,
            clock,
            summary: ReplaySummary::default(),
        })
    }

    /// Evaluates one event read from input line `line`.
    pub fn process(&mut self, line: usize, event: &ViolationEvent) -> ReplayDecision {
        if let Some(detected_at) = event.detected_at {
            let at = u64::try_from(detected_at.timestamp_millis()).unwrap_or(0);
            if at > self.clock.now_millis() {
                self.clock.set(at);
            }
        }

        let window = event
            .window_secs
            .map_or(self.service.config().default_window, Duration::from_secs);
        let decision = self.service.check_within(
            event.category,
            &event.subject_name,
            &event.location,
            window,
        );

        self.summary.total += 1;
        if decision.is_allowed() {
            self.summary.allowed += 1;
        } else {
            self.summary.suppressed += 1;
        }

        ReplayDecision {
            line,
            category: event.category,
            subject_name: event.subject_name.clone(),
            location: event.location.clone(),
            allowed: decision.is_allowed(),
            retry_after_ms: decision
                .retry_after()
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    /// Returns the totals so far.
    #[must_use]
    pub const fn summary(&self) -> ReplaySummary {
        self.summary
    }
}

/// Replays every JSON-lines event from `reader`, writing one JSON decision
/// per event to `writer`.
///
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] naming the line number of the first
/// malformed event, or [`Error::OperationFailed`] on I/O failure.
pub fn replay_lines<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    config: DeduplicationConfig,
) -> Result<ReplaySummary> {
    let mut session = ReplaySession::new(config)?;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| io_error("read_replay_input", &e))?;
        if line.trim().is_empty() {
            continue;
        }

        let event: ViolationEvent = serde_json::from_str(&line)
            .map_err(|e| Error::InvalidInput(format!("line {line_no}: {e}")))?;

        let decision = session.process(line_no, &event);

        serde_json::to_writer(&mut writer, &decision)
            .map_err(|e| Error::OperationFailed {
                operation: "write_replay_output".to_string(),
                cause: e.to_string(),
            })?;
        writeln!(writer).map_err(|e| io_error("write_replay_output", &e))?;
    }

    writer
        .flush()
        .map_err(|e| io_error("flush_replay_output", &e))?;

    let summary = session.summary();
    tracing::info!(
        total = summary.total,
        allowed = summary.allowed,
        suppressed = summary.suppressed,
        "Replay finished"
    );

    Ok(summary)
}

fn io_error(operation: &str, e: &std::io::Error) -> Error {
    Error::OperationFailed {
        operation: operation.to_string(),
        cause: e.to_string(),
    }
}
