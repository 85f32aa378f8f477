//! Render pass statistics.

use std::collections::VecDeque;

use web_time::Instant;

/// Fixed-capacity window of recent values (oldest evicted first).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity: capacity.max(1),
    }
  }

  pub fn push(&mut self, value: T) {
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl RollingWindow<u64> {
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.buffer.iter().sum::<u64>() as f64 / self.buffer.len() as f64
    }
  }

  pub fn max(&self) -> Option<u64> {
    self.buffer.iter().copied().max()
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(64)
  }
}

/// Counters of a single render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassRecord {
  /// Cells turned into primitives (persistent + active + hover).
  pub cells_drawn: usize,
  pub collections_submitted: usize,
  pub collections_removed: usize,
  pub duration_us: u64,
}

/// Accumulated statistics of a [`RenderDepthCache`](super::RenderDepthCache).
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
  /// Completed passes.
  pub passes: u64,
  /// Passes skipped because the backend was not ready.
  pub skipped_passes: u64,
  pub total_cells_drawn: u64,
  pub last_pass: PassRecord,
  /// Duration of recent passes in microseconds.
  pub pass_timings_us: RollingWindow<u64>,
}

impl RenderStats {
  pub fn record(&mut self, record: PassRecord) {
    self.passes += 1;
    self.total_cells_drawn += record.cells_drawn as u64;
    self.pass_timings_us.push(record.duration_us);
    self.last_pass = record;
  }

  pub fn record_skipped(&mut self) {
    self.skipped_passes += 1;
  }

  pub fn average_pass_us(&self) -> f64 {
    self.pass_timings_us.average()
  }
}

/// Wall-clock timer for one pass.
pub(crate) struct PassTimer(Instant);

impl PassTimer {
  pub(crate) fn start() -> Self {
    Self(Instant::now())
  }

  pub(crate) fn elapsed_us(&self) -> u64 {
    self.0.elapsed().as_micros() as u64
  }
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;
