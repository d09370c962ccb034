//! Outcome counters for batch decoding.

use std::time::Duration;

/// How a single shot ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// Decoded, and the correction reproduces the syndrome.
    Converged { weight: usize },
    /// Odd-weight syndrome; no correction exists.
    Unresolvable,
    /// Decoded, but the correction's syndrome differs from the input.
    Inconsistent,
    /// The decoder reported an internal invariant violation.
    Failed,
}

/// Per-outcome shot counts.
///
/// Built with `fold`/`reduce` across rayon workers, so recording and
/// merging both consume and return the value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub converged: usize,
    pub unresolvable: usize,
    pub inconsistent: usize,
    pub failed: usize,
    pub total_weight: usize,
}

impl BatchStats {
    pub fn record(mut self, outcome: ShotOutcome) -> Self {
        match outcome {
            ShotOutcome::Converged { weight } => {
                self.converged += 1;
                self.total_weight += weight;
            }
            ShotOutcome::Unresolvable => self.unresolvable += 1,
            ShotOutcome::Inconsistent => self.inconsistent += 1,
            ShotOutcome::Failed => self.failed += 1,
        }
        self
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            converged: self.converged + other.converged,
            unresolvable: self.unresolvable + other.unresolvable,
            inconsistent: self.inconsistent + other.inconsistent,
            failed: self.failed + other.failed,
            total_weight: self.total_weight + other.total_weight,
        }
    }

    pub fn total(&self) -> usize {
        self.converged + self.unresolvable + self.inconsistent + self.failed
    }

    /// Mean correction weight over converged shots.
    pub fn mean_weight(&self) -> f64 {
        if self.converged == 0 {
            0.0
        } else {
            self.total_weight as f64 / self.converged as f64
        }
    }

    pub fn print_report(&self, elapsed: Duration) {
        let seconds = elapsed.as_secs_f64();
        println!("Results");
        println!("Time: {:.4} s", seconds);
        if seconds > 0.0 {
            println!("Throughput: {:.2} shots/s", self.total() as f64 / seconds);
        }
        println!("Converged: {}/{}", self.converged, self.total());
        println!("Unresolvable: {}", self.unresolvable);
        println!("Inconsistent: {}", self.inconsistent);
        if self.failed > 0 {
            println!("Failed: {}", self.failed);
        }
        println!("Mean weight: {:.3}", self.mean_weight());
    }
}
