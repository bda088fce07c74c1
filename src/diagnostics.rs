//! Timing and report structures emitted by the generator tools.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

/// Timing entry describing a single stage of sample generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one sample or a whole batch.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Record the time since `start` under `label` and return a fresh start.
    pub fn lap(&mut self, label: impl Into<String>, start: Instant) -> Instant {
        self.push(label, elapsed_ms(start));
        Instant::now()
    }

    /// Add every stage of `other` into the matching stage here, appending
    /// labels seen for the first time.
    pub fn accumulate(&mut self, other: &TimingBreakdown) {
        self.total_ms += other.total_ms;
        for stage in &other.stages {
            match self.stages.iter_mut().find(|s| s.label == stage.label) {
                Some(existing) => existing.elapsed_ms += stage.elapsed_ms,
                None => self.stages.push(stage.clone()),
            }
        }
    }
}

#[inline]
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Outcome of one generated sample.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleReport {
    pub background: PathBuf,
    pub image: PathBuf,
    pub label: PathBuf,
    pub boxes: usize,
    /// Placements dropped because no text color passed the heuristic.
    pub skipped_colors: usize,
    pub timing: TimingBreakdown,
}

/// Summary written at the end of a batch run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub seed: u64,
    pub backgrounds: usize,
    pub total_boxes: usize,
    pub samples: Vec<SampleReport>,
    /// Stage times summed over samples; `total_ms` is wall time.
    pub timing: TimingBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_merges_by_label() {
        let mut a = TimingBreakdown::with_total(2.0);
        a.push("integral", 1.0);
        let mut b = TimingBreakdown::with_total(3.0);
        b.push("integral", 0.5);
        b.push("render", 2.0);
        a.accumulate(&b);
        assert_eq!(a.total_ms, 5.0);
        assert_eq!(a.stages.len(), 2);
        assert_eq!(a.stages[0].elapsed_ms, 1.5);
        assert_eq!(a.stages[1].label, "render");
    }

    #[test]
    fn stage_timing_uses_camel_case() {
        let json = serde_json::to_value(StageTiming::new("placement", 1.25)).unwrap();
        assert_eq!(json["elapsedMs"], 1.25);
    }
}
