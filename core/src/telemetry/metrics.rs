use std::sync::Mutex;

use serde::Serialize;

/// Counters the processing loop feeds and the status surface reads.
pub struct FrameMetrics {
    inner: Mutex<Counters>,
}

#[derive(Default, Clone, Copy)]
struct Counters {
    frames: usize,
    candidates: usize,
    last_seq: Option<u64>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub frames: usize,
    pub candidates: usize,
    pub last_seq: Option<u64>,
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
        }
    }

    /// Record one classified frame and how many candidates it carried.
    pub fn record_frame(&self, seq: u64, candidates: usize) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.frames += 1;
            counters.candidates += candidates;
            counters.last_seq = Some(seq);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(counters) = self.inner.lock() {
            MetricsSnapshot {
                frames: counters.frames,
                candidates: counters.candidates,
                last_seq: counters.last_seq,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_and_track_the_last_sequence() {
        let metrics = FrameMetrics::new();
        metrics.record_frame(3, 2);
        metrics.record_frame(4, 5);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames, 2);
        assert_eq!(snapshot.candidates, 7);
        assert_eq!(snapshot.last_seq, Some(4));
    }

    #[test]
    fn fresh_metrics_are_zeroed() {
        assert_eq!(FrameMetrics::new().snapshot(), MetricsSnapshot::default());
    }
}
