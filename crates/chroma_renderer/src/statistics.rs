//! Render statistics.
//!
//! Counters are atomics so front ends can poll them while a pass runs
//! without touching the renderer lock.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

/// Outcome of one completed pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassReport {
    /// 1-based pass index since the last flush
    pub frame_index: u64,
    pub rays: u64,
    pub duration: Duration,
    /// Mean absolute per-channel change, when tracked
    pub l1_norm: Option<f32>,
}

#[derive(Debug, Default)]
pub struct Statistics {
    frames: AtomicU64,
    rays: AtomicU64,
    last_pass_nanos: AtomicU64,
    total_nanos: AtomicU64,
    /// f32 bits; NaN means not tracked
    l1_norm: AtomicU32,
}

impl Statistics {
    pub fn new() -> Self {
        let stats = Self::default();
        stats.reset();
        stats
    }

    pub fn reset(&self) {
        self.frames.store(0, Ordering::Relaxed);
        self.rays.store(0, Ordering::Relaxed);
        self.last_pass_nanos.store(0, Ordering::Relaxed);
        self.total_nanos.store(0, Ordering::Relaxed);
        self.l1_norm.store(f32::NAN.to_bits(), Ordering::Relaxed);
    }

    pub fn record(&self, report: &PassReport) {
        let nanos = u64::try_from(report.duration.as_nanos()).unwrap_or(u64::MAX);
        self.rays.fetch_add(report.rays, Ordering::Relaxed);
        self.last_pass_nanos.store(nanos, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.l1_norm
            .store(report.l1_norm.unwrap_or(f32::NAN).to_bits(), Ordering::Relaxed);
        // Published last so a reader that sees the new frame count also
        // sees the counters of that frame
        self.frames.fetch_add(1, Ordering::Release);
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        let frames = self.frames();
        let l1_norm = f32::from_bits(self.l1_norm.load(Ordering::Relaxed));
        StatisticsSnapshot {
            frames,
            rays: self.rays.load(Ordering::Relaxed),
            last_pass: Duration::from_nanos(self.last_pass_nanos.load(Ordering::Relaxed)),
            total_time: Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed)),
            l1_norm: (!l1_norm.is_nan()).then_some(l1_norm),
        }
    }
}

/// Point-in-time copy of the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatisticsSnapshot {
    /// Passes since the last reset
    pub frames: u64,
    pub rays: u64,
    pub last_pass: Duration,
    pub total_time: Duration,
    pub l1_norm: Option<f32>,
}

impl StatisticsSnapshot {
    pub fn rays_per_second(&self) -> f64 {
        let seconds = self.total_time.as_secs_f64();
        if seconds > 0.0 {
            self.rays as f64 / seconds
        } else {
            0.0
        }
    }

    /// Frames per second of the most recent pass.
    pub fn fps(&self) -> f64 {
        let seconds = self.last_pass.as_secs_f64();
        if seconds > 0.0 {
            1.0 / seconds
        } else {
            0.0
        }
    }
}
