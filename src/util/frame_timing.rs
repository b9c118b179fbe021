//! Frame clock: per-frame elapsed time and the statistics the control
//! panel displays.

use web_time::{Duration, Instant};

/// Length of the window over which the displayed averages are computed.
pub const STATS_WINDOW: Duration = Duration::from_secs(1);

/// Snapshot of the displayed frame statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Frames per second averaged over the last full window.
    pub fps: f32,
    /// Mean frame time over the last full window, in milliseconds.
    pub frame_time_ms: f32,
    /// Exponentially smoothed instantaneous FPS.
    pub smoothed_fps: f32,
    /// Frames rendered since start.
    pub total_frames: u64,
}

/// Frame timer with windowed averages and an EMA for smooth display.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Timestamp of the previous tick; `None` until the first frame.
    last_frame: Option<Instant>,
    /// Frames counted in the current window.
    window_frames: u32,
    /// Time accumulated in the current window.
    window_elapsed: Duration,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    stats: FrameStats,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Timer that has not seen a frame yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: None,
            window_frames: 0,
            window_elapsed: Duration::ZERO,
            smoothing: 0.05,
            stats: FrameStats {
                smoothed_fps: 60.0,
                ..FrameStats::default()
            },
        }
    }

    /// Mark the start of a frame and return the seconds since the previous
    /// one. The first call returns zero.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_frame = Some(now);
        self.record(elapsed);
        elapsed.as_secs_f32()
    }

    /// Fold one frame of `elapsed` duration into the statistics.
    pub fn record(&mut self, elapsed: Duration) {
        self.stats.total_frames += 1;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.stats.smoothed_fps = self.stats.smoothed_fps
                * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }

        self.window_frames += 1;
        self.window_elapsed += elapsed;
        if self.window_elapsed >= STATS_WINDOW {
            let secs = self.window_elapsed.as_secs_f32();
            self.stats.fps = self.window_frames as f32 / secs;
            self.stats.frame_time_ms = secs * 1000.0 / self.window_frames as f32;
            log::trace!(
                "{:.1} fps, {:.2} ms/frame",
                self.stats.fps,
                self.stats.frame_time_ms
            );
            self.window_frames = 0;
            self.window_elapsed = Duration::ZERO;
        }
    }

    /// Current statistics.
    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Get the current FPS (windowed average).
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.stats.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut timing = FrameTiming::new();
        assert_eq!(timing.tick(), 0.0);
        assert_eq!(timing.stats().total_frames, 1);
    }

    #[test]
    fn averages_refresh_once_per_window() {
        let mut timing = FrameTiming::new();
        let frame = Duration::from_millis(20);
        for _ in 0..49 {
            timing.record(frame);
        }
        // 980 ms so far: window not complete.
        assert_eq!(timing.fps(), 0.0);
        timing.record(frame);
        assert!((timing.fps() - 50.0).abs() < 1e-3);
        assert!((timing.stats().frame_time_ms - 20.0).abs() < 1e-3);
    }

    #[test]
    fn smoothed_fps_moves_toward_instant_rate() {
        let mut timing = FrameTiming::new();
        for _ in 0..500 {
            timing.record(Duration::from_millis(10));
        }
        assert!((timing.stats().smoothed_fps - 100.0).abs() < 1.0);
    }
}
