//! Frame scheduling for the animation loop.
//!
//! [`AnimationControl`] is the start/stop switch of the loop. It is a shared
//! atomic flag, so a host thread holding a clone can pause the effect while
//! the event loop owns everything else. [`FrameClock`] counts frames and keeps
//! a smoothed FPS figure for the window title.
//!
//! ```ignore
//! let sim = Simulation::new().with_text("PAUSE ME");
//! let control = sim.control();
//! std::thread::spawn(move || {
//!     std::thread::sleep(Duration::from_secs(5));
//!     control.stop();
//! });
//! sim.run()?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared start/stop switch for the animation loop.
///
/// While stopped no ticks run, so particles freeze and the trail overlay
/// stops fading the last frame.
#[derive(Debug, Clone)]
pub struct AnimationControl {
    running: Arc<AtomicBool>,
}

impl AnimationControl {
    /// A running control.
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::Release);
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Flip the state, returning whether the loop is now running.
    pub fn toggle(&self) -> bool {
        !self.running.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Default for AnimationControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame counter with a periodically refreshed FPS estimate.
#[derive(Debug)]
pub struct FrameClock {
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Record a frame. Returns `true` when the FPS estimate was refreshed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> bool {
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return true;
        }
        false
    }

    /// Forget the time spent paused so it does not count against the FPS.
    pub fn resume(&mut self) {
        let now = Instant::now();
        self.fps_update_time = now;
        self.fps_frame_count = self.frame_count;
    }

    /// Frames recorded so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
