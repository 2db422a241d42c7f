use glam::Vec2;

use super::brush_pool::BrushPool;

/// Per-axis movement a pointer must exceed before a brush is stamped
pub const DEFAULT_THRESHOLD: f32 = 4.0;

/// Samples the pointer in surface-centered, y-up coordinates and stamps
/// brushes into the pool when it has moved far enough
#[derive(Debug, Clone)]
pub struct PointerTracker {
    current: Vec2,
    previous: Vec2,
    cursor: usize,
    threshold: f32,
    half_extent: Vec2,
}

impl PointerTracker {
    /// `width` and `height` are the surface size in logical pixels
    pub fn new(width: f32, height: f32, threshold: f32) -> Self {
        Self {
            current: Vec2::ZERO,
            previous: Vec2::ZERO,
            cursor: 0,
            threshold,
            half_extent: Self::half_extent_of(width, height),
        }
    }

    fn half_extent_of(width: f32, height: f32) -> Vec2 {
        Vec2::new(width, height) * 0.5
    }

    /// Track a new logical surface size; later samples are centered on it
    pub fn set_surface_size(&mut self, width: f32, height: f32) {
        self.half_extent = Self::half_extent_of(width, height);
    }

    /// Record a pointer position in logical window pixels (origin top-left, y down)
    pub fn sample(&mut self, client_x: f32, client_y: f32) {
        self.current = Vec2::new(
            client_x - self.half_extent.x,
            self.half_extent.y - client_y,
        );
    }

    /// Compare the current sample against the last examined one and stamp a
    /// brush if either axis moved beyond the threshold.
    ///
    /// Returns the slot that was activated, if any. The previous sample is
    /// always replaced by the current one.
    pub fn step(&mut self, pool: &mut BrushPool) -> Option<usize> {
        let activated = if self.exceeds_threshold() {
            let slot = self.cursor % pool.len();
            match pool.activate(self.current, slot) {
                Ok(()) => {
                    self.cursor = (slot + 1) % pool.len();
                    Some(slot)
                }
                Err(e) => {
                    log::warn!("pointer activation skipped: {}", e);
                    None
                }
            }
        } else {
            None
        };

        self.previous = self.current;
        activated
    }

    fn exceeds_threshold(&self) -> bool {
        let delta = (self.current - self.previous).abs();
        delta.x > self.threshold || delta.y > self.threshold
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    pub fn previous(&self) -> Vec2 {
        self.previous
    }

    /// Slot the next activation will land in
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}
