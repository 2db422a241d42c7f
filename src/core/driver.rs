use std::fmt;

use super::brush_pool::{BrushPool, PoolError};
use super::clock::AnimationClock;
use super::frame::FrameParams;
use super::pointer::PointerTracker;
use super::surface::SurfaceManager;
use crate::config::SketchConfig;
use crate::traits::{FrameRenderer, WindowContext};

const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Views the sketch can be navigated to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Route {
    #[default]
    Home,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
        }
    }
}

/// Lifecycle of the sketch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Constructed, objects not built yet
    Uninitialized,
    /// Objects built, frames are being produced
    Running,
    /// Loop halted; terminal
    Stopped,
}

#[derive(Debug)]
pub enum StartError<E> {
    Pool(PoolError),
    Renderer(E),
}

impl<E: fmt::Display> fmt::Display for StartError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::Pool(e) => write!(f, "failed to build brush pool: {}", e),
            StartError::Renderer(e) => write!(f, "failed to prepare renderer: {}", e),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for StartError<E> {}

/// Frames-per-second tally, reported once per interval
#[derive(Debug, Default, Clone, Copy)]
struct FpsCounter {
    frame_count: u32,
    timer: f32,
}

impl FpsCounter {
    fn record(&mut self, delta: f32) -> Option<f32> {
        self.frame_count += 1;
        self.timer += delta;

        if self.timer >= FPS_UPDATE_INTERVAL {
            let fps = self.frame_count as f32 / self.timer;
            self.frame_count = 0;
            self.timer = 0.0;
            Some(fps)
        } else {
            None
        }
    }
}

/// Per-frame loop tying pointer input, the brush pool, and the renderer together
///
/// Each tick runs pointer step, clock advance, render, decay, then asks the
/// host window for the next frame. Ticks outside `Running` do nothing and do
/// not reschedule.
pub struct AnimationDriver<R: FrameRenderer> {
    state: DriverState,
    config: SketchConfig,
    surface: SurfaceManager,
    tracker: PointerTracker,
    clock: AnimationClock,
    pool: Option<BrushPool>,
    renderer: R,
    frame_number: u64,
    fps: FpsCounter,
}

impl<R: FrameRenderer> AnimationDriver<R> {
    pub fn new(config: SketchConfig, surface: SurfaceManager, renderer: R) -> Self {
        let logical = surface.logical_size();
        let tracker = PointerTracker::new(logical.x, logical.y, config.pointer_threshold);
        let clock = AnimationClock::new(config.time_mode);

        Self {
            state: DriverState::Uninitialized,
            config,
            surface,
            tracker,
            clock,
            pool: None,
            renderer,
            frame_number: 0,
            fps: FpsCounter::default(),
        }
    }

    /// Navigate to `route`. The first navigation builds the brush pool and
    /// GPU objects and starts the loop; later ones leave them untouched.
    pub fn go_to(&mut self, route: Route) -> Result<(), StartError<R::Error>> {
        match self.state {
            DriverState::Stopped => {
                log::warn!("navigation to {} ignored: sketch is stopped", route.path());
                return Ok(());
            }
            DriverState::Running => {
                log::debug!("navigation to {}: already running", route.path());
                return Ok(());
            }
            DriverState::Uninitialized => {}
        }

        match route {
            Route::Home => self.add_objects()?,
        }

        self.state = DriverState::Running;
        log::info!(
            "sketch running at {}x{} with {} brushes",
            self.surface.width(),
            self.surface.height(),
            self.config.brush.pool_size
        );
        Ok(())
    }

    fn add_objects(&mut self) -> Result<(), StartError<R::Error>> {
        let pool = BrushPool::with_seed(self.config.brush, self.config.seed).map_err(StartError::Pool)?;
        self.renderer.prepare(&pool).map_err(StartError::Renderer)?;
        self.pool = Some(pool);
        Ok(())
    }

    /// Run one frame. Returns the parameters rendered with, or `None` when
    /// the sketch is not running.
    ///
    /// On a render error the decay step and rescheduling are skipped; the
    /// host decides whether to recover or stop.
    pub fn tick(
        &mut self,
        delta: f32,
        scheduler: &dyn WindowContext,
    ) -> Result<Option<FrameParams>, R::Error> {
        if self.state != DriverState::Running {
            return Ok(None);
        }
        let Some(pool) = self.pool.as_mut() else {
            return Ok(None);
        };

        self.tracker.step(pool);

        let time = self.clock.advance(delta);
        let params = FrameParams::new(
            self.frame_number,
            time,
            delta,
            self.surface.resolution(),
            self.surface.projection().view_projection(),
            self.config.displacement_strength,
        );

        self.renderer.render_frame(&params, pool)?;
        pool.decay_step();
        self.frame_number += 1;

        if let Some(fps) = self.fps.record(delta) {
            log::debug!("FPS: {:.1}, {} brushes visible", fps, pool.visible_count());
        }

        scheduler.request_redraw();
        Ok(Some(params))
    }

    /// Halt the loop. Later ticks and navigations are ignored.
    pub fn stop(&mut self) {
        if self.state != DriverState::Stopped {
            log::info!("sketch stopped after {} frames", self.frame_number);
        }
        self.state = DriverState::Stopped;
    }

    /// Record a pointer position in physical window pixels
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let logical = self.surface.to_logical(x, y);
        self.tracker.sample(logical.x, logical.y);
    }

    /// Adopt a new physical surface size. Returns true if anything was resized.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.surface.resize_to(width, height) {
            return false;
        }
        self.sync_surface();
        true
    }

    /// Adopt a new scale factor; the drawing buffer keeps its physical size
    /// while the logical extent and projection follow the new scale.
    pub fn set_scale_factor(&mut self, scale_factor: f64) -> bool {
        if !self.surface.set_scale_factor(scale_factor as f32) {
            return false;
        }
        self.sync_surface();
        true
    }

    /// Re-measure the container (size and scale factor) and resize to it
    pub fn resize_to_container(&mut self, container: &dyn WindowContext) -> bool {
        if !self.surface.resize(container) {
            return false;
        }
        self.sync_surface();
        true
    }

    fn sync_surface(&mut self) {
        let logical = self.surface.logical_size();
        self.tracker.set_surface_size(logical.x, logical.y);
        self.renderer.resize(self.surface.width(), self.surface.height());
    }

    /// Rebuild size-dependent render state at the current size
    pub fn reconfigure(&mut self) {
        self.renderer.resize(self.surface.width(), self.surface.height());
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn pool(&self) -> Option<&BrushPool> {
        self.pool.as_ref()
    }

    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub fn surface(&self) -> &SurfaceManager {
        &self.surface
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::default(), Route::Home);
    }

    #[test]
    fn test_fps_counter_reports_once_per_interval() {
        let mut fps = FpsCounter::default();
        assert_eq!(fps.record(0.25), None);
        assert_eq!(fps.record(0.25), None);
        assert_eq!(fps.record(0.25), None);
        assert_eq!(fps.record(0.25), Some(4.0));
        assert_eq!(fps.record(0.25), None);
    }
}
