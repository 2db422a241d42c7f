use crate::core::brush_pool::BrushPool;
use crate::core::frame::FrameParams;

/// Two-pass frame renderer driven by the animation loop
pub trait FrameRenderer {
    type Error;

    /// Allocate per-pool resources. Called once, when the sketch starts running.
    fn prepare(&mut self, pool: &BrushPool) -> Result<(), Self::Error>;

    /// Draw the pool into the displacement target, then composite it onscreen
    fn render_frame(&mut self, params: &FrameParams, pool: &BrushPool) -> Result<(), Self::Error>;

    /// Resize the surface and any size-dependent targets
    fn resize(&mut self, width: u32, height: u32);
}
