use glam::Mat4;

/// Per-frame inputs to the compositor
///
/// Built fresh by the driver every tick and handed to the renderer by
/// reference, in place of mutating shader uniforms between draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub number: u64,
    /// Animation time fed to the `time` uniform
    pub time: f32,
    pub delta: f32,
    /// Logical surface size as (width, height, 1, 1)
    pub resolution: [f32; 4],
    /// Camera and projection of the surface, mapping logical pixels to clip space
    pub view_projection: Mat4,
    /// How far the displacement map pushes base-texture lookups (in UV units)
    pub displacement_strength: f32,
}

impl FrameParams {
    pub fn new(
        number: u64,
        time: f32,
        delta: f32,
        resolution: [f32; 4],
        view_projection: Mat4,
        displacement_strength: f32,
    ) -> Self {
        Self {
            number,
            time,
            delta,
            resolution,
            view_projection,
            displacement_strength,
        }
    }
}
