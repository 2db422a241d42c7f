use glam::{Mat4, Vec2, Vec3};

use crate::traits::WindowContext;

pub const NEAR_PLANE: f32 = -1000.0;
pub const FAR_PLANE: f32 = 1000.0;
pub const CAMERA_Z: f32 = 2.0;

/// Orthographic view volume measured in logical pixels
///
/// The frustum height equals the logical surface height and its width
/// follows the aspect ratio, so one world unit covers one logical pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoProjection {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl OrthoProjection {
    pub fn for_size(width: u32, height: u32) -> Self {
        Self::for_extent(width as f32, height as f32)
    }

    pub fn for_extent(width: f32, height: f32) -> Self {
        let frustum_size = height;
        let aspect = width / height;
        let half_width = frustum_size * aspect / 2.0;
        let half_height = frustum_size / 2.0;

        Self {
            left: -half_width,
            right: half_width,
            top: half_height,
            bottom: -half_height,
            near: NEAR_PLANE,
            far: FAR_PLANE,
            aspect,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_Z), Vec3::ZERO, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Owns the drawing surface size and its projection
///
/// The drawing buffer is sized in physical pixels. World units, pointer
/// samples, and the projection are in logical pixels (physical / scale).
#[derive(Debug, Clone, Copy)]
pub struct SurfaceManager {
    width: u32,
    height: u32,
    scale_factor: f32,
    projection: OrthoProjection,
}

impl SurfaceManager {
    /// Measure `container` and build a projection matching it 1:1 in
    /// logical pixels.
    ///
    /// A container must exist; a zero-sized one is clamped to a single pixel.
    pub fn initialize(container: &dyn WindowContext) -> Self {
        let (width, height) = container.inner_size();
        if width == 0 || height == 0 {
            log::warn!("container reported {}x{}; clamping to 1x1", width, height);
        }
        Self::with_scale(width.max(1), height.max(1), container.scale_factor() as f32)
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        Self::with_scale(width, height, 1.0)
    }

    /// Physical size plus scale factor; non-positive scales fall back to 1
    pub fn with_scale(width: u32, height: u32, scale_factor: f32) -> Self {
        let scale_factor = Self::sanitize_scale(scale_factor);
        Self {
            width,
            height,
            scale_factor,
            projection: Self::projection_for(width, height, scale_factor),
        }
    }

    fn sanitize_scale(scale_factor: f32) -> f32 {
        if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            log::warn!("invalid scale factor {}; using 1.0", scale_factor);
            1.0
        }
    }

    fn projection_for(width: u32, height: u32, scale_factor: f32) -> OrthoProjection {
        OrthoProjection::for_extent(width as f32 / scale_factor, height as f32 / scale_factor)
    }

    /// Re-measure `container`. Returns true if anything changed.
    pub fn resize(&mut self, container: &dyn WindowContext) -> bool {
        let (width, height) = container.inner_size();
        let rescaled = self.set_scale_factor(container.scale_factor() as f32);
        self.resize_to(width, height) || rescaled
    }

    /// Adopt a new physical size. Zero dimensions are ignored and keep the
    /// old size.
    pub fn resize_to(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if width == self.width && height == self.height {
            return false;
        }

        self.width = width;
        self.height = height;
        self.projection = Self::projection_for(width, height, self.scale_factor);
        log::debug!("surface resized to {}x{} (aspect {:.3})", width, height, self.projection.aspect);
        true
    }

    /// Adopt a new scale factor. Returns true if it changed.
    pub fn set_scale_factor(&mut self, scale_factor: f32) -> bool {
        let scale_factor = Self::sanitize_scale(scale_factor);
        if scale_factor == self.scale_factor {
            return false;
        }

        self.scale_factor = scale_factor;
        self.projection = Self::projection_for(self.width, self.height, scale_factor);
        log::debug!("surface scale factor now {}", scale_factor);
        true
    }

    /// Physical width of the drawing buffer
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Physical height of the drawing buffer
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Surface size in logical pixels
    pub fn logical_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) / self.scale_factor
    }

    /// Convert a physical window position to logical pixels
    pub fn to_logical(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y) / self.scale_factor
    }

    pub fn aspect(&self) -> f32 {
        self.projection.aspect
    }

    pub fn projection(&self) -> &OrthoProjection {
        &self.projection
    }

    /// Logical surface size packed for the `resolution` shader uniform
    pub fn resolution(&self) -> [f32; 4] {
        let size = self.logical_size();
        [size.x, size.y, 1.0, 1.0]
    }
}
