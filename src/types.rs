use glam::Mat4;

use crate::core::brush_pool::BrushInstance;
use crate::core::frame::FrameParams;

/// View-projection matrix for the brush pass
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ProjectionUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl ProjectionUniform {
    pub fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

impl From<&FrameParams> for ProjectionUniform {
    fn from(params: &FrameParams) -> Self {
        Self::new(params.view_projection)
    }
}

/// Uniforms for the composite pass
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeUniform {
    pub resolution: [f32; 4],
    pub time: f32,
    pub strength: f32,
    pub _pad: [f32; 2],
}

impl From<&FrameParams> for CompositeUniform {
    fn from(params: &FrameParams) -> Self {
        Self {
            resolution: params.resolution,
            time: params.time,
            strength: params.displacement_strength,
            _pad: [0.0, 0.0],
        }
    }
}

/// Corner of the unit brush quad
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2], // -0.5..0.5
    pub uv: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-0.5, -0.5], uv: [0.0, 1.0] },
    QuadVertex { position: [0.5, -0.5], uv: [1.0, 1.0] },
    QuadVertex { position: [0.5, 0.5], uv: [1.0, 0.0] },
    QuadVertex { position: [-0.5, 0.5], uv: [0.0, 0.0] },
];

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Per-instance brush data; one entry per pool slot, visible or not
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BrushInstanceRaw {
    pub position: [f32; 2],
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
    pub visible: f32, // 1.0 visible, 0.0 hidden
    pub _pad: [f32; 2],
}

impl BrushInstanceRaw {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x2,
        3 => Float32,
        4 => Float32,
        5 => Float32,
        6 => Float32
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BrushInstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

impl From<&BrushInstance> for BrushInstanceRaw {
    fn from(brush: &BrushInstance) -> Self {
        Self {
            position: brush.position.to_array(),
            rotation: brush.rotation,
            scale: brush.scale,
            opacity: brush.opacity,
            visible: if brush.visible { 1.0 } else { 0.0 },
            _pad: [0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<ProjectionUniform>(), 64);
        assert_eq!(std::mem::size_of::<CompositeUniform>(), 32);
        assert_eq!(std::mem::size_of::<BrushInstanceRaw>(), 32);
        assert_eq!(std::mem::size_of::<QuadVertex>(), 16);
    }

    #[test]
    fn test_hidden_brush_flag() {
        let brush = BrushInstance {
            position: Vec2::new(3.0, 4.0),
            rotation: 1.0,
            scale: 0.2,
            opacity: 0.5,
            visible: false,
        };
        let raw = BrushInstanceRaw::from(&brush);
        assert_eq!(raw.visible, 0.0);
        assert_eq!(raw.position, [3.0, 4.0]);
        assert_eq!(raw.opacity, 0.5);
    }

    #[test]
    fn test_composite_uniform_from_params() {
        let params = FrameParams::new(3, 1.5, 0.016, [800.0, 600.0, 1.0, 1.0], Mat4::IDENTITY, 0.1);
        let uniform = CompositeUniform::from(&params);
        assert_eq!(uniform.resolution, [800.0, 600.0, 1.0, 1.0]);
        assert_eq!(uniform.time, 1.5);
        assert_eq!(uniform.strength, 0.1);
    }

    #[test]
    fn test_projection_uniform_from_params() {
        let view_proj = Mat4::from_scale(glam::Vec3::new(2.0, 3.0, 1.0));
        let params = FrameParams::new(0, 0.0, 0.0, [1.0, 1.0, 1.0, 1.0], view_proj, 0.1);
        assert_eq!(ProjectionUniform::from(&params).view_proj, view_proj.to_cols_array_2d());
    }
}
