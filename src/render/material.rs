//! Gradient material: the render pipeline and uniform layouts for blobs.

use crate::geometry::Vertex;
use crate::math::{Color, Matrix4, Vector3};
use bytemuck::{Pod, Zeroable};

/// Camera uniform data.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Build from a view-projection matrix.
    pub fn new(view_proj: &Matrix4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

/// Per-blob model uniform data.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct ModelUniform {
    /// Model matrix (pure translation; blobs neither rotate nor scale).
    pub model: [[f32; 4]; 4],
    /// Blob radius, used by the fragment stage to scale the vertical blend.
    pub radius: f32,
    _padding: [f32; 3],
}

impl ModelUniform {
    /// Build from a world translation and blob radius.
    pub fn new(position: Vector3, radius: f32) -> Self {
        Self {
            model: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [position.x, position.y, position.z, 1.0],
            ],
            radius,
            _padding: [0.0; 3],
        }
    }
}

/// Shared blend uniform: the two configured colors plus elapsed time.
/// Rewritten every frame from the parameter store, so color edits reach
/// every existing blob before the next render.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct BlendUniform {
    /// Bottom color.
    pub color1: [f32; 3],
    /// Elapsed time in seconds.
    pub time: f32,
    /// Top color.
    pub color2: [f32; 3],
    _padding: f32,
}

impl BlendUniform {
    /// Build from the two blend colors and the elapsed time.
    pub fn new(color1: Color, color2: Color, time: f32) -> Self {
        Self {
            color1: color1.to_array(),
            time,
            color2: color2.to_array(),
            _padding: 0.0,
        }
    }
}

/// The blob material: a vertex/fragment pair blending two colors by vertical
/// position under fixed-direction Lambertian lighting, drawn with alpha 0.9.
pub struct GradientMaterial {
    pipeline: wgpu::RenderPipeline,
    camera_bind_group_layout: wgpu::BindGroupLayout,
    model_bind_group_layout: wgpu::BindGroupLayout,
    blend_bind_group_layout: wgpu::BindGroupLayout,
}

impl GradientMaterial {
    const SHADER_SOURCE: &'static str = include_str!("shaders/blob.wgsl");

    /// Build the pipeline for the given surface and depth formats.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blob shader"),
            source: wgpu::ShaderSource::Wgsl(Self::SHADER_SOURCE.into()),
        });

        let uniform_layout_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("camera bind group layout"),
                entries: &[uniform_layout_entry(0)],
            });

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("model bind group layout"),
                entries: &[uniform_layout_entry(0)],
            });

        let blend_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("blend bind group layout"),
                entries: &[uniform_layout_entry(0)],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blob pipeline layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &model_bind_group_layout,
                &blend_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blob render pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            camera_bind_group_layout,
            model_bind_group_layout,
            blend_bind_group_layout,
        }
    }

    /// Get the render pipeline.
    #[inline]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Create a camera bind group for a uniform buffer.
    pub fn create_camera_bind_group(
        &self,
        device: &wgpu::Device,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        Self::uniform_bind_group(device, &self.camera_bind_group_layout, buffer, "camera")
    }

    /// Create a per-blob model bind group for a uniform buffer.
    pub fn create_model_bind_group(
        &self,
        device: &wgpu::Device,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        Self::uniform_bind_group(device, &self.model_bind_group_layout, buffer, "model")
    }

    /// Create a blend bind group for a uniform buffer.
    pub fn create_blend_bind_group(
        &self,
        device: &wgpu::Device,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        Self::uniform_bind_group(device, &self.blend_bind_group_layout, buffer, "blend")
    }

    fn uniform_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }
}
