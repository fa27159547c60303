//! Blob renderer: keeps per-blob GPU resources in sync with the registry
//! and records the render pass.

use super::material::{BlendUniform, CameraUniform, GradientMaterial, ModelUniform};
use crate::camera::PerspectiveCamera;
use crate::core::{BlobId, Context};
use crate::geometry::Vertex;
use crate::math::Color;
use crate::sim::{Blob, BlobRegistry, SharedParams};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use wgpu::util::DeviceExt;

/// GPU resources for one blob, created on first sight and dropped when the
/// blob leaves the registry.
struct GpuBlob {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    /// Interleave scratch, reused across uploads to keep the per-frame loop
    /// allocation-free.
    vertex_scratch: Vec<Vertex>,
}

impl GpuBlob {
    fn new(ctx: &Context, material: &GradientMaterial, blob: &Blob) -> Self {
        let vertex_scratch = interleave(blob, Vec::with_capacity(blob.vertex_count()));

        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blob vertex buffer"),
            contents: bytemuck::cast_slice(&vertex_scratch),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blob index buffer"),
            contents: bytemuck::cast_slice(blob.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        let model_uniform = ModelUniform::new(blob.position(), blob.size());
        let model_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blob model buffer"),
            contents: bytemuck::cast_slice(&[model_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let model_bind_group = material.create_model_bind_group(&ctx.device, &model_buffer);

        Self {
            vertex_buffer,
            index_buffer,
            index_count: blob.indices().len() as u32,
            model_buffer,
            model_bind_group,
            vertex_scratch,
        }
    }
}

/// Rebuild the interleaved vertex array from a blob's attribute buffers.
fn interleave(blob: &Blob, mut scratch: Vec<Vertex>) -> Vec<Vertex> {
    scratch.clear();
    let positions = blob.positions();
    let normals = blob.normals();
    let uvs = blob.uvs();

    for v in 0..blob.vertex_count() {
        let i = v * 3;
        scratch.push(Vertex::new(
            [positions[i], positions[i + 1], positions[i + 2]],
            [normals[i], normals[i + 1], normals[i + 2]],
            [uvs[v * 2], uvs[v * 2 + 1]],
        ));
    }

    scratch
}

/// Draws every blob in the registry with the gradient material.
pub struct BlobRenderer {
    material: GradientMaterial,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    blend_buffer: wgpu::Buffer,
    blend_bind_group: wgpu::BindGroup,
    blobs: HashMap<BlobId, GpuBlob>,
    draw_order: Vec<BlobId>,
    params: SharedParams,
}

impl BlobRenderer {
    /// Create the renderer and its pipeline.
    pub fn new(ctx: &Context, params: SharedParams) -> Self {
        let material = GradientMaterial::new(&ctx.device, ctx.surface_format, ctx.depth_format);

        let camera_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::new(
                &crate::math::Matrix4::IDENTITY,
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = material.create_camera_bind_group(&ctx.device, &camera_buffer);

        let blend = {
            let p = params.borrow();
            BlendUniform::new(p.color1, p.color2, 0.0)
        };
        let blend_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blend buffer"),
            contents: bytemuck::cast_slice(&[blend]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let blend_bind_group = material.create_blend_bind_group(&ctx.device, &blend_buffer);

        Self {
            material,
            camera_buffer,
            camera_bind_group,
            blend_buffer,
            blend_bind_group,
            blobs: HashMap::new(),
            draw_order: Vec::new(),
            params,
        }
    }

    /// Sync GPU state with the simulation: create resources for new blobs,
    /// drop resources for removed ones, re-upload dirty vertex buffers and
    /// write this frame's uniforms. Runs after all physics for the frame.
    pub fn prepare(
        &mut self,
        ctx: &Context,
        camera: &mut PerspectiveCamera,
        registry: &mut BlobRegistry,
        elapsed: f32,
    ) {
        ctx.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniform::new(camera.view_projection_matrix())]),
        );

        // Colors are read from the store every frame, so a panel edit lands
        // on every existing blob before the next render.
        let blend = {
            let p = self.params.borrow();
            BlendUniform::new(p.color1, p.color2, elapsed)
        };
        ctx.queue
            .write_buffer(&self.blend_buffer, 0, bytemuck::cast_slice(&[blend]));

        self.draw_order.clear();

        for blob in registry.iter_mut() {
            let id = blob.id();
            self.draw_order.push(id);

            match self.blobs.entry(id) {
                Entry::Vacant(entry) => {
                    entry.insert(GpuBlob::new(ctx, &self.material, blob));
                    blob.clear_dirty();
                }
                Entry::Occupied(mut entry) => {
                    let gpu = entry.get_mut();
                    if blob.is_dirty() {
                        gpu.vertex_scratch =
                            interleave(blob, std::mem::take(&mut gpu.vertex_scratch));
                        ctx.queue.write_buffer(
                            &gpu.vertex_buffer,
                            0,
                            bytemuck::cast_slice(&gpu.vertex_scratch),
                        );
                        blob.clear_dirty();
                    }
                    let model = ModelUniform::new(blob.position(), blob.size());
                    ctx.queue
                        .write_buffer(&gpu.model_buffer, 0, bytemuck::cast_slice(&[model]));
                }
            }
        }

        // Detach resources for blobs that left the registry.
        let live: HashSet<BlobId> = self.draw_order.iter().copied().collect();
        self.blobs.retain(|id, _| live.contains(id));
    }

    /// Record the blob render pass.
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        clear_color: Color,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blob render pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: clear_color.r as f64,
                        g: clear_color.g as f64,
                        b: clear_color.b as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(self.material.pipeline());
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_bind_group(2, &self.blend_bind_group, &[]);

        for id in &self.draw_order {
            let Some(gpu) = self.blobs.get(id) else {
                continue;
            };
            render_pass.set_bind_group(1, &gpu.model_bind_group, &[]);
            render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            render_pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);
        }
    }
}
