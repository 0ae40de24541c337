use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::text::{GlyphVertex, LoadedFont, QuadBatch};

/// Straight-alpha RGBA text color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextColor(pub [f32; 4]);

impl TextColor {
    pub const WHITE: TextColor = TextColor([1.0, 1.0, 1.0, 1.0]);
}

impl Default for TextColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One batch of quads and how to draw it.
#[derive(Debug, Copy, Clone)]
pub struct TextDraw<'a> {
    pub batch: &'a QuadBatch,
    /// Size of the color target in pixels; quad positions are in the same space.
    pub viewport: Vec2,
    pub color: TextColor,
}

impl<'a> TextDraw<'a> {
    pub fn new(batch: &'a QuadBatch, viewport: Vec2) -> Self {
        Self { batch, viewport, color: TextColor::WHITE }
    }

    pub fn with_color(mut self, color: TextColor) -> Self {
        self.color = color;
        self
    }

    fn globals(&self) -> Globals {
        Globals::new(self.viewport.to_array(), self.color)
    }
}

/// Draws glyph quads sampled from one font's atlas.
///
/// The atlas becomes an `R8Unorm` texture when the pipeline is created and is
/// never written again. The built-in font samples with nearest filtering so
/// its dots stay crisp; outline atlases sample linearly.
pub struct TextPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    globals_ubo: wgpu::Buffer,

    // geometry, grown on demand
    vbo: Option<wgpu::Buffer>,
    ibo: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    index_capacity: usize,
}

impl TextPipeline {
    /// Uploads the font's atlas and builds a pipeline writing to
    /// `surface_format` targets.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        font: &LoadedFont,
    ) -> Self {
        let atlas = font.atlas();
        let size = wgpu::Extent3d {
            width: atlas.width(),
            height: atlas.height(),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen text atlas"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            atlas.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(atlas.width()),
                rows_per_image: Some(atlas.height()),
            },
            size,
        );
        let atlas_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let filter = if font.state().is_fallback() {
            wgpu::FilterMode::Nearest
        } else {
            wgpu::FilterMode::Linear
        };
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lumen text sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let globals_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen text globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen text bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Globals>() as u64),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen text bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lumen text shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen text pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lumen text pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "TextPipeline: uploaded {}x{} atlas ({})",
            atlas.width(),
            atlas.height(),
            font.state()
        );

        Self {
            pipeline,
            bind_group,
            globals_ubo,
            vbo: None,
            ibo: None,
            vertex_capacity: 0,
            index_capacity: 0,
        }
    }

    /// Draws every quad of `text.batch` in one indexed draw, on top of
    /// whatever `color_view` already holds.
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        text: TextDraw<'_>,
    ) {
        let batch = text.batch;
        if batch.is_empty() {
            return;
        }

        self.ensure_capacity(device, batch.vertices().len(), batch.indices().len());
        queue.write_buffer(&self.globals_ubo, 0, bytemuck::bytes_of(&text.globals()));

        let Some(vbo) = self.vbo.as_ref() else { return; };
        let Some(ibo) = self.ibo.as_ref() else { return; };
        queue.write_buffer(vbo, 0, batch.vertex_bytes());
        queue.write_buffer(ibo, 0, batch.index_bytes());

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen text pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..batch.vertex_bytes().len() as u64));
        rpass.set_index_buffer(ibo.slice(..batch.index_bytes().len() as u64), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..batch.indices().len() as u32, 0, 0..1);
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, vertices: usize, indices: usize) {
        if vertices > self.vertex_capacity || self.vbo.is_none() {
            let cap = vertices.next_power_of_two().max(256);
            self.vbo = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("lumen text vbo"),
                size: (cap * std::mem::size_of::<GlyphVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vertex_capacity = cap;
        }
        if indices > self.index_capacity || self.ibo.is_none() {
            let cap = indices.next_power_of_two().max(384);
            self.ibo = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("lumen text ibo"),
                size: (cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.index_capacity = cap;
        }
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Uniform block (32 bytes):
///
///  offset  0  viewport  [f32; 2]
///  offset  8  _pad      [f32; 2]
///  offset 16  color     [f32; 4]
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Globals {
    viewport: [f32; 2],
    _pad: [f32; 2],
    color: [f32; 4],
}

impl Globals {
    fn new(viewport: [f32; 2], color: TextColor) -> Self {
        Self {
            viewport: [viewport[0].max(1.0), viewport[1].max(1.0)],
            _pad: [0.0; 2],
            color: color.0,
        }
    }
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x2, // pos
    1 => Float32x2  // uv
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GlyphVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globals_match_shader_layout() {
        assert_eq!(std::mem::size_of::<Globals>(), 32);
        let g = Globals::new([0.0, 600.0], TextColor::WHITE);
        assert_eq!(g.viewport, [1.0, 600.0]);
        assert_eq!(bytemuck::bytes_of(&g).len(), 32);
    }

    #[test]
    fn draw_carries_viewport_and_color() {
        let batch = QuadBatch::default();
        let red = TextColor([1.0, 0.0, 0.0, 1.0]);
        let text = TextDraw::new(&batch, Vec2::new(800.0, 600.0)).with_color(red);
        let g = text.globals();
        assert_eq!(g.viewport, [800.0, 600.0]);
        assert_eq!(g.color, red.0);
        assert_eq!(TextDraw::new(&batch, Vec2::zero()).color, TextColor::WHITE);
    }

    #[test]
    fn vertex_layout_covers_glyph_vertex() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.attributes[1].offset, 8);
    }
}
