use crate::mesh::{SphereVertex, StarInstance, sphere_mesh, star_instances};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use globeview_assets::{AssetId, TextureAsset};
use globeview_common::Rgb;
use globeview_scene::planet::SPHERE_SEGMENTS;
use globeview_scene::{Material, MeshNode, Scene, SkyField, SphereGeometry};
use glam::Mat4;
use wgpu::util::DeviceExt;

/// Samples per pixel for the color and depth targets.
pub const MSAA_SAMPLES: u32 = 4;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// `src * src.a + dst`, destination alpha untouched.
const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Zero,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("color map is {width}x{height}, device allows at most {limit} texels per side")]
    TextureTooLarge { width: u32, height: u32, limit: u32 },
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    viewport: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

impl ModelUniforms {
    fn for_node(node: &MeshNode) -> Self {
        let color = match node.material {
            Material::Halo { color, opacity, .. } => color.with_alpha(opacity).to_array(),
            Material::Surface { .. } => Rgb::WHITE.with_alpha(1.0).to_array(),
        };
        Self {
            model: node.transform.matrix().to_cols_array_2d(),
            color,
        }
    }
}

/// How a sphere pipeline treats faces and depth.
struct SphereStyle {
    cull_mode: wgpu::Face,
    blend: wgpu::BlendState,
    depth_write: bool,
}

/// Color map uploaded for one planet texture.
struct SurfaceBinding {
    texture: AssetId,
    bind_group: wgpu::BindGroup,
}

/// wgpu renderer for the globe scene.
pub struct GlobeRenderer {
    star_pipeline: wgpu::RenderPipeline,
    earth_pipeline: wgpu::RenderPipeline,
    halo_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    body_buffer: wgpu::Buffer,
    body_bind_group: wgpu::BindGroup,
    halo_buffer: wgpu::Buffer,
    halo_bind_group: wgpu::BindGroup,
    surface_layout: wgpu::BindGroupLayout,
    surface: Option<SurfaceBinding>,
    sphere_vertex_buffer: wgpu::Buffer,
    sphere_index_buffer: wgpu::Buffer,
    sphere_index_count: u32,
    star_buffer: wgpu::Buffer,
    star_count: u32,
    color_target: wgpu::TextureView,
    depth_target: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    size: (u32, u32),
}

impl GlobeRenderer {
    /// Build pipelines and static geometry. The starfield is uploaded once.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sky: &SkyField,
    ) -> Self {
        let frame_layout = uniform_layout(device, "frame_bind_group_layout");
        let model_layout = uniform_layout(device, "model_bind_group_layout");
        let surface_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("surface_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniforms"),
            contents: bytemuck::bytes_of(&FrameUniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                view: Mat4::IDENTITY.to_cols_array_2d(),
                viewport: [width.max(1) as f32, height.max(1) as f32, 0.0, 0.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = uniform_bind_group(device, &frame_layout, &frame_buffer, "frame");
        let (body_buffer, body_bind_group) = model_uniforms(device, &model_layout, "body");
        let (halo_buffer, halo_bind_group) = model_uniforms(device, &model_layout, "halo");

        // Stars: instanced quads, drawn first, never occlude anything.
        let star_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("star_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::star_shader().into()),
        });
        let star_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("star_pipeline_layout"),
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });
        let star_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("star_pipeline"),
            layout: Some(&star_layout),
            vertex: wgpu::VertexState {
                module: &star_shader,
                entry_point: Some("vs_star"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<StarInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32,
                        2 => Float32x3,
                        3 => Float32,
                        4 => Float32,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &star_shader,
                entry_point: Some("fs_star"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(ADDITIVE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(false)),
            multisample: multisample_state(),
            multiview: None,
            cache: None,
        });

        let earth_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("earth_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::earth_shader().into()),
        });
        let earth_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("earth_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &model_layout, &surface_layout],
            push_constant_ranges: &[],
        });
        let earth_pipeline = sphere_pipeline(
            device,
            "earth_pipeline",
            &earth_layout,
            &earth_shader,
            ("vs_earth", "fs_earth"),
            surface_format,
            SphereStyle {
                cull_mode: wgpu::Face::Back,
                blend: wgpu::BlendState::REPLACE,
                depth_write: true,
            },
        );

        // Halo: only the inside of the shell, so it rims the planet.
        let halo_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("halo_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::halo_shader().into()),
        });
        let halo_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("halo_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &model_layout],
            push_constant_ranges: &[],
        });
        let halo_pipeline = sphere_pipeline(
            device,
            "halo_pipeline",
            &halo_layout,
            &halo_shader,
            ("vs_halo", "fs_halo"),
            surface_format,
            SphereStyle {
                cull_mode: wgpu::Face::Front,
                blend: ADDITIVE,
                depth_write: false,
            },
        );

        let (sphere_verts, sphere_indices) = sphere_mesh(&SphereGeometry::unit(SPHERE_SEGMENTS));
        let sphere_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_vertex_buffer"),
            contents: bytemuck::cast_slice(&sphere_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let sphere_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_index_buffer"),
            contents: bytemuck::cast_slice(&sphere_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let stars = star_instances(sky);
        let star_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star_instance_buffer"),
            contents: bytemuck::cast_slice(&stars),
            usage: wgpu::BufferUsages::VERTEX,
        });

        tracing::info!(
            stars = stars.len(),
            sphere_triangles = sphere_indices.len() / 3,
            format = ?surface_format,
            samples = MSAA_SAMPLES,
            "globe renderer ready"
        );

        let (color_target, depth_target) =
            Self::create_targets(device, surface_format, width, height);

        Self {
            star_pipeline,
            earth_pipeline,
            halo_pipeline,
            frame_buffer,
            frame_bind_group,
            body_buffer,
            body_bind_group,
            halo_buffer,
            halo_bind_group,
            surface_layout,
            surface: None,
            sphere_vertex_buffer,
            sphere_index_buffer,
            sphere_index_count: sphere_indices.len() as u32,
            star_buffer,
            star_count: stars.len() as u32,
            color_target,
            depth_target,
            surface_format,
            size: (width.max(1), height.max(1)),
        }
    }

    /// Upload the planet color map. Sampled as linear `Rgba8Unorm` so the
    /// shading rule sees the stored byte values.
    pub fn attach_planet_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        asset: &TextureAsset,
    ) -> Result<(), RenderError> {
        let limit = device.limits().max_texture_dimension_2d;
        if asset.width() > limit || asset.height() > limit {
            return Err(RenderError::TextureTooLarge {
                width: asset.width(),
                height: asset.height(),
                limit,
            });
        }

        let size = wgpu::Extent3d {
            width: asset.width(),
            height: asset.height(),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("planet_color_map"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
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
            asset.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * asset.width()),
                rows_per_image: Some(asset.height()),
            },
            size,
        );

        // Longitude wraps, latitude does not.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("planet_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let view = texture.create_view(&Default::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("surface_bind_group"),
            layout: &self.surface_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        tracing::debug!(
            texture = %asset.id(),
            width = asset.width(),
            height = asset.height(),
            "planet color map uploaded"
        );
        self.surface = Some(SurfaceBinding {
            texture: asset.id(),
            bind_group,
        });
        Ok(())
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (color, depth) = Self::create_targets(device, self.surface_format, width, height);
        self.color_target = color;
        self.depth_target = depth;
        self.size = (width.max(1), height.max(1));
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Whether the planet would be drawn this frame.
    pub fn draws_planet(&self, scene: &Scene) -> bool {
        self.planet_binding(scene).is_some()
    }

    /// Render one frame into `view`: stars, then earth and halo when ready.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
    ) {
        let camera = scene.camera();
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
                view: camera.view_matrix().to_cols_array_2d(),
                viewport: [
                    self.size.0 as f32,
                    self.size.1 as f32,
                    scene.elapsed() as f32,
                    0.0,
                ],
            }),
        );

        let planet = self.planet_binding(scene);
        if let Some((body, halo, _)) = planet {
            queue.write_buffer(
                &self.body_buffer,
                0,
                bytemuck::bytes_of(&ModelUniforms::for_node(body)),
            );
            queue.write_buffer(
                &self.halo_buffer,
                0,
                bytemuck::bytes_of(&ModelUniforms::for_node(halo)),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("globe_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("globe_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.color_target,
                    resolve_target: Some(view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(scene.background())),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_target,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            if self.star_count > 0 {
                pass.set_pipeline(&self.star_pipeline);
                pass.set_vertex_buffer(0, self.star_buffer.slice(..));
                pass.draw(0..6, 0..self.star_count);
            }

            if let Some((_, _, surface)) = planet {
                pass.set_vertex_buffer(0, self.sphere_vertex_buffer.slice(..));
                pass.set_index_buffer(
                    self.sphere_index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );

                pass.set_pipeline(&self.earth_pipeline);
                pass.set_bind_group(1, &self.body_bind_group, &[]);
                pass.set_bind_group(2, surface, &[]);
                pass.draw_indexed(0..self.sphere_index_count, 0, 0..1);

                pass.set_pipeline(&self.halo_pipeline);
                pass.set_bind_group(1, &self.halo_bind_group, &[]);
                pass.draw_indexed(0..self.sphere_index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    /// The planet nodes plus the bind group of their uploaded color map, if
    /// both exist and belong together.
    fn planet_binding<'a>(
        &'a self,
        scene: &'a Scene,
    ) -> Option<(&'a MeshNode, &'a MeshNode, &'a wgpu::BindGroup)> {
        let planet = scene.planet().ready()?;
        let surface = self.surface.as_ref()?;
        (surface.texture == planet.texture())
            .then_some((planet.body(), planet.halo(), &surface.bind_group))
    }

    fn create_targets(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> (wgpu::TextureView, wgpu::TextureView) {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let target = |label: &str, format: wgpu::TextureFormat| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size,
                    mip_level_count: 1,
                    sample_count: MSAA_SAMPLES,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&Default::default())
        };
        (
            target("msaa_color_target", format),
            target("depth_target", DEPTH_FORMAT),
        )
    }
}

fn clear_color(background: Rgb) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(background.r),
        g: f64::from(background.g),
        b: f64::from(background.b),
        a: 1.0,
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
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

fn model_uniforms(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(&ModelUniforms {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0; 4],
        }),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = uniform_bind_group(device, layout, &buffer, label);
    (buffer, bind_group)
}

fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: Default::default(),
        bias: Default::default(),
    }
}

fn multisample_state() -> wgpu::MultisampleState {
    wgpu::MultisampleState {
        count: MSAA_SAMPLES,
        ..Default::default()
    }
}

fn sphere_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    (vs, fs): (&str, &str),
    format: wgpu::TextureFormat,
    style: SphereStyle,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<SphereVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x2,
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(style.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(style.cull_mode),
            ..Default::default()
        },
        depth_stencil: Some(depth_state(style.depth_write)),
        multisample: multisample_state(),
        multiview: None,
        cache: None,
    })
}
