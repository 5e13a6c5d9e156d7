mod overlay;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use globeview_assets::{TextureAsset, TextureCache, TextureLoad, TextureSource};
use globeview_input::{Action, PointerButton, PointerTracker};
use globeview_render::{DebugTextRenderer, Renderer};
use globeview_render_wgpu::GlobeRenderer;
use globeview_scene::{Overlay, Scene, SceneConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "globeview-desktop", about = "Rotating globe viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Planet color map: http(s) URL or file path
    #[arg(short, long)]
    texture: Option<String>,

    /// Starfield seed
    #[arg(short, long)]
    seed: Option<u64>,
}

/// Config file (or defaults) with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Result<SceneConfig> {
    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(texture) = &cli.texture {
        config.texture = texture.clone();
    }
    if let Some(seed) = cli.seed {
        config.star_seed = seed;
    }
    config.validate()?;
    Ok(config)
}

/// Application state.
struct AppState {
    config: SceneConfig,
    scene: Scene,
    overlay: Overlay,
    pointer: PointerTracker,
    textures: TextureCache,
    load: Option<TextureLoad>,
    started: Instant,
    last_frame: Instant,
}

impl AppState {
    fn new(config: SceneConfig) -> Result<Self> {
        let scene = Scene::new(&config);
        tracing::debug!("initial scene:\n{}", DebugTextRenderer::new().render(&scene));
        let load = TextureLoad::spawn(TextureSource::parse(&config.texture))
            .context("starting texture fetch")?;
        let now = Instant::now();
        Ok(Self {
            config,
            scene,
            overlay: Overlay::STANDARD,
            pointer: PointerTracker::new(),
            textures: TextureCache::new(),
            load: Some(load),
            started: now,
            last_frame: now,
        })
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;
        self.scene
            .tick(dt, (now - self.started).as_secs_f64());
    }

    /// The fetched color map, handed out once. A failed fetch settles the
    /// planet as failed instead.
    fn take_texture(&mut self) -> Option<Arc<TextureAsset>> {
        let load = self.load.as_mut()?;
        let result = load.poll()?;
        let source = load.source().clone();
        self.load = None;
        match result {
            Ok(texture) => {
                let id = self.textures.insert(&source, texture);
                self.textures.get(id)
            }
            Err(e) => {
                self.scene.fail_planet(format!("{source}: {e}"));
                None
            }
        }
    }

    fn handle_pointer(&mut self, event: &WindowEvent) {
        let action = match event {
            WindowEvent::MouseInput { button, state, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    _ => return,
                };
                self.pointer
                    .on_button(button, *state == ElementState::Pressed)
            }
            WindowEvent::CursorMoved { position, .. } => self
                .pointer
                .on_cursor_moved(Vec2::new(position.x as f32, position.y as f32)),
            WindowEvent::CursorLeft { .. } => self.pointer.on_cursor_left(),
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.pointer.on_wheel_lines(*y),
                MouseScrollDelta::PixelDelta(p) => self.pointer.on_wheel_pixels(p.y as f32),
            },
            WindowEvent::PinchGesture { delta, .. } => self.pointer.on_pinch(*delta as f32),
            _ => Action::Noop,
        };
        if !action.is_noop() {
            tracing::trace!(?action, "pointer action");
            self.scene.apply(action);
        }
    }
}

/// Everything that exists only once the window is up.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: GlobeRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let window_config = &self.state.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no GPU adapter can present to this window")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("globeview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        // Colors are authored as display values; a linear target stores them as-is.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no texture formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.scene.set_viewport(config.width, config.height);

        let renderer = GlobeRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            self.state.scene.sky(),
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend ({:?})",
            adapter.get_info().backend.to_str(),
            surface_format
        );

        Ok(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn redraw(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        self.state.update();

        if let Some(texture) = self.state.take_texture() {
            match gpu
                .renderer
                .attach_planet_texture(&gpu.device, &gpu.queue, &texture)
            {
                Ok(()) => {
                    self.state.scene.resolve_planet(texture.id());
                }
                Err(e) => {
                    self.state.scene.fail_planet(e.to_string());
                }
            }
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer
            .render(&gpu.device, &gpu.queue, &view, &self.state.scene);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let overlay = self.state.overlay;
        let elapsed = self.state.scene.elapsed() as f32;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            overlay::draw(ctx, &overlay, elapsed);
        });

        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("overlay_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("GPU initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            // The overlay takes no input, so every event continues to the scene.
            let _ = gpu.egui_winit.on_window_event(&gpu.window, &event);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    gpu.renderer
                        .resize(&gpu.device, gpu.config.width, gpu.config.height);
                    self.state
                        .scene
                        .set_viewport(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            other => self.state.handle_pointer(&other),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("globeview-desktop starting");

    let config = resolve_config(&cli)?;
    let state = AppState::new(config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
