// src/app.rs

use std::sync::Arc;

use log::info;
use winit::{
    event::{DeviceEvent, WindowEvent},
    window::Window,
};

use boxwalk::config::EngineConfig;
use boxwalk::demo_scene;
use boxwalk::engine_lib::camera::Camera;
use boxwalk::engine_lib::input::InputCollector;
use boxwalk::engine_lib::scene_types::{NodeId, Scene};
use boxwalk::engine_lib::transform::Transform;
use boxwalk::rendering_lib::renderer::Renderer;
use boxwalk::rendering_lib::shader::WGSL_SHADER_SOURCE;

use crate::ui::{build_ui, HudState};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("could not create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter")]
    NoAdapter,
    #[error("surface reports no usable format")]
    NoSurfaceFormat,
    #[error("could not open device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error(transparent)]
    Scene(#[from] boxwalk::error::SceneError),
}

/// Prefers an sRGB format; errors if the surface offers no format or alpha mode.
fn pick_surface_format(
    caps: &wgpu::SurfaceCapabilities,
) -> Result<(wgpu::TextureFormat, wgpu::CompositeAlphaMode), AppError> {
    let fallback = caps.formats.first().copied().ok_or(AppError::NoSurfaceFormat)?;
    let format = caps.formats.iter().copied().find(|f| f.is_srgb()).unwrap_or(fallback);
    let alpha_mode = caps.alpha_modes.first().copied().ok_or(AppError::NoSurfaceFormat)?;
    Ok((format, alpha_mode))
}

pub struct PlaygroundApp {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    renderer: Renderer,
    config: EngineConfig,
    scene: Scene,
    player: NodeId,
    camera: Camera,
    input: InputCollector,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl PlaygroundApp {
    pub async fn new(window: Arc<Window>, config: EngineConfig) -> Result<Self, AppError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(AppError::NoAdapter)?;
        info!("using adapter {:?}", adapter.get_info().name);
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: if cfg!(target_arch = "wasm32") {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default()
                    },
                    label: None,
                },
                None,
            )
            .await?;

        let (surface_format, alpha_mode) = pick_surface_format(&surface.get_capabilities(&adapter))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let renderer = Renderer::new(
            &device,
            surface_config.format,
            WGSL_SHADER_SOURCE,
            &config.render,
            surface_config.width,
            surface_config.height,
        );

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_config.format, None, 1);

        let demo = demo_scene::build(&config)?;
        let camera = Camera::from_config(&config.camera);

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            size,
            renderer,
            scene: demo.scene,
            player: demo.player,
            camera,
            input: InputCollector::new(false),
            egui_ctx,
            egui_state,
            egui_renderer,
            config,
        })
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_config);
            self.renderer.resize(&self.device, new_size.width, new_size.height);
        }
    }

    /// Advances the simulation by the wall-clock `dt`, clamped to `max_frame_dt`.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, self.config.max_frame_dt);
        let input = self.input.sample();
        self.scene.update(&input, dt);
    }

    fn camera_host(&self) -> Transform {
        self.scene.transform(self.player).copied().unwrap_or_default()
    }

    fn hud_state(&self) -> HudState {
        let player = self.scene.node(self.player).and_then(|n| n.player());
        HudState {
            position: self.camera_host().position,
            velocity: player.map(|p| p.velocity()).unwrap_or_default(),
            grounded: player.is_some_and(|p| p.is_grounded()),
            cursor_grabbed: self.input.cursor_grabbed(),
        }
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let output_texture = self.surface.get_current_texture()?;
        let view = output_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Main Command Encoder"),
        });

        let host = self.camera_host();
        self.renderer.render_scene(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            &self.scene,
            &self.camera,
            &host,
            self.size.width as f32,
            self.size.height as f32,
        );

        let hud = self.hud_state();
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| build_ui(ctx, &hud));
        self.egui_state.handle_platform_output(window, full_output.platform_output);
        let tris = self.egui_ctx.tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.surface_config.width, self.surface_config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.egui_renderer.update_buffers(&self.device, &self.queue, &mut encoder, &tris, &screen_descriptor);
        {
            let mut gui_render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.egui_renderer.render(&mut gui_render_pass, &tris, &screen_descriptor);
        }
        for tex_id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(tex_id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output_texture.present();
        Ok(())
    }

    /// Returns true when the event was consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent, window: &Window) -> bool {
        // While the cursor is free the HUD gets first pick of the event.
        if !self.input.cursor_grabbed() && self.egui_state.on_window_event(window, event).consumed {
            return true;
        }
        self.input.handle_window_event(event, window)
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        self.input.handle_device_event(event);
    }
}
