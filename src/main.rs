// src/main.rs

mod app;
mod ui;

use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::WindowBuilder,
};

use app::PlaygroundApp;
use boxwalk::config::EngineConfig;

fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            // Fails only if a logger is already installed.
            let _ = console_log::init_with_level(log::Level::Warn);
        } else {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        }
    }
}

fn load_config() -> EngineConfig {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            EngineConfig::default()
        } else {
            let path = std::env::args().nth(1).unwrap_or_else(|| boxwalk::config::DEFAULT_CONFIG_PATH.to_string());
            EngineConfig::load_or_default(path)
        }
    }
}

pub async fn run() {
    init_logging();
    let config = load_config();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("could not create event loop: {e}");
            return;
        }
    };
    let window = match WindowBuilder::new()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.window.width, config.window.height))
        .build(&event_loop)
    {
        Ok(window) => Arc::new(window),
        Err(e) => {
            error!("could not create window: {e}");
            return;
        }
    };

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::WindowExtWebSys;
        let attached = web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.get_element_by_id("wasm-viewport")?;
                let canvas = web_sys::Element::from(window.canvas()?);
                dst.append_child(&canvas).ok()?;
                Some(())
            });
        if attached.is_none() {
            error!("could not attach canvas to #wasm-viewport");
            return;
        }
    }

    let mut app_state = match PlaygroundApp::new(window.clone(), config).await {
        Ok(app) => app,
        Err(e) => {
            error!("{e}");
            return;
        }
    };
    info!("starting main loop");
    let mut last_time = Instant::now();

    let result = event_loop.run(move |event, target: &EventLoopWindowTarget<()>| {
        target.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, window_id } if window_id == window.id() => {
                if !app_state.handle_window_event(event, &window) {
                    match event {
                        WindowEvent::CloseRequested => target.exit(),
                        WindowEvent::Resized(physical_size) => app_state.resize(*physical_size),
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent { event: ref device_event, .. } => {
                app_state.handle_device_event(device_event);
            }
            Event::AboutToWait => {
                let now = Instant::now();
                let dt = (now - last_time).as_secs_f32();
                last_time = now;

                app_state.update(dt);
                match app_state.render(&window) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        app_state.resize(app_state.size());
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("GPU out of memory, exiting");
                        target.exit();
                    }
                    Err(e) => warn!("surface error: {e:?}"),
                }

                if !target.exiting() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    });
    if let Err(e) = result {
        error!("event loop error: {e}");
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        fn main() {
            wasm_bindgen_futures::spawn_local(run());
        }
    } else {
        #[tokio::main]
        async fn main() {
            run().await;
        }
    }
}
