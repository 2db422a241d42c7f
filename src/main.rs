use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use ripple_brush::assets::SketchAssets;
use ripple_brush::cli::Cli;
use ripple_brush::compositor::{Compositor, RenderError};
use ripple_brush::config::SketchConfig;
use ripple_brush::core::{AnimationDriver, Clock, InputAction, Route, SurfaceManager, WinitInput};
use ripple_brush::logging::{init_logging, LoggingConfig};
use ripple_brush::traits::WindowContext;
use ripple_brush::window::SketchWindow;

struct App {
    config: SketchConfig,
    assets: SketchAssets,
    route: Route,
    window: Option<SketchWindow>,
    driver: Option<AnimationDriver<Compositor>>,
    clock: Clock,
}

impl App {
    fn new(config: SketchConfig, assets: SketchAssets, route: Route) -> Self {
        Self {
            config,
            assets,
            route,
            window: None,
            driver: None,
            clock: Clock::new(),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) {
        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.title.as_str())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.width,
                    self.config.height,
                )),
        ) {
            Ok(w) => SketchWindow::new(Arc::new(w)),
            Err(e) => {
                log::error!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let compositor = match pollster::block_on(Compositor::new(window.inner().clone(), &self.assets)) {
            Ok(c) => c,
            Err(e) => {
                log::error!("failed to initialize compositor: {}", e);
                event_loop.exit();
                return;
            }
        };

        let surface = SurfaceManager::initialize(&window);
        let mut driver = AnimationDriver::new(self.config.clone(), surface, compositor);
        if let Err(e) = driver.go_to(self.route) {
            log::error!("failed to open {}: {}", self.route.path(), e);
            event_loop.exit();
            return;
        }

        self.clock.reset();
        window.request_redraw();
        self.window = Some(window);
        self.driver = Some(driver);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(driver), Some(window)) = (&mut self.driver, &self.window) else {
            return;
        };
        let delta = self.clock.tick();

        match driver.tick(delta, window) {
            Ok(_) => {}
            Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::debug!("surface lost or outdated; reconfiguring");
                driver.reconfigure();
                window.request_redraw();
            }
            Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                log::error!("out of GPU memory; stopping");
                driver.stop();
                event_loop.exit();
            }
            Err(e) => {
                log::warn!("frame skipped: {}", e);
                window.request_redraw();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.start(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(action) = WinitInput::translate(&event) else {
            return;
        };

        match action {
            InputAction::Exit => {
                if let Some(driver) = &mut self.driver {
                    driver.stop();
                }
                event_loop.exit();
            }
            InputAction::PointerMoved { x, y } => {
                if let Some(driver) = &mut self.driver {
                    driver.pointer_moved(x, y);
                }
            }
            InputAction::Resized { width, height } => {
                if let Some(driver) = &mut self.driver {
                    driver.resize(width, height);
                }
            }
            InputAction::ScaleFactorChanged { scale_factor } => {
                if let Some(driver) = &mut self.driver {
                    driver.set_scale_factor(scale_factor);
                }
            }
            InputAction::Redraw => self.redraw(event_loop),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::with_filter(cli.log.clone()));

    let config = SketchConfig::resolve(&cli)?;
    let assets = SketchAssets::load(config.brush_texture.as_deref(), config.base_texture.as_deref())?;

    let event_loop = EventLoop::new().context("create event loop")?;
    let mut app = App::new(config, assets, cli.route);

    log::info!("Ripple Brush - move the pointer to paint, Escape to quit");
    event_loop.run_app(&mut app).context("run event loop")?;

    Ok(())
}
