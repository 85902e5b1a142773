use anyhow::{Context, Result};
use clap::Parser;

use soft_surface::cli::Cli;
use soft_surface::config::{AppConfig, Config};
use soft_surface::demo::run_headless;

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(frames) = cli.frames {
        config.run.frames = frames;
    }
    Ok(config)
}

fn run_headless_mode(cli: &Cli, config: &AppConfig) -> Result<()> {
    let report = run_headless(config).context("Headless run failed")?;
    let json = serde_json::to_string_pretty(&report)?;

    match &cli.stats_json {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(windows)]
mod native {
    use anyhow::{anyhow, Result};
    use raw_window_handle::{HasWindowHandle, RawWindowHandle};
    use winit::{
        application::ApplicationHandler,
        event::*,
        event_loop::{ActiveEventLoop, EventLoop},
        keyboard::{KeyCode, PhysicalKey},
        window::{Window, WindowId},
    };

    use soft_surface::config::AppConfig;
    use soft_surface::demo::GradientRenderer;
    use soft_surface::frame::FrameClock;
    use soft_surface::platform::win32::{Win32Instance, Win32Window};
    use soft_surface::{AnySurface, PresentationSurface, SurfaceTarget};

    struct App {
        config: AppConfig,
        // Declared before the window so it is dropped first
        surface: Option<AnySurface>,
        window: Option<Window>,
        renderer: GradientRenderer,
        clock: FrameClock,
    }

    impl App {
        fn new(config: AppConfig) -> Self {
            Self {
                config,
                surface: None,
                window: None,
                renderer: GradientRenderer,
                clock: FrameClock::realtime(),
            }
        }

        fn redraw(&mut self) -> soft_surface::Result<()> {
            let (Some(surface), Some(frame)) = (self.surface.as_mut(), self.clock.next()) else {
                return Ok(());
            };
            let extent = surface.capabilities()?.current_extent;
            let image = self.renderer.render(&frame, extent);
            surface.present(&image)
        }
    }

    fn surface_target(window: &Window) -> Result<SurfaceTarget> {
        let handle = window
            .window_handle()
            .map_err(|e| anyhow!("Window handle unavailable: {e}"))?;
        match handle.as_raw() {
            RawWindowHandle::Win32(raw) => Ok(SurfaceTarget::Win32 {
                instance: Win32Instance::from_raw(raw.hinstance.map_or(0, |h| h.get())),
                window: Win32Window::from_raw(raw.hwnd.get()),
            }),
            other => Err(anyhow!("Unsupported window handle: {other:?}")),
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }

            let attributes = Window::default_attributes()
                .with_title(self.config.window.title.clone())
                .with_inner_size(winit::dpi::PhysicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                ));
            let window = match event_loop.create_window(attributes) {
                Ok(w) => w,
                Err(e) => {
                    log::error!("Failed to create window: {e}");
                    event_loop.exit();
                    return;
                }
            };

            let surface = surface_target(&window).and_then(|target| {
                AnySurface::create(target, self.config.surface).map_err(anyhow::Error::from)
            });
            match surface {
                Ok(surface) => {
                    log::info!("Presenting through {} surface", surface.backend_name());
                    self.surface = Some(surface);
                    self.window = Some(window);
                }
                Err(e) => {
                    log::error!("Failed to create surface: {e}");
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
            match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            ..
                        },
                    ..
                } => event_loop.exit(),
                WindowEvent::RedrawRequested => {
                    if let Err(e) = self.redraw() {
                        log::error!("Present failed: {e}");
                    }
                }
                _ => {}
            }
        }

        fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }

        fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
            if let Some(surface) = &mut self.surface {
                log::info!("Surface stats: {:?}", surface.stats());
                surface.destroy(None);
            }
        }
    }

    pub fn run(config: AppConfig) -> Result<()> {
        let event_loop = EventLoop::new()?;
        let mut app = App::new(config);
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.headless || !cfg!(windows) {
        return run_headless_mode(&cli, &config);
    }

    #[cfg(windows)]
    native::run(config)?;

    Ok(())
}
