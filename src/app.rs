use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{Layer, Settings};
use crate::error::GpuError;
use crate::gpu::{GpuContext, Presenter};
use crate::raster::PixelBuffer;
use crate::scheduler::{
    AutomatonBackdrop, Backdrop, ContourBackdrop, FrameScheduler, SystemClock,
};

/// Both backdrops with their own drawing surfaces
struct Layers {
    automaton: AutomatonBackdrop,
    automaton_pixels: PixelBuffer,
    contours: ContourBackdrop,
    contour_pixels: PixelBuffer,
}

impl Layers {
    fn new(settings: &Settings, width: u32, height: u32) -> Self {
        // Separate streams so the noise table doesn't depend on grid size
        let automaton = AutomatonBackdrop::new(
            width,
            height,
            settings.automaton.clone(),
            settings.seed,
        );
        let contours = ContourBackdrop::new(
            width,
            height,
            settings.contours.clone(),
            settings.seed.wrapping_add(1),
        );
        Self {
            automaton,
            automaton_pixels: PixelBuffer::new(width, height),
            contours,
            contour_pixels: PixelBuffer::new(width, height),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.automaton.resize(width, height);
        self.automaton_pixels.resize(width, height);
        self.contours.resize(width, height);
        self.contour_pixels.resize(width, height);
    }

    fn pixels(&self, layer: Layer) -> &PixelBuffer {
        match layer {
            Layer::Automaton => &self.automaton_pixels,
            Layer::Contours => &self.contour_pixels,
        }
    }

    fn name(&self, layer: Layer) -> &'static str {
        match layer {
            Layer::Automaton => self.automaton.name(),
            Layer::Contours => self.contours.name(),
        }
    }
}

/// Application state
pub struct App {
    settings: Settings,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    presenter: Option<Presenter>,
    layers: Option<Layers>,
    scheduler: FrameScheduler<SystemClock>,
    layer: Layer,
    cursor: Option<(f64, f64)>,
    fps_counter: FpsCounter,
    fatal: Option<GpuError>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let layer = settings.layer;
        Self {
            settings,
            window: None,
            gpu: None,
            presenter: None,
            layers: None,
            scheduler: FrameScheduler::new(SystemClock::new()),
            layer,
            cursor: None,
            fps_counter: FpsCounter::new(),
            fatal: None,
        }
    }

    /// GPU failure that stopped the event loop, if any
    pub fn take_error(&mut self) -> Option<GpuError> {
        self.fatal.take()
    }

    fn render(&mut self) {
        let (Some(gpu), Some(presenter), Some(layers)) =
            (self.gpu.as_ref(), self.presenter.as_ref(), self.layers.as_mut())
        else {
            return;
        };

        // Both layers keep animating; only the active one is shown.
        let now = self.scheduler.begin_frame();
        let automaton_drawn = layers.automaton.frame(now, &mut layers.automaton_pixels);
        let contours_drawn = layers.contours.frame(now, &mut layers.contour_pixels);

        let pixels = layers.pixels(self.layer);
        if pixels.width() == 0 || pixels.height() == 0 {
            return;
        }
        let fresh = match self.layer {
            Layer::Automaton => automaton_drawn,
            Layer::Contours => contours_drawn,
        };
        if fresh {
            presenter.upload(&gpu.queue, pixels);
        }

        // Get surface texture
        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure surface
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        presenter.draw(&mut encoder, &view);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "Backdrops - {} - {:.0} FPS",
                    layers.name(self.layer),
                    fps
                ));
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        log::info!("Window resized to {}x{}", width, height);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(presenter) = &mut self.presenter {
                presenter.resize(&gpu.device, width, height);
            }
        }
        if let Some(layers) = &mut self.layers {
            layers.resize(width, height);
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        if key_code != KeyCode::Space {
            return;
        }
        self.layer = self.layer.toggled();
        // Hidden layers keep painting their own buffers, so the newly shown
        // one already holds a current frame.
        if let (Some(gpu), Some(presenter), Some(layers)) =
            (self.gpu.as_ref(), self.presenter.as_ref(), self.layers.as_ref())
        {
            let pixels = layers.pixels(self.layer);
            if pixels.width() > 0 && pixels.height() > 0 {
                presenter.upload(&gpu.queue, pixels);
            }
            log::info!("Switched to {} layer", layers.name(self.layer));
        }
    }

    fn handle_click(&mut self) {
        let (Some((x, y)), Some(layers)) = (self.cursor, self.layers.as_mut()) else {
            return;
        };
        match self.layer {
            Layer::Automaton => layers.automaton.click(x, y),
            Layer::Contours => layers.contours.click(x, y),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing procedural backdrops (seed {})...", self.settings.seed);

        let window_attrs = Window::default_attributes()
            .with_title("Backdrops - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Creating GPU context...");
        let gpu = match pollster::block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("GPU initialization failed: {}", e);
                self.fatal = Some(e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        log::info!("Viewport: {}x{}", size.width, size.height);

        let presenter = Presenter::new(&gpu.device, gpu.format(), size.width, size.height);
        let layers = Layers::new(&self.settings, size.width, size.height);

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Click: Seed or clear cells around the pointer");
        log::info!("  Space: Switch automaton/contours");
        log::info!("  Escape: Quit");

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.presenter = Some(presenter);
        self.layers = Some(layers);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some((position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.handle_click();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size.width, new_size.height);
            }
            WindowEvent::RedrawRequested => {
                self.render();
                // Request another frame immediately
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
