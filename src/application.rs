use std::time::{Duration, Instant};

use wgpu::SurfaceError;
use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};

use crate::error::Error;

/// Window parameters fixed for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub target_fps: u32,
}

#[derive(Debug)]
pub struct AppState {
    previous_time: Instant,
    /// Seconds between the two most recent frames.
    elapsed_time: f32,
    frame_count: u64,
    stats_start: Instant,
    stats_frames: u32,
    fps: f32,
}

impl AppState {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            previous_time: now,
            elapsed_time: 0.0,
            frame_count: 0,
            stats_start: now,
            stats_frames: 0,
            fps: 0.0,
        }
    }

    /// Advances the frame clock. Returns true once per second, when the
    /// frame rate estimate is refreshed.
    pub fn update(&mut self) -> bool {
        let current_time = Instant::now();
        self.elapsed_time = current_time
            .duration_since(self.previous_time)
            .as_secs_f32();
        self.previous_time = current_time;
        self.frame_count += 1;
        self.stats_frames += 1;

        let window = current_time.duration_since(self.stats_start);
        if window >= Duration::from_secs(1) {
            self.fps = self.stats_frames as f32 / window.as_secs_f32();
            self.stats_frames = 0;
            self.stats_start = current_time;
            true
        } else {
            false
        }
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Application<L: Layer + 'static> {
    layer: Option<L>,
    options: Option<L::Options>,
    screen: Screen,
    state: AppState,
    frame_period: Duration,
    next_frame: Instant,
}

impl<L: Layer + 'static> Application<L> {
    pub fn new(screen: Screen, target_fps: u32, options: L::Options) -> Self {
        Self {
            screen,
            layer: None,
            options: Some(options),
            state: AppState::new(),
            frame_period: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            next_frame: Instant::now(),
        }
    }

    fn shutdown(&mut self, control_flow: &mut ControlFlow) {
        control_flow.set_exit_with_code(0);
        if let Some(layer) = self.layer.as_mut() {
            if let Err(err) = layer.shutdown(&self.state, &mut self.screen) {
                tracing::error!("shutdown failed: {}", err);
                control_flow.set_exit_with_code(1);
            }
        }
    }

    fn run(
        &mut self,
        event: Event<()>,
        _event_loop: &EventLoopWindowTarget<()>,
        control_flow: &mut ControlFlow,
    ) {
        control_flow.set_wait_until(self.next_frame);

        if let Some(layer) = self.layer.as_mut() {
            layer.process_event(&event, &mut self.screen);
        }

        match event {
            Event::NewEvents(StartCause::Init) => {
                let Some(options) = self.options.take() else {
                    return;
                };
                match L::start(&mut self.screen, &self.state, options) {
                    Ok(layer) => self.layer = Some(layer),
                    Err(err) => {
                        tracing::error!("failed to start: {}", err);
                        control_flow.set_exit_with_code(1);
                    }
                }
            }
            Event::WindowEvent {
                window_id,
                ref event,
            } if self.screen.window().id() == window_id => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            ..
                        },
                    ..
                } => self.shutdown(control_flow),
                WindowEvent::Resized(physical_size) => {
                    self.screen.resize(*physical_size);
                    if let Some(layer) = self.layer.as_mut() {
                        layer.resize(*physical_size, &self.state, &mut self.screen);
                    }
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    self.screen.resize(**new_inner_size);
                    if let Some(layer) = self.layer.as_mut() {
                        layer.resize(**new_inner_size, &self.state, &mut self.screen);
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                let now = Instant::now();
                if now >= self.next_frame {
                    if self.state.update() {
                        tracing::debug!(
                            fps = self.state.fps(),
                            frame = self.state.frame_count(),
                            "frame rate"
                        );
                    }
                    self.screen.window().request_redraw();
                    self.next_frame = now + self.frame_period;
                }
                control_flow.set_wait_until(self.next_frame);
            }
            Event::RedrawRequested(window_id) if self.screen.window().id() == window_id => {
                let Some(layer) = self.layer.as_mut() else {
                    return;
                };
                layer.update(&self.state, &mut self.screen);

                match layer.render(&self.state, &mut self.screen) {
                    Ok(_) => {}
                    Err(SurfaceError::Lost) => self.screen.resize_to_current(),
                    Err(SurfaceError::OutOfMemory) => control_flow.set_exit_with_code(137),
                    Err(e) => tracing::error!("{:?}", e),
                }
            }
            _ => {}
        }
    }

    /// Opens the window and drives `L` until the window closes. Only returns
    /// if the window or the GPU device cannot be set up.
    pub async fn init(window: WindowConfig, options: L::Options) -> Result<(), Error> {
        let event_loop = EventLoop::new();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let screen = Screen::new(&event_loop, &instance, &window).await?;
        tracing::info!(
            width = window.width,
            height = window.height,
            fps = window.target_fps,
            "window created"
        );
        let mut application = Self::new(screen, window.target_fps, options);
        event_loop.run(move |event, event_loop, control_flow| {
            application.run(event, event_loop, control_flow);
        });
    }
}

pub struct Screen {
    pub surface: wgpu::Surface,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    window: Window,
}

impl Screen {
    pub async fn new(
        event_loop: &EventLoopWindowTarget<()>,
        instance: &wgpu::Instance,
        window_config: &WindowConfig,
    ) -> Result<Self, Error> {
        let window = WindowBuilder::new()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height))
            .build(event_loop)?;

        // SAFETY:
        // The surface needs to live as long as the window that created it.
        // Screen owns the window so this should be safe.
        let surface = unsafe { instance.create_surface(&window) }?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(Error::NoAdapter)?;
        tracing::info!("using adapter {:?}", adapter.get_info().name);
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                    label: None,
                },
                None,
            )
            .await?;
        let size = window.inner_size();
        let config = surface
            .get_default_config(&adapter, size.width, size.height)
            .ok_or(Error::UnsupportedSurface)?;
        surface.configure(&device, &config);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resize the screen to new window size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Resize the screen to current window inner size.
    pub fn resize_to_current(&mut self) {
        self.resize(self.window.inner_size());
    }
}

pub trait Layer: Sized {
    /// Startup parameters handed to [`Layer::start`].
    type Options: 'static;

    fn start(screen: &mut Screen, app: &AppState, options: Self::Options) -> Result<Self, Error>;
    fn process_event(&mut self, event: &Event<()>, screen: &mut Screen);
    fn resize(&mut self, new_size: PhysicalSize<u32>, app: &AppState, screen: &mut Screen);
    fn update(&mut self, app: &AppState, screen: &mut Screen);
    fn render(&mut self, app: &AppState, screen: &mut Screen) -> Result<(), SurfaceError>;
    fn shutdown(&mut self, app: &AppState, screen: &mut Screen) -> Result<(), Error>;
}
