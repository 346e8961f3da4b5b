use std::time::Instant;

use clap::Parser;
use tiny_raytracer_lib::{
    application::{AppState, Application, Layer, Screen, WindowConfig},
    args::CliArgs,
    config::RenderConfig,
    display::{Canvas, InputState, RasterCanvas, Rgba8},
    gpu::FrameBlit,
    renderer::{DrawMode, FrameRenderer, SCREEN_HEIGHT, SCREEN_WIDTH},
    scene::{Orbit, Scene},
    Error,
};
use wgpu::{CommandEncoderDescriptor, TextureViewDescriptor};
use winit::{dpi::PhysicalSize, event::Event};

const TITLE: &str = "TINY_RAY_TRACER";

struct TracerOptions {
    config: RenderConfig,
    draw_mode: DrawMode,
}

struct TinyRayTracer {
    scene: Scene,
    orbit: Orbit,
    config: RenderConfig,
    input: InputState,
    renderer: FrameRenderer,
    canvas: RasterCanvas,
    blit: FrameBlit,
}

impl Layer for TinyRayTracer {
    type Options = TracerOptions;

    fn start(screen: &mut Screen, _app: &AppState, options: TracerOptions) -> Result<Self, Error> {
        let mut canvas = RasterCanvas::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        canvas.clear(Rgba8::BLACK);
        let blit = FrameBlit::new(
            &screen.device,
            &screen.queue,
            screen.config.format,
            canvas.image(),
        );
        tracing::info!(
            scale = options.config.scale(),
            max_depth = options.config.max_depth(),
            draw_mode = ?options.draw_mode,
            "starting renderer"
        );

        Ok(Self {
            scene: Scene::showcase(),
            orbit: Orbit::default(),
            config: options.config,
            input: InputState::new(),
            renderer: FrameRenderer::new(options.draw_mode),
            canvas,
            blit,
        })
    }

    fn process_event(&mut self, event: &Event<()>, _screen: &mut Screen) {
        if let Event::WindowEvent { event, .. } = event {
            self.input.process_event(event);
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>, _app: &AppState, _screen: &mut Screen) {
        tracing::debug!(
            width = new_size.width,
            height = new_size.height,
            "window resized"
        );
    }

    fn update(&mut self, _app: &AppState, _screen: &mut Screen) {
        if let Some(sphere) = self.scene.spheres.first_mut() {
            self.orbit.advance(sphere);
        }
        self.config.apply_keys(&self.input);
        self.input.end_frame();
    }

    fn render(&mut self, app: &AppState, screen: &mut Screen) -> Result<(), wgpu::SurfaceError> {
        let started = Instant::now();
        let rects = self
            .renderer
            .render_into(&self.scene, &self.config, &mut self.canvas);
        tracing::trace!(
            frame = app.frame_count(),
            rects,
            millis = started.elapsed().as_secs_f32() * 1000.0,
            "frame traced"
        );
        self.blit.upload(&screen.queue, self.canvas.image());

        let output = screen.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&TextureViewDescriptor::default());
        let mut encoder = screen
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.blit.draw(&mut encoder, &view, wgpu::Color::BLACK);

        screen.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn shutdown(&mut self, _app: &AppState, _screen: &mut Screen) -> Result<(), Error> {
        tracing::info!("exiting");
        Ok(())
    }
}

fn snapshot(args: &CliArgs, config: RenderConfig) -> Result<(), Error> {
    let Some(path) = args.snapshot.as_ref() else {
        return Ok(());
    };
    let renderer = FrameRenderer::new(args.draw_mode.into());
    let mut canvas = RasterCanvas::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    let started = Instant::now();
    let rects = renderer.render_into(&Scene::showcase(), &config, &mut canvas);
    tracing::info!(
        rects,
        millis = started.elapsed().as_secs_f32() * 1000.0,
        "frame rendered"
    );
    canvas.into_image().save(path)?;
    tracing::info!("snapshot written to {}", path.display());
    Ok(())
}

fn run(args: CliArgs) -> Result<(), Error> {
    let config = args.render_config()?;
    if args.snapshot.is_some() {
        return snapshot(&args, config);
    }

    let window = WindowConfig {
        title: TITLE.to_owned(),
        width: SCREEN_WIDTH,
        height: SCREEN_HEIGHT,
        target_fps: args.fps,
    };
    let options = TracerOptions {
        config,
        draw_mode: args.draw_mode.into(),
    };
    pollster::block_on(Application::<TinyRayTracer>::init(window, options))
}

fn main() {
    let args = CliArgs::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    if let Err(err) = run(args) {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}
