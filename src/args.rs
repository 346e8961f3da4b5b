use std::path::PathBuf;

use crate::{config::RenderConfig, renderer::DrawMode};

/// Command line interface arguments.
#[derive(clap::Parser, Debug)]
#[clap(
    author,
    version,
    about = "Interactive recursive ray tracer of a small sphere scene."
)]
pub struct CliArgs {
    /// Initial detail scale: one ray per `scale x scale` screen pixels.
    #[clap(long, default_value_t = 8, value_parser = parse_scale)]
    pub scale: u32,

    /// Initial recursion depth for reflection and refraction rays.
    #[clap(long, default_value_t = 4, value_parser = parse_depth)]
    pub max_depth: u32,

    #[clap(long, default_value_t = 60, help = "Target frames per second")]
    pub fps: u32,

    #[clap(long, value_enum, default_value_t = DrawModeArg::Runs)]
    pub draw_mode: DrawModeArg,

    /// Render a single frame to this PNG file and exit without opening a window.
    #[clap(long)]
    pub snapshot: Option<PathBuf>,

    #[clap(short, long, help = "Use verbose output (log level = debug)")]
    pub verbose: bool,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawModeArg {
    /// Merge same-colored neighbours into one rectangle.
    Runs,
    /// One rectangle per macro-pixel.
    Cells,
}

impl From<DrawModeArg> for DrawMode {
    fn from(arg: DrawModeArg) -> Self {
        match arg {
            DrawModeArg::Runs => DrawMode::Runs,
            DrawModeArg::Cells => DrawMode::Cells,
        }
    }
}

impl CliArgs {
    pub fn render_config(&self) -> Result<RenderConfig, crate::config::ConfigError> {
        RenderConfig::new(self.scale, self.max_depth)
    }
}

fn parse_scale(s: &str) -> Result<u32, String> {
    let scale = s.parse::<u32>().map_err(|e| e.to_string())?;
    RenderConfig::check_scale(scale).map_err(|e| e.to_string())
}

fn parse_depth(s: &str) -> Result<u32, String> {
    let depth = s.parse::<u32>().map_err(|e| e.to_string())?;
    RenderConfig::check_depth(depth).map_err(|e| e.to_string())
}
