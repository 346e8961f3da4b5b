pub mod application;
pub mod args;
pub mod camera;
pub mod config;
pub mod display;
pub mod error;
pub mod gpu;
pub mod intersect;
pub mod renderer;
pub mod scene;
pub mod shading;
pub mod texture;
pub mod util;

pub use error::Error;
