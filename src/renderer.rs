use glam::Vec3;
use rayon::prelude::*;

use crate::{
    camera::Camera,
    config::RenderConfig,
    display::{Canvas, FillRect, Rgba8},
    scene::Scene,
    shading::cast_ray,
};

pub const SCREEN_WIDTH: u32 = 1024;
pub const SCREEN_HEIGHT: u32 = 768;

/// Colors of the reduced grid, row-major with a stride of `width`.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec3>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; width as usize * height as usize],
        }
    }

    pub fn get(&self, i: u32, j: u32) -> Vec3 {
        self.pixels[(j * self.width + i) as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Vec3]> {
        self.pixels.chunks(self.width.max(1) as usize)
    }
}

/// How a traced framebuffer becomes draw commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Same-colored neighbours in a row merge into one rectangle.
    #[default]
    Runs,
    /// One rectangle per macro-pixel.
    Cells,
}

#[derive(Debug, Clone)]
pub struct FrameRenderer {
    pub screen_width: u32,
    pub screen_height: u32,
    pub camera: Camera,
    pub draw_mode: DrawMode,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            camera: Camera::default(),
            draw_mode: DrawMode::default(),
        }
    }
}

impl FrameRenderer {
    pub fn new(draw_mode: DrawMode) -> Self {
        Self {
            draw_mode,
            ..Default::default()
        }
    }

    /// Size of the reduced grid for the given config.
    pub fn grid_size(&self, config: &RenderConfig) -> (u32, u32) {
        let scale = config.scale();
        debug_assert!(self.screen_width % scale == 0 && self.screen_height % scale == 0);
        (self.screen_width / scale, self.screen_height / scale)
    }

    /// Shades every cell of the reduced grid. Rows are traced in parallel,
    /// each writing only its own slice.
    pub fn trace(&self, scene: &Scene, config: &RenderConfig) -> Framebuffer {
        let (width, height) = self.grid_size(config);
        let max_depth = config.max_depth();
        let mut framebuffer = Framebuffer::new(width, height);
        framebuffer
            .pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(j, row)| {
                for (i, pixel) in row.iter_mut().enumerate() {
                    let dir = self
                        .camera
                        .primary_direction(i as u32, j as u32, width, height);
                    *pixel = cast_ray(Camera::EYE, dir, scene, 0, max_depth);
                }
            });
        framebuffer
    }

    pub fn render(&self, scene: &Scene, config: &RenderConfig) -> Vec<FillRect> {
        let framebuffer = self.trace(scene, config);
        match self.draw_mode {
            DrawMode::Runs => compact(&framebuffer, config.scale()),
            DrawMode::Cells => cells(&framebuffer, config.scale()),
        }
    }

    /// Renders a frame and issues its draw commands. Returns how many
    /// rectangles were drawn.
    pub fn render_into(&self, scene: &Scene, config: &RenderConfig, canvas: &mut impl Canvas) -> usize {
        let commands = self.render(scene, config);
        canvas.clear(Rgba8::BLACK);
        for rect in &commands {
            canvas.draw_filled_rect(rect);
        }
        commands.len()
    }
}

/// Merges runs of identical colors along each row into rectangles scaled
/// back up to screen pixels.
pub fn compact(framebuffer: &Framebuffer, scale: u32) -> Vec<FillRect> {
    let mut commands = Vec::new();
    for (j, row) in framebuffer.rows().enumerate() {
        let y = j as u32 * scale;
        let mut start = 0;
        for i in 1..=row.len() {
            if i == row.len() || row[i] != row[start] {
                commands.push(FillRect {
                    x: start as u32 * scale,
                    y,
                    width: (i - start) as u32 * scale,
                    height: scale,
                    color: to_rgba8(row[start]),
                });
                start = i;
            }
        }
    }
    commands
}

/// One rectangle per cell, without merging.
pub fn cells(framebuffer: &Framebuffer, scale: u32) -> Vec<FillRect> {
    framebuffer
        .rows()
        .enumerate()
        .flat_map(|(j, row)| {
            row.iter().enumerate().map(move |(i, color)| FillRect {
                x: i as u32 * scale,
                y: j as u32 * scale,
                width: scale,
                height: scale,
                color: to_rgba8(*color),
            })
        })
        .collect()
}

/// Brings a shaded color into displayable range. Colors brighter than 1 are
/// divided by their largest channel so the hue survives.
pub fn to_rgba8(color: Vec3) -> Rgba8 {
    let max = color.max_element();
    let color = if max > 1.0 { color / max } else { color };
    let channel = |c: f32| (255.0 * c.clamp(0.0, 1.0)) as u8;
    Rgba8::rgb(channel(color.x), channel(color.y), channel(color.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{display::RasterCanvas, shading::BACKGROUND};
    use proptest::prelude::*;

    fn coverage(rects: &[FillRect], width: u32, height: u32) -> Vec<u32> {
        let mut hits = vec![0u32; (width * height) as usize];
        for r in rects {
            for y in r.y..r.y + r.height {
                for x in r.x..r.x + r.width {
                    hits[(y * width + x) as usize] += 1;
                }
            }
        }
        hits
    }

    #[test]
    fn to_rgba8_normalizes_bright_colors() {
        assert_eq!(to_rgba8(Vec3::new(2.0, 1.0, 0.0)), Rgba8::rgb(255, 127, 0));
        assert_eq!(to_rgba8(Vec3::new(0.5, 0.0, 1.0)), Rgba8::rgb(127, 0, 255));
        assert_eq!(to_rgba8(Vec3::new(-1.0, 0.0, 0.0)), Rgba8::rgb(0, 0, 0));
    }

    #[test]
    fn compact_merges_runs_per_row() {
        let (a, b) = (Vec3::new(0.1, 0.2, 0.3), Vec3::new(0.9, 0.8, 0.7));
        let framebuffer = Framebuffer {
            width: 4,
            height: 2,
            pixels: vec![a, a, b, b, b, b, b, a],
        };
        let rects = compact(&framebuffer, 2);
        assert_eq!(rects.len(), 4);
        assert_eq!((rects[0].x, rects[0].y, rects[0].width), (0, 0, 4));
        assert_eq!((rects[1].x, rects[1].width), (4, 4));
        assert_eq!((rects[2].x, rects[2].y, rects[2].width), (0, 2, 6));
        assert_eq!((rects[3].x, rects[3].width), (6, 2));
        assert!(rects.iter().all(|r| r.height == 2));
    }

    #[test]
    fn runs_do_not_cross_rows() {
        let a = Vec3::splat(0.5);
        let framebuffer = Framebuffer {
            width: 3,
            height: 3,
            pixels: vec![a; 9],
        };
        let rects = compact(&framebuffer, 4);
        assert_eq!(rects.len(), 3);
        assert!(rects.iter().all(|r| r.x == 0 && r.width == 12));
    }

    #[test]
    fn cells_emit_one_rect_per_pixel() {
        let framebuffer = Framebuffer::new(5, 3);
        let rects = cells(&framebuffer, 2);
        assert_eq!(rects.len(), 15);
        assert!(coverage(&rects, 10, 6).iter().all(|&n| n == 1));
    }

    #[test]
    fn trace_uses_reduced_grid() {
        let renderer = FrameRenderer::default();
        let config = RenderConfig::new(16, 1).unwrap();
        let framebuffer = renderer.trace(&Scene::default(), &config);
        assert_eq!((framebuffer.width, framebuffer.height), (64, 48));
        assert_eq!(framebuffer.pixels.len(), 64 * 48);
        // Top row looks into the sky, nothing to hit.
        assert!(framebuffer.rows().next().unwrap().iter().all(|c| *c == BACKGROUND));
    }

    #[test]
    fn every_scale_tiles_the_screen() {
        let renderer = FrameRenderer::default();
        let scene = Scene::showcase();
        for scale in [16, 8] {
            let config = RenderConfig::new(scale, 1).unwrap();
            let rects = renderer.render(&scene, &config);
            let hits = coverage(&rects, SCREEN_WIDTH, SCREEN_HEIGHT);
            assert!(hits.iter().all(|&n| n == 1), "scale {scale} leaves gaps or overlaps");
        }
    }

    #[test]
    fn runs_and_cells_paint_the_same_image() {
        let scene = Scene::showcase();
        let config = RenderConfig::new(16, 2).unwrap();

        let mut runs = RasterCanvas::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let run_count = FrameRenderer::new(DrawMode::Runs).render_into(&scene, &config, &mut runs);
        let mut cells = RasterCanvas::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let cell_count = FrameRenderer::new(DrawMode::Cells).render_into(&scene, &config, &mut cells);

        assert_eq!(cell_count, 64 * 48);
        assert!(run_count < cell_count);
        assert_eq!(runs.image(), cells.image());
    }

    #[test]
    fn showcase_frame_has_background_and_objects() {
        let renderer = FrameRenderer::default();
        let config = RenderConfig::new(16, 2).unwrap();
        let framebuffer = renderer.trace(&Scene::showcase(), &config);
        let background = framebuffer.pixels.iter().filter(|c| **c == BACKGROUND).count();
        assert!(background > 0);
        assert!(background < framebuffer.pixels.len());
    }

    fn arb_framebuffer() -> impl Strategy<Value = Framebuffer> {
        (1u32..12, 1u32..8).prop_flat_map(|(w, h)| {
            // Few distinct colors so runs actually form.
            let palette = prop_oneof![
                Just(Vec3::ZERO),
                Just(Vec3::new(0.2, 0.7, 0.8)),
                Just(Vec3::new(3.0, 1.0, 0.5)),
                (-1.0f32..4.0, -1.0f32..4.0, -1.0f32..4.0).prop_map(|(r, g, b)| Vec3::new(r, g, b)),
            ];
            prop::collection::vec(palette, (w * h) as usize).prop_map(move |pixels| Framebuffer {
                width: w,
                height: h,
                pixels,
            })
        })
    }

    proptest! {
        #[test]
        fn compaction_tiles_grid_exactly(framebuffer in arb_framebuffer(), scale_exp in 0u32..5) {
            let scale = 1 << scale_exp;
            let rects = compact(&framebuffer, scale);
            let hits = coverage(&rects, framebuffer.width * scale, framebuffer.height * scale);
            prop_assert!(hits.iter().all(|&n| n == 1));
            prop_assert!(rects.len() <= framebuffer.pixels.len());
            let area: u64 = rects.iter().map(FillRect::area).sum();
            prop_assert_eq!(area, framebuffer.pixels.len() as u64 * (scale * scale) as u64);
            for r in &rects {
                prop_assert_eq!(r.color.0[3], 255);
                prop_assert_eq!(r.x % scale, 0);
                prop_assert_eq!(r.height, scale);
            }
        }

        #[test]
        fn compaction_preserves_cell_colors(framebuffer in arb_framebuffer()) {
            let rects = compact(&framebuffer, 1);
            for r in &rects {
                for x in r.x..r.x + r.width {
                    prop_assert_eq!(r.color, to_rgba8(framebuffer.get(x, r.y)));
                }
            }
        }
    }
}
