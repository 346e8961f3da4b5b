//! Drawing and input surface the frame renderer talks to.
//!
//! The window backend lives in [`crate::application`]; everything here is
//! plain data plus an in-memory canvas so frames can be produced without a
//! window.

use image::{Rgba, RgbaImage};
use winit::event::{ElementState, KeyboardInput, VirtualKeyCode, WindowEvent};

/// 8-bit RGBA color as consumed by the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8(pub [u8; 4]);

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8([0, 0, 0, 255]);

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }
}

/// Axis aligned rectangle in screen pixels, filled with one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: Rgba8,
}

impl FillRect {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

pub trait Canvas {
    fn clear(&mut self, color: Rgba8);
    fn draw_filled_rect(&mut self, rect: &FillRect);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ScaleDown,
    ScaleUp,
    DepthDown,
    DepthUp,
}

impl Key {
    const COUNT: usize = 4;

    pub fn from_keycode(keycode: VirtualKeyCode) -> Option<Self> {
        match keycode {
            VirtualKeyCode::Left => Some(Key::ScaleDown),
            VirtualKeyCode::Right => Some(Key::ScaleUp),
            VirtualKeyCode::Down => Some(Key::DepthDown),
            VirtualKeyCode::Up => Some(Key::DepthUp),
            _ => None,
        }
    }
}

/// Source of edge-triggered key presses for the current frame.
pub trait KeyInput {
    fn key_pressed(&self, key: Key) -> bool;
}

/// Tracks which keys went down since the last [`InputState::end_frame`].
///
/// Auto-repeat events are ignored: a key must be released before it can
/// register another press.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    held: [bool; Key::COUNT],
    pressed: [bool; Key::COUNT],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the event was a key this state cares about.
    pub fn process_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(keycode),
                        ..
                    },
                ..
            } => match Key::from_keycode(*keycode) {
                Some(key) => {
                    self.set(key, *state == ElementState::Pressed);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    pub fn set(&mut self, key: Key, down: bool) {
        let idx = key as usize;
        if down && !self.held[idx] {
            self.pressed[idx] = true;
        }
        self.held[idx] = down;
    }

    pub fn end_frame(&mut self) {
        self.pressed = [false; Key::COUNT];
    }
}

impl KeyInput for InputState {
    fn key_pressed(&self, key: Key) -> bool {
        self.pressed[key as usize]
    }
}

/// Canvas backed by an RGBA image. Rectangles are clipped to the image.
pub struct RasterCanvas {
    image: RgbaImage,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl Canvas for RasterCanvas {
    fn clear(&mut self, color: Rgba8) {
        self.image
            .pixels_mut()
            .for_each(|pixel| *pixel = Rgba(color.0));
    }

    fn draw_filled_rect(&mut self, rect: &FillRect) {
        let x_end = rect.x.saturating_add(rect.width).min(self.image.width());
        let y_end = rect.y.saturating_add(rect.height).min(self.image.height());
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                self.image.put_pixel(x, y, Rgba(rect.color.0));
            }
        }
    }
}
