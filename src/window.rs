use std::time::{Duration, Instant};

use minifb::{Key, Scale, Window, WindowOptions};

use crate::{
    display::{FrameBuffer, HEIGHT, WIDTH},
    runner::Frontend,
};

// ~60 fps
const FRAME_INTERVAL: Duration = Duration::from_micros(16600);

const fn from_u16_rgb(r: u16, g: u16, b: u16) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

const LIT: u32 = from_u16_rgb(0, 127, 255);
const DARK: u32 = from_u16_rgb(0, 0, 0);

/// Scaled minifb view of the frame buffer. ESC or closing the window stops the run.
pub struct WindowFrontend {
    window: Window,
    pixel_buffer: Vec<u32>,
    last_sync: Option<Instant>,
}

impl WindowFrontend {
    pub fn new() -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "minichip - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale: Scale::X16,
                ..WindowOptions::default()
            },
        )?;
        window.set_position(500, 300);
        Ok(Self {
            window,
            pixel_buffer: vec![DARK; WIDTH * HEIGHT],
            last_sync: None,
        })
    }

    fn paint(&mut self, fb: &FrameBuffer) {
        for (pixel, lit) in self.pixel_buffer.iter_mut().zip(fb.rows().flatten()) {
            *pixel = if *lit { LIT } else { DARK };
        }
    }
}

impl Frontend for WindowFrontend {
    fn sync(&mut self, fb: &FrameBuffer) -> bool {
        if self
            .last_sync
            .is_some_and(|last| last.elapsed() < FRAME_INTERVAL)
        {
            return true;
        }
        self.last_sync = Some(Instant::now());

        self.paint(fb);
        if let Err(err) = self
            .window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
        {
            log::warn!("window update failed: {err}");
            return false;
        }
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }
}
