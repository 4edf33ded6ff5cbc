use crate::config::{LayerStyle, Rgba};
use crate::render::Surface;
use image::RgbaImage;

/// Off-screen pixel canvas with real alpha, used for headless captures
pub struct RasterSurface {
    width: u32,
    height: u32,
    /// Premultiplied RGBA, row-major
    pixels: Vec<[f32; 4]>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied coverage of one pixel
    #[cfg(test)]
    pub fn alpha_at(&self, x: u32, y: u32) -> f32 {
        self.pixels[(y * self.width + x) as usize][3]
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let keep = 1.0 - a;
        let px = &mut self.pixels[y as usize * self.width as usize + x as usize];
        px[0] = color.r as f32 / 255.0 * a + px[0] * keep;
        px[1] = color.g as f32 / 255.0 * a + px[1] * keep;
        px[2] = color.b as f32 / 255.0 * a + px[2] * keep;
        px[3] = a + px[3] * keep;
    }

    /// Flatten the layer over the background at the layer opacity
    pub fn composite(&self, style: &LayerStyle) -> RgbaImage {
        let bg = [
            style.background.r as f32 / 255.0,
            style.background.g as f32 / 255.0,
            style.background.b as f32 / 255.0,
        ];
        let opacity = style.opacity.clamp(0.0, 1.0);

        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let px = self.pixels[(y * self.width + x) as usize];
            let keep = 1.0 - px[3] * opacity;
            let channel = |i: usize| {
                ((px[i] * opacity + bg[i] * keep) * 255.0)
                    .round()
                    .clamp(0.0, 255.0) as u8
            };
            image::Rgba([channel(0), channel(1), channel(2), 255])
        })
    }
}

impl Surface for RasterSurface {
    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    fn fill_disc(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        let r = radius.max(0.0);
        let r_sq = r * r;
        let mut hit = false;

        for py in (y - r).floor() as i64..=(y + r).ceil() as i64 {
            for px in (x - r).floor() as i64..=(x + r).ceil() as i64 {
                let dx = px as f32 + 0.5 - x;
                let dy = py as f32 + 0.5 - y;
                if dx * dx + dy * dy <= r_sq {
                    self.blend(px, py, color, color.a);
                    hit = true;
                }
            }
        }

        // Sub-pixel discs still cover the pixel they sit in
        if !hit {
            self.blend(x.floor() as i64, y.floor() as i64, color, color.a);
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba) {
        // Hairlines thinner than a pixel cover it partially
        let alpha = color.a * width.clamp(0.0, 1.0);
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        let mut last = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let px = (from.0 + dx * t).floor() as i64;
            let py = (from.1 + dy * t).floor() as i64;
            if last != Some((px, py)) {
                self.blend(px, py, color, alpha);
                last = Some((px, py));
            }
        }
    }
}
