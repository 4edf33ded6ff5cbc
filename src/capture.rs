use crate::config::{LayerStyle, SimulationConfig};
use crate::field::ParticleField;
use crate::raster::RasterSurface;
use crate::viewport::ViewportMonitor;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Headless run parameters
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frames: usize,
    pub fps: u32,
    pub seed: Option<u64>,
    /// Fixed pointer position in surface space; (0, 0) when absent
    pub pointer: Option<(f32, f32)>,
}

/// What a capture produced
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSummary {
    pub frames_written: usize,
    pub particles: usize,
}

fn is_gif(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"))
}

/// Run the field without a terminal and write the result to disk.
///
/// `.gif` paths get every frame as a looping animation; anything else gets the last frame as PNG.
pub fn run_capture(
    options: &CaptureOptions,
    config: SimulationConfig,
    style: LayerStyle,
) -> Result<CaptureSummary, String> {
    if options.width == 0 || options.height == 0 {
        return Err(format!(
            "Capture size must be non-zero, got {}x{}",
            options.width, options.height
        ));
    }
    // Surface space is addressed through u16 terminal cells
    if options.width > u16::MAX as u32 || options.height > u16::MAX as u32 {
        return Err(format!(
            "Capture size {}x{} exceeds {}x{}",
            options.width,
            options.height,
            u16::MAX,
            u16::MAX
        ));
    }
    if options.frames == 0 {
        return Err("Capture needs at least one frame".to_string());
    }

    let mut field = ParticleField::new(
        config,
        ViewportMonitor::with_pixels(options.width, options.height),
        options.seed,
    );
    if let Some((x, y)) = options.pointer {
        field.pointer.record(x, y);
    }
    let mut surface = RasterSurface::new(options.width, options.height);

    let frames_written = if is_gif(&options.path) {
        write_gif(options, &mut field, &mut surface, &style)?
    } else {
        for _ in 0..options.frames {
            field.tick();
        }
        field.render(&mut surface);
        surface
            .composite(&style)
            .save_with_format(&options.path, image::ImageFormat::Png)
            .map_err(|e| format!("Failed to write PNG {}: {}", options.path.display(), e))?;
        1
    };

    log::info!(
        "captured {} frame(s) of {} particles to {}",
        frames_written,
        field.pool.len(),
        options.path.display()
    );

    Ok(CaptureSummary {
        frames_written,
        particles: field.pool.len(),
    })
}

/// Per-frame GIF delay in hundredths of a second. Players stretch delays under 2 to ~10.
fn gif_delay(fps: u32) -> u16 {
    ((100.0 / fps.max(1) as f32).round() as u16).max(2)
}

fn write_gif(
    options: &CaptureOptions,
    field: &mut ParticleField,
    surface: &mut RasterSurface,
    style: &LayerStyle,
) -> Result<usize, String> {
    let width = u16::try_from(surface.width())
        .map_err(|_| format!("GIF width {} exceeds {}", surface.width(), u16::MAX))?;
    let height = u16::try_from(surface.height())
        .map_err(|_| format!("GIF height {} exceeds {}", surface.height(), u16::MAX))?;

    let file = File::create(&options.path)
        .map_err(|e| format!("Failed to create {}: {}", options.path.display(), e))?;
    let mut encoder = gif::Encoder::new(BufWriter::new(file), width, height, &[])
        .map_err(|e| format!("Failed to start GIF: {}", e))?;
    encoder
        .set_repeat(gif::Repeat::Infinite)
        .map_err(|e| format!("Failed to set GIF looping: {}", e))?;

    let delay = gif_delay(options.fps);

    for _ in 0..options.frames {
        field.tick();
        field.render(surface);

        let mut pixels = surface.composite(style).into_raw();
        let mut frame = gif::Frame::from_rgba_speed(width, height, &mut pixels, 10);
        frame.delay = delay;
        encoder
            .write_frame(&frame)
            .map_err(|e| format!("Failed to write GIF frame: {}", e))?;
    }

    Ok(options.frames)
}
