use serde::Serialize;
use std::ops::RangeInclusive;

/// RGBA color with straight (non-premultiplied) alpha in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Linear blend from `self` toward `other` by `t` (0.0 = self, 1.0 = other)
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Fixed constants governing density, forces, damping, ranges and palette.
///
/// These are compile-time values; nothing reads them from disk.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationConfig {
    /// Viewport area (px²) per particle
    pub density_divisor: f32,
    /// Pointer pull reaches this far (px)
    pub attraction_radius: f32,
    /// Velocity added per frame at zero distance
    pub attraction_strength: f32,
    /// Velocity multiplier applied every frame (< 1)
    pub damping: f32,
    /// Two particles closer than this are joined by an edge (px)
    pub connection_radius: f32,
    /// Edge alpha at zero distance
    pub connection_opacity_scale: f32,
    pub connection_color: Rgba,
    pub connection_width: f32,
    /// Initial velocity components are drawn from [-jitter, jitter]
    pub velocity_jitter: f32,
    pub radius_range: RangeInclusive<f32>,
    pub opacity_range: RangeInclusive<f32>,
    pub palette: &'static [Rgba],
}

pub const PALETTE: [Rgba; 3] = [
    Rgba::new(0, 255, 255, 0.15),   // cyan
    Rgba::new(138, 43, 226, 0.12),  // purple
    Rgba::new(147, 112, 219, 0.12), // violet
];

impl SimulationConfig {
    pub const DEFAULT: SimulationConfig = SimulationConfig {
        density_divisor: 15000.0,
        attraction_radius: 150.0,
        attraction_strength: 0.01,
        damping: 0.99,
        connection_radius: 100.0,
        connection_opacity_scale: 0.05,
        connection_color: Rgba::opaque(0, 255, 255),
        connection_width: 0.5,
        velocity_jitter: 0.15,
        radius_range: 0.5..=2.5,
        opacity_range: 0.2..=0.7,
        palette: &PALETTE,
    };

    /// Compiled-in configuration as pretty JSON
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {}", e))
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How the particle layer is composited under the page content
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LayerStyle {
    /// Opacity of the whole particle layer over the background
    pub opacity: f32,
    pub background: Rgba,
    /// Terminal cells cannot carry sub-percent alpha; faint strokes are scaled up by this much
    pub terminal_gain: f32,
}

impl LayerStyle {
    pub const DEFAULT: LayerStyle = LayerStyle {
        opacity: 0.3,
        background: Rgba::opaque(8, 8, 16),
        terminal_gain: 12.0,
    };
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}
