use crate::config::{Rgba, SimulationConfig};
use crate::particle::Particle;

/// Anything the particle layer can be drawn onto.
///
/// Coordinates are in surface space (virtual pixels). Colors use straight alpha and are
/// blended source-over onto what is already there.
pub trait Surface {
    /// Make the whole surface transparent
    fn clear(&mut self);
    fn fill_disc(&mut self, x: f32, y: f32, radius: f32, color: Rgba);
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba);
}

/// Alpha of the edge between two particles `distance` apart, or None if they are too far apart
pub fn connection_alpha(distance: f32, config: &SimulationConfig) -> Option<f32> {
    if distance < config.connection_radius {
        Some((1.0 - distance / config.connection_radius) * config.connection_opacity_scale)
    } else {
        None
    }
}

/// Draw one frame: clear, every particle as a disc, then an edge for every close pair.
///
/// Discs use the particle's palette color as-is; the per-particle opacity is not applied.
/// The pair pass is O(n²), fine for the few hundred particles the density formula allows.
pub fn render<S: Surface>(particles: &[Particle], surface: &mut S, config: &SimulationConfig) {
    surface.clear();

    for p in particles {
        surface.fill_disc(p.x, p.y, p.radius, p.color);
    }

    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let dx = a.x - b.x;
            let dy = a.y - b.y;
            let distance = (dx * dx + dy * dy).sqrt();

            if let Some(alpha) = connection_alpha(distance, config) {
                surface.stroke_line(
                    (a.x, a.y),
                    (b.x, b.y),
                    config.connection_width,
                    config.connection_color.with_alpha(alpha),
                );
            }
        }
    }
}
