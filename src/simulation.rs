use crate::config::SimulationConfig;
use crate::particle::Particle;
use crate::pointer::PointerSample;
use crate::viewport::ViewportDimensions;

/// Velocity impulse pulling a particle at (x, y) toward the pointer.
///
/// Linear falloff: full `attraction_strength` next to the pointer, zero at or beyond
/// `attraction_radius`. A particle exactly on the pointer gets nothing (no direction).
pub fn attraction(x: f32, y: f32, pointer: PointerSample, config: &SimulationConfig) -> (f32, f32) {
    let dx = pointer.x - x;
    let dy = pointer.y - y;
    let dist = (dx * dx + dy * dy).sqrt();

    if dist > 0.0 && dist < config.attraction_radius {
        let force = (config.attraction_radius - dist) / config.attraction_radius;
        let scale = force * config.attraction_strength / dist;
        (dx * scale, dy * scale)
    } else {
        (0.0, 0.0)
    }
}

/// Advance one particle by one frame.
///
/// Order matters: integrate, attract, damp, flip velocity if outside, then clamp.
/// The flip test runs before the clamp, so a particle sitting on an edge can keep
/// reversing without moving.
pub fn step_particle(
    particle: &mut Particle,
    pointer: PointerSample,
    bounds: ViewportDimensions,
    config: &SimulationConfig,
) {
    // One implicit time unit per frame
    particle.x += particle.vx;
    particle.y += particle.vy;

    let (ax, ay) = attraction(particle.x, particle.y, pointer, config);
    particle.vx += ax;
    particle.vy += ay;

    particle.vx *= config.damping;
    particle.vy *= config.damping;

    if particle.x < 0.0 || particle.x > bounds.width {
        particle.vx = -particle.vx;
    }
    if particle.y < 0.0 || particle.y > bounds.height {
        particle.vy = -particle.vy;
    }

    particle.x = particle.x.clamp(0.0, bounds.width.max(0.0));
    particle.y = particle.y.clamp(0.0, bounds.height.max(0.0));
}

/// Advance every particle by one frame
pub fn step(
    particles: &mut [Particle],
    pointer: PointerSample,
    bounds: ViewportDimensions,
    config: &SimulationConfig,
) {
    for particle in particles.iter_mut() {
        step_particle(particle, pointer, bounds, config);
    }
}
