//! Snowfall: the decorative overlay drawn behind every screen.
//!
//! Generation is pure given an RNG: a fixed number of particles, each field
//! an independent uniform draw over its range. A [`Snowfall`] is created
//! once per mounted scene and never shared. Drawing is a function of the
//! particles and the elapsed time since mount.

use std::f64::consts::TAU;
use std::time::Duration;

use rand::Rng;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use crate::tui::theme;

/// Default count for the general-purpose overlay.
pub const OVERLAY_COUNT: usize = 50;

/// Default count for the loading screen's inline variant.
pub const INLINE_COUNT: usize = 45;

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// One flake.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: usize,
    /// Horizontal position, percent of the width.
    pub left: f64,
    /// Seconds before the flake first appears.
    pub delay: f64,
    /// Seconds for one top-to-bottom fall.
    pub duration: f64,
    pub size: f64,
    pub opacity: f64,
}

/// Half-open `[min, max)` range. `min == max` pins the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Bounds { min, max }
    }

    pub const fn fixed(value: f64) -> Self {
        Bounds { min: value, max: value }
    }

    pub fn contains(&self, value: f64) -> bool {
        if self.max <= self.min {
            value == self.min
        } else {
            value >= self.min && value < self.max
        }
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min..self.max)
        }
    }
}

/// Bounds for every particle field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleRanges {
    pub left: Bounds,
    pub delay: Bounds,
    pub duration: Bounds,
    pub size: Bounds,
    pub opacity: Bounds,
}

impl ParticleRanges {
    /// The general-purpose overlay.
    pub const OVERLAY: ParticleRanges = ParticleRanges {
        left: Bounds::new(0.0, 100.0),
        delay: Bounds::new(0.0, 2.0),
        duration: Bounds::new(8.0, 12.0),
        size: Bounds::new(4.0, 12.0),
        opacity: Bounds::new(0.3, 1.0),
    };

    /// The loading screen's simpler variant: uniform small dots.
    pub const INLINE: ParticleRanges = ParticleRanges {
        left: Bounds::new(0.0, 100.0),
        delay: Bounds::new(0.0, 5.0),
        duration: Bounds::new(4.0, 10.0),
        size: Bounds::fixed(4.0),
        opacity: Bounds::fixed(0.8),
    };

    pub fn contains(&self, p: &Particle) -> bool {
        self.left.contains(p.left)
            && self.delay.contains(p.delay)
            && self.duration.contains(p.duration)
            && self.size.contains(p.size)
            && self.opacity.contains(p.opacity)
    }
}

/// Draw `count` particles from `ranges`.
pub fn generate<R: Rng>(count: usize, ranges: &ParticleRanges, rng: &mut R) -> Vec<Particle> {
    (0..count)
        .map(|id| Particle {
            id,
            left: ranges.left.sample(rng),
            delay: ranges.delay.sample(rng),
            duration: ranges.duration.sample(rng),
            size: ranges.size.sample(rng),
            opacity: ranges.opacity.sample(rng),
        })
        .collect()
}

// ============================================================================
// SNOWFALL
// ============================================================================

/// A mounted snowfall: particles generated once, drawn many times.
#[derive(Debug, Clone, PartialEq)]
pub struct Snowfall {
    particles: Vec<Particle>,
}

impl Snowfall {
    pub fn overlay<R: Rng>(count: usize, rng: &mut R) -> Self {
        Snowfall {
            particles: generate(count, &ParticleRanges::OVERLAY, rng),
        }
    }

    pub fn inline<R: Rng>(count: usize, rng: &mut R) -> Self {
        Snowfall {
            particles: generate(count, &ParticleRanges::INLINE, rng),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// A widget drawing this snowfall as it looks `elapsed` after mount.
    pub fn at(&self, elapsed: Duration) -> SnowLayer<'_> {
        SnowLayer {
            snowfall: self,
            elapsed,
        }
    }
}

/// Where a flake is on screen, in cells relative to the area.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    x: u16,
    y: u16,
    opacity: f64,
}

fn place(p: &Particle, elapsed: f64, width: u16, height: u16) -> Option<Placement> {
    if width == 0 || height == 0 || elapsed < p.delay || p.duration <= 0.0 {
        return None;
    }

    let t = elapsed - p.delay;
    let phase = (t % p.duration) / p.duration;

    // Drift right over the fall, plus a sway at twice the fall frequency.
    let w = f64::from(width);
    let drift = phase * w * 0.08;
    let sway = (TAU * t / (p.duration * 0.5)).sin() * 1.5;
    let x = (p.left / 100.0 * w + drift + sway).rem_euclid(w);
    let y = phase * f64::from(height);

    // Fade in over the first tenth of the fall, out over the last.
    let fade = if phase < 0.1 {
        phase / 0.1
    } else if phase > 0.9 {
        (1.0 - phase) / 0.1
    } else {
        1.0
    };

    Some(Placement {
        x: (x as u16).min(width - 1),
        y: (y as u16).min(height - 1),
        opacity: p.opacity * fade,
    })
}

fn glyph(size: f64) -> char {
    if size < 6.0 {
        '·'
    } else if size < 9.0 {
        '•'
    } else {
        '❄'
    }
}

/// Snowfall frozen at one instant, renderable with ratatui.
pub struct SnowLayer<'a> {
    snowfall: &'a Snowfall,
    elapsed: Duration,
}

impl Widget for SnowLayer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let elapsed = self.elapsed.as_secs_f64();
        for particle in &self.snowfall.particles {
            let Some(spot) = place(particle, elapsed, area.width, area.height) else {
                continue;
            };
            if spot.opacity < 0.15 {
                continue;
            }
            if let Some(cell) = buf.cell_mut((area.x + spot.x, area.y + spot.y)) {
                cell.set_char(glyph(particle.size))
                    .set_style(theme::snow_style(spot.opacity));
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn overlay_has_default_count_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let snow = Snowfall::overlay(OVERLAY_COUNT, &mut rng);
        assert_eq!(snow.particles().len(), 50);
        for p in snow.particles() {
            assert!(ParticleRanges::OVERLAY.contains(p), "out of range: {:?}", p);
        }
    }

    #[test]
    fn inline_has_default_count_with_fixed_size() {
        let mut rng = StdRng::seed_from_u64(11);
        let snow = Snowfall::inline(INLINE_COUNT, &mut rng);
        assert_eq!(snow.particles().len(), 45);
        for p in snow.particles() {
            assert!(ParticleRanges::INLINE.contains(p), "out of range: {:?}", p);
            assert_eq!(p.size, 4.0);
            assert_eq!(p.opacity, 0.8);
        }
    }

    #[test]
    fn ids_are_sequential() {
        let mut rng = StdRng::seed_from_u64(1);
        let particles = generate(5, &ParticleRanges::OVERLAY, &mut rng);
        let ids: Vec<usize> = particles.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn zero_count_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate(0, &ParticleRanges::OVERLAY, &mut rng).is_empty());
    }

    #[test]
    fn separate_instantiations_are_independent() {
        let mut rng = StdRng::seed_from_u64(3);
        let first = Snowfall::overlay(OVERLAY_COUNT, &mut rng);
        let mut second = Snowfall::overlay(OVERLAY_COUNT, &mut rng);
        assert_ne!(first, second);

        let before = first.clone();
        second.particles.clear();
        assert_eq!(first, before);
    }

    #[test]
    fn flake_hidden_until_its_delay() {
        let p = Particle {
            id: 0,
            left: 50.0,
            delay: 1.5,
            duration: 10.0,
            size: 5.0,
            opacity: 1.0,
        };
        assert!(place(&p, 1.0, 80, 24).is_none());
        assert!(place(&p, 2.0, 80, 24).is_some());
    }

    #[test]
    fn flake_stays_inside_area() {
        let mut rng = StdRng::seed_from_u64(42);
        let particles = generate(200, &ParticleRanges::OVERLAY, &mut rng);
        for step in 0..100 {
            let elapsed = f64::from(step) * 0.37;
            for p in &particles {
                if let Some(spot) = place(p, elapsed, 40, 12) {
                    assert!(spot.x < 40 && spot.y < 12);
                }
            }
        }
    }

    #[test]
    fn layer_draws_some_flakes() {
        let mut rng = StdRng::seed_from_u64(5);
        let snow = Snowfall::overlay(OVERLAY_COUNT, &mut rng);
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        snow.at(Duration::from_secs(6)).render(area, &mut buf);

        let drawn = buf
            .content()
            .iter()
            .filter(|cell| cell.symbol() != " ")
            .count();
        assert!(drawn > 0);
    }

    #[test]
    fn layer_on_empty_area_is_noop() {
        let mut rng = StdRng::seed_from_u64(5);
        let snow = Snowfall::overlay(OVERLAY_COUNT, &mut rng);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        snow.at(Duration::from_secs(6)).render(area, &mut buf);
    }
}
