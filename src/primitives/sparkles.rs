//! Sparkles - deterministic decorative particle layout.
//!
//! Positions and scales come from fixed tables; delays from a closed-form
//! function of the index. Nothing here is random, so a server-side render
//! and any later render produce identical particles.

use serde::{Deserialize, Serialize};

use crate::types::Vec2;

/// Particle positions in percent of the container. Five 20%-wide bands of
/// five, then scattered extras.
pub const SPARKLE_POSITIONS: [(f64, f64); 40] = [
    (5.0, 10.0), (8.0, 35.0), (12.0, 60.0), (15.0, 80.0), (18.0, 25.0),
    (22.0, 15.0), (25.0, 50.0), (28.0, 75.0), (32.0, 40.0), (35.0, 65.0),
    (42.0, 20.0), (45.0, 45.0), (48.0, 70.0), (52.0, 30.0), (55.0, 55.0),
    (62.0, 15.0), (65.0, 40.0), (68.0, 65.0), (72.0, 35.0), (75.0, 60.0),
    (82.0, 25.0), (85.0, 50.0), (88.0, 75.0), (92.0, 20.0), (95.0, 55.0),
    (10.0, 90.0), (38.0, 10.0), (58.0, 85.0), (78.0, 10.0), (90.0, 85.0),
    (20.0, 5.0), (50.0, 95.0), (70.0, 5.0), (30.0, 30.0), (80.0, 40.0),
    (40.0, 80.0), (60.0, 25.0), (25.0, 90.0), (75.0, 15.0), (35.0, 70.0),
];

/// Particle scales, parallel to [`SPARKLE_POSITIONS`].
pub const SPARKLE_SCALES: [f64; 40] = [
    0.4, 0.6, 0.5, 0.8, 0.3, 0.7, 0.55, 0.9, 0.45, 0.65,
    0.5, 0.75, 0.35, 0.85, 0.6, 0.7, 0.4, 0.95, 0.5, 0.8,
    0.65, 0.45, 0.7, 0.55, 0.85, 0.6, 0.75, 0.4, 0.9, 0.5,
    0.65, 0.3, 0.8, 0.55, 0.7, 0.45, 0.85, 0.6, 0.75, 1.0,
];

pub const SPARKLE_COUNT: usize = SPARKLE_POSITIONS.len();

// =============================================================================
// PARAMETERS
// =============================================================================

/// Delay schedule. `delay(i) = max(0, (i * step) mod cycle + variation(i))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkleParams {
    /// Seconds between consecutive base delays.
    pub step_seconds: f64,
    /// Base delays wrap at this many seconds.
    pub cycle_seconds: f64,
    /// Variation spans `[-variation, +variation)` seconds.
    pub variation_seconds: f64,
    pub hash_multiplier: u64,
    pub hash_modulus: u64,
    /// Particles rendered by default.
    pub count: usize,
}

impl Default for SparkleParams {
    fn default() -> Self {
        Self {
            step_seconds: 0.25,
            cycle_seconds: 3.0,
            variation_seconds: 0.2,
            hash_multiplier: 7919,
            hash_modulus: 1000,
            count: SPARKLE_COUNT,
        }
    }
}

// =============================================================================
// PARTICLE SPEC
// =============================================================================

/// One decorative particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpec {
    pub index: usize,
    /// Position in percent, both axes in `[0, 100]`.
    pub position_percent: Vec2,
    pub scale: f64,
    pub delay_seconds: f64,
}

impl ParticleSpec {
    /// CSS custom properties driving the particle's keyframes.
    pub fn css_vars(&self) -> [(&'static str, String); 4] {
        [
            ("--sparkle-delay", format!("{}s", self.delay_seconds)),
            ("--sparkle-x", format!("{}%", self.position_percent.x)),
            ("--sparkle-y", format!("{}%", self.position_percent.y)),
            ("--sparkle-scale", format!("{}", self.scale)),
        ]
    }

    /// Inline `style` attribute value.
    pub fn style(&self) -> String {
        self.css_vars()
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// =============================================================================
// GENERATION
// =============================================================================

/// Per-index delay offset in `[-variation, +variation)` seconds.
pub fn sparkle_variation(index: usize, params: &SparkleParams) -> f64 {
    let modulus = params.hash_modulus.max(1);
    let seed = (index as u64).wrapping_mul(params.hash_multiplier) % modulus;
    (seed as f64 / modulus as f64) * params.variation_seconds * 2.0 - params.variation_seconds
}

/// Particle `index` with default parameters. Indices past the table wrap.
pub fn generate(index: usize) -> ParticleSpec {
    generate_with(index, &SparkleParams::default())
}

pub fn generate_with(index: usize, params: &SparkleParams) -> ParticleSpec {
    let slot = index % SPARKLE_COUNT;
    let (x, y) = SPARKLE_POSITIONS[slot];

    let base = if params.cycle_seconds > 0.0 {
        (index as f64 * params.step_seconds) % params.cycle_seconds
    } else {
        0.0
    };
    let delay_seconds = (base + sparkle_variation(index, params)).max(0.0);

    ParticleSpec {
        index,
        position_percent: Vec2::new(x, y),
        scale: SPARKLE_SCALES[slot],
        delay_seconds,
    }
}

/// First `count` particles.
pub fn generate_all(count: usize) -> Vec<ParticleSpec> {
    generate_all_with(count, &SparkleParams::default())
}

pub fn generate_all_with(count: usize, params: &SparkleParams) -> Vec<ParticleSpec> {
    (0..count).map(|i| generate_with(i, params)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_zero() {
        let p = generate(0);
        assert_eq!(p.position_percent, Vec2::new(5.0, 10.0));
        assert_eq!(p.scale, 0.4);
        // Base 0 with a negative offset clamps to 0.
        assert_eq!(p.delay_seconds, 0.0);
    }

    #[test]
    fn test_index_one() {
        let p = generate(1);
        assert_eq!(p.position_percent, Vec2::new(8.0, 35.0));
        assert_eq!(p.scale, 0.6);
        assert!((p.delay_seconds - 0.25).abs() <= 0.2);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate_all(40), generate_all(40));
        for i in 0..40 {
            assert_eq!(generate(i), generate(i));
        }
    }

    #[test]
    fn test_bounds() {
        let params = SparkleParams::default();
        for p in generate_all(120) {
            assert!((0.0..=100.0).contains(&p.position_percent.x));
            assert!((0.0..=100.0).contains(&p.position_percent.y));
            assert!(p.scale > 0.0);
            assert!(p.delay_seconds >= 0.0);
            assert!(p.delay_seconds < params.cycle_seconds + params.variation_seconds);
            let v = sparkle_variation(p.index, &params);
            assert!((-0.2..0.2).contains(&v));
        }
    }

    #[test]
    fn test_wraps_past_table() {
        let wrapped = generate(SPARKLE_COUNT + 3);
        let base = generate(3);
        assert_eq!(wrapped.position_percent, base.position_percent);
        assert_eq!(wrapped.scale, base.scale);
        assert_eq!(wrapped.index, SPARKLE_COUNT + 3);
    }

    #[test]
    fn test_css_vars() {
        let p = ParticleSpec {
            index: 0,
            position_percent: Vec2::new(5.0, 10.0),
            scale: 0.4,
            delay_seconds: 0.0,
        };
        assert_eq!(
            p.style(),
            "--sparkle-delay: 0s; --sparkle-x: 5%; --sparkle-y: 10%; --sparkle-scale: 0.4"
        );
    }

    #[test]
    fn test_zero_cycle_does_not_divide() {
        let params = SparkleParams {
            cycle_seconds: 0.0,
            ..SparkleParams::default()
        };
        assert!(generate_with(7, &params).delay_seconds.is_finite());
    }
}
