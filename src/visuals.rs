//! Visual tuning: glow sizing, colors, and fade pacing.
//!
//! Like the physics parameters, everything here is a named field with a
//! sensible default, so a host can restyle the reveal without touching the
//! engine.

use std::ops::Range;

/// Appearance and fade parameters for one playback.
#[derive(Clone, Debug)]
pub struct Visuals {
    /// Base hue of the glow palette, `0..1` HSV.
    pub hue: f32,
    /// Per-particle hue jitter, `±hue_spread`.
    pub hue_spread: f32,
    /// Core radius range for spawned particles, px.
    pub core_size: Range<f32>,
    /// Halo radius as a multiple of the core radius.
    pub halo_scale: f32,
    /// Alpha multiplier for the halo pass.
    pub halo_alpha: f32,
    /// Backdrop darkening level held during scatter and gather.
    pub dim_level: f32,
    /// Seconds to fade out the source display once scatter begins.
    pub source_fade: f32,
    /// Seconds for a glyph to fade in once the reveal triggers.
    pub reveal_fade: f32,
    /// Extra reveal delay per glyph index, seconds.
    pub glyph_stagger: f32,
    /// Seconds to fade in the secondary content.
    pub secondary_fade: f32,
    /// Easing rate toward the backdrop goal, 1/s.
    pub backdrop_rate: f32,
    /// Standing glow radius drawn behind a revealed glyph, px.
    pub glyph_glow: f32,
    /// Alpha multiplier for the standing glyph glow.
    pub glyph_glow_alpha: f32,
}

impl Default for Visuals {
    fn default() -> Self {
        Self {
            hue: 0.52,
            hue_spread: 0.06,
            core_size: 1.6..3.4,
            halo_scale: 3.2,
            halo_alpha: 0.35,
            dim_level: 0.65,
            source_fade: 0.5,
            reveal_fade: 0.6,
            glyph_stagger: 0.06,
            secondary_fade: 0.8,
            backdrop_rate: 3.0,
            glyph_glow: 26.0,
            glyph_glow_alpha: 0.5,
        }
    }
}

/// Smoothstep easing on `0..1`.
#[inline]
pub(crate) fn smooth(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_endpoints() {
        assert_eq!(smooth(0.0), 0.0);
        assert_eq!(smooth(1.0), 1.0);
        assert_eq!(smooth(-2.0), 0.0);
        assert_eq!(smooth(5.0), 1.0);
    }

    #[test]
    fn test_smooth_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = smooth(i as f32 / 100.0);
            assert!(v >= last);
            last = v;
        }
    }
}
