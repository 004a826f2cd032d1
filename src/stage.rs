//! The stage: layout queries and visibility mutation for the revealed content.
//!
//! [`Stage`] is the engine's window onto the host content: where the glyph
//! anchors currently sit, whether the environment prefers reduced motion,
//! and the opacity/backdrop knobs the engine turns over the course of a
//! playback. Targets are re-queried at gather time, never cached from mount,
//! so the animation tolerates reflow between scatter and gather.

use glam::Vec2;

/// One gather destination: the on-screen anchor of a glyph/content element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    /// Current anchor position in surface pixels.
    pub position: Vec2,
    /// Index of the glyph this target reconstructs.
    pub glyph: usize,
    /// Emphasized glyphs get dedicated priority particles.
    pub emphasis: bool,
}

/// Host content the engine reveals.
///
/// All mutation methods are fire-and-forget style setters; the engine calls
/// them only from its frame tick, never after [`stop`](crate::Engine::stop).
pub trait Stage {
    /// Current target set, one entry per glyph. Called at gather time and at
    /// finalize, so implementations should report live layout positions.
    fn targets(&self) -> Vec<Target>;

    /// Whether the environment prefers reduced motion. Consulted once at
    /// [`start`](crate::Engine::start).
    fn reduced_motion(&self) -> bool {
        false
    }

    /// Opacity of the original static display that dissolves at scatter.
    fn set_source_opacity(&mut self, opacity: f32);

    /// Opacity of one reconstructed glyph.
    fn set_glyph_opacity(&mut self, glyph: usize, opacity: f32);

    /// Opacity of the secondary content shown after the reveal.
    fn set_secondary_opacity(&mut self, opacity: f32);

    /// Backdrop darkening level, 0 (normal) to 1 (black).
    fn set_backdrop(&mut self, dim: f32);
}

/// A ready-made stage that spaces glyph anchors evenly along a horizontal
/// line. Used by the demos and handy in tests; a real host would implement
/// [`Stage`] against its own layout system.
#[derive(Clone, Debug)]
pub struct LineStage {
    center: Vec2,
    width: f32,
    emphasis: Option<usize>,
    reduced_motion: bool,
    source_opacity: f32,
    secondary_opacity: f32,
    backdrop: f32,
    glyph_opacity: Vec<f32>,
}

impl LineStage {
    /// `glyphs` anchors centered on `center`, spanning `width` pixels.
    pub fn new(glyphs: usize, center: Vec2, width: f32) -> Self {
        Self {
            center,
            width,
            emphasis: None,
            reduced_motion: false,
            source_opacity: 1.0,
            secondary_opacity: 0.0,
            backdrop: 0.0,
            glyph_opacity: vec![0.0; glyphs],
        }
    }

    /// One glyph anchor per non-space character of `text`, with the first
    /// character emphasized.
    pub fn from_text(text: &str, center: Vec2, width: f32) -> Self {
        let glyphs = text.chars().filter(|c| !c.is_whitespace()).count();
        Self {
            emphasis: (glyphs > 0).then_some(0),
            ..Self::new(glyphs, center, width)
        }
    }

    /// Mark one glyph as emphasized.
    pub fn with_emphasis(mut self, glyph: usize) -> Self {
        self.emphasis = Some(glyph);
        self
    }

    /// Report a reduced-motion preference from this stage.
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Move the anchor line (layout reflow).
    pub fn relocate(&mut self, center: Vec2, width: f32) {
        self.center = center;
        self.width = width;
    }

    /// Number of glyph anchors.
    pub fn glyphs(&self) -> usize {
        self.glyph_opacity.len()
    }

    /// Current opacity of one glyph.
    pub fn glyph_opacity(&self, glyph: usize) -> f32 {
        self.glyph_opacity.get(glyph).copied().unwrap_or(0.0)
    }

    /// Current opacity of the source display.
    pub fn source_opacity(&self) -> f32 {
        self.source_opacity
    }

    /// Current opacity of the secondary content.
    pub fn secondary_opacity(&self) -> f32 {
        self.secondary_opacity
    }

    /// Current backdrop darkening level.
    pub fn backdrop(&self) -> f32 {
        self.backdrop
    }

    /// Whether every glyph is fully visible.
    pub fn fully_revealed(&self) -> bool {
        !self.glyph_opacity.is_empty() && self.glyph_opacity.iter().all(|&o| o >= 1.0)
    }
}

impl Stage for LineStage {
    fn targets(&self) -> Vec<Target> {
        let n = self.glyph_opacity.len();
        (0..n)
            .map(|i| {
                let t = if n > 1 {
                    i as f32 / (n - 1) as f32
                } else {
                    0.5
                };
                Target {
                    position: Vec2::new(
                        self.center.x - self.width / 2.0 + t * self.width,
                        self.center.y,
                    ),
                    glyph: i,
                    emphasis: self.emphasis == Some(i),
                }
            })
            .collect()
    }

    fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn set_source_opacity(&mut self, opacity: f32) {
        self.source_opacity = opacity;
    }

    fn set_glyph_opacity(&mut self, glyph: usize, opacity: f32) {
        if let Some(slot) = self.glyph_opacity.get_mut(glyph) {
            *slot = opacity;
        }
    }

    fn set_secondary_opacity(&mut self, opacity: f32) {
        self.secondary_opacity = opacity;
    }

    fn set_backdrop(&mut self, dim: f32) {
        self.backdrop = dim;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_stage_spacing() {
        let stage = LineStage::new(5, Vec2::new(400.0, 300.0), 400.0);
        let targets = stage.targets();
        assert_eq!(targets.len(), 5);
        assert_eq!(targets[0].position, Vec2::new(200.0, 300.0));
        assert_eq!(targets[4].position, Vec2::new(600.0, 300.0));
        let gap = targets[1].position.x - targets[0].position.x;
        assert!((gap - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_from_text_skips_whitespace() {
        let stage = LineStage::from_text("GLOW UP", Vec2::new(0.0, 0.0), 100.0);
        assert_eq!(stage.glyphs(), 6);
        assert!(stage.targets()[0].emphasis);
        assert!(!stage.targets()[1].emphasis);
    }

    #[test]
    fn test_single_glyph_centered() {
        let stage = LineStage::new(1, Vec2::new(100.0, 50.0), 200.0);
        let targets = stage.targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].position, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_relocate_changes_targets() {
        let mut stage = LineStage::new(3, Vec2::new(100.0, 50.0), 100.0);
        let before = stage.targets();
        stage.relocate(Vec2::new(300.0, 200.0), 100.0);
        let after = stage.targets();
        assert_ne!(before[0].position, after[0].position);
        assert_eq!(after[1].position, Vec2::new(300.0, 200.0));
    }

    #[test]
    fn test_opacity_setters() {
        let mut stage = LineStage::new(2, Vec2::ZERO, 10.0);
        stage.set_glyph_opacity(0, 1.0);
        stage.set_glyph_opacity(1, 1.0);
        assert!(stage.fully_revealed());
        // out-of-range glyph is ignored
        stage.set_glyph_opacity(9, 0.5);
        assert!(stage.fully_revealed());
    }
}
