//! Four-pass raster synthesis of the boot-print silhouette.
//!
//! The passes form a strict pipeline over one owned buffer:
//! fill → tread carve → edge shade → splatter. Each pass's postconditions
//! are the next pass's preconditions; in particular shade relies on carve
//! having produced the final transparent/filled classification per texel.

use crate::{
    Error,
    color::{Palette, RGBA},
    image::{ImageMut, ImageOwned},
    profile,
    utils::clamp,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

/// Synthesis parameters. The defaults are the documented reference set;
/// regenerating with them must reproduce byte-identical textures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SynthParams {
    /// Canvas width in texels.
    pub width: usize,
    /// Canvas height in texels.
    pub height: usize,
    /// Transparent margin above and below the sole.
    pub margin_y: usize,
    /// Half-width of the sole where the profile evaluates to 1.0.
    pub max_half_width: usize,
    /// Rows between consecutive tread-gap anchors.
    pub tread_spacing: usize,
    /// Rows carved per tread gap.
    pub tread_gap: usize,
    /// Columns the carved span is inset from the silhouette edge.
    pub tread_inset: usize,
    /// Columns recolored on each side by the edge shade.
    pub edge_band: usize,
    /// Droplet candidates requested by the splatter pass.
    pub splatter_count: usize,
    /// Alpha of committed droplets.
    pub splatter_alpha: u8,
    /// Maximum polar displacement of a droplet from the silhouette edge.
    pub splatter_reach: f64,
    /// PRNG seed for the splatter pass.
    pub seed: u64,
    pub palette: Palette,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            width: 22,
            height: 40,
            margin_y: 3,
            max_half_width: 5,
            tread_spacing: 4,
            tread_gap: 2,
            tread_inset: 2,
            edge_band: 2,
            splatter_count: 15,
            splatter_alpha: 150,
            splatter_reach: 4.0,
            seed: 42,
            palette: Palette::default(),
        }
    }
}

impl SynthParams {
    /// Reject dimensions that cannot host the margins and the profile.
    /// Runs before any buffer is allocated.
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidCanvas {
                reason: format!("canvas {}x{} is empty", self.width, self.height),
            });
        }
        if self.height <= 2 * self.margin_y {
            return Err(Error::InvalidCanvas {
                reason: format!(
                    "height {} does not exceed twice the vertical margin {}",
                    self.height, self.margin_y
                ),
            });
        }
        if 2 * self.max_half_width + 1 > self.width {
            return Err(Error::InvalidCanvas {
                reason: format!(
                    "width {} cannot host a silhouette of half-width {}",
                    self.width, self.max_half_width
                ),
            });
        }
        if self.tread_spacing == 0 {
            return Err(Error::InvalidCanvas {
                reason: "tread spacing must be at least one row".to_string(),
            });
        }
        Ok(())
    }
}

/// Drives the four synthesis passes over one buffer. Handedness-agnostic,
/// the output is always the canonical right-foot orientation.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    params: SynthParams,
}

impl Synthesizer {
    pub fn new(params: SynthParams) -> Result<Self, Error> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    /// Run the full pipeline and return the finished right-foot buffer.
    pub fn synthesize(&self) -> ImageOwned<RGBA> {
        tracing::debug_span!(
            "[synth]",
            width = self.params.width,
            height = self.params.height,
            seed = self.params.seed
        )
        .in_scope(|| {
            let mut img = ImageOwned::new_default(self.params.height, self.params.width);
            self.fill(&mut img);
            self.carve(&mut img);
            self.shade(&mut img);
            self.splatter(&mut img);
            img
        })
    }

    /// Vertical extent of the sole, `top..bottom`.
    fn extent(&self) -> (usize, usize) {
        (self.params.margin_y, self.params.height - self.params.margin_y)
    }

    fn rel_y(&self, y: usize) -> f64 {
        let (top, bottom) = self.extent();
        (y - top) as f64 / (bottom - top) as f64
    }

    /// Inclusive filled column span of the silhouette at row `y`, clamped
    /// to the canvas.
    fn row_span(&self, y: usize) -> (usize, usize) {
        let half = (self.params.max_half_width as f64 * profile::width_factor(self.rel_y(y))) as i64;
        let cx = (self.params.width / 2) as i64;
        let max_x = self.params.width as i64 - 1;
        let left = clamp(cx - half, 0, max_x);
        let right = clamp(cx + half, 0, max_x);
        (left as usize, right as usize)
    }

    /// Pass 1: lay down the solid silhouette, hard edges, no anti-aliasing.
    fn fill(&self, img: &mut ImageOwned<RGBA>) {
        let (top, bottom) = self.extent();
        for y in top..bottom {
            let (left, right) = self.row_span(y);
            for x in left..=right {
                if let Some(texel) = img.get_mut(y, x) {
                    *texel = self.params.palette.fill;
                }
            }
        }
    }

    /// Pass 2: cut horizontal tread gaps back to transparent. The carved
    /// span is inset from the silhouette edge so carving only ever converts
    /// filled texels; rows close to the bottom margin are skipped so the
    /// gap cannot eat the heel's rounded cap.
    fn carve(&self, img: &mut ImageOwned<RGBA>) {
        let (top, bottom) = self.extent();
        let start = top + 3;
        let end = bottom.saturating_sub(3);
        if start >= end {
            return;
        }
        for anchor in (start..end).step_by(self.params.tread_spacing) {
            let (left, right) = self.row_span(anchor);
            let left = left + self.params.tread_inset;
            let Some(right) = right.checked_sub(self.params.tread_inset) else {
                continue;
            };
            if left > right {
                continue;
            }
            for y in anchor..anchor + self.params.tread_gap {
                if y + 2 >= bottom {
                    continue;
                }
                for x in left..=right {
                    if let Some(texel) = img.get_mut(y, x) {
                        *texel = RGBA::TRANSPARENT;
                    }
                }
            }
        }
    }

    /// Pass 3: recolor the outermost filled columns on each side to the
    /// edge color. Never touches texels carving left transparent.
    fn shade(&self, img: &mut ImageOwned<RGBA>) {
        let (top, bottom) = self.extent();
        for y in top..bottom {
            let (left, right) = self.row_span(y);
            for offset in 0..self.params.edge_band {
                if let Some(texel) = img.get_mut(y, left + offset) {
                    if texel.is_opaque() {
                        *texel = self.params.palette.edge;
                    }
                }
                if let Some(x) = right.checked_sub(offset) {
                    if let Some(texel) = img.get_mut(y, x) {
                        if texel.is_opaque() {
                            *texel = self.params.palette.edge;
                        }
                    }
                }
            }
        }
    }

    /// Pass 4: scatter low-alpha droplets around the silhouette edge from
    /// a seeded PRNG. Candidates that land out of bounds or on a texel that
    /// already holds ink are dropped, so the visible droplet count is at
    /// most `splatter_count`.
    fn splatter(&self, img: &mut ImageOwned<RGBA>) {
        let (top, bottom) = self.extent();
        let droplet = self.params.palette.fill.with_alpha(self.params.splatter_alpha);
        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        let mut committed = 0usize;
        for _ in 0..self.params.splatter_count {
            let angle = rng.gen_range(0.0..TAU);
            let dist = rng.gen_range(0.0..=self.params.splatter_reach);
            let base_y = rng.gen_range(top..bottom);
            let (left, right) = self.row_span(base_y);
            let edge_x = if rng.gen_bool(0.5) { left } else { right };

            let x = (edge_x as f64 + dist * angle.cos()) as i64;
            let y = (base_y as f64 + dist * angle.sin()) as i64;
            if x < 0 || y < 0 {
                continue;
            }
            let Some(texel) = img.get_mut(y as usize, x as usize) else {
                continue;
            };
            if texel.is_opaque() {
                continue;
            }
            *texel = droplet;
            committed += 1;
        }
        tracing::debug!(
            requested = self.params.splatter_count,
            committed,
            "splatter droplets"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;

    fn opaque_texels(img: &ImageOwned<RGBA>) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..img.height() {
            for x in 0..img.width() {
                if img.get(y, x).is_some_and(|texel| texel.is_opaque()) {
                    out.push((y, x));
                }
            }
        }
        out
    }

    /// Distance between the outermost solid (alpha 255) texels of a row,
    /// ignoring low-alpha droplets.
    fn solid_span(img: &ImageOwned<RGBA>, y: usize) -> usize {
        let solid: Vec<usize> = (0..img.width())
            .filter(|&x| img.get(y, x).is_some_and(|texel| texel.alpha() == 255))
            .collect();
        match (solid.first(), solid.last()) {
            (Some(first), Some(last)) => last - first + 1,
            _ => 0,
        }
    }

    #[test]
    fn test_determinism() {
        let synthesizer = Synthesizer::new(SynthParams::default()).unwrap();
        assert!(synthesizer.synthesize() == synthesizer.synthesize());
    }

    #[test]
    fn test_reference_spans() {
        let synthesizer = Synthesizer::new(SynthParams::default()).unwrap();
        let img = synthesizer.synthesize();
        let (top, bottom) = synthesizer.extent();
        let extent = bottom - top;

        // toe tip: width factor 1.0 over half-width 5 gives an 11-texel span
        let toe = solid_span(&img, top);
        assert!((9..=11).contains(&toe), "toe span {}", toe);

        // narrow arch (rel_y ≈ 0.55): factor 0.65 gives a 7-texel span
        let arch_y = top + (0.55 * extent as f64).round() as usize;
        let rel_y = synthesizer.rel_y(arch_y);
        assert!((0.50..0.60).contains(&rel_y), "rel_y {}", rel_y);
        let arch = solid_span(&img, arch_y);
        assert!((5..=7).contains(&arch), "arch span {}", arch);
    }

    #[test]
    fn test_margins_stay_transparent() {
        let params = SynthParams::default();
        let synthesizer = Synthesizer::new(params.clone()).unwrap();
        let mut img = ImageOwned::new_default(params.height, params.width);
        synthesizer.fill(&mut img);
        synthesizer.carve(&mut img);
        synthesizer.shade(&mut img);
        for y in (0..params.margin_y).chain(params.height - params.margin_y..params.height) {
            for x in 0..params.width {
                assert_eq!(img.get(y, x), Some(&RGBA::TRANSPARENT));
            }
        }
    }

    #[test]
    fn test_carve_is_strict_subset() {
        let params = SynthParams::default();
        let synthesizer = Synthesizer::new(params.clone()).unwrap();

        let mut filled = ImageOwned::new_default(params.height, params.width);
        synthesizer.fill(&mut filled);
        let mut carved = filled.clone();
        synthesizer.carve(&mut carved);

        let filled_set = opaque_texels(&filled);
        let carved_set = opaque_texels(&carved);
        assert!(carved_set.len() < filled_set.len());
        for texel in &carved_set {
            assert!(filled_set.contains(texel), "carving filled {:?}", texel);
        }
    }

    #[test]
    fn test_shade_preserves_occupancy() {
        let params = SynthParams::default();
        let synthesizer = Synthesizer::new(params.clone()).unwrap();

        let mut img = ImageOwned::new_default(params.height, params.width);
        synthesizer.fill(&mut img);
        synthesizer.carve(&mut img);
        let before = img.clone();
        synthesizer.shade(&mut img);

        assert_eq!(opaque_texels(&before), opaque_texels(&img));
        for y in 0..params.height {
            for x in 0..params.width {
                let (old, new) = (before.get(y, x).unwrap(), img.get(y, x).unwrap());
                if old != new {
                    assert_eq!(*old, params.palette.fill);
                    assert_eq!(*new, params.palette.edge);
                }
            }
        }
    }

    #[test]
    fn test_splatter_respects_occupancy() {
        let params = SynthParams::default();
        let synthesizer = Synthesizer::new(params.clone()).unwrap();

        let mut img = ImageOwned::new_default(params.height, params.width);
        synthesizer.fill(&mut img);
        synthesizer.carve(&mut img);
        synthesizer.shade(&mut img);
        let before = img.clone();
        synthesizer.splatter(&mut img);

        let droplet = params.palette.fill.with_alpha(params.splatter_alpha);
        let solid = |img: &ImageOwned<RGBA>| {
            img.data().iter().filter(|texel| texel.alpha() == 255).count()
        };
        assert_eq!(solid(&before), solid(&img));

        let mut committed = 0;
        for y in 0..params.height {
            for x in 0..params.width {
                let (old, new) = (before.get(y, x).unwrap(), img.get(y, x).unwrap());
                if old != new {
                    assert_eq!(*old, RGBA::TRANSPARENT);
                    assert_eq!(*new, droplet);
                    committed += 1;
                }
            }
        }
        assert!(committed <= params.splatter_count);
    }

    #[test]
    fn test_invalid_canvas() {
        let reject = |params: SynthParams| {
            assert!(matches!(
                Synthesizer::new(params).err(),
                Some(Error::InvalidCanvas { .. })
            ));
        };
        reject(SynthParams {
            height: 6,
            margin_y: 3,
            ..SynthParams::default()
        });
        reject(SynthParams {
            width: 10,
            max_half_width: 5,
            ..SynthParams::default()
        });
        reject(SynthParams {
            tread_spacing: 0,
            ..SynthParams::default()
        });
        reject(SynthParams {
            width: 0,
            ..SynthParams::default()
        });
    }

    #[test]
    fn test_tiny_canvas_is_clamped_not_panicking() {
        // narrow canvas forces span clamping on every row
        let params = SynthParams {
            width: 7,
            height: 12,
            margin_y: 2,
            max_half_width: 3,
            ..SynthParams::default()
        };
        let synthesizer = Synthesizer::new(params.clone()).unwrap();
        let img = synthesizer.synthesize();
        assert_eq!(img.width(), params.width);
        assert_eq!(img.height(), params.height);
    }
}
