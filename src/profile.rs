//! Boot-sole silhouette profile.
//!
//! Maps a normalized vertical position along the sole (0.0 at the toe tip,
//! 1.0 at the heel edge) to a width fraction of the maximum half-width. The
//! breakpoints and interpolation kinds below are what make the silhouette
//! read as a boot rather than a blob, so they are fixed.

use crate::utils::clamp;
use std::f64::consts::PI;

/// End of the toe band (cosine taper).
const TOE_END: f64 = 0.30;
/// End of the upper-arch band (linear narrowing).
const UPPER_ARCH_END: f64 = 0.50;
/// End of the narrow-arch band (constant waist).
const NARROW_ARCH_END: f64 = 0.60;
/// Width fraction at the waist of the sole.
const WAIST: f64 = 0.65;

/// Width fraction of the silhouette at `rel_y ∈ [0, 1]`.
///
/// | band | `rel_y` | shape |
/// |---|---|---|
/// | toe | `[0, 0.30)` | `0.90 + 0.10·cos(t·π/2)` with `t = rel_y/0.30` |
/// | upper arch | `[0.30, 0.50)` | linear `0.90 → 0.65` |
/// | narrow arch | `[0.50, 0.60)` | constant `0.65` |
/// | heel | `[0.60, 1.0]` | linear `0.65 → 0.95` |
///
/// Inputs outside `[0, 1]` are clamped. The result is always in `(0, 1]`.
pub fn width_factor(rel_y: f64) -> f64 {
    let rel_y = clamp(rel_y, 0.0, 1.0);
    if rel_y < TOE_END {
        let t = rel_y / TOE_END;
        0.90 + 0.10 * (t * PI / 2.0).cos()
    } else if rel_y < UPPER_ARCH_END {
        let t = (rel_y - TOE_END) / (UPPER_ARCH_END - TOE_END);
        0.90 - 0.25 * t
    } else if rel_y < NARROW_ARCH_END {
        WAIST
    } else {
        let t = (rel_y - NARROW_ARCH_END) / (1.0 - NARROW_ARCH_END);
        WAIST + 0.30 * t
    }
}
