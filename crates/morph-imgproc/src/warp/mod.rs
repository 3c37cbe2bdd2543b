//! Marker-driven geometric warps.
//!
//! All three algorithms share one shape: for every destination pixel,
//! compute a source-lookup position in normalized space, clamp it to the
//! image area and bilinear-sample the source image. They differ in how the
//! markers turn a pixel position into that lookup:
//!
//! - [`warp_radial`]: point markers with a Gaussian falloff
//! - [`warp_field`]: line markers, Beier-Neely field warping
//! - [`warp_mesh`]: triangle mesh with barycentric remapping
//!
//! Each warp pulls the image toward the marker geometry of the requested
//! [`Side`] relative to the interpolated mid-geometry, so warping both
//! sides and cross-dissolving them yields the morph.

mod field;
mod mesh;
mod radial;

pub use field::warp_field;
pub use mesh::warp_mesh;
pub use radial::warp_radial;

use morph_image::ImageBuffer;
use morph_markers::{MarkerSet, Side};

/// Warp `src` into `dst` with the algorithm matching the marker set family.
///
/// The marker set variant and the warping algorithm are a fixed pairing
/// selected by the engine; this dispatcher is the variant match at that
/// boundary.
pub fn warp(markers: &MarkerSet, src: &ImageBuffer, dst: &mut ImageBuffer, side: Side) {
    match markers {
        MarkerSet::Point(set) => warp_radial(set, src, dst, side),
        MarkerSet::Line(set) => warp_field(set, src, dst, side),
        MarkerSet::Mesh(set) => warp_mesh(set, src, dst, side),
    }
}
