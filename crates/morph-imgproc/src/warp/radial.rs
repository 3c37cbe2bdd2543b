use glam::Vec2;

use morph_image::ImageBuffer;
use morph_markers::{PointMarkerSet, Side};

use crate::parallel;

/// Falloff of a point marker's influence; divisor of the squared distance
/// in the Gaussian kernel.
const POINT_WEIGHT: f32 = 0.05;

/// Per-call snapshot of a point marker: its interpolated position and the
/// displacement toward the requested side.
struct WarpMarker {
    pos: Vec2,
    move_vec: Vec2,
}

/// Radial-basis warping driven by point markers.
///
/// Every destination pixel takes the weight-normalized average of the
/// markers' move vectors, weighted by `exp(-dist^2 / POINT_WEIGHT)` to the
/// markers' interpolated positions, and samples the source there. With no
/// markers (or all weights underflowing to zero far away from every
/// marker) the pass degenerates to identity sampling.
pub fn warp_radial(markers: &PointMarkerSet, src: &ImageBuffer, dst: &mut ImageBuffer, side: Side) {
    let warp_markers: Vec<WarpMarker> = markers
        .markers()
        .iter()
        .map(|m| WarpMarker {
            pos: m.interpolated,
            move_vec: *m.geometry(side) - m.interpolated,
        })
        .collect();

    parallel::par_iter_rows_positions(dst, |pos, dst_pixel| {
        let mut weighted_move = Vec2::ZERO;
        let mut total_weight = 0.0f32;

        for marker in &warp_markers {
            let dist_sq = (pos - marker.pos).length_squared();
            let weight = (-dist_sq / POINT_WEIGHT).exp();
            weighted_move += marker.move_vec * weight;
            total_weight += weight;
        }

        let lookup = if total_weight > 0.0 {
            pos + weighted_move / total_weight
        } else {
            pos
        };
        let lookup = lookup.clamp(Vec2::ZERO, Vec2::ONE);

        *dst_pixel = src.sample(lookup.x, lookup.y);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use morph_image::{ImageSize, Rgba};
    use morph_markers::Location;

    const SIZE: ImageSize = ImageSize {
        width: 16,
        height: 16,
    };
    const PANEL: Vec2 = Vec2::new(160.0, 160.0);

    fn gradient_image() -> ImageBuffer {
        let mut image = ImageBuffer::from_size_val(SIZE, Rgba::default());
        for y in 0..SIZE.height {
            for x in 0..SIZE.width {
                image.as_slice_mut()[y * SIZE.width + x] =
                    Rgba::opaque((x * 16) as u8, (y * 16) as u8, 0);
            }
        }
        image
    }

    #[test]
    fn no_markers_is_identity() {
        let src = gradient_image();
        let mut dst = ImageBuffer::from_size_val(SIZE, Rgba::default());

        warp_radial(&PointMarkerSet::new(), &src, &mut dst, Side::Start);

        for y in 0..SIZE.height {
            for x in 0..SIZE.width {
                let u = x as f32 / SIZE.width as f32;
                let v = y as f32 / SIZE.height as f32;
                assert_eq!(dst.get(x, y).unwrap(), src.sample(u, v));
            }
        }
    }

    #[test]
    fn unmoved_marker_is_identity() {
        let src = gradient_image();
        let mut dst = ImageBuffer::from_size_val(SIZE, Rgba::default());
        let mut expected = ImageBuffer::from_size_val(SIZE, Rgba::default());

        // a marker whose start and end coincide produces a zero move vector
        let mut markers = PointMarkerSet::new();
        markers.on_primary_down(Location::Start, Vec2::new(0.5, 0.5), PANEL);
        markers.on_primary_up();
        markers.update_interpolation(0.5);

        warp_radial(&markers, &src, &mut dst, Side::Start);
        warp_radial(&PointMarkerSet::new(), &src, &mut expected, Side::Start);

        assert_eq!(dst.as_slice(), expected.as_slice());
    }

    #[test]
    fn marker_pulls_pixels_toward_its_side() {
        let src = gradient_image();
        let mut dst = ImageBuffer::from_size_val(SIZE, Rgba::default());

        // start position at (0.25, 0.5), end at (0.75, 0.5); at t=0.5 the
        // interpolated marker sits at (0.5, 0.5) and the start-side move
        // vector points left
        let mut markers = PointMarkerSet::new();
        markers.on_primary_down(Location::Start, Vec2::new(0.25, 0.5), PANEL);
        markers.on_primary_up();
        markers.on_primary_down(Location::End, Vec2::new(0.25, 0.5), PANEL);
        markers.on_pointer_move(Location::End, Vec2::new(0.75, 0.5), PANEL);
        markers.on_primary_up();
        markers.update_interpolation(0.5);

        warp_radial(&markers, &src, &mut dst, Side::Start);

        // at the marker itself the displacement is exactly the move vector,
        // so the warped center shows the source at x = 0.25
        let center = dst.get(8, 8).unwrap();
        let pulled = src.sample(0.25, 0.5);
        assert_eq!(center.r, pulled.r);
    }
}
