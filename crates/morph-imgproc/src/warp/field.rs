use glam::Vec2;

use morph_image::ImageBuffer;
use morph_markers::{LineMarkerSet, Side};

use crate::parallel;

/// Falloff of a line marker's influence; divisor of the squared distance
/// in the Gaussian kernel.
const LINE_WEIGHT: f32 = 0.05;

/// Lines shorter than this at mid-interpolation are skipped; their local
/// frame is undefined.
const MIN_FRAME_LENGTH: f32 = 1e-6;

/// Per-call snapshot of a line marker: the interpolated line's local frame
/// and the side line's frame to reconstruct the lookup in.
struct WarpMarker {
    mid_start: Vec2,
    mid_dir: Vec2,
    mid_perp: Vec2,
    mid_len: f32,
    side_start: Vec2,
    side_dir: Vec2,
    side_perp: Vec2,
    side_len: f32,
}

/// Field warping (Beier-Neely) driven by line markers.
///
/// Every destination pixel is expressed in each interpolated line's local
/// frame (`u` along the line normalized by its length, `v` the signed
/// perpendicular distance) and re-embedded in the same frame of the
/// requested side's line. The influence falls off as
/// `exp(-d^2 / LINE_WEIGHT)` where `d` is the perpendicular distance between
/// the endpoints and the distance to the nearest endpoint beyond them. The
/// per-line displacements accumulate; with no markers the pass is identity
/// sampling.
pub fn warp_field(markers: &LineMarkerSet, src: &ImageBuffer, dst: &mut ImageBuffer, side: Side) {
    let warp_markers: Vec<WarpMarker> = markers
        .lines()
        .iter()
        .filter_map(|m| {
            let mid = m.interpolated;
            let mid_span = mid.end - mid.start;
            let mid_len = mid_span.length();
            // editing keeps each side above MIN_LINE_LENGTH, but opposing
            // start/end lines can still cancel at mid-interpolation
            if mid_len < MIN_FRAME_LENGTH {
                return None;
            }

            let side_line = m.geometry(side);
            let side_span = side_line.end - side_line.start;

            Some(WarpMarker {
                mid_start: mid.start,
                mid_dir: mid_span / mid_len,
                mid_perp: mid_span.perp() / mid_len,
                mid_len,
                side_start: side_line.start,
                side_dir: side_span.normalize_or_zero(),
                side_perp: side_span.perp().normalize_or_zero(),
                side_len: side_span.length(),
            })
        })
        .collect();

    parallel::par_iter_rows_positions(dst, |pos, dst_pixel| {
        let mut lookup = pos;

        for marker in &warp_markers {
            let to_start = pos - marker.mid_start;

            // position in the interpolated line's frame
            let u = to_start.dot(marker.mid_dir) / marker.mid_len;
            let v = to_start.dot(marker.mid_perp);

            let dist_sq = if u < 0.0 {
                to_start.length_squared()
            } else if u > 1.0 {
                let mid_end = marker.mid_start + marker.mid_dir * marker.mid_len;
                (pos - mid_end).length_squared()
            } else {
                v * v
            };
            let weight = (-dist_sq / LINE_WEIGHT).exp();

            // the same (u, v) in the side line's frame
            let src_point = marker.side_start
                + marker.side_dir * (u * marker.side_len)
                + marker.side_perp * v;
            lookup += (pos - src_point) * weight;
        }

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

        warp_field(&LineMarkerSet::new(), &src, &mut dst, Side::Start);

        for y in 0..SIZE.height {
            for x in 0..SIZE.width {
                let u = x as f32 / SIZE.width as f32;
                let v = y as f32 / SIZE.height as f32;
                assert_eq!(dst.get(x, y).unwrap(), src.sample(u, v));
            }
        }
    }

    #[test]
    fn unmoved_line_is_identity() {
        let src = gradient_image();
        let mut dst = ImageBuffer::from_size_val(SIZE, Rgba::default());
        let mut expected = ImageBuffer::from_size_val(SIZE, Rgba::default());

        // identical start and end lines: the side frame equals the mid
        // frame, every reconstructed point equals the pixel itself
        let mut markers = LineMarkerSet::new();
        markers.on_primary_down(Location::Start, Vec2::new(0.3, 0.5), PANEL);
        markers.on_pointer_move(Location::Start, Vec2::new(0.7, 0.5), PANEL);
        markers.on_primary_up();
        markers.update_interpolation(0.5);

        warp_field(&markers, &src, &mut dst, Side::Start);
        warp_field(&LineMarkerSet::new(), &src, &mut expected, Side::Start);

        // reconstructing a pixel through the line frame and back is only
        // float-identical up to rounding, which can flip the byte
        // truncation by one
        for (got, want) in dst.as_slice().iter().zip(expected.as_slice()) {
            assert!(got.r.abs_diff(want.r) <= 1);
            assert!(got.g.abs_diff(want.g) <= 1);
        }
    }

    #[test]
    fn displaced_line_moves_pixels_along_it() {
        let src = gradient_image();
        let mut dst = ImageBuffer::from_size_val(SIZE, Rgba::default());

        // horizontal line shifted right between start and end image; at
        // t=0 the interpolated line equals the start line, so the end-side
        // pass must shift its lookups
        let mut markers = LineMarkerSet::new();
        markers.on_primary_down(Location::Start, Vec2::new(0.25, 0.5), PANEL);
        markers.on_pointer_move(Location::Start, Vec2::new(0.5, 0.5), PANEL);
        markers.on_primary_up();

        // drag the whole end-side line right by 0.25: the far endpoint
        // first so the min-length rule never triggers
        markers.on_primary_down(Location::End, Vec2::new(0.5, 0.5), PANEL);
        markers.on_pointer_move(Location::End, Vec2::new(0.75, 0.5), PANEL);
        markers.on_primary_up();
        markers.on_primary_down(Location::End, Vec2::new(0.25, 0.5), PANEL);
        markers.on_pointer_move(Location::End, Vec2::new(0.5, 0.5), PANEL);
        markers.on_primary_up();

        assert_eq!(markers.lines()[0].end.start, Vec2::new(0.5, 0.5));
        assert_eq!(markers.lines()[0].end.end, Vec2::new(0.75, 0.5));

        markers.update_interpolation(0.0);
        warp_field(&markers, &src, &mut dst, Side::End);

        // a pixel on the interpolated line maps to the corresponding point
        // on the end-side line: weight 1, u=0.5, v=0 reconstructs
        // (0.625, 0.5), displacement (pos - src_point) = (-0.25, 0)
        let on_line = dst.get(6, 8).unwrap();
        let shifted = src.sample(0.125, 0.5);
        assert_eq!(on_line.r, shifted.r);
    }
}
