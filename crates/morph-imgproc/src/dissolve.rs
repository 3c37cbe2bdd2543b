use morph_image::{ImageBuffer, Rgba};

use crate::parallel;

/// Cross-dissolve `start` and `end` into `dst` by `progress`.
///
/// The inputs are expected to be warped onto the destination grid already,
/// so the blend is a direct per-pixel [`Rgba::lerp`] with no resampling.
/// `progress = 0` reproduces `start` and `progress = 1` reproduces `end`,
/// up to the lerp's byte truncation.
///
/// # Panics
///
/// Panics when the three buffers differ in size or `progress` is outside
/// `[0, 1]`; both indicate a caller bug, not a runtime condition.
pub fn cross_dissolve(start: &ImageBuffer, end: &ImageBuffer, dst: &mut ImageBuffer, progress: f32) {
    assert!(
        (0.0..=1.0).contains(&progress),
        "progress out of range: {progress}"
    );
    assert_eq!(start.size(), dst.size(), "start/output size mismatch");
    assert_eq!(end.size(), dst.size(), "end/output size mismatch");

    parallel::par_iter_rows_zip(start, end, dst, |start_pixel, end_pixel, dst_pixel| {
        *dst_pixel = Rgba::lerp(*start_pixel, *end_pixel, progress);
    });
}
