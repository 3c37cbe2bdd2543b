use glam::Vec2;
use rayon::prelude::*;

use morph_image::{ImageBuffer, Rgba};

/// Fill every destination pixel from its normalized position, rows in
/// parallel.
///
/// Each worker owns a disjoint range of destination rows with exclusive
/// write access to its slice; whatever `f` captures is shared read-only.
/// The position handed to `f` is `(xi / width, yi / height)`. The call
/// returns only after every row completes.
pub fn par_iter_rows_positions(
    dst: &mut ImageBuffer,
    f: impl Fn(Vec2, &mut Rgba) + Send + Sync,
) {
    let (cols, rows) = (dst.cols(), dst.rows());
    let x_step = 1.0 / cols as f32;

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(yi, dst_row)| {
            let y = yi as f32 / rows as f32;
            let mut x = 0.0f32;
            for dst_pixel in dst_row.iter_mut() {
                f(Vec2::new(x, y), dst_pixel);
                x += x_step;
            }
        });
}

/// Combine two equally-sized sources into `dst` pixel by pixel, rows in
/// parallel.
///
/// All three buffers must have the same row length; rows are zipped, so
/// differing heights silently truncate; callers validate dimensions first.
pub fn par_iter_rows_zip(
    src1: &ImageBuffer,
    src2: &ImageBuffer,
    dst: &mut ImageBuffer,
    f: impl Fn(&Rgba, &Rgba, &mut Rgba) + Send + Sync,
) {
    let cols = dst.cols();

    src1.as_slice()
        .par_chunks_exact(cols)
        .zip(src2.as_slice().par_chunks_exact(cols))
        .zip(dst.as_slice_mut().par_chunks_exact_mut(cols))
        .for_each(|((src1_row, src2_row), dst_row)| {
            src1_row
                .iter()
                .zip(src2_row.iter())
                .zip(dst_row.iter_mut())
                .for_each(|((src1_pixel, src2_pixel), dst_pixel)| {
                    f(src1_pixel, src2_pixel, dst_pixel);
                });
        });
}
