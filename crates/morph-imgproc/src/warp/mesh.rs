use glam::Vec2;

use morph_image::ImageBuffer;
use morph_markers::{Side, TriangleMeshMarkerSet};

use crate::parallel;

/// A destination-space triangle with precomputed barycentric terms.
///
/// `d00`, `d11` and `d01` are the Gram-matrix dot products of the edge
/// vectors, pre-divided by the Gram determinant, so evaluating the
/// barycentric coordinates of a point costs two dot products and four
/// multiplies.
struct DestTriangle {
    a: Vec2,
    v0: Vec2,
    v1: Vec2,
    d00: f32,
    d11: f32,
    d01: f32,
}

/// A source-space triangle: anchor vertex and edge vectors.
struct SourceTriangle {
    a: Vec2,
    v0: Vec2,
    v1: Vec2,
}

/// Mesh warping driven by triangle-mesh vertex markers.
///
/// Every destination pixel is located in the triangulation at the
/// interpolated vertex positions by a linear scan in triangulation order;
/// the first triangle containing it (`u >= 0`, `v >= 0`, `u + v < 1`) maps it
/// barycentrically onto the same triangle at the requested side's vertex
/// positions. Pixels outside every triangle, and the whole pass when the
/// triangulation is empty, fall back to identity sampling.
pub fn warp_mesh(
    markers: &TriangleMeshMarkerSet,
    src: &ImageBuffer,
    dst: &mut ImageBuffer,
    side: Side,
) {
    let vertices = markers.vertices();

    let dest_triangles: Vec<DestTriangle> = markers
        .triangles()
        .iter()
        .map(|&[i0, i1, i2]| {
            let a = vertices[i0].interpolated;
            let v0 = vertices[i2].interpolated - a;
            let v1 = vertices[i1].interpolated - a;

            let d00 = v0.length_squared();
            let d11 = v1.length_squared();
            let d01 = v0.dot(v1);
            // a degenerate triangle makes this infinite; its containment
            // test then never passes
            let inv_denom = 1.0 / (d00 * d11 - d01 * d01);

            DestTriangle {
                a,
                v0,
                v1,
                d00: d00 * inv_denom,
                d11: d11 * inv_denom,
                d01: d01 * inv_denom,
            }
        })
        .collect();

    let source_triangles: Vec<SourceTriangle> = markers
        .triangles()
        .iter()
        .map(|&[i0, i1, i2]| {
            let a = *vertices[i0].geometry(side);
            SourceTriangle {
                a,
                v0: *vertices[i2].geometry(side) - a,
                v1: *vertices[i1].geometry(side) - a,
            }
        })
        .collect();

    parallel::par_iter_rows_positions(dst, |pos, dst_pixel| {
        let mut lookup = pos;

        for (dest, source) in dest_triangles.iter().zip(&source_triangles) {
            let v2 = pos - dest.a;

            let dot02 = dest.v0.dot(v2);
            let dot12 = dest.v1.dot(v2);

            let u = dest.d11 * dot02 - dest.d01 * dot12;
            let v = dest.d00 * dot12 - dest.d01 * dot02;

            // first containing triangle wins
            if u >= 0.0 && v >= 0.0 && u + v < 1.0 {
                lookup = source.a + source.v0 * u + source.v1 * v;
                break;
            }
        }

        let lookup = lookup.clamp(Vec2::ZERO, Vec2::ONE);
        *dst_pixel = src.sample(lookup.x, lookup.y);
    });
}
