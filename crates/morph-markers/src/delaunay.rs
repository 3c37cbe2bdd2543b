//! Incremental Delaunay triangulation (Bowyer-Watson).
//!
//! Vertices are inserted one at a time into a synthetic super-triangle;
//! every triangle whose circumcircle contains the new vertex is removed and
//! the resulting cavity is re-filled with triangles fanning out from the
//! vertex. Triangles are returned as index triples into the input slice.

use glam::Vec2;

/// Triangulate `points`, returning triangles as vertex index triples.
///
/// Fewer than three points yield no triangles. The caller is responsible
/// for avoiding fully collinear inputs; the mesh marker set does so by
/// jittering its fixed corner vertices.
pub fn triangulate(points: &[Vec2]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    // bounding box of the input, for sizing the super-triangle
    let mut min = points[0];
    let mut max = points[0];
    for &p in &points[1..] {
        min = min.min(p);
        max = max.max(p);
    }
    let mid = (min + max) * 0.5;
    let extent = (max - min).max_element().max(1.0);

    // super-triangle vertices live past the end of the input slice
    let mut vertices = points.to_vec();
    vertices.push(mid + Vec2::new(-20.0 * extent, -extent));
    vertices.push(mid + Vec2::new(0.0, 20.0 * extent));
    vertices.push(mid + Vec2::new(20.0 * extent, -extent));

    let mut triangles: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];

    for (index, &point) in points.iter().enumerate() {
        // triangles whose circumcircle contains the new vertex
        let mut bad = Vec::new();
        for (ti, tri) in triangles.iter().enumerate() {
            if circumcircle_contains(
                vertices[tri[0]],
                vertices[tri[1]],
                vertices[tri[2]],
                point,
            ) {
                bad.push(ti);
            }
        }

        // cavity boundary: edges belonging to exactly one bad triangle
        let mut boundary: Vec<[usize; 2]> = Vec::new();
        for &ti in &bad {
            let [a, b, c] = triangles[ti];
            for edge in [[a, b], [b, c], [c, a]] {
                if let Some(twin) = boundary
                    .iter()
                    .position(|e| (e[0] == edge[0] && e[1] == edge[1]) || (e[0] == edge[1] && e[1] == edge[0]))
                {
                    boundary.swap_remove(twin);
                } else {
                    boundary.push(edge);
                }
            }
        }

        for &ti in bad.iter().rev() {
            triangles.swap_remove(ti);
        }
        for edge in boundary {
            triangles.push([edge[0], edge[1], index]);
        }
    }

    // drop everything still touching the super-triangle
    triangles.retain(|tri| tri.iter().all(|&v| v < n));
    triangles
}

/// Whether `p` lies strictly inside the circumcircle of the triangle
/// `(a, b, c)`.
///
/// The determinant is evaluated in `f64`; it decides triangulation topology
/// and single precision is not enough near co-circular configurations. A
/// degenerate (zero-area) triangle contains nothing.
fn circumcircle_contains(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> bool {
    let (ax, ay) = ((a.x - p.x) as f64, (a.y - p.y) as f64);
    let (bx, by) = ((b.x - p.x) as f64, (b.y - p.y) as f64);
    let (cx, cy) = ((c.x - p.x) as f64, (c.y - p.y) as f64);

    let det = (ax * ax + ay * ay) * (bx * cy - by * cx)
        - (bx * bx + by * by) * (ax * cy - ay * cx)
        + (cx * cx + cy * cy) * (ax * by - ay * bx);

    let orientation = ((b.x - a.x) as f64) * ((c.y - a.y) as f64)
        - ((b.y - a.y) as f64) * ((c.x - a.x) as f64);

    if orientation > 0.0 {
        det > 0.0
    } else if orientation < 0.0 {
        det < 0.0
    } else {
        false
    }
}
