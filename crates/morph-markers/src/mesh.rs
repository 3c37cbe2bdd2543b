use glam::Vec2;
use rand::Rng;

use crate::delaunay;
use crate::marker::{hit_test, Lerp, Location, Marker, Side};

/// Number of fixed boundary vertices seeded at the image corners.
pub const NUM_FIXED_VERTICES: usize = 4;

/// Spread of the random offset applied to the fixed corner vertices.
const CORNER_JITTER: f32 = 1e-3;

/// Triangle-mesh vertex markers, the input of mesh warping.
///
/// The set always carries four fixed boundary vertices just outside the
/// image corners; they can be selected but never moved or removed. The
/// triangle connectivity is a Delaunay triangulation over all vertex
/// positions sampled at interpolation factor 0.5, recomputed after every
/// edit rather than every frame.
#[derive(Clone, Debug)]
pub struct TriangleMeshMarkerSet {
    markers: Vec<Marker<Vec2>>,
    triangles: Vec<[usize; 3]>,
    last_interpolation: f32,
    selected: Option<usize>,
    hovered: Option<usize>,
}

impl Default for TriangleMeshMarkerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TriangleMeshMarkerSet {
    /// Create a set holding only the four fixed corner vertices.
    ///
    /// Each corner is pushed slightly outside the unit square by an
    /// independent random offset, which keeps the corner configuration off
    /// the exactly co-circular case the triangulation cannot order.
    pub fn new() -> Self {
        let mut rng = rand::rng();
        let mut jitter = || rng.random_range(0.0..CORNER_JITTER);

        let corners = [
            Vec2::new(0.0, -jitter()),
            Vec2::new(1.0 + jitter(), 0.0),
            Vec2::new(1.0, 1.0 + jitter()),
            Vec2::new(-jitter(), 1.0),
        ];

        let mut set = Self {
            markers: corners.iter().map(|&c| Marker::at(c, 0.0)).collect(),
            triangles: Vec::new(),
            last_interpolation: 0.0,
            selected: None,
            hovered: None,
        };
        set.retriangulate();
        set
    }

    /// Vertices in insertion order; the first [`NUM_FIXED_VERTICES`] are the
    /// fixed corners.
    pub fn vertices(&self) -> &[Marker<Vec2>] {
        &self.markers
    }

    /// Triangles as vertex index triples, in triangulation order.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Number of vertices, fixed corners included.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the set has no vertices. Never true: the corners remain.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Vertex index under the pointer since the last move, for rendering
    /// feedback.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    fn hit(&self, side: Side, pos: Vec2, image_size_px: Vec2) -> Option<usize> {
        hit_test(
            self.markers.iter().map(|m| *m.geometry(side)),
            pos,
            image_size_px,
        )
    }

    /// Recompute the Delaunay triangulation over the mid-interpolation
    /// vertex positions.
    fn retriangulate(&mut self) {
        let positions: Vec<Vec2> = self
            .markers
            .iter()
            .map(|m| Lerp::lerp(m.start, m.end, 0.5))
            .collect();
        self.triangles = delaunay::triangulate(&positions);
        log::debug!(
            "triangulated {} vertices into {} triangles",
            positions.len(),
            self.triangles.len()
        );
    }

    /// Select the hit vertex for dragging, or insert a new one at `pos`.
    pub fn on_primary_down(&mut self, location: Location, pos: Vec2, image_size_px: Vec2) {
        let Some(side) = location.side() else { return };

        if let Some(index) = self.hit(side, pos, image_size_px) {
            self.selected = Some(index);
            return;
        }

        self.selected = Some(self.markers.len());
        self.markers.push(Marker::at(pos, self.last_interpolation));
        self.retriangulate();
    }

    /// Release the dragged vertex. Idempotent.
    pub fn on_primary_up(&mut self) {
        self.selected = None;
    }

    /// Delete the hit vertex unless it is one of the fixed corners.
    pub fn on_secondary_down(&mut self, location: Location, pos: Vec2, image_size_px: Vec2) {
        let Some(side) = location.side() else { return };

        match self.hit(side, pos, image_size_px) {
            Some(index) if index >= NUM_FIXED_VERTICES => {
                self.markers.remove(index);
                self.selected = None;
                self.hovered = None;
                self.retriangulate();
            }
            _ => {}
        }
    }

    /// Drag the selected vertex to `pos`, or refresh hover state.
    ///
    /// Fixed corner vertices stay put even while selected. An accepted move
    /// retriangulates. Returns whether any geometry changed.
    pub fn on_pointer_move(&mut self, location: Location, pos: Vec2, image_size_px: Vec2) -> bool {
        let Some(side) = location.side() else {
            return false;
        };

        self.hovered = self.hit(side, pos, image_size_px);

        match self.selected {
            Some(index) if index >= NUM_FIXED_VERTICES => {
                let marker = &mut self.markers[index];
                *marker.geometry_mut(side) = pos;
                marker.update_interpolation(self.last_interpolation);
                self.retriangulate();
                true
            }
            _ => false,
        }
    }

    /// Store `t` and recompute every vertex's interpolated position.
    ///
    /// The triangulation is untouched; connectivity is pinned to the 0.5
    /// sample and only changes on edits.
    pub fn update_interpolation(&mut self, t: f32) {
        debug_assert!((0.0..=1.0).contains(&t));
        self.last_interpolation = t;
        for marker in &mut self.markers {
            marker.update_interpolation(t);
        }
    }

    /// Remove all vertices except the fixed corners.
    pub fn clear_markers(&mut self) {
        self.markers.truncate(NUM_FIXED_VERTICES);
        self.selected = None;
        self.hovered = None;
        self.retriangulate();
    }
}
