use glam::Vec2;

use crate::line::LineMarkerSet;
use crate::marker::Location;
use crate::mesh::TriangleMeshMarkerSet;
use crate::point::PointMarkerSet;

/// The marker set families, as a tagged union.
///
/// Each variant pairs with exactly one warping algorithm; the pairing is
/// fixed by the engine's algorithm selection and the warp entry points
/// dispatch on the variant. The union exists so the editing surface (the
/// pointer gestures and the interpolation update) can be driven without
/// knowing the active family.
#[derive(Clone, Debug)]
pub enum MarkerSet {
    /// Point correspondences (radial-basis warping).
    Point(PointMarkerSet),
    /// Line correspondences (field warping).
    Line(LineMarkerSet),
    /// Triangle mesh vertices (mesh warping).
    Mesh(TriangleMeshMarkerSet),
}

impl MarkerSet {
    /// Variant name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            MarkerSet::Point(_) => "point",
            MarkerSet::Line(_) => "line",
            MarkerSet::Mesh(_) => "mesh",
        }
    }

    /// Number of markers (vertices for the mesh family, fixed corners
    /// included).
    pub fn len(&self) -> usize {
        match self {
            MarkerSet::Point(set) => set.len(),
            MarkerSet::Line(set) => set.len(),
            MarkerSet::Mesh(set) => set.len(),
        }
    }

    /// Whether the set has no markers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// See the concrete sets' `on_primary_down`.
    pub fn on_primary_down(&mut self, location: Location, pos: Vec2, image_size_px: Vec2) {
        match self {
            MarkerSet::Point(set) => set.on_primary_down(location, pos, image_size_px),
            MarkerSet::Line(set) => set.on_primary_down(location, pos, image_size_px),
            MarkerSet::Mesh(set) => set.on_primary_down(location, pos, image_size_px),
        }
    }

    /// See the concrete sets' `on_primary_up`.
    pub fn on_primary_up(&mut self) {
        match self {
            MarkerSet::Point(set) => set.on_primary_up(),
            MarkerSet::Line(set) => set.on_primary_up(),
            MarkerSet::Mesh(set) => set.on_primary_up(),
        }
    }

    /// See the concrete sets' `on_secondary_down`.
    pub fn on_secondary_down(&mut self, location: Location, pos: Vec2, image_size_px: Vec2) {
        match self {
            MarkerSet::Point(set) => set.on_secondary_down(location, pos, image_size_px),
            MarkerSet::Line(set) => set.on_secondary_down(location, pos, image_size_px),
            MarkerSet::Mesh(set) => set.on_secondary_down(location, pos, image_size_px),
        }
    }

    /// See the concrete sets' `on_pointer_move`. Returns whether any
    /// geometry changed.
    pub fn on_pointer_move(&mut self, location: Location, pos: Vec2, image_size_px: Vec2) -> bool {
        match self {
            MarkerSet::Point(set) => set.on_pointer_move(location, pos, image_size_px),
            MarkerSet::Line(set) => set.on_pointer_move(location, pos, image_size_px),
            MarkerSet::Mesh(set) => set.on_pointer_move(location, pos, image_size_px),
        }
    }

    /// Store `t` and recompute every marker's interpolated geometry.
    pub fn update_interpolation(&mut self, t: f32) {
        match self {
            MarkerSet::Point(set) => set.update_interpolation(t),
            MarkerSet::Line(set) => set.update_interpolation(t),
            MarkerSet::Mesh(set) => set.update_interpolation(t),
        }
    }

    /// Remove all removable markers.
    pub fn clear_markers(&mut self) {
        match self {
            MarkerSet::Point(set) => set.clear_markers(),
            MarkerSet::Line(set) => set.clear_markers(),
            MarkerSet::Mesh(set) => set.clear_markers(),
        }
    }
}
