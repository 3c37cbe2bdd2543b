use glam::Vec2;

use crate::marker::{hit_test, Location, Marker, Side};

/// Point correspondence markers, the input of radial-basis warping.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use morph_markers::{Location, PointMarkerSet};
///
/// let mut markers = PointMarkerSet::new();
/// let panel = Vec2::new(640.0, 480.0);
/// markers.on_primary_down(Location::Start, Vec2::new(0.5, 0.5), panel);
/// markers.on_primary_up();
/// assert_eq!(markers.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PointMarkerSet {
    markers: Vec<Marker<Vec2>>,
    last_interpolation: f32,
    selected: Option<usize>,
    hovered: Option<usize>,
}

impl PointMarkerSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers in insertion order.
    pub fn markers(&self) -> &[Marker<Vec2>] {
        &self.markers
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the set has no markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Marker index under the pointer since the last move, for rendering
    /// feedback.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Marker index being dragged, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    fn hit(&self, side: Side, pos: Vec2, image_size_px: Vec2) -> Option<usize> {
        hit_test(
            self.markers.iter().map(|m| *m.geometry(side)),
            pos,
            image_size_px,
        )
    }

    /// Select the hit marker for dragging, or create a new one at `pos`.
    pub fn on_primary_down(&mut self, location: Location, pos: Vec2, image_size_px: Vec2) {
        let Some(side) = location.side() else { return };

        if let Some(index) = self.hit(side, pos, image_size_px) {
            self.selected = Some(index);
            return;
        }

        self.selected = Some(self.markers.len());
        self.markers.push(Marker::at(pos, self.last_interpolation));
    }

    /// Release the dragged marker. Idempotent.
    pub fn on_primary_up(&mut self) {
        self.selected = None;
    }

    /// Delete the marker hit at `pos`, if any.
    pub fn on_secondary_down(&mut self, location: Location, pos: Vec2, image_size_px: Vec2) {
        let Some(side) = location.side() else { return };

        if let Some(index) = self.hit(side, pos, image_size_px) {
            self.markers.remove(index);
            self.selected = None;
            self.hovered = None;
        }
    }

    /// Drag the selected marker to `pos` and refresh hover state.
    ///
    /// Returns whether any marker geometry changed.
    pub fn on_pointer_move(&mut self, location: Location, pos: Vec2, image_size_px: Vec2) -> bool {
        let Some(side) = location.side() else {
            return false;
        };

        self.hovered = self.hit(side, pos, image_size_px);

        if let Some(index) = self.selected {
            let marker = &mut self.markers[index];
            *marker.geometry_mut(side) = pos;
            marker.update_interpolation(self.last_interpolation);
            return true;
        }
        false
    }

    /// Store `t` and recompute every marker's interpolated geometry.
    pub fn update_interpolation(&mut self, t: f32) {
        debug_assert!((0.0..=1.0).contains(&t));
        self.last_interpolation = t;
        for marker in &mut self.markers {
            marker.update_interpolation(t);
        }
    }

    /// Remove all markers.
    pub fn clear_markers(&mut self) {
        self.markers.clear();
        self.selected = None;
        self.hovered = None;
    }
}
