use glam::Vec2;

use crate::marker::{hit_test, LineSegment, Location, Marker, Side};

/// Shortest allowed line segment, in normalized units.
///
/// New lines are seeded with this length and endpoint drags that would
/// shrink a segment below it are rejected.
pub const MIN_LINE_LENGTH: f32 = 0.05;

/// Which endpoint of a segment a gesture addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Endpoint {
    Start,
    End,
}

/// Line correspondence markers, the input of field (Beier-Neely) warping.
#[derive(Clone, Debug, Default)]
pub struct LineMarkerSet {
    markers: Vec<Marker<LineSegment>>,
    last_interpolation: f32,
    dragged: Option<(usize, Endpoint)>,
    /// While the creating drag is held, moves apply to both sides.
    drag_both: bool,
    hovered: Option<(usize, Endpoint)>,
}

impl LineMarkerSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers in insertion order.
    pub fn lines(&self) -> &[Marker<LineSegment>] {
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
        self.hovered.map(|(index, _)| index)
    }

    /// Endpoint hit-test; line ends take precedence over line starts.
    fn hit_endpoint(
        &self,
        side: Side,
        pos: Vec2,
        image_size_px: Vec2,
    ) -> Option<(usize, Endpoint)> {
        if let Some(index) = hit_test(
            self.markers.iter().map(|m| m.geometry(side).end),
            pos,
            image_size_px,
        ) {
            return Some((index, Endpoint::End));
        }
        hit_test(
            self.markers.iter().map(|m| m.geometry(side).start),
            pos,
            image_size_px,
        )
        .map(|index| (index, Endpoint::Start))
    }

    /// Start dragging the hit endpoint, or create a new line at `pos`.
    ///
    /// A new line's second endpoint is seeded at
    /// `pos + (MIN_LINE_LENGTH, 0)` so it never starts degenerate; until the
    /// button is released, drags move the new line in both images.
    pub fn on_primary_down(&mut self, location: Location, pos: Vec2, image_size_px: Vec2) {
        let Some(side) = location.side() else { return };

        if let Some(hit) = self.hit_endpoint(side, pos, image_size_px) {
            self.dragged = Some(hit);
            return;
        }

        self.drag_both = true;
        self.dragged = Some((self.markers.len(), Endpoint::End));

        let segment = LineSegment::new(pos, pos + Vec2::new(MIN_LINE_LENGTH, 0.0));
        let mut marker = Marker {
            start: segment,
            end: segment,
            interpolated: segment,
        };
        marker.update_interpolation(self.last_interpolation);
        self.markers.push(marker);
    }

    /// Release the dragged endpoint. Idempotent.
    pub fn on_primary_up(&mut self) {
        self.dragged = None;
        self.drag_both = false;
    }

    /// Delete the dragged line if any, else the line whose endpoint is hit.
    pub fn on_secondary_down(&mut self, location: Location, pos: Vec2, image_size_px: Vec2) {
        let Some(side) = location.side() else { return };

        if let Some((index, _)) = self.dragged {
            self.markers.remove(index);
        } else if let Some((index, _)) = self.hit_endpoint(side, pos, image_size_px) {
            self.markers.remove(index);
        }

        self.dragged = None;
        self.drag_both = false;
        self.hovered = None;
    }

    /// Drag the held endpoint to `pos`, or refresh hover state.
    ///
    /// A move that would bring the endpoint closer than [`MIN_LINE_LENGTH`]
    /// to the opposite endpoint of the same segment is rejected for that
    /// geometry. Returns whether any geometry changed.
    pub fn on_pointer_move(&mut self, location: Location, pos: Vec2, image_size_px: Vec2) -> bool {
        let Some(side) = location.side() else {
            return false;
        };

        let Some((index, endpoint)) = self.dragged else {
            self.hovered = self.hit_endpoint(side, pos, image_size_px);
            return false;
        };

        let mut changed = Self::move_endpoint(&mut self.markers[index], side, endpoint, pos);
        if self.drag_both {
            changed |=
                Self::move_endpoint(&mut self.markers[index], side.opposite(), endpoint, pos);
        }
        if changed {
            self.markers[index].update_interpolation(self.last_interpolation);
        }
        changed
    }

    fn move_endpoint(
        marker: &mut Marker<LineSegment>,
        side: Side,
        endpoint: Endpoint,
        pos: Vec2,
    ) -> bool {
        let segment = marker.geometry_mut(side);
        let anchor = match endpoint {
            Endpoint::Start => segment.end,
            Endpoint::End => segment.start,
        };
        if (anchor - pos).length() <= MIN_LINE_LENGTH {
            return false;
        }
        match endpoint {
            Endpoint::Start => segment.start = pos,
            Endpoint::End => segment.end = pos,
        }
        true
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
        self.dragged = None;
        self.drag_both = false;
        self.hovered = None;
    }
}
