use glam::Vec2;

/// On-screen marker hit radius in pixels.
pub const HIT_RADIUS_PX: f32 = 10.0;

/// The two sides of a correspondence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Geometry in the start image.
    Start,
    /// Geometry in the end image.
    End,
}

impl Side {
    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Side::Start => Side::End,
            Side::End => Side::Start,
        }
    }
}

/// Which image panel a pointer event belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// The start image panel.
    Start,
    /// The end image panel.
    End,
    /// Neither panel; marker sets ignore the event.
    Outside,
}

impl Location {
    /// The correspondence side addressed by this location, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Location::Start => Some(Side::Start),
            Location::End => Some(Side::End),
            Location::Outside => None,
        }
    }
}

/// Linear interpolation between two values of the same geometry type.
pub trait Lerp {
    /// Interpolate from `a` to `b` by a factor `t` in `[0, 1]`.
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for Vec2 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

/// A line segment in normalized image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    /// First endpoint.
    pub start: Vec2,
    /// Second endpoint.
    pub end: Vec2,
}

impl LineSegment {
    /// Create a segment from its endpoints.
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Length of the segment.
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

impl Lerp for LineSegment {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self {
            start: Lerp::lerp(a.start, b.start, t),
            end: Lerp::lerp(a.end, b.end, t),
        }
    }
}

/// A feature correspondence between the start and the end image.
///
/// The interpolated geometry is derived state; it is recomputed whenever the
/// owning set applies a new interpolation factor and whenever a drag edits
/// one of the sides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker<T> {
    /// Geometry in the start image.
    pub start: T,
    /// Geometry in the end image.
    pub end: T,
    /// Geometry blended at the last applied interpolation factor.
    pub interpolated: T,
}

impl<T: Lerp + Copy> Marker<T> {
    /// Create a marker with both sides at the same geometry, interpolated at
    /// the given factor.
    pub fn at(geometry: T, interpolation: f32) -> Self {
        let mut marker = Self {
            start: geometry,
            end: geometry,
            interpolated: geometry,
        };
        marker.update_interpolation(interpolation);
        marker
    }

    /// Recompute the interpolated geometry for the factor `t`.
    pub fn update_interpolation(&mut self, t: f32) {
        self.interpolated = T::lerp(self.start, self.end, t);
    }

    /// The geometry on the given side.
    pub fn geometry(&self, side: Side) -> &T {
        match side {
            Side::Start => &self.start,
            Side::End => &self.end,
        }
    }

    /// The geometry on the given side, mutably.
    pub fn geometry_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Start => &mut self.start,
            Side::End => &mut self.end,
        }
    }
}

/// Index of the first point within the hit radius of `pos`, if any.
///
/// `image_size_px` is the on-screen pixel size of the clicked panel; it
/// converts the fixed [`HIT_RADIUS_PX`] into normalized units per axis, so
/// hits track the rendered marker size regardless of panel scale.
pub fn hit_test<I>(points: I, pos: Vec2, image_size_px: Vec2) -> Option<usize>
where
    I: IntoIterator<Item = Vec2>,
{
    points.into_iter().position(|point| {
        let delta_px = (point - pos) * image_size_px;
        delta_px.length_squared() <= HIT_RADIUS_PX * HIT_RADIUS_PX
    })
}
