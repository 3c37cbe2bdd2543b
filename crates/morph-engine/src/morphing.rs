use morph_image::{ImageBuffer, ImageSize, Rgba};
use morph_imgproc::dissolve::cross_dissolve;
use morph_imgproc::warp::warp;
use morph_markers::{
    LineMarkerSet, MarkerSet, PointMarkerSet, Side, TriangleMeshMarkerSet,
};

/// The available morphing algorithms.
///
/// Each variant maps 1:1 to a marker set family and a warping
/// implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Triangle-mesh warping over a Delaunay triangulation.
    MeshBased,
    /// Radial-basis warping over point markers.
    RadialFunctions,
    /// Field (Beier-Neely) warping over line markers.
    FeatureBased,
}

impl Algorithm {
    fn make_marker_set(self) -> MarkerSet {
        match self {
            Algorithm::MeshBased => MarkerSet::Mesh(TriangleMeshMarkerSet::new()),
            Algorithm::RadialFunctions => MarkerSet::Point(PointMarkerSet::new()),
            Algorithm::FeatureBased => MarkerSet::Line(LineMarkerSet::new()),
        }
    }
}

/// Morphing engine: algorithm selection, image slots and the render
/// pipeline.
///
/// The engine is not internally reentrant; a render reuses the engine-owned
/// warp buffers, so callers serialize `render` calls and keep marker edits
/// off in-flight renders.
///
/// # Examples
///
/// ```
/// use morph_engine::{Algorithm, Morphing};
/// use morph_image::{ImageBuffer, ImageSize, Rgba};
///
/// let size = ImageSize {
///     width: 32,
///     height: 32,
/// };
///
/// let mut engine = Morphing::new(Algorithm::RadialFunctions);
/// engine.set_start_image(ImageBuffer::from_size_val(size, Rgba::opaque(255, 0, 0)));
/// engine.set_end_image(ImageBuffer::from_size_val(size, Rgba::opaque(0, 0, 255)));
///
/// let mut output = ImageBuffer::from_size_val(engine.output_size().unwrap(), Rgba::default());
/// engine.render(0.5, &mut output);
/// ```
#[derive(Debug)]
pub struct Morphing {
    algorithm: Algorithm,
    marker_set: MarkerSet,
    start_image: Option<ImageBuffer>,
    end_image: Option<ImageBuffer>,
    warped_start: Option<ImageBuffer>,
    warped_end: Option<ImageBuffer>,
}

impl Morphing {
    /// Create an engine with a fresh marker set for `algorithm`.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            marker_set: algorithm.make_marker_set(),
            start_image: None,
            end_image: None,
            warped_start: None,
            warped_end: None,
        }
    }

    /// The active algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Switch the active algorithm.
    ///
    /// Changing the algorithm discards the current marker set and starts a
    /// fresh one of the matching family; marker edits do not survive the
    /// switch. Selecting the already-active algorithm keeps everything.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        if algorithm == self.algorithm {
            return;
        }
        self.algorithm = algorithm;
        self.marker_set = algorithm.make_marker_set();
        log::debug!("switched to {algorithm:?}, marker set reset");
    }

    /// The active marker set, for overlay rendering and queries.
    pub fn marker_set(&self) -> &MarkerSet {
        &self.marker_set
    }

    /// The active marker set, for routing pointer gestures into.
    pub fn marker_set_mut(&mut self) -> &mut MarkerSet {
        &mut self.marker_set
    }

    /// Assign the start image, dropping the previously owned buffer.
    pub fn set_start_image(&mut self, image: ImageBuffer) {
        self.start_image = Some(image);
    }

    /// Assign the end image, dropping the previously owned buffer.
    pub fn set_end_image(&mut self, image: ImageBuffer) {
        self.end_image = Some(image);
    }

    /// The start image, if assigned.
    pub fn start_image(&self) -> Option<&ImageBuffer> {
        self.start_image.as_ref()
    }

    /// The end image, if assigned.
    pub fn end_image(&self) -> Option<&ImageBuffer> {
        self.end_image.as_ref()
    }

    /// Conventional output size: the component-wise maximum of the two
    /// source sizes. `None` until both images are assigned.
    pub fn output_size(&self) -> Option<ImageSize> {
        let start = self.start_image.as_ref()?.size();
        let end = self.end_image.as_ref()?.size();
        Some(ImageSize {
            width: start.width.max(end.width),
            height: start.height.max(end.height),
        })
    }

    /// Render the morph at `progress` into `output`.
    ///
    /// Runs the full pipeline: marker interpolation update, one warp pass
    /// per source image onto the output grid, cross-dissolve of the warped
    /// pair. Warping samples normalized coordinates, so the output may have
    /// any size; [`Morphing::output_size`] gives the conventional choice.
    ///
    /// # Panics
    ///
    /// Panics when `progress` is outside `[0, 1]` or either source image is
    /// missing; both indicate a caller bug, not a runtime condition.
    pub fn render(&mut self, progress: f32, output: &mut ImageBuffer) {
        assert!(
            (0.0..=1.0).contains(&progress),
            "progress out of range: {progress}"
        );
        let (Some(start_image), Some(end_image)) = (&self.start_image, &self.end_image) else {
            panic!("render requires both source images");
        };
        debug_assert!(
            matches!(
                (self.algorithm, &self.marker_set),
                (Algorithm::MeshBased, MarkerSet::Mesh(_))
                    | (Algorithm::RadialFunctions, MarkerSet::Point(_))
                    | (Algorithm::FeatureBased, MarkerSet::Line(_))
            ),
            "algorithm {:?} paired with {} marker set",
            self.algorithm,
            self.marker_set.kind()
        );

        let size = output.size();
        let warped_start = Self::scratch(&mut self.warped_start, size);
        let warped_end = Self::scratch(&mut self.warped_end, size);

        self.marker_set.update_interpolation(progress);

        warp(&self.marker_set, start_image, warped_start, Side::Start);
        warp(&self.marker_set, end_image, warped_end, Side::End);
        cross_dissolve(warped_start, warped_end, output, progress);

        log::debug!(
            "rendered {size} at progress {progress:.3} with {:?} ({} markers)",
            self.algorithm,
            self.marker_set.len()
        );
    }

    /// The scratch buffer for one warp slot, reallocated only when the
    /// render target size changed.
    fn scratch(slot: &mut Option<ImageBuffer>, size: ImageSize) -> &mut ImageBuffer {
        if slot.as_ref().map(ImageBuffer::size) != Some(size) {
            *slot = Some(ImageBuffer::from_size_val(size, Rgba::default()));
        }
        slot.as_mut().expect("scratch slot just filled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use morph_markers::Location;

    const SIZE: ImageSize = ImageSize {
        width: 16,
        height: 16,
    };

    fn engine_with_images(algorithm: Algorithm) -> Morphing {
        let mut engine = Morphing::new(algorithm);
        engine.set_start_image(ImageBuffer::from_size_val(SIZE, Rgba::opaque(255, 0, 0)));
        engine.set_end_image(ImageBuffer::from_size_val(SIZE, Rgba::opaque(0, 0, 255)));
        engine
    }

    #[test]
    fn render_midpoint_blends_constant_images() {
        let size = ImageSize {
            width: 256,
            height: 256,
        };
        let mut engine = Morphing::new(Algorithm::RadialFunctions);
        engine.set_start_image(ImageBuffer::from_size_val(size, Rgba::opaque(255, 0, 0)));
        engine.set_end_image(ImageBuffer::from_size_val(size, Rgba::opaque(0, 0, 255)));
        let mut output = ImageBuffer::from_size_val(size, Rgba::default());

        engine.render(0.5, &mut output);

        for &px in output.as_slice() {
            // (255 + 0) / 2 per channel, allowing the truncation unit
            assert!(px.r.abs_diff(127) <= 1);
            assert!(px.g == 0);
            assert!(px.b.abs_diff(127) <= 1);
        }
    }

    #[test]
    fn render_endpoints_reproduce_warped_sides() {
        let mut engine = engine_with_images(Algorithm::RadialFunctions);
        let mut output = ImageBuffer::from_size_val(SIZE, Rgba::default());

        engine.render(0.0, &mut output);
        assert!(output.as_slice().iter().all(|px| px.r == 255 && px.b == 0));

        engine.render(1.0, &mut output);
        assert!(output.as_slice().iter().all(|px| px.r == 0 && px.b == 255));
    }

    #[test]
    fn render_works_for_every_algorithm() {
        for algorithm in [
            Algorithm::MeshBased,
            Algorithm::RadialFunctions,
            Algorithm::FeatureBased,
        ] {
            let mut engine = engine_with_images(algorithm);
            let mut output = ImageBuffer::from_size_val(SIZE, Rgba::default());
            engine.render(0.25, &mut output);
        }
    }

    #[test]
    fn output_size_is_the_larger_source() {
        let mut engine = Morphing::new(Algorithm::RadialFunctions);
        assert_eq!(engine.output_size(), None);

        engine.set_start_image(ImageBuffer::from_size_val(
            ImageSize {
                width: 64,
                height: 16,
            },
            Rgba::default(),
        ));
        assert_eq!(engine.output_size(), None);

        engine.set_end_image(ImageBuffer::from_size_val(
            ImageSize {
                width: 32,
                height: 48,
            },
            Rgba::default(),
        ));
        assert_eq!(
            engine.output_size(),
            Some(ImageSize {
                width: 64,
                height: 48,
            })
        );
    }

    #[test]
    fn algorithm_switch_resets_markers() {
        let mut engine = Morphing::new(Algorithm::RadialFunctions);
        let panel = Vec2::new(100.0, 100.0);
        engine
            .marker_set_mut()
            .on_primary_down(Location::Start, Vec2::new(0.5, 0.5), panel);
        engine.marker_set_mut().on_primary_up();
        assert_eq!(engine.marker_set().len(), 1);

        engine.set_algorithm(Algorithm::FeatureBased);
        assert!(matches!(engine.marker_set(), MarkerSet::Line(_)));
        assert_eq!(engine.marker_set().len(), 0);

        // re-selecting the active algorithm keeps the marker set
        engine
            .marker_set_mut()
            .on_primary_down(Location::Start, Vec2::new(0.5, 0.5), panel);
        engine.marker_set_mut().on_primary_up();
        engine.set_algorithm(Algorithm::FeatureBased);
        assert_eq!(engine.marker_set().len(), 1);
    }

    #[test]
    #[should_panic(expected = "progress out of range")]
    fn out_of_range_progress_is_fatal() {
        let mut engine = engine_with_images(Algorithm::RadialFunctions);
        let mut output = ImageBuffer::from_size_val(SIZE, Rgba::default());
        engine.render(1.25, &mut output);
    }

    #[test]
    #[should_panic(expected = "both source images")]
    fn render_without_images_is_fatal() {
        let mut engine = Morphing::new(Algorithm::RadialFunctions);
        let mut output = ImageBuffer::from_size_val(SIZE, Rgba::default());
        engine.render(0.5, &mut output);
    }

    #[test]
    fn render_into_differently_sized_outputs_reuses_slots() {
        let mut engine = engine_with_images(Algorithm::RadialFunctions);

        let mut small = ImageBuffer::from_size_val(
            ImageSize {
                width: 8,
                height: 8,
            },
            Rgba::default(),
        );
        let mut large = ImageBuffer::from_size_val(SIZE, Rgba::default());

        engine.render(0.5, &mut small);
        engine.render(0.5, &mut large);
        engine.render(0.5, &mut large);

        assert!(large.as_slice().iter().all(|px| px.r.abs_diff(127) <= 1));
    }
}
