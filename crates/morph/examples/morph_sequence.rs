//! Render a short morph sequence between two synthetic images.
//!
//! Run with `RUST_LOG=debug` to see the engine's per-frame tracing.

use morph::engine::{Algorithm, Morphing};
use morph::image::{ImageBuffer, ImageSize, Rgba};
use morph::markers::glam::Vec2;
use morph::markers::Location;

const FRAMES: usize = 10;

/// A vertical two-tone test card.
fn two_tone(size: ImageSize, left: Rgba, right: Rgba) -> ImageBuffer {
    let mut image = ImageBuffer::from_size_val(size, left);
    for y in 0..size.height {
        for x in size.width / 2..size.width {
            image.as_slice_mut()[y * size.width + x] = right;
        }
    }
    image
}

fn main() {
    env_logger::init();

    let size = ImageSize {
        width: 512,
        height: 512,
    };

    let mut engine = Morphing::new(Algorithm::RadialFunctions);
    engine.set_start_image(two_tone(
        size,
        Rgba::opaque(220, 40, 40),
        Rgba::opaque(240, 200, 40),
    ));
    engine.set_end_image(two_tone(
        size,
        Rgba::opaque(40, 60, 220),
        Rgba::opaque(40, 200, 160),
    ));

    // one correspondence: a feature at (0.4, 0.5) in the start image moves
    // to (0.6, 0.5) in the end image
    let panel = Vec2::new(size.width as f32, size.height as f32);
    let markers = engine.marker_set_mut();
    markers.on_primary_down(Location::Start, Vec2::new(0.4, 0.5), panel);
    markers.on_primary_up();
    markers.on_primary_down(Location::End, Vec2::new(0.4, 0.5), panel);
    markers.on_pointer_move(Location::End, Vec2::new(0.6, 0.5), panel);
    markers.on_primary_up();

    let mut output = ImageBuffer::from_size_val(
        engine.output_size().expect("both images are set"),
        Rgba::default(),
    );

    let started = std::time::Instant::now();
    for frame in 0..FRAMES {
        let progress = frame as f32 / (FRAMES - 1) as f32;
        engine.render(progress, &mut output);

        let center = output.get(size.width / 2, size.height / 2).unwrap();
        println!(
            "frame {frame:2} progress {progress:.2} center pixel ({}, {}, {})",
            center.r, center.g, center.b
        );
    }
    println!(
        "rendered {FRAMES} frames of {size} in {:?}",
        started.elapsed()
    );
}
