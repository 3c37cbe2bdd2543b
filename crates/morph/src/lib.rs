#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use morph_image as image;

#[doc(inline)]
pub use morph_markers as markers;

#[doc(inline)]
pub use morph_imgproc as imgproc;

#[doc(inline)]
pub use morph_engine as engine;
