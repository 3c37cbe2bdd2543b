/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    /// Error when the pixel data length does not match the image size.
    #[error("data length ({0}) does not match the image size ({1})")]
    InvalidLength(usize, usize),

    /// Error when a raw byte slice is not a whole number of RGBA samples.
    #[error("byte length ({0}) is not a multiple of 4")]
    InvalidByteLength(usize),
}
