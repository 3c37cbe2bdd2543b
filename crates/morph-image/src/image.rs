use crate::color::Rgba;
use crate::error::ImageError;

/// Image size in pixels
///
/// # Examples
///
/// ```
/// use morph_image::ImageSize;
///
/// let image_size = ImageSize {
///     width: 10,
///     height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl ImageSize {
    /// Number of pixels in an image of this size.
    pub fn num_pixels(&self) -> usize {
        self.width * self.height
    }
}

/// An owned raster of packed RGBA samples addressed `[y * width + x]`.
///
/// The buffer length always equals `width * height`; the byte stride of a
/// row is therefore `width * 4`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    size: ImageSize,
    data: Vec<Rgba>,
}

impl ImageBuffer {
    /// Create a new image from pixel data.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an
    /// error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use morph_image::{ImageBuffer, ImageSize, Rgba};
    ///
    /// let image = ImageBuffer::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![Rgba::default(); 10 * 20],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// ```
    pub fn new(size: ImageSize, data: Vec<Rgba>) -> Result<Self, ImageError> {
        if data.len() != size.num_pixels() {
            return Err(ImageError::InvalidLength(data.len(), size.num_pixels()));
        }

        Ok(Self { size, data })
    }

    /// Create a new image filled with a single color.
    pub fn from_size_val(size: ImageSize, val: Rgba) -> Self {
        Self {
            size,
            data: vec![val; size.num_pixels()],
        }
    }

    /// Create a new image from packed RGBA8 bytes, 4 bytes per pixel.
    ///
    /// This is the adapter for decode glue handing over raw byte arrays.
    ///
    /// # Errors
    ///
    /// If the byte length is not a multiple of 4 or does not match the image
    /// size, an error is returned.
    pub fn from_rgba8(size: ImageSize, bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.len() % 4 != 0 {
            return Err(ImageError::InvalidByteLength(bytes.len()));
        }

        let data = bytes
            .chunks_exact(4)
            .map(|px| Rgba::new(px[0], px[1], px[2], px[3]))
            .collect::<Vec<_>>();

        Self::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the pixel data as a flat slice in row-major order.
    pub fn as_slice(&self) -> &[Rgba] {
        &self.data
    }

    /// Get the pixel data as a mutable flat slice in row-major order.
    pub fn as_slice_mut(&mut self) -> &mut [Rgba] {
        &mut self.data
    }

    /// Get the pixel at integer coordinates, if inside the image.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(self.data[y * self.size.width + x])
    }

    /// Bilinearly sample the image at normalized coordinates.
    ///
    /// `x` and `y` must be in `[0, 1]`; they map to the pixel grid as
    /// `(x * (width - 1), y * (height - 1))`. The four nearest neighbors are
    /// blended with [`Rgba::lerp`], so the truncation of that lerp carries
    /// into the sampled value. Neighbor lookups clamp at the last row and
    /// column. Out-of-range input is a caller bug; callers clamp first.
    pub fn sample(&self, x: f32, y: f32) -> Rgba {
        debug_assert!((0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y));

        let (cols, rows) = (self.size.width, self.size.height);

        let u = x * (cols - 1) as f32;
        let v = y * (rows - 1) as f32;

        let iu = (u.trunc() as usize).min(cols - 1);
        let iv = (v.trunc() as usize).min(rows - 1);

        let iu1 = (iu + 1).min(cols - 1);
        let iv1 = (iv + 1).min(rows - 1);

        let frac_u = u.fract();
        let frac_v = v.fract();

        let p00 = self.data[iv * cols + iu];
        let p01 = self.data[iv * cols + iu1];
        let p10 = self.data[iv1 * cols + iu];
        let p11 = self.data[iv1 * cols + iu1];

        let top = Rgba::lerp(p00, p01, frac_u);
        let bottom = Rgba::lerp(p10, p11, frac_u);
        Rgba::lerp(top, bottom, frac_v)
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageBuffer, ImageSize};
    use crate::color::Rgba;
    use crate::error::ImageError;

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert_eq!(image_size.num_pixels(), 200);
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = ImageBuffer::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            vec![Rgba::default(); 10 * 20],
        )?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);

        Ok(())
    }

    #[test]
    fn image_length_mismatch() {
        let result = ImageBuffer::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            vec![Rgba::default(); 5],
        );
        assert_eq!(result.err(), Some(ImageError::InvalidLength(5, 16)));
    }

    #[test]
    fn image_from_rgba8() -> Result<(), ImageError> {
        let bytes = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let image = ImageBuffer::from_rgba8(
            ImageSize {
                width: 2,
                height: 1,
            },
            &bytes,
        )?;
        assert_eq!(image.get(0, 0), Some(Rgba::new(1, 2, 3, 4)));
        assert_eq!(image.get(1, 0), Some(Rgba::new(5, 6, 7, 8)));
        assert_eq!(image.get(2, 0), None);

        Ok(())
    }

    #[test]
    fn image_from_rgba8_bad_length() {
        let result = ImageBuffer::from_rgba8(
            ImageSize {
                width: 1,
                height: 1,
            },
            &[0u8; 3],
        );
        assert_eq!(result.err(), Some(ImageError::InvalidByteLength(3)));
    }

    #[test]
    fn sample_at_corners() -> Result<(), ImageError> {
        let image = ImageBuffer::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![
                Rgba::opaque(10, 0, 0),
                Rgba::opaque(20, 0, 0),
                Rgba::opaque(30, 0, 0),
                Rgba::opaque(40, 0, 0),
            ],
        )?;

        assert_eq!(image.sample(0.0, 0.0), Rgba::opaque(10, 0, 0));
        assert_eq!(image.sample(1.0, 0.0), Rgba::opaque(20, 0, 0));
        assert_eq!(image.sample(0.0, 1.0), Rgba::opaque(30, 0, 0));
        assert_eq!(image.sample(1.0, 1.0), Rgba::opaque(40, 0, 0));

        Ok(())
    }

    #[test]
    fn sample_center_blends() -> Result<(), ImageError> {
        let image = ImageBuffer::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![Rgba::opaque(0, 0, 0), Rgba::opaque(100, 0, 0)],
        )?;

        assert_eq!(image.sample(0.5, 0.0), Rgba::opaque(50, 0, 0));
        assert_eq!(image.sample(0.5, 1.0), Rgba::opaque(50, 0, 0));

        Ok(())
    }

    #[test]
    fn sample_constant_image() {
        let image = ImageBuffer::from_size_val(
            ImageSize {
                width: 7,
                height: 5,
            },
            Rgba::opaque(9, 8, 7),
        );

        for (x, y) in [(0.0, 0.0), (0.3, 0.7), (1.0, 1.0), (0.99, 0.01)] {
            assert_eq!(image.sample(x, y), Rgba::opaque(9, 8, 7));
        }
    }
}
