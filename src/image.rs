use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::{self, Read};

//===========================================================================//

/// A decoded image: a grid of straight-alpha (non-premultiplied) RGBA pixels
/// in row-major order, starting from the top-left corner.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgba_data: Vec<u8>,
}

impl RasterImage {
    /// Creates a new image with the given dimensions and RGBA data.  The
    /// `rgba_data` must have `4 * width * height` bytes and be in row-major
    /// order from top to bottom.  Panics if `rgba_data` is the wrong length.
    pub fn from_rgba_data(
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
    ) -> RasterImage {
        let expected_data_len = (width as u64) * (height as u64) * 4;
        if (rgba_data.len() as u64) != expected_data_len {
            panic!(
                "Invalid data length (was {}, but must be {} for {}x{} image)",
                rgba_data.len(),
                expected_data_len,
                width,
                height
            );
        }
        RasterImage { width, height, rgba_data }
    }

    /// Decodes an image from a PNG stream.  Every PNG color type and bit
    /// depth is converted to 8-bit RGBA.
    pub fn read_png<R: Read>(
        reader: R,
    ) -> Result<RasterImage, png::DecodingError> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(
            png::Transformations::EXPAND | png::Transformations::STRIP_16,
        );
        let mut png_reader = decoder.read_info()?;
        let mut buffer = vec![0u8; png_reader.output_buffer_size()];
        let frame = png_reader.next_frame(&mut buffer)?;
        buffer.truncate(frame.buffer_size());
        trace!(
            "PNG: {}x{} {:?} {:?}",
            frame.width,
            frame.height,
            frame.color_type,
            frame.bit_depth
        );
        let rgba_data = match frame.color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => {
                let mut rgba = Vec::with_capacity(buffer.len() / 3 * 4);
                for rgb in buffer.chunks_exact(3) {
                    rgba.extend_from_slice(rgb);
                    rgba.push(u8::MAX);
                }
                rgba
            }
            png::ColorType::GrayscaleAlpha => {
                let mut rgba = Vec::with_capacity(buffer.len() * 2);
                for pair in buffer.chunks_exact(2) {
                    let (gray, alpha) = (pair[0], pair[1]);
                    rgba.extend_from_slice(&[gray, gray, gray, alpha]);
                }
                rgba
            }
            png::ColorType::Grayscale => {
                let mut rgba = Vec::with_capacity(buffer.len() * 4);
                for gray in buffer.into_iter() {
                    rgba.extend_from_slice(&[gray, gray, gray, u8::MAX]);
                }
                rgba
            }
            // Unreachable: EXPAND converts every palette to RGB or RGBA
            // before a frame is returned.
            png::ColorType::Indexed => {
                return Err(png::DecodingError::IoError(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "PNG palette was not expanded to RGB(A)",
                )));
            }
        };
        Ok(RasterImage::from_rgba_data(frame.width, frame.height, rgba_data))
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the RGBA data for this image, in row-major order from top to
    /// bottom.
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// Consumes the image and returns its RGBA data.
    pub fn into_rgba_data(self) -> Vec<u8> {
        self.rgba_data
    }

    /// Returns the RGBA value of the pixel at column `x` and row `y`
    /// (counting from the top), or `None` if that is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = 4 * (y as usize * self.width as usize + x as usize);
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.rgba_data[start..start + 4]);
        Some(rgba)
    }
}

//===========================================================================//


//===========================================================================//
