use std::io;
use thiserror::Error;

//===========================================================================//

/// Errors that can occur while decoding an ICO file.
///
/// A failed decode always yields exactly one of these, and never a partially
/// decoded file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IcoError {
    /// The header or directory is malformed (for example, a nonzero reserved
    /// field, or too few bytes to hold the declared directory).
    #[error("Invalid ICO data: {0}")]
    InvalidFormat(String),

    /// The header declares a resource type other than icons (1).  Cursor
    /// files (type 2) end up here.
    #[error(
        "Unsupported resource type ({0}), only icon files (type 1) are \
         supported"
    )]
    UnsupportedContainerType(u16),

    /// The header declares zero images.
    #[error("ICO file contains no images")]
    EmptyFile,

    /// A directory entry points outside of the input buffer.
    #[error(
        "Image {index} spans {size} bytes at offset {offset}, but the input \
         is only {available} bytes long"
    )]
    OutOfBounds {
        /// Index of the offending directory entry.
        index: usize,
        /// Declared payload offset.
        offset: u32,
        /// Declared payload size.
        size: u32,
        /// Length of the whole input buffer.
        available: usize,
    },

    /// A BMP payload ends before all of its color data could be read.
    #[error(
        "BMP data for image {index} is truncated (needed {needed} bytes, \
         but only {available} are available)"
    )]
    TruncatedData {
        /// Index of the offending directory entry.
        index: usize,
        /// Number of payload bytes required.
        needed: u64,
        /// Number of payload bytes present.
        available: usize,
    },

    /// A BMP payload uses a color depth that this crate can't decode.
    #[error(
        "Unsupported BMP bits-per-pixel ({bits_per_pixel}) in image {index}"
    )]
    UnsupportedBitDepth {
        /// Index of the offending directory entry.
        index: usize,
        /// The bits-per-pixel value from the DIB header.
        bits_per_pixel: u16,
    },

    /// The PNG decoder rejected an embedded PNG image.
    #[error("Malformed PNG data in image {index}: {source}")]
    Png {
        /// Index of the offending directory entry.
        index: usize,
        /// The error reported by the PNG decoder.
        #[source]
        source: png::DecodingError,
    },

    /// Reading from the underlying stream failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A specialized `Result` type for ICO decoding.
pub type Result<T> = std::result::Result<T, IcoError>;

//===========================================================================//

/// A failure while decoding a single embedded image, before it has been
/// attributed to a directory entry.
#[derive(Debug)]
pub(crate) enum ImageError {
    Invalid(String),
    Truncated { needed: u64, available: usize },
    UnsupportedBitDepth(u16),
    Png(png::DecodingError),
}

impl ImageError {
    /// Attributes this failure to the directory entry at `index`.
    pub(crate) fn at(self, index: usize) -> IcoError {
        match self {
            ImageError::Invalid(message) => IcoError::InvalidFormat(format!(
                "Image {}: {}",
                index, message
            )),
            ImageError::Truncated { needed, available } => {
                IcoError::TruncatedData { index, needed, available }
            }
            ImageError::UnsupportedBitDepth(bits_per_pixel) => {
                IcoError::UnsupportedBitDepth { index, bits_per_pixel }
            }
            ImageError::Png(source) => IcoError::Png { index, source },
        }
    }
}

impl From<png::DecodingError> for ImageError {
    fn from(error: png::DecodingError) -> ImageError {
        ImageError::Png(error)
    }
}

//===========================================================================//


//===========================================================================//
