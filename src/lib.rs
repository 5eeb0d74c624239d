//! A library for decoding ICO icon files.
//!
//! An ICO file holds a small header, a directory of image descriptors, and
//! the images themselves, each stored either as a complete PNG stream or as
//! a BMP without its file header.  This crate decodes every image into
//! straight-alpha RGBA pixels, and can also report a file's largest size and
//! image count from its directory alone.
//!
//! ```no_run
//! let data = std::fs::read("favicon.ico").unwrap();
//! let icon = icodec::decode(&data).unwrap();
//! let image = icon.image_by_size(32, 32).unwrap();
//! println!("{}x{}", image.width(), image.height());
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod binary;
mod bmp;
mod bmpdepth;
mod config;
mod error;
mod header;
mod icofile;
mod image;

pub use crate::config::IcoConfig;
pub use crate::error::{IcoError, Result};
pub use crate::header::{DirectoryEntry, Header};
pub use crate::icofile::{IcoFile, ImageFormat};
pub use crate::image::RasterImage;

use std::io::Read;

//===========================================================================//

/// Decodes a complete ICO file held in memory.
pub fn decode(data: &[u8]) -> Result<IcoFile> {
    IcoFile::decode(data)
}

/// Reads the header and directory of an ICO stream and reports the size of
/// its largest image along with the number of images, without touching any
/// image data.
pub fn decode_config<R: Read>(reader: R) -> Result<IcoConfig> {
    IcoConfig::read(reader)
}

/// Returns true if `data` starts like an ICO file (a zero reserved field
/// followed by the icon resource type).  Hosts that dispatch on file
/// signatures can use this to route data to [`decode`].
pub fn is_ico(data: &[u8]) -> bool {
    data.starts_with(&[0, 0, 1, 0])
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::is_ico;

    #[test]
    fn sniff_icon_signature() {
        assert!(is_ico(b"\x00\x00\x01\x00\x01\x00"));
        assert!(!is_ico(b"\x00\x00\x02\x00\x01\x00"));
        assert!(!is_ico(b"\x89PNG\r\n\x1a\n"));
        assert!(!is_ico(b"\x00\x00\x01"));
    }
}

//===========================================================================//
