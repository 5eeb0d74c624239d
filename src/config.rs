use crate::error::{IcoError, Result};
use crate::header::{self, Header, HEADER_LEN};
use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::{self, Read};

//===========================================================================//

/// Summary metadata for an ICO file, obtained without decoding any images.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IcoConfig {
    width: u32,
    height: u32,
    count: u16,
}

impl IcoConfig {
    /// Reads just the header and directory of an ICO stream.  Exactly `6 +
    /// 16 * count` bytes are consumed from `reader`; the image payloads are
    /// never read, so the stream may end right after the directory.
    pub fn read<R: Read>(mut reader: R) -> Result<IcoConfig> {
        let mut data = vec![0u8; HEADER_LEN];
        read_section(&mut reader, &mut data, "ICONDIR header")?;
        let header = Header::parse(&data)?;
        data.resize(header.directory_end(), 0);
        read_section(&mut reader, &mut data[HEADER_LEN..], "ICONDIR entries")?;
        let (header, entries) = header::read_directory(&data)?;
        let (width, height) = match header::largest_entry(&entries) {
            Some(index) => (
                entries[index].effective_width(),
                entries[index].effective_height(),
            ),
            None => (0, 0),
        };
        trace!("ICO config: {}x{}, {} images", width, height, header.count());
        Ok(IcoConfig { width, height, count: header.count() })
    }

    /// Returns the width of the largest image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the largest image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the number of images in the file.
    pub fn count(&self) -> u16 {
        self.count
    }
}

fn read_section<R: Read>(
    reader: &mut R,
    buffer: &mut [u8],
    what: &str,
) -> Result<()> {
    match reader.read_exact(buffer) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
            invalid_format!(
                "{} is truncated (needed {} bytes)",
                what,
                buffer.len()
            )
        }
        Err(error) => Err(IcoError::Io(error)),
    }
}

//===========================================================================//


//===========================================================================//
