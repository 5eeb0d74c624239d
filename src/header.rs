use crate::binary::ByteReader;
use crate::error::{IcoError, Result};
use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

// The size of the ICONDIR struct, in bytes.
pub(crate) const HEADER_LEN: usize = 6;

// The size of one ICONDIRENTRY struct, in bytes.
pub(crate) const ENTRY_LEN: usize = 16;

// The ICONDIR type field value for icon files.
const ICON_TYPE: u16 = 1;

//===========================================================================//

/// The fixed header at the start of an ICO file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Header {
    reserved: u16,
    container_type: u16,
    count: u16,
}

impl Header {
    /// Parses and validates the header at the start of `data`.
    pub(crate) fn parse(data: &[u8]) -> Result<Header> {
        let mut reader = ByteReader::new(data);
        let (reserved, container_type, count) =
            match (reader.read_u16(), reader.read_u16(), reader.read_u16()) {
                (Some(reserved), Some(container_type), Some(count)) => {
                    (reserved, container_type, count)
                }
                _ => invalid_format!(
                    "ICONDIR header is truncated \
                     (was {} bytes, but must be {})",
                    data.len(),
                    HEADER_LEN
                ),
            };
        trace!(
            "ICONDIR: reserved={reserved} type={container_type} count={count}"
        );
        if reserved != 0 {
            invalid_format!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        if container_type != ICON_TYPE {
            return Err(IcoError::UnsupportedContainerType(container_type));
        }
        if count == 0 {
            return Err(IcoError::EmptyFile);
        }
        Ok(Header { reserved, container_type, count })
    }

    /// Returns the reserved field, which is always zero in a valid file.
    pub fn reserved(&self) -> u16 {
        self.reserved
    }

    /// Returns the container type field, which is 1 (icon) in any header
    /// that parsed successfully.
    pub fn container_type(&self) -> u16 {
        self.container_type
    }

    /// Returns the number of images declared in the directory.
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Returns the total size of the header plus its directory, in bytes.
    pub(crate) fn directory_end(&self) -> usize {
        HEADER_LEN + ENTRY_LEN * self.count as usize
    }
}

//===========================================================================//

/// One record in the ICO directory, describing a single embedded image.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct DirectoryEntry {
    width: u8,
    height: u8,
    color_count: u8,
    reserved: u8,
    color_planes: u16,
    bits_per_pixel: u16,
    size: u32,
    offset: u32,
}

impl DirectoryEntry {
    fn parse(reader: &mut ByteReader) -> Option<DirectoryEntry> {
        Some(DirectoryEntry {
            width: reader.read_u8()?,
            height: reader.read_u8()?,
            color_count: reader.read_u8()?,
            reserved: reader.read_u8()?,
            color_planes: reader.read_u16()?,
            bits_per_pixel: reader.read_u16()?,
            size: reader.read_u32()?,
            offset: reader.read_u32()?,
        })
    }

    /// Returns the width byte exactly as stored (zero stands for 256).
    pub fn width_byte(&self) -> u8 {
        self.width
    }

    /// Returns the height byte exactly as stored (zero stands for 256).
    pub fn height_byte(&self) -> u8 {
        self.height
    }

    /// Returns the width of the image, in pixels.
    pub fn effective_width(&self) -> u32 {
        if self.width == 0 {
            256
        } else {
            self.width as u32
        }
    }

    /// Returns the height of the image, in pixels.
    pub fn effective_height(&self) -> u32 {
        if self.height == 0 {
            256
        } else {
            self.height as u32
        }
    }

    /// Returns the number of palette colors (zero if there is no palette).
    pub fn color_count(&self) -> u8 {
        self.color_count
    }

    /// Returns the reserved byte.
    pub fn reserved(&self) -> u8 {
        self.reserved
    }

    /// Returns the number of color planes.
    pub fn color_planes(&self) -> u16 {
        self.color_planes
    }

    /// Returns the bits-per-pixel declared in the directory.  The embedded
    /// image's own header is authoritative when decoding.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns the length of the image payload, in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the absolute offset of the image payload within the file.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub(crate) fn area(&self) -> u64 {
        self.effective_width() as u64 * self.effective_height() as u64
    }

    /// Returns the squared distance between this entry's dimensions and the
    /// requested ones.
    pub(crate) fn distance_to(&self, width: u32, height: u32) -> u64 {
        let dw = self.effective_width().abs_diff(width) as u64;
        let dh = self.effective_height().abs_diff(height) as u64;
        (dw * dw).saturating_add(dh * dh)
    }

    /// Returns this entry's payload.  `validate_spans` must have accepted
    /// the entry against `data` first.
    pub(crate) fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        let start = self.offset as usize;
        &data[start..start + self.size as usize]
    }
}

//===========================================================================//

/// Parses the header and the directory that immediately follows it.  Only
/// `6 + 16 * count` bytes of `data` are ever examined.
pub(crate) fn read_directory(
    data: &[u8],
) -> Result<(Header, Vec<DirectoryEntry>)> {
    let header = Header::parse(data)?;
    let num_entries = header.count() as usize;
    let mut reader = ByteReader::new(&data[HEADER_LEN..]);
    let mut entries = Vec::<DirectoryEntry>::with_capacity(num_entries);
    for index in 0..num_entries {
        let entry = match DirectoryEntry::parse(&mut reader) {
            Some(entry) => entry,
            None => invalid_format!(
                "ICONDIRENTRY {} is truncated \
                 (directory needs {} bytes, but only {} are available)",
                index,
                header.directory_end(),
                data.len()
            ),
        };
        trace!(
            "ICONDIRENTRY {}: {}x{} bpp={} size={} offset={}",
            index,
            entry.effective_width(),
            entry.effective_height(),
            entry.bits_per_pixel,
            entry.size,
            entry.offset
        );
        entries.push(entry);
    }
    Ok((header, entries))
}

/// Checks that every entry's payload lies entirely within a buffer of
/// `available` bytes.
pub(crate) fn validate_spans(
    entries: &[DirectoryEntry],
    available: usize,
) -> Result<()> {
    for (index, entry) in entries.iter().enumerate() {
        let end = entry.offset as u64 + entry.size as u64;
        if entry.offset as u64 >= available as u64 || end > available as u64 {
            return Err(IcoError::OutOfBounds {
                index,
                offset: entry.offset,
                size: entry.size,
                available,
            });
        }
    }
    Ok(())
}

/// Returns the index of the entry with the largest pixel area, preferring
/// the earliest entry on ties.
pub(crate) fn largest_entry(entries: &[DirectoryEntry]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (index, entry) in entries.iter().enumerate() {
        let area = entry.area();
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((index, area)),
        }
    }
    best.map(|(index, _)| index)
}

/// Returns the index of the entry whose dimensions are closest to the
/// requested ones, preferring the earliest entry on ties.
pub(crate) fn closest_entry(
    entries: &[DirectoryEntry],
    width: u32,
    height: u32,
) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (index, entry) in entries.iter().enumerate() {
        let distance = entry.distance_to(width, height);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

//===========================================================================//


//===========================================================================//
