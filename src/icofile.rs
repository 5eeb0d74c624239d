use crate::bmp;
use crate::error::{ImageError, Result};
use crate::header::{self, DirectoryEntry, Header};
use crate::image::RasterImage;
use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::Read;

//===========================================================================//

// The signature that all PNG files start with.
const PNG_SIGNATURE: &[u8] =
    &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

//===========================================================================//

/// The encoding of one embedded image.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ImageFormat {
    /// A complete PNG stream.
    Png,
    /// A BMP without its file header, starting at the DIB header.
    Bmp,
}

impl ImageFormat {
    /// Determines how an embedded image payload is encoded.  Anything that
    /// doesn't start with the full PNG signature is taken to be a BMP.
    pub fn detect(data: &[u8]) -> ImageFormat {
        if data.starts_with(PNG_SIGNATURE) {
            ImageFormat::Png
        } else {
            ImageFormat::Bmp
        }
    }
}

/// Decodes one entry's payload with the decoder that its format calls for.
fn decode_image(data: &[u8]) -> std::result::Result<RasterImage, ImageError> {
    match ImageFormat::detect(data) {
        ImageFormat::Png => Ok(RasterImage::read_png(data)?),
        ImageFormat::Bmp => bmp::read_bmp(data),
    }
}

//===========================================================================//

/// A fully decoded ICO file: its header, its directory, and one decoded
/// image per directory entry, in directory order.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IcoFile {
    header: Header,
    entries: Vec<DirectoryEntry>,
    images: Vec<RasterImage>,
}

impl IcoFile {
    /// Decodes a complete ICO file held in memory.  Fails if the header or
    /// directory is malformed, if any entry points outside of `data`, or if
    /// any single image can't be decoded.
    pub fn decode(data: &[u8]) -> Result<IcoFile> {
        let (header, entries) = header::read_directory(data)?;
        header::validate_spans(&entries, data.len())?;
        let mut images = Vec::<RasterImage>::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let payload = entry.payload(data);
            trace!(
                "Decoding image {} ({:?}, {} bytes)",
                index,
                ImageFormat::detect(payload),
                payload.len()
            );
            let image =
                decode_image(payload).map_err(|error| error.at(index))?;
            if image.width() != entry.effective_width()
                || image.height() != entry.effective_height()
            {
                debug!(
                    "Image {} is {}x{}, but its directory entry says {}x{}",
                    index,
                    image.width(),
                    image.height(),
                    entry.effective_width(),
                    entry.effective_height()
                );
            }
            images.push(image);
        }
        Ok(IcoFile { header, entries, images })
    }

    /// Reads an entire ICO stream into memory and decodes it.
    pub fn read<R: Read>(mut reader: R) -> Result<IcoFile> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        IcoFile::decode(&data)
    }

    /// Returns the file header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the directory entries, in file order.
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Returns the decoded images; `images()[i]` belongs to `entries()[i]`.
    pub fn images(&self) -> &[RasterImage] {
        &self.images
    }

    /// Returns the number of images in the file.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the file holds no images.  A successfully decoded
    /// file never does.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over each directory entry together with its image.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&DirectoryEntry, &RasterImage)> + '_ {
        self.entries.iter().zip(self.images.iter())
    }

    /// Returns the index of the entry with the largest area (by the sizes in
    /// the directory), preferring the first such entry on ties.
    pub fn best_index(&self) -> Option<usize> {
        header::largest_entry(&self.entries)
    }

    /// Returns the image with the largest area (by the sizes in the
    /// directory), preferring the first such image on ties.
    pub fn best_image(&self) -> Option<&RasterImage> {
        self.best_index().map(|index| &self.images[index])
    }

    /// Returns the index of the entry whose size is closest to `width` x
    /// `height`, measured by squared distance and preferring the first such
    /// entry on ties.
    pub fn index_by_size(&self, width: u32, height: u32) -> Option<usize> {
        header::closest_entry(&self.entries, width, height)
    }

    /// Returns the image whose size is closest to `width` x `height`.  There
    /// is no cutoff: some image is returned however far away it is.
    pub fn image_by_size(
        &self,
        width: u32,
        height: u32,
    ) -> Option<&RasterImage> {
        self.index_by_size(width, height).map(|index| &self.images[index])
    }

    /// Returns the (width, height) of each entry, in directory order.
    pub fn available_sizes(&self) -> Vec<(u32, u32)> {
        self.entries
            .iter()
            .map(|entry| (entry.effective_width(), entry.effective_height()))
            .collect()
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{IcoFile, ImageFormat};
    use crate::error::IcoError;
    use std::io::Cursor;

    #[test]
    fn detect_formats() {
        assert_eq!(
            ImageFormat::detect(b"\x89PNG\r\n\x1a\n\x00\x00"),
            ImageFormat::Png
        );
        // Only a full signature counts.
        assert_eq!(ImageFormat::detect(b"\x89PNG\r\n\x1a"), ImageFormat::Bmp);
        assert_eq!(
            ImageFormat::detect(b"\x89PNG\x00\x00\x00\x00"),
            ImageFormat::Bmp
        );
        assert_eq!(ImageFormat::detect(b"\x28\x00\x00\x00"), ImageFormat::Bmp);
        assert_eq!(ImageFormat::detect(b""), ImageFormat::Bmp);
    }

    #[test]
    fn read_bmp_32bpp_icon() {
        let input: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x01\x01\x00\x00\x01\x00\x20\x00\
            \x2c\x00\x00\x00\x16\x00\x00\x00\
            \
            \x28\x00\x00\x00\x01\x00\x00\x00\x02\x00\x00\x00\
            \x01\x00\x20\x00\x00\x00\x00\x00\x04\x00\x00\x00\
            \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
            \x00\x00\x00\x00\
            \
            \x00\x00\xff\xff";
        let icofile = IcoFile::read(Cursor::new(input)).unwrap();
        assert_eq!(icofile.len(), 1);
        assert!(!icofile.is_empty());
        assert_eq!(icofile.header().count(), 1);
        let image = &icofile.images()[0];
        assert_eq!(image.width(), 1);
        assert_eq!(image.height(), 1);
        assert_eq!(image.rgba_data(), b"\xff\x00\x00\xff");
        assert_eq!(icofile.best_image(), Some(image));
        assert_eq!(icofile.image_by_size(256, 256), Some(image));
        assert_eq!(icofile.available_sizes(), vec![(1, 1)]);
        let pairs: Vec<_> = icofile.iter().collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.bits_per_pixel(), 32);
    }

    #[test]
    fn read_png_grayscale_icon() {
        let input: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x02\x02\x00\x00\x00\x00\x00\x00\
            \x47\x00\x00\x00\x16\x00\x00\x00\
            \
            \x89\x50\x4e\x47\x0d\x0a\x1a\x0a\x00\x00\x00\x0d\x49\x48\x44\x52\
            \x00\x00\x00\x02\x00\x00\x00\x02\x08\x00\x00\x00\x00\x57\xdd\x52\
            \xf8\x00\x00\x00\x0e\x49\x44\x41\x54\x78\x9c\x63\xb4\x77\x60\xdc\
            \xef\x00\x00\x04\x08\x01\x81\x86\x2e\xc9\x8d\x00\x00\x00\x00\x49\
            \x45\x4e\x44\xae\x42\x60\x82";
        let icofile = IcoFile::decode(input).unwrap();
        assert_eq!(icofile.len(), 1);
        let image = &icofile.images()[0];
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        let rgba: &[u8] = b"\
            \x3f\x3f\x3f\xff\x7f\x7f\x7f\xff\
            \xbf\xbf\xbf\xff\xff\xff\xff\xff";
        assert_eq!(image.rgba_data(), rgba);
    }

    #[test]
    fn malformed_png_names_entry() {
        let input: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x02\x02\x00\x00\x00\x00\x00\x00\
            \x0c\x00\x00\x00\x16\x00\x00\x00\
            \
            \x89\x50\x4e\x47\x0d\x0a\x1a\x0a\x00\x00\x00\x0d";
        match IcoFile::decode(input) {
            Err(IcoError::Png { index, .. }) => assert_eq!(index, 0),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn out_of_bounds_entry_fails_whole_file() {
        let input: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x01\x01\x00\x00\x01\x00\x20\x00\
            \x2c\x00\x00\x00\x16\x00\x00\x00\
            \
            \x28\x00\x00\x00";
        match IcoFile::decode(input) {
            Err(IcoError::OutOfBounds { index, offset, size, available }) => {
                assert_eq!(index, 0);
                assert_eq!(offset, 22);
                assert_eq!(size, 44);
                assert_eq!(available, 26);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}

//===========================================================================//
