use crate::binary::ByteReader;
use crate::bmpdepth::{self, BmpDepth};
use crate::error::ImageError;
use crate::image::RasterImage;
use log::{debug, trace};

//===========================================================================//

// The size of a BITMAPINFOHEADER struct, in bytes.
const BMP_HEADER_LEN: usize = 40;

// Each color table entry is stored as blue, green, red, reserved.
const PALETTE_ENTRY_LEN: u64 = 4;

//===========================================================================//

/// The leading fields of the DIB header that decoding depends on.
struct DibHeader {
    header_size: u32,
    width: i32,
    height: i32,
    planes: u16,
    bits_per_pixel: u16,
}

impl DibHeader {
    fn parse(data: &[u8]) -> Result<DibHeader, ImageError> {
        if data.len() < BMP_HEADER_LEN {
            truncated!(BMP_HEADER_LEN as u64, data.len());
        }
        let mut reader = ByteReader::new(data);
        match (
            reader.read_u32(),
            reader.read_i32(),
            reader.read_i32(),
            reader.read_u16(),
            reader.read_u16(),
        ) {
            (
                Some(header_size),
                Some(width),
                Some(height),
                Some(planes),
                Some(bits_per_pixel),
            ) => Ok(DibHeader {
                header_size,
                width,
                height,
                planes,
                bits_per_pixel,
            }),
            _ => truncated!(BMP_HEADER_LEN as u64, data.len()),
        }
    }
}

//===========================================================================//

/// Decodes a headerless BMP, as embedded in an ICO file, into an image.
///
/// The data begins directly with the DIB header, whose height field counts
/// the rows of both the color (XOR) mask and the transparency (AND) mask.
/// An optional color table follows the header, then the XOR mask, then the
/// AND mask.  Both masks store their rows bottom-up, each row padded to a
/// multiple of four bytes.
pub(crate) fn read_bmp(data: &[u8]) -> Result<RasterImage, ImageError> {
    let header = DibHeader::parse(data)?;
    trace!(
        "DIB: header_size={} width={} height={} planes={} bpp={}",
        header.header_size,
        header.width,
        header.height,
        header.planes,
        header.bits_per_pixel
    );
    let depth = match BmpDepth::from_bits_per_pixel(header.bits_per_pixel) {
        Some(depth) => depth,
        None => {
            return Err(ImageError::UnsupportedBitDepth(header.bits_per_pixel))
        }
    };
    if header.width < 0 {
        return Err(ImageError::Invalid(format!(
            "Invalid BMP width (was {}, but must not be negative)",
            header.width
        )));
    }
    let height = header.height / 2;
    if height < 0 {
        return Err(ImageError::Invalid(format!(
            "Invalid BMP height (was {}, but must not be negative)",
            header.height
        )));
    }
    let width = header.width as u32;
    let height = height as u32;

    // Read in the color table, which immediately follows the DIB header:
    let palette_offset = header.header_size as u64;
    let palette_len = PALETTE_ENTRY_LEN * depth.num_colors() as u64;
    let pixel_offset = palette_offset + palette_len;
    if pixel_offset > data.len() as u64 {
        truncated!(pixel_offset, data.len());
    }
    let palette = read_palette(
        &data[palette_offset as usize..pixel_offset as usize],
        depth.num_colors(),
    );

    if width == 0 || height == 0 {
        return Ok(RasterImage::from_rgba_data(width, height, Vec::new()));
    }

    // Make sure that every row of the color data is present before
    // allocating anything.  The last row in the data doesn't need its
    // padding.
    let stride = depth.row_stride(width as u64);
    let row_data_size = depth.row_data_size(width as u64);
    let needed = (height as u64 - 1)
        .checked_mul(stride)
        .and_then(|size| size.checked_add(row_data_size))
        .and_then(|size| size.checked_add(pixel_offset))
        .unwrap_or(u64::MAX);
    if needed > data.len() as u64 {
        truncated!(needed, data.len());
    }

    // Read in the color data, which is stored row by row, starting from
    // the *bottom* row:
    let width = width as usize;
    let height = height as usize;
    let mut rgba = vec![u8::MAX; 4 * width * height];
    for (row, rgba_row) in rgba.chunks_exact_mut(4 * width).enumerate() {
        let start =
            pixel_offset as usize + (height - row - 1) * stride as usize;
        let row_data = &data[start..start + row_data_size as usize];
        decode_row(depth, row_data, &palette, rgba_row);
    }

    // The AND mask (if any) starts after the last, padded row:
    let mask_offset = pixel_offset + height as u64 * stride;
    apply_and_mask(data, mask_offset, width, height, &mut rgba);

    Ok(RasterImage::from_rgba_data(width as u32, height as u32, rgba))
}

fn read_palette(data: &[u8], num_colors: usize) -> Vec<[u8; 3]> {
    let mut palette = Vec::with_capacity(num_colors);
    for bgrx in data.chunks_exact(PALETTE_ENTRY_LEN as usize) {
        palette.push([bgrx[2], bgrx[1], bgrx[0]]);
    }
    debug_assert_eq!(palette.len(), num_colors);
    palette
}

/// Decodes one row of XOR mask data into RGBA pixels.  Alpha is only
/// written at 32 bpp; every other depth leaves it opaque.
fn decode_row(
    depth: BmpDepth,
    row_data: &[u8],
    palette: &[[u8; 3]],
    rgba_row: &mut [u8],
) {
    let pixels = rgba_row.chunks_exact_mut(4);
    match depth {
        BmpDepth::One => {
            for (col, pixel) in pixels.enumerate() {
                let byte = row_data[col / 8];
                let index = (byte >> (7 - col % 8)) & 0x1;
                pixel[..3].copy_from_slice(&palette[index as usize]);
            }
        }
        BmpDepth::Four => {
            for (col, pixel) in pixels.enumerate() {
                let byte = row_data[col / 2];
                let index = if col % 2 == 0 { byte >> 4 } else { byte & 0xf };
                pixel[..3].copy_from_slice(&palette[index as usize]);
            }
        }
        BmpDepth::Eight => {
            for (pixel, &index) in pixels.zip(row_data) {
                pixel[..3].copy_from_slice(&palette[index as usize]);
            }
        }
        BmpDepth::TwentyFour => {
            for (pixel, bgr) in pixels.zip(row_data.chunks_exact(3)) {
                pixel[0] = bgr[2];
                pixel[1] = bgr[1];
                pixel[2] = bgr[0];
            }
        }
        BmpDepth::ThirtyTwo => {
            for (pixel, bgra) in pixels.zip(row_data.chunks_exact(4)) {
                pixel[0] = bgra[2];
                pixel[1] = bgra[1];
                pixel[2] = bgra[0];
                pixel[3] = bgra[3];
            }
        }
    }
}

/// Applies the 1-bit-per-pixel AND mask that starts at `mask_offset` in
/// `data` to the alpha channel of `rgba`.  A set bit makes its pixel fully
/// transparent; a clear bit leaves the pixel alone.  If `data` is too short
/// to hold the whole mask, the mask is treated as absent and `rgba` is left
/// untouched.  Returns whether the mask was applied.
fn apply_and_mask(
    data: &[u8],
    mask_offset: u64,
    width: usize,
    height: usize,
    rgba: &mut [u8],
) -> bool {
    debug_assert_eq!(rgba.len(), 4 * width * height);
    let stride = bmpdepth::row_stride(width as u64, 1);
    let mask_end = (height as u64)
        .checked_mul(stride)
        .and_then(|size| size.checked_add(mask_offset));
    match mask_end {
        Some(end) if end <= data.len() as u64 => {}
        _ => {
            debug!(
                "AND mask absent or truncated (needed {:?} bytes, \
                 but only {} are available)",
                mask_end,
                data.len()
            );
            return false;
        }
    }
    if width == 0 {
        return true;
    }
    for (row, rgba_row) in rgba.chunks_exact_mut(4 * width).enumerate() {
        let start =
            mask_offset as usize + (height - row - 1) * stride as usize;
        let mask_row = &data[start..start + stride as usize];
        for (col, pixel) in rgba_row.chunks_exact_mut(4).enumerate() {
            if (mask_row[col / 8] >> (7 - col % 8)) & 0x1 == 1 {
                pixel[3] = 0;
            }
        }
    }
    true
}

//===========================================================================//


//===========================================================================//
