#![allow(dead_code)]

//===========================================================================//

/// One image to place in a synthetic ICO file.
pub struct Entry {
    pub width: u8,
    pub height: u8,
    pub bits_per_pixel: u16,
    pub payload: Vec<u8>,
}

impl Entry {
    pub fn new(
        width: u8,
        height: u8,
        bits_per_pixel: u16,
        payload: Vec<u8>,
    ) -> Entry {
        Entry { width, height, bits_per_pixel, payload }
    }
}

/// Builds an ICO file with the given entries, their payloads stored one
/// after another right after the directory.
pub fn build_ico(entries: &[Entry]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    let mut offset = 6 + 16 * entries.len() as u32;
    for entry in entries {
        data.push(entry.width);
        data.push(entry.height);
        data.push(0); // color count
        data.push(0); // reserved
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&entry.bits_per_pixel.to_le_bytes());
        data.extend_from_slice(&(entry.payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&offset.to_le_bytes());
        offset += entry.payload.len() as u32;
    }
    for entry in entries {
        data.extend_from_slice(&entry.payload);
    }
    data
}

/// Builds a headerless BMP: a 40-byte BITMAPINFOHEADER (with the height
/// doubled, as ICO requires) followed by `body`, which holds the color
/// table, XOR mask and AND mask exactly as they should appear.
pub fn dib(
    width: i32,
    height: i32,
    bits_per_pixel: u16,
    body: &[u8],
) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&40u32.to_le_bytes());
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&(2 * height).to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&bits_per_pixel.to_le_bytes());
    data.resize(40, 0);
    data.extend_from_slice(body);
    data
}

/// Builds a 32-bpp BMP of a single color, with an all-zero AND mask.
pub fn solid_bmp32(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let mut body = Vec::new();
    for _ in 0..(width * height) {
        body.extend_from_slice(&[rgba[2], rgba[1], rgba[0], rgba[3]]);
    }
    let mask_stride = ((width as usize + 7) / 8 + 3) / 4 * 4;
    body.resize(body.len() + mask_stride * height as usize, 0);
    dib(width as i32, height as i32, 32, &body)
}

/// Encodes RGBA data as a PNG stream.
pub fn png_rgba(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(rgba).unwrap();
        writer.finish().unwrap();
    }
    data
}

/// Encodes 8-bit indexed data as a PNG stream.
pub fn png_indexed(
    width: u32,
    height: u32,
    palette: &[u8],
    indices: &[u8],
) -> Vec<u8> {
    let mut data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut data, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(palette.to_vec());
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(indices).unwrap();
        writer.finish().unwrap();
    }
    data
}

//===========================================================================//
