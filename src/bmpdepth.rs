//===========================================================================//

/// The color depths that an ICO-embedded BMP can be decoded from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BmpDepth {
    One,
    Four,
    Eight,
    TwentyFour,
    ThirtyTwo,
}

impl BmpDepth {
    pub(crate) fn from_bits_per_pixel(
        bits_per_pixel: u16,
    ) -> Option<BmpDepth> {
        match bits_per_pixel {
            1 => Some(BmpDepth::One),
            4 => Some(BmpDepth::Four),
            8 => Some(BmpDepth::Eight),
            24 => Some(BmpDepth::TwentyFour),
            32 => Some(BmpDepth::ThirtyTwo),
            _ => None,
        }
    }

    pub(crate) fn bits_per_pixel(&self) -> u16 {
        match *self {
            BmpDepth::One => 1,
            BmpDepth::Four => 4,
            BmpDepth::Eight => 8,
            BmpDepth::TwentyFour => 24,
            BmpDepth::ThirtyTwo => 32,
        }
    }

    /// Returns the number of entries in the color table that precedes the
    /// pixel data (zero for the direct-color depths).
    pub(crate) fn num_colors(&self) -> usize {
        match *self {
            BmpDepth::One => 2,
            BmpDepth::Four => 16,
            BmpDepth::Eight => 256,
            BmpDepth::TwentyFour | BmpDepth::ThirtyTwo => 0,
        }
    }

    /// Returns the number of meaningful bytes in one row of `width` pixels,
    /// not counting padding.
    pub(crate) fn row_data_size(&self, width: u64) -> u64 {
        row_data_size(width, self.bits_per_pixel())
    }

    /// Returns the number of bytes in one row of `width` pixels, including
    /// the padding up to a multiple of four bytes.
    pub(crate) fn row_stride(&self, width: u64) -> u64 {
        row_stride(width, self.bits_per_pixel())
    }
}

//===========================================================================//

pub(crate) fn row_data_size(width: u64, bits_per_pixel: u16) -> u64 {
    (width * bits_per_pixel as u64 + 7) / 8
}

pub(crate) fn row_stride(width: u64, bits_per_pixel: u16) -> u64 {
    ((row_data_size(width, bits_per_pixel) + 3) / 4) * 4
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{row_stride, BmpDepth};

    #[test]
    fn bmp_depth_round_trip() {
        let depths = &[
            BmpDepth::One,
            BmpDepth::Four,
            BmpDepth::Eight,
            BmpDepth::TwentyFour,
            BmpDepth::ThirtyTwo,
        ];
        for &depth in depths.iter() {
            assert_eq!(
                BmpDepth::from_bits_per_pixel(depth.bits_per_pixel()),
                Some(depth)
            );
        }
    }

    #[test]
    fn unsupported_depths() {
        for &bits in &[0, 2, 16, 48, 64] {
            assert_eq!(BmpDepth::from_bits_per_pixel(bits), None);
        }
    }

    #[test]
    fn rows_are_padded_to_four_bytes() {
        assert_eq!(BmpDepth::ThirtyTwo.row_stride(1), 4);
        assert_eq!(BmpDepth::TwentyFour.row_data_size(1), 3);
        assert_eq!(BmpDepth::TwentyFour.row_stride(1), 4);
        assert_eq!(BmpDepth::TwentyFour.row_stride(5), 16);
        assert_eq!(BmpDepth::Eight.row_stride(5), 8);
        assert_eq!(BmpDepth::Four.row_data_size(5), 3);
        assert_eq!(BmpDepth::Four.row_stride(5), 4);
        assert_eq!(BmpDepth::One.row_stride(33), 8);
        assert_eq!(BmpDepth::One.row_stride(0), 0);
        assert_eq!(row_stride(32, 1), 4);
    }
}

//===========================================================================//
