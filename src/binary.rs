use byteorder::{ByteOrder, LittleEndian};

//===========================================================================//

/// A forward-only cursor over a byte slice that reads little-endian
/// fixed-width fields.  Every read is bounds-checked and returns `None`
/// (without advancing) if the field would run past the end of the data.
#[derive(Clone, Debug)]
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> ByteReader<'a> {
        ByteReader { data, position: 0 }
    }

    /// Consumes and returns the next `len` bytes.
    pub(crate) fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.position.checked_add(len)?;
        let bytes = self.data.get(self.position..end)?;
        self.position = end;
        Some(bytes)
    }

    pub(crate) fn read_u8(&mut self) -> Option<u8> {
        self.take(1).map(|bytes| bytes[0])
    }

    pub(crate) fn read_u16(&mut self) -> Option<u16> {
        self.take(2).map(LittleEndian::read_u16)
    }

    pub(crate) fn read_u32(&mut self) -> Option<u32> {
        self.take(4).map(LittleEndian::read_u32)
    }

    pub(crate) fn read_i32(&mut self) -> Option<i32> {
        self.take(4).map(LittleEndian::read_i32)
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::ByteReader;

    #[test]
    fn reads_little_endian_fields_in_sequence() {
        let data: &[u8] = b"\x7f\x34\x12\x78\x56\x34\x12\xfe\xff\xff\xff";
        let mut reader = ByteReader::new(data);
        assert_eq!(reader.read_u8(), Some(0x7f));
        assert_eq!(reader.read_u16(), Some(0x1234));
        assert_eq!(reader.read_u32(), Some(0x12345678));
        assert_eq!(reader.read_i32(), Some(-2));
        assert_eq!(reader.read_u8(), None);
    }

    #[test]
    fn short_reads_do_not_advance() {
        let mut reader = ByteReader::new(b"\x01\x02\x03");
        assert_eq!(reader.read_u16(), Some(0x0201));
        assert_eq!(reader.read_u32(), None);
        assert_eq!(reader.read_u8(), Some(0x03));
        assert_eq!(reader.read_u8(), None);
    }

    #[test]
    fn take_rejects_overflowing_lengths() {
        let mut reader = ByteReader::new(b"\x00\x00");
        assert_eq!(reader.read_u8(), Some(0));
        assert_eq!(reader.take(usize::MAX), None);
        assert_eq!(reader.take(1), Some(&b"\x00"[..]));
    }
}

//===========================================================================//
