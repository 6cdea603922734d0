//! String table section records.

use nsimage_wire::{FieldReader, WireRecord, WireResult};

/// Header declaring how many entries follow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StringTableHeader {
    pub num_entry: u32,
}

impl WireRecord for StringTableHeader {
    const RECORD: &'static str = "StringTableHeader";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            if f.number == 1 {
                rec.num_entry = f.u32()?;
            }
        }
        Ok(rec)
    }
}

/// One id → text mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringTableEntry {
    pub id: u32,
    pub str: String,
}

impl WireRecord for StringTableEntry {
    const RECORD: &'static str = "StringTableEntry";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.id = f.u32()?,
                2 => rec.str = f.string()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsimage_wire::FieldWriter;

    #[test]
    fn entry_decode() {
        let payload = FieldWriter::new().varint(1, 3).string(2, "staff").finish();
        let rec = StringTableEntry::decode(&payload).unwrap();
        assert_eq!(rec.id, 3);
        assert_eq!(rec.str, "staff");
    }

    #[test]
    fn header_decode() {
        let payload = FieldWriter::new().varint(1, 12).finish();
        assert_eq!(StringTableHeader::decode(&payload).unwrap().num_entry, 12);
    }

    #[test]
    fn entry_invalid_utf8_is_malformed() {
        let payload = FieldWriter::new().bytes(2, &[0xFF, 0xFE]).finish();
        assert!(StringTableEntry::decode(&payload).is_err());
    }
}
