//! Namespace bookkeeping record.

use nsimage_wire::{FieldReader, WireRecord, WireResult};

/// Single record of the NAMESPACE_INFO section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameSystemInfo {
    pub namespace_id: u32,
    pub genstamp_v1: u64,
    pub genstamp_v2: u64,
    pub genstamp_v1_limit: u64,
    pub last_allocated_block_id: u64,
    pub transaction_id: u64,
}

impl WireRecord for NameSystemInfo {
    const RECORD: &'static str = "NameSystemInfo";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.namespace_id = f.u32()?,
                2 => rec.genstamp_v1 = f.u64()?,
                3 => rec.genstamp_v2 = f.u64()?,
                4 => rec.genstamp_v1_limit = f.u64()?,
                5 => rec.last_allocated_block_id = f.u64()?,
                6 => rec.transaction_id = f.u64()?,
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
    fn decodes_all_fields() {
        let payload = FieldWriter::new()
            .varint(1, 42)
            .varint(2, 1000)
            .varint(3, 1001)
            .varint(4, 999)
            .varint(5, 1073741825)
            .varint(6, 37)
            .finish();
        let rec = NameSystemInfo::decode(&payload).unwrap();
        assert_eq!(rec.namespace_id, 42);
        assert_eq!(rec.genstamp_v1, 1000);
        assert_eq!(rec.genstamp_v2, 1001);
        assert_eq!(rec.genstamp_v1_limit, 999);
        assert_eq!(rec.last_allocated_block_id, 1073741825);
        assert_eq!(rec.transaction_id, 37);
    }
}
