//! The string table: id → text lookup shared by every name-resolving decoder.

use std::io::Read;

use nsimage_records::{StringTableEntry, StringTableHeader};
use nsimage_wire::{decode_required, Counted};

use crate::error::{ImageError, ImageResult};

/// Resolved string table.
///
/// Constructed once from the STRING_TABLE section; decoders that resolve
/// names take `&StringTable`, so a handle only exists after the table is
/// populated. Id `0` denotes "no name" and resolves to the empty string.
#[derive(Clone, Debug, Default)]
pub struct StringTable {
    entries: Vec<Option<String>>,
}

impl StringTable {
    /// Load the table from its section stream.
    pub fn load(r: &mut impl Read) -> ImageResult<Self> {
        let header: StringTableHeader = decode_required(r)?;
        // name ids are 24-bit; a larger table cannot be referenced
        if header.num_entry > (1 << 24) {
            return Err(ImageError::CorruptStringTable(format!(
                "declared entry count {} exceeds the 24-bit id space",
                header.num_entry
            )));
        }
        let mut entries = vec![None; header.num_entry as usize + 1];
        let mut group = Counted::<StringTableEntry>::new(u64::from(header.num_entry));
        while let Some(e) = group.next(r)? {
            let slot = entries
                .get_mut(e.id as usize)
                .ok_or(ImageError::UnknownStringId { id: e.id })?;
            *slot = Some(e.str);
        }
        Ok(Self { entries })
    }

    /// Number of slots, including the reserved id 0.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve an id to its text.
    pub fn lookup(&self, id: u32) -> ImageResult<&str> {
        if id == 0 {
            return Ok("");
        }
        self.entries
            .get(id as usize)
            .and_then(|slot| slot.as_deref())
            .ok_or(ImageError::UnknownStringId { id })
    }

    /// Build a table directly from entries. Fixture support for tests.
    pub fn from_entries(entries: &[(u32, &str)]) -> Self {
        let max = entries.iter().map(|&(id, _)| id).max().unwrap_or(0);
        let mut slots = vec![None; max as usize + 1];
        for &(id, text) in entries {
            slots[id as usize] = Some(text.to_string());
        }
        Self { entries: slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsimage_wire::{encode_delimited, FieldWriter};

    fn table_section(entries: &[(u32, &str)]) -> Vec<u8> {
        let mut out = Vec::new();
        encode_delimited(
            &mut out,
            &FieldWriter::new().varint(1, entries.len() as u64).finish(),
        );
        for &(id, text) in entries {
            encode_delimited(
                &mut out,
                &FieldWriter::new().varint(1, u64::from(id)).string(2, text).finish(),
            );
        }
        out
    }

    #[test]
    fn load_and_lookup() {
        let bytes = table_section(&[(1, "alice"), (2, "staff")]);
        let table = StringTable::load(&mut bytes.as_slice()).unwrap();
        assert_eq!(table.lookup(1).unwrap(), "alice");
        assert_eq!(table.lookup(2).unwrap(), "staff");
    }

    #[test]
    fn id_zero_is_unnamed() {
        let table = StringTable::from_entries(&[(1, "alice")]);
        assert_eq!(table.lookup(0).unwrap(), "");
    }

    #[test]
    fn unknown_id_rejected() {
        let table = StringTable::from_entries(&[(1, "alice")]);
        let err = table.lookup(9).unwrap_err();
        assert!(matches!(err, ImageError::UnknownStringId { id: 9 }));
    }

    #[test]
    fn entry_id_beyond_declared_count_rejected() {
        let mut out = Vec::new();
        encode_delimited(&mut out, &FieldWriter::new().varint(1, 1).finish());
        encode_delimited(
            &mut out,
            &FieldWriter::new().varint(1, 5).string(2, "stray").finish(),
        );
        let err = StringTable::load(&mut out.as_slice()).unwrap_err();
        assert!(matches!(err, ImageError::UnknownStringId { id: 5 }));
    }

    #[test]
    fn oversized_entry_count_rejected() {
        let mut out = Vec::new();
        encode_delimited(
            &mut out,
            &FieldWriter::new().varint(1, (1u64 << 24) + 1).finish(),
        );
        let err = StringTable::load(&mut out.as_slice()).unwrap_err();
        assert!(matches!(err, ImageError::CorruptStringTable(_)));
    }

    #[test]
    fn short_table_is_count_mismatch() {
        let mut out = Vec::new();
        encode_delimited(&mut out, &FieldWriter::new().varint(1, 3).finish());
        let err = StringTable::load(&mut out.as_slice()).unwrap_err();
        assert!(matches!(err, ImageError::Wire(_)));
    }
}
