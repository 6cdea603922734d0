//! The file summary: versions, codec, and the section table.

use nsimage_wire::{FieldReader, WireRecord, WireResult};

use crate::section::{SectionDescriptor, SectionKind};

/// Trailing summary record describing the whole container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileSummary {
    pub ondisk_version: u32,
    pub layout_version: u32,
    /// Codec applied to every section body; absent means identity.
    pub codec: Option<String>,
    pub sections: Vec<SectionDescriptor>,
}

impl WireRecord for FileSummary {
    const RECORD: &'static str = "FileSummary";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.ondisk_version = f.u32()?,
                2 => rec.layout_version = f.u32()?,
                3 => rec.codec = Some(f.string()?),
                4 => rec.sections.push(decode_section(f.bytes()?)?),
                _ => {}
            }
        }
        Ok(rec)
    }
}

fn decode_section(data: &[u8]) -> WireResult<SectionDescriptor> {
    let mut name = String::new();
    let mut length = 0;
    let mut offset = 0;
    let mut r = FieldReader::new("FileSummary.Section", data);
    while let Some(f) = r.next_field()? {
        match f.number {
            1 => name = f.string()?,
            2 => length = f.u64()?,
            3 => offset = f.u64()?,
            _ => {}
        }
    }
    let kind = SectionKind::from_name(&name);
    Ok(SectionDescriptor {
        name,
        kind,
        offset,
        length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsimage_wire::FieldWriter;

    fn section_bytes(name: &str, length: u64, offset: u64) -> FieldWriter {
        FieldWriter::new()
            .string(1, name)
            .varint(2, length)
            .varint(3, offset)
    }

    #[test]
    fn decodes_summary_with_sections() {
        let payload = FieldWriter::new()
            .varint(1, 1)
            .varint(2, 27)
            .string(3, "zstd")
            .message(4, section_bytes("INODE", 100, 8))
            .message(4, section_bytes("MYSTERY", 5, 108))
            .finish();
        let summary = FileSummary::decode(&payload).unwrap();
        assert_eq!(summary.ondisk_version, 1);
        assert_eq!(summary.layout_version, 27);
        assert_eq!(summary.codec.as_deref(), Some("zstd"));
        assert_eq!(summary.sections.len(), 2);
        assert_eq!(summary.sections[0].kind, Some(SectionKind::Inode));
        assert_eq!(summary.sections[0].offset, 8);
        assert_eq!(summary.sections[0].length, 100);
        assert_eq!(summary.sections[1].kind, None);
        assert_eq!(summary.sections[1].name, "MYSTERY");
    }

    #[test]
    fn codec_absent_by_default() {
        let payload = FieldWriter::new().varint(1, 1).varint(2, 27).finish();
        let summary = FileSummary::decode(&payload).unwrap();
        assert!(summary.codec.is_none());
        assert!(summary.sections.is_empty());
    }
}
