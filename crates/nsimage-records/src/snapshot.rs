//! Snapshot and snapshot-diff records.

use std::fmt;

use nsimage_wire::{FieldReader, WireRecord, WireResult};

use crate::inode::Inode;

/// Header of the SNAPSHOT section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotSectionHeader {
    pub snapshot_counter: u32,
    pub snapshottable_dirs: Vec<u64>,
    pub num_snapshots: u32,
}

impl WireRecord for SnapshotSectionHeader {
    const RECORD: &'static str = "SnapshotSectionHeader";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.snapshot_counter = f.u32()?,
                2 => f.packed_u64s(&mut rec.snapshottable_dirs)?,
                3 => rec.num_snapshots = f.u32()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// One snapshot: its id and the root inode captured at creation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub snapshot_id: u32,
    pub root: Option<Inode>,
}

impl WireRecord for Snapshot {
    const RECORD: &'static str = "Snapshot";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.snapshot_id = f.u32()?,
                2 => rec.root = Some(Inode::decode_named("Snapshot.root", f.bytes()?)?),
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// Shape of one diff-entry group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffEntryKind {
    FileDiff,
    DirectoryDiff,
}

impl DiffEntryKind {
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            1 => Some(Self::FileDiff),
            2 => Some(Self::DirectoryDiff),
            _ => None,
        }
    }
}

impl fmt::Display for DiffEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileDiff => write!(f, "FILE_DIFF"),
            Self::DirectoryDiff => write!(f, "DIRECTORY_DIFF"),
        }
    }
}

/// Diff-entry header: kind, owning inode, and the declared group size.
///
/// `kind` stays raw here; the walker rejects values outside the known set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffEntry {
    pub kind: u64,
    pub inode_id: u64,
    pub num_of_diff: u32,
}

impl WireRecord for DiffEntry {
    const RECORD: &'static str = "DiffEntry";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.kind = f.u64()?,
                2 => rec.inode_id = f.u64()?,
                3 => rec.num_of_diff = f.u32()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// One file diff.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileDiff {
    pub snapshot_id: u32,
    pub file_size: u64,
    pub name: Vec<u8>,
}

impl WireRecord for FileDiff {
    const RECORD: &'static str = "FileDiff";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.snapshot_id = f.u32()?,
                2 => rec.file_size = f.u64()?,
                3 => rec.name = f.bytes()?.to_vec(),
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// One directory diff; followed on the wire by `created_list_size`
/// [`CreatedListEntry`] records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryDiff {
    pub snapshot_id: u32,
    pub children_size: u32,
    pub is_snapshot_root: bool,
    pub name: Vec<u8>,
    pub created_list_size: u32,
    pub deleted_inodes: Vec<u64>,
    pub deleted_inode_refs: Vec<u32>,
}

impl WireRecord for DirectoryDiff {
    const RECORD: &'static str = "DirectoryDiff";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.snapshot_id = f.u32()?,
                2 => rec.children_size = f.u32()?,
                3 => rec.is_snapshot_root = f.bool()?,
                4 => rec.name = f.bytes()?.to_vec(),
                5 => rec.created_list_size = f.u32()?,
                6 => f.packed_u64s(&mut rec.deleted_inodes)?,
                7 => f.packed_u32s(&mut rec.deleted_inode_refs)?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// Name created under a directory between two snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreatedListEntry {
    pub name: Vec<u8>,
}

impl WireRecord for CreatedListEntry {
    const RECORD: &'static str = "CreatedListEntry";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            if f.number == 1 {
                rec.name = f.bytes()?.to_vec();
            }
        }
        Ok(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inode::InodeType;
    use nsimage_wire::FieldWriter;

    #[test]
    fn snapshot_with_root() {
        let root = FieldWriter::new().varint(1, 2).varint(2, 16385).bytes(3, b"");
        let payload = FieldWriter::new().varint(1, 4).message(2, root).finish();
        let snap = Snapshot::decode(&payload).unwrap();
        assert_eq!(snap.snapshot_id, 4);
        let root = snap.root.unwrap();
        assert_eq!(root.id, 16385);
        assert_eq!(root.kind, InodeType::Directory);
    }

    #[test]
    fn header_with_snapshottable_dirs() {
        let payload = FieldWriter::new()
            .varint(1, 9)
            .packed_varints(2, &[16385, 16400])
            .varint(3, 2)
            .finish();
        let h = SnapshotSectionHeader::decode(&payload).unwrap();
        assert_eq!(h.snapshot_counter, 9);
        assert_eq!(h.snapshottable_dirs, vec![16385, 16400]);
        assert_eq!(h.num_snapshots, 2);
    }

    #[test]
    fn diff_entry_kind_mapping() {
        assert_eq!(DiffEntryKind::from_u64(1), Some(DiffEntryKind::FileDiff));
        assert_eq!(DiffEntryKind::from_u64(2), Some(DiffEntryKind::DirectoryDiff));
        assert_eq!(DiffEntryKind::from_u64(0), None);
        assert_eq!(DiffEntryKind::from_u64(3), None);
    }

    #[test]
    fn directory_diff_decode() {
        let payload = FieldWriter::new()
            .varint(1, 3)
            .varint(2, 7)
            .varint(3, 1)
            .bytes(4, b"snapdir")
            .varint(5, 2)
            .packed_varints(6, &[100, 101])
            .packed_varints(7, &[9])
            .finish();
        let d = DirectoryDiff::decode(&payload).unwrap();
        assert_eq!(d.snapshot_id, 3);
        assert_eq!(d.children_size, 7);
        assert!(d.is_snapshot_root);
        assert_eq!(d.name, b"snapdir");
        assert_eq!(d.created_list_size, 2);
        assert_eq!(d.deleted_inodes, vec![100, 101]);
        assert_eq!(d.deleted_inode_refs, vec![9]);
    }

    #[test]
    fn file_diff_decode() {
        let payload = FieldWriter::new()
            .varint(1, 1)
            .varint(2, 2048)
            .bytes(3, b"old-name")
            .finish();
        let d = FileDiff::decode(&payload).unwrap();
        assert_eq!(d.snapshot_id, 1);
        assert_eq!(d.file_size, 2048);
        assert_eq!(d.name, b"old-name");
    }
}
