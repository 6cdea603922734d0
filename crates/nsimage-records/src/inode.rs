//! Inode records: the INODE, INODE_REFERENCE, INODE_DIRECTORY, and
//! FILES_UNDER_CONSTRUCTION section families.

use std::fmt;

use nsimage_wire::{FieldReader, WireError, WireRecord, WireResult};

/// Header of the INODE section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InodeSectionHeader {
    pub last_inode_id: u64,
    pub num_inodes: u64,
}

impl WireRecord for InodeSectionHeader {
    const RECORD: &'static str = "InodeSectionHeader";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.last_inode_id = f.u64()?,
                2 => rec.num_inodes = f.u64()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InodeType {
    File,
    Directory,
    Symlink,
}

impl InodeType {
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            1 => Some(Self::File),
            2 => Some(Self::Directory),
            3 => Some(Self::Symlink),
            _ => None,
        }
    }
}

impl fmt::Display for InodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "FILE"),
            Self::Directory => write!(f, "DIRECTORY"),
            Self::Symlink => write!(f, "SYMLINK"),
        }
    }
}

/// Storage media classes used by per-type quotas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageType {
    Disk,
    Ssd,
    Archive,
    RamDisk,
    Provided,
}

impl StorageType {
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            1 => Some(Self::Disk),
            2 => Some(Self::Ssd),
            3 => Some(Self::Archive),
            4 => Some(Self::RamDisk),
            5 => Some(Self::Provided),
            _ => None,
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disk => write!(f, "DISK"),
            Self::Ssd => write!(f, "SSD"),
            Self::Archive => write!(f, "ARCHIVE"),
            Self::RamDisk => write!(f, "RAM_DISK"),
            Self::Provided => write!(f, "PROVIDED"),
        }
    }
}

/// One block of a file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub id: u64,
    pub genstamp: u64,
    pub num_bytes: u64,
}

impl Block {
    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new("Block", data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.id = f.u64()?,
                2 => rec.genstamp = f.u64()?,
                3 => rec.num_bytes = f.u64()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// Compact ACL feature: packed 32-bit entries, decoded by `nsimage-image`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AclFeature {
    pub entries: Vec<u32>,
}

impl AclFeature {
    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new("AclFeature", data);
        while let Some(f) = r.next_field()? {
            if f.number == 1 {
                f.packed_fixed32s(&mut rec.entries)?;
            }
        }
        Ok(rec)
    }
}

/// One extended attribute: packed namespace/name id plus raw value bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XAttrCompact {
    pub name: u32,
    pub value: Vec<u8>,
}

impl XAttrCompact {
    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new("XAttrCompact", data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.name = f.fixed32()?,
                2 => rec.value = f.bytes()?.to_vec(),
                _ => {}
            }
        }
        Ok(rec)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XAttrFeature {
    pub xattrs: Vec<XAttrCompact>,
}

impl XAttrFeature {
    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new("XAttrFeature", data);
        while let Some(f) = r.next_field()? {
            if f.number == 1 {
                rec.xattrs.push(XAttrCompact::decode(f.bytes()?)?);
            }
        }
        Ok(rec)
    }
}

/// Per-storage-type quota.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeQuota {
    pub storage_type: StorageType,
    pub quota: u64,
}

impl TypeQuota {
    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut storage_type = None;
        let mut quota = 0;
        let mut r = FieldReader::new("TypeQuota", data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => {
                    let raw = f.u64()?;
                    storage_type = Some(StorageType::from_u64(raw).ok_or_else(|| {
                        WireError::malformed("TypeQuota", format!("unknown storage type {raw}"))
                    })?);
                }
                2 => quota = f.u64()?,
                _ => {}
            }
        }
        let storage_type = storage_type
            .ok_or_else(|| WireError::malformed("TypeQuota", "missing storage type"))?;
        Ok(Self {
            storage_type,
            quota,
        })
    }
}

/// Under-construction lease carried by an open file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileUnderConstruction {
    pub client_name: String,
    pub client_machine: String,
}

impl FileUnderConstruction {
    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new("FileUnderConstruction", data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.client_name = f.string()?,
                2 => rec.client_machine = f.string()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// File payload of an inode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileNode {
    pub replication: u32,
    pub modification_time: u64,
    pub access_time: u64,
    pub preferred_block_size: u64,
    pub permission: u64,
    pub blocks: Vec<Block>,
    pub file_uc: Option<FileUnderConstruction>,
    pub acl: AclFeature,
    pub xattrs: Option<XAttrFeature>,
    pub storage_policy_id: Option<u32>,
    pub is_striped: bool,
}

impl FileNode {
    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new("FileNode", data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.replication = f.u32()?,
                2 => rec.modification_time = f.u64()?,
                3 => rec.access_time = f.u64()?,
                4 => rec.preferred_block_size = f.u64()?,
                5 => rec.permission = f.fixed64()?,
                6 => rec.blocks.push(Block::decode(f.bytes()?)?),
                7 => rec.file_uc = Some(FileUnderConstruction::decode(f.bytes()?)?),
                8 => rec.acl = AclFeature::decode(f.bytes()?)?,
                9 => rec.xattrs = Some(XAttrFeature::decode(f.bytes()?)?),
                10 => rec.storage_policy_id = Some(f.u32()?),
                11 => rec.is_striped = f.bool()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// Directory payload of an inode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryNode {
    pub modification_time: u64,
    pub ns_quota: Option<u64>,
    pub ds_quota: Option<u64>,
    pub permission: u64,
    pub acl: AclFeature,
    pub xattrs: Option<XAttrFeature>,
    pub type_quotas: Vec<TypeQuota>,
}

impl DirectoryNode {
    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new("DirectoryNode", data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.modification_time = f.u64()?,
                2 => rec.ns_quota = Some(f.u64()?),
                3 => rec.ds_quota = Some(f.u64()?),
                4 => rec.permission = f.fixed64()?,
                5 => rec.acl = AclFeature::decode(f.bytes()?)?,
                6 => rec.xattrs = Some(XAttrFeature::decode(f.bytes()?)?),
                7 => rec.type_quotas.push(TypeQuota::decode(f.bytes()?)?),
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// Symlink payload of an inode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymlinkNode {
    pub permission: u64,
    pub target: Vec<u8>,
    pub modification_time: u64,
    pub access_time: u64,
}

impl SymlinkNode {
    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new("SymlinkNode", data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.permission = f.fixed64()?,
                2 => rec.target = f.bytes()?.to_vec(),
                3 => rec.modification_time = f.u64()?,
                4 => rec.access_time = f.u64()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// Type-specific payload of an inode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InodePayload {
    File(FileNode),
    Directory(DirectoryNode),
    Symlink(SymlinkNode),
}

/// One namespace node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inode {
    pub id: u64,
    pub kind: InodeType,
    pub name: Vec<u8>,
    pub payload: Option<InodePayload>,
}

impl WireRecord for Inode {
    const RECORD: &'static str = "Inode";

    fn decode(data: &[u8]) -> WireResult<Self> {
        Self::decode_named(Self::RECORD, data)
    }
}

impl Inode {
    /// Decode with an explicit record name, so nested occurrences (a
    /// snapshot root) report where they were found.
    pub fn decode_named(record: &'static str, data: &[u8]) -> WireResult<Self> {
        let mut kind = None;
        let mut id = 0;
        let mut name = Vec::new();
        let mut payload = None;
        let mut r = FieldReader::new(record, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => {
                    let raw = f.u64()?;
                    kind = Some(InodeType::from_u64(raw).ok_or_else(|| {
                        WireError::malformed(record, format!("unknown inode type {raw}"))
                    })?);
                }
                2 => id = f.u64()?,
                3 => name = f.bytes()?.to_vec(),
                4 => payload = Some(InodePayload::File(FileNode::decode(f.bytes()?)?)),
                5 => payload = Some(InodePayload::Directory(DirectoryNode::decode(f.bytes()?)?)),
                6 => payload = Some(InodePayload::Symlink(SymlinkNode::decode(f.bytes()?)?)),
                _ => {}
            }
        }
        let kind = kind.ok_or_else(|| WireError::malformed(record, "missing inode type"))?;
        Ok(Self {
            id,
            kind,
            name,
            payload,
        })
    }
}

/// One INODE_DIRECTORY record: a parent and its children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirEntry {
    pub parent: u64,
    pub children: Vec<u64>,
    pub ref_children: Vec<u32>,
}

impl WireRecord for DirEntry {
    const RECORD: &'static str = "DirEntry";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.parent = f.u64()?,
                2 => f.packed_u64s(&mut rec.children)?,
                3 => f.packed_u32s(&mut rec.ref_children)?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// One INODE_REFERENCE record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InodeReference {
    pub referred_id: u64,
    pub name: Vec<u8>,
    pub dst_snapshot_id: u32,
    pub last_snapshot_id: u32,
}

impl WireRecord for InodeReference {
    const RECORD: &'static str = "InodeReference";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.referred_id = f.u64()?,
                2 => rec.name = f.bytes()?.to_vec(),
                3 => rec.dst_snapshot_id = f.u32()?,
                4 => rec.last_snapshot_id = f.u32()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// One FILES_UNDER_CONSTRUCTION record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileUnderConstructionEntry {
    pub inode_id: u64,
    pub full_path: String,
}

impl WireRecord for FileUnderConstructionEntry {
    const RECORD: &'static str = "FileUnderConstructionEntry";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.inode_id = f.u64()?,
                2 => rec.full_path = f.string()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}
