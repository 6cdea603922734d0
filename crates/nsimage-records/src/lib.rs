//! Record types for the checkpoint image container.
//!
//! One module per section family. Each record is a plain struct with public
//! fields plus a [`nsimage_wire::WireRecord`] impl binding it to its wire
//! schema; field numbers are part of the container contract and are fixed
//! here. The walkers in `nsimage-dump` consume these as already-decoded
//! typed values.

pub mod cache;
pub mod inode;
pub mod namesystem;
pub mod secret;
pub mod section;
pub mod snapshot;
pub mod string_table;
pub mod summary;

pub use cache::{CacheDirective, CacheExpiration, CacheManagerHeader, CachePool};
pub use inode::{
    AclFeature, Block, DirEntry, DirectoryNode, FileNode, FileUnderConstruction,
    FileUnderConstructionEntry, Inode, InodePayload, InodeReference, InodeSectionHeader,
    InodeType, StorageType, SymlinkNode, TypeQuota, XAttrCompact, XAttrFeature,
};
pub use namesystem::NameSystemInfo;
pub use secret::{DelegationKey, PersistToken, SecretManagerHeader};
pub use section::{canonical_order, SectionDescriptor, SectionKind};
pub use snapshot::{
    CreatedListEntry, DiffEntry, DiffEntryKind, DirectoryDiff, FileDiff, Snapshot,
    SnapshotSectionHeader,
};
pub use string_table::{StringTableEntry, StringTableHeader};
pub use summary::FileSummary;
