//! Section kinds and descriptors.

use std::fmt;

/// Known section kinds, in canonical output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    NamespaceInfo,
    StringTable,
    Inode,
    InodeReference,
    InodeDirectory,
    FilesUnderConstruction,
    Snapshot,
    SnapshotDiff,
    SecretManager,
    CacheManager,
}

impl SectionKind {
    pub const ALL: [SectionKind; 10] = [
        Self::NamespaceInfo,
        Self::StringTable,
        Self::Inode,
        Self::InodeReference,
        Self::InodeDirectory,
        Self::FilesUnderConstruction,
        Self::Snapshot,
        Self::SnapshotDiff,
        Self::SecretManager,
        Self::CacheManager,
    ];

    /// Parse the section name used in the file summary.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NAMESPACE_INFO" => Some(Self::NamespaceInfo),
            "STRING_TABLE" => Some(Self::StringTable),
            "INODE" => Some(Self::Inode),
            "INODE_REFERENCE" => Some(Self::InodeReference),
            "INODE_DIRECTORY" => Some(Self::InodeDirectory),
            "FILES_UNDER_CONSTRUCTION" => Some(Self::FilesUnderConstruction),
            "SNAPSHOT" => Some(Self::Snapshot),
            "SNAPSHOT_DIFF" => Some(Self::SnapshotDiff),
            "SECRET_MANAGER" => Some(Self::SecretManager),
            "CACHE_MANAGER" => Some(Self::CacheManager),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NamespaceInfo => "NAMESPACE_INFO",
            Self::StringTable => "STRING_TABLE",
            Self::Inode => "INODE",
            Self::InodeReference => "INODE_REFERENCE",
            Self::InodeDirectory => "INODE_DIRECTORY",
            Self::FilesUnderConstruction => "FILES_UNDER_CONSTRUCTION",
            Self::Snapshot => "SNAPSHOT",
            Self::SnapshotDiff => "SNAPSHOT_DIFF",
            Self::SecretManager => "SECRET_MANAGER",
            Self::CacheManager => "CACHE_MANAGER",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One section's location inside the container.
///
/// `kind` is `None` for section names this build does not recognize; those
/// sections are skipped, never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionDescriptor {
    pub name: String,
    pub kind: Option<SectionKind>,
    pub offset: u64,
    pub length: u64,
}

/// Order descriptors canonically: known kinds by declaration order, unknown
/// kinds after all known ones, ties broken by appearance order.
pub fn canonical_order(sections: &[SectionDescriptor]) -> Vec<&SectionDescriptor> {
    let mut ordered: Vec<&SectionDescriptor> = sections.iter().collect();
    ordered.sort_by_key(|d| d.kind.map_or(usize::MAX, |k| k as usize));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, offset: u64) -> SectionDescriptor {
        SectionDescriptor {
            name: name.to_string(),
            kind: SectionKind::from_name(name),
            offset,
            length: 10,
        }
    }

    #[test]
    fn name_roundtrip() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn unknown_name() {
        assert!(SectionKind::from_name("ERASURE_CODING").is_none());
        assert!(SectionKind::from_name("").is_none());
    }

    #[test]
    fn canonical_order_reorders_known_kinds() {
        let sections = vec![
            descriptor("CACHE_MANAGER", 0),
            descriptor("STRING_TABLE", 1),
            descriptor("NAMESPACE_INFO", 2),
        ];
        let ordered = canonical_order(&sections);
        let names: Vec<&str> = ordered.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["NAMESPACE_INFO", "STRING_TABLE", "CACHE_MANAGER"]);
    }

    #[test]
    fn unknown_kinds_sort_last_in_appearance_order() {
        let sections = vec![
            descriptor("MYSTERY_B", 0),
            descriptor("SNAPSHOT", 1),
            descriptor("MYSTERY_A", 2),
            descriptor("INODE", 3),
        ];
        let ordered = canonical_order(&sections);
        let names: Vec<&str> = ordered.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["INODE", "SNAPSHOT", "MYSTERY_B", "MYSTERY_A"]);
    }

    #[test]
    fn string_table_precedes_consumers() {
        let table = SectionKind::StringTable as usize;
        assert!(table < SectionKind::Inode as usize);
        assert!(table < SectionKind::Snapshot as usize);
        assert!(table < SectionKind::SecretManager as usize);
    }
}
