//! Packed permission and ACL decoding.
//!
//! A permission is one packed 64-bit value: mode in the low 16 bits, group
//! string-id in bits 16..40, user string-id in bits 40..64. An ACL entry is
//! one packed 32-bit value: perm bits 0..3, type bits 3..5, scope bit 5,
//! name string-id bits 6..30.

use std::fmt;

use nsimage_records::AclFeature;

use crate::error::ImageResult;
use crate::strings::StringTable;

const MODE_MASK: u64 = (1 << 16) - 1;
const GROUP_OFFSET: u32 = 16;
const USER_OFFSET: u32 = 40;
const NAME_ID_MASK: u64 = (1 << 24) - 1;

const ACL_PERM_MASK: u32 = 7;
const ACL_TYPE_OFFSET: u32 = 3;
const ACL_TYPE_MASK: u32 = 3;
const ACL_SCOPE_OFFSET: u32 = 5;
const ACL_SCOPE_MASK: u32 = 1;
const ACL_NAME_OFFSET: u32 = 6;
const ACL_NAME_MASK: u32 = (1 << 24) - 1;

const PERM_SYMBOLS: [&str; 8] = ["---", "--x", "-w-", "-wx", "r--", "r-x", "rw-", "rwx"];

/// Decoded (user, group, mode) triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permission {
    pub user: String,
    pub group: String,
    pub mode: u16,
}

impl Permission {
    /// Decode a packed permission, resolving names through the table.
    pub fn decode(packed: u64, strings: &StringTable) -> ImageResult<Self> {
        let mode = (packed & MODE_MASK) as u16;
        let group_id = ((packed >> GROUP_OFFSET) & NAME_ID_MASK) as u32;
        let user_id = ((packed >> USER_OFFSET) & NAME_ID_MASK) as u32;
        Ok(Self {
            user: strings.lookup(user_id)?.to_string(),
            group: strings.lookup(group_id)?.to_string(),
            mode,
        })
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{:04o}", self.user, self.group, self.mode)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AclType {
    User,
    Group,
    Mask,
    Other,
}

impl AclType {
    fn from_bits(bits: u32) -> Self {
        match bits & ACL_TYPE_MASK {
            0 => Self::User,
            1 => Self::Group,
            2 => Self::Mask,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for AclType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Group => write!(f, "group"),
            Self::Mask => write!(f, "mask"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AclScope {
    Access,
    Default,
}

/// One decoded access-control entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AclEntry {
    pub scope: AclScope,
    pub entry_type: AclType,
    pub name: String,
    pub perm: u8,
}

impl fmt::Display for AclEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope == AclScope::Default {
            write!(f, "default:")?;
        }
        write!(
            f,
            "{}:{}:{}",
            self.entry_type,
            self.name,
            PERM_SYMBOLS[(self.perm & 7) as usize]
        )
    }
}

/// Expand a compact ACL feature into ordered textual entries.
pub fn decode_acl_entries(
    feature: &AclFeature,
    strings: &StringTable,
) -> ImageResult<Vec<AclEntry>> {
    let mut entries = Vec::with_capacity(feature.entries.len());
    for &packed in &feature.entries {
        let scope = if (packed >> ACL_SCOPE_OFFSET) & ACL_SCOPE_MASK == 0 {
            AclScope::Access
        } else {
            AclScope::Default
        };
        let name_id = (packed >> ACL_NAME_OFFSET) & ACL_NAME_MASK;
        entries.push(AclEntry {
            scope,
            entry_type: AclType::from_bits(packed >> ACL_TYPE_OFFSET),
            name: strings.lookup(name_id)?.to_string(),
            perm: (packed & ACL_PERM_MASK) as u8,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageError;

    fn table() -> StringTable {
        StringTable::from_entries(&[(1, "alice"), (2, "staff"), (3, "bob")])
    }

    fn pack_permission(user_id: u64, group_id: u64, mode: u64) -> u64 {
        user_id << USER_OFFSET | group_id << GROUP_OFFSET | mode
    }

    fn pack_acl(scope: u32, entry_type: u32, name_id: u32, perm: u32) -> u32 {
        scope << ACL_SCOPE_OFFSET
            | entry_type << ACL_TYPE_OFFSET
            | name_id << ACL_NAME_OFFSET
            | perm
    }

    #[test]
    fn formats_user_group_octal() {
        let p = Permission::decode(pack_permission(1, 2, 0o750), &table()).unwrap();
        assert_eq!(p.to_string(), "alice:staff:0750");
    }

    #[test]
    fn mode_keeps_high_bits() {
        let p = Permission::decode(pack_permission(1, 2, 0o1777), &table()).unwrap();
        assert_eq!(p.to_string(), "alice:staff:1777");
    }

    #[test]
    fn unresolvable_user_id_fails() {
        let err = Permission::decode(pack_permission(99, 2, 0o755), &table()).unwrap_err();
        assert!(matches!(err, ImageError::UnknownStringId { id: 99 }));
    }

    #[test]
    fn acl_named_user_entry() {
        let feature = AclFeature {
            entries: vec![pack_acl(0, 0, 3, 7)],
        };
        let entries = decode_acl_entries(&feature, &table()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].to_string(), "user:bob:rwx");
    }

    #[test]
    fn acl_default_scope_prefix() {
        let feature = AclFeature {
            entries: vec![pack_acl(1, 1, 2, 5)],
        };
        let entries = decode_acl_entries(&feature, &table()).unwrap();
        assert_eq!(entries[0].to_string(), "default:group:staff:r-x");
    }

    #[test]
    fn acl_unnamed_entries() {
        let feature = AclFeature {
            entries: vec![pack_acl(0, 2, 0, 6), pack_acl(0, 3, 0, 4)],
        };
        let entries = decode_acl_entries(&feature, &table()).unwrap();
        assert_eq!(entries[0].to_string(), "mask::rw-");
        assert_eq!(entries[1].to_string(), "other::r--");
    }

    #[test]
    fn empty_feature_decodes_empty() {
        let entries = decode_acl_entries(&AclFeature::default(), &table()).unwrap();
        assert!(entries.is_empty());
    }
}
