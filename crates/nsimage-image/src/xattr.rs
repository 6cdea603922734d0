//! Extended-attribute decoding.
//!
//! The namespace and name id share one packed 32-bit value: two base
//! namespace bits at offset 30, one extension bit at offset 5 (shifted up to
//! bit 2 of the namespace), and a 24-bit name string-id at offset 6.

use std::fmt;

use nsimage_records::XAttrCompact;

use crate::error::{ImageError, ImageResult};
use crate::strings::StringTable;

const NS_OFFSET: u32 = 30;
const NS_MASK: u32 = 3;
const NS_EXT_OFFSET: u32 = 5;
const NS_EXT_MASK: u32 = 1;
const NAME_OFFSET: u32 = 6;
const NAME_MASK: u32 = (1 << 24) - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XAttrNamespace {
    User,
    Trusted,
    Security,
    System,
    Raw,
}

impl XAttrNamespace {
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(Self::User),
            1 => Some(Self::Trusted),
            2 => Some(Self::Security),
            3 => Some(Self::System),
            4 => Some(Self::Raw),
            _ => None,
        }
    }
}

impl fmt::Display for XAttrNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Trusted => write!(f, "TRUSTED"),
            Self::Security => write!(f, "SECURITY"),
            Self::System => write!(f, "SYSTEM"),
            Self::Raw => write!(f, "RAW"),
        }
    }
}

/// Attribute value, classified by a pure byte-validity check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XAttrValue {
    /// The bytes form valid UTF-8.
    Text(String),
    /// Anything else; rendered as lowercase hex.
    Binary(Vec<u8>),
}

/// One decoded extended attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XAttr {
    pub namespace: XAttrNamespace,
    pub name: String,
    pub value: XAttrValue,
}

/// Decode a compact xattr record, resolving the name through the table.
pub fn decode_xattr(compact: &XAttrCompact, strings: &StringTable) -> ImageResult<XAttr> {
    let encoded = compact.name;
    let ns_bits =
        ((encoded >> NS_OFFSET) & NS_MASK) | (((encoded >> NS_EXT_OFFSET) & NS_EXT_MASK) << 2);
    let namespace =
        XAttrNamespace::from_bits(ns_bits).ok_or(ImageError::UnknownXAttrNamespace(ns_bits))?;
    let name = strings
        .lookup((encoded >> NAME_OFFSET) & NAME_MASK)?
        .to_string();
    let value = match String::from_utf8(compact.value.clone()) {
        Ok(text) => XAttrValue::Text(text),
        Err(err) => XAttrValue::Binary(err.into_bytes()),
    };
    Ok(XAttr {
        namespace,
        name,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StringTable {
        StringTable::from_entries(&[(1, "checksum"), (2, "policy")])
    }

    fn pack_name(ns: u32, name_id: u32) -> u32 {
        let base = ns & NS_MASK;
        let ext = (ns >> 2) & NS_EXT_MASK;
        base << NS_OFFSET | ext << NS_EXT_OFFSET | name_id << NAME_OFFSET
    }

    #[test]
    fn namespace_base_and_extension_bits() {
        for ns in 0..5u32 {
            let compact = XAttrCompact {
                name: pack_name(ns, 1),
                value: Vec::new(),
            };
            let attr = decode_xattr(&compact, &table()).unwrap();
            assert_eq!(
                XAttrNamespace::from_bits(ns),
                Some(attr.namespace),
                "namespace {ns}"
            );
        }
    }

    #[test]
    fn namespace_beyond_enumeration_rejected() {
        for ns in 5..8u32 {
            let compact = XAttrCompact {
                name: pack_name(ns, 1),
                value: Vec::new(),
            };
            let err = decode_xattr(&compact, &table()).unwrap_err();
            assert!(matches!(err, ImageError::UnknownXAttrNamespace(bits) if bits == ns));
        }
    }

    #[test]
    fn raw_namespace_uses_extension_bit() {
        // namespace 4 = base 0, extension 1
        let compact = XAttrCompact {
            name: pack_name(4, 2),
            value: Vec::new(),
        };
        let attr = decode_xattr(&compact, &table()).unwrap();
        assert_eq!(attr.namespace, XAttrNamespace::Raw);
        assert_eq!(attr.name, "policy");
    }

    #[test]
    fn utf8_value_is_text() {
        let compact = XAttrCompact {
            name: pack_name(0, 1),
            value: b"ab".to_vec(),
        };
        let attr = decode_xattr(&compact, &table()).unwrap();
        assert_eq!(attr.value, XAttrValue::Text("ab".to_string()));
    }

    #[test]
    fn non_utf8_value_is_binary() {
        let compact = XAttrCompact {
            name: pack_name(0, 1),
            value: vec![0xFF, 0xFE],
        };
        let attr = decode_xattr(&compact, &table()).unwrap();
        assert_eq!(attr.value, XAttrValue::Binary(vec![0xFF, 0xFE]));
    }
}
