//! Checkpoint image container access.
//!
//! # Architecture
//!
//! - [`Image`]: validates the format magic, loads the tail-positioned
//!   [`FileSummary`](nsimage_records::FileSummary), and opens bounded,
//!   codec-wrapped byte streams per section
//! - [`Codec`]: the section compression codecs named in the summary
//! - [`StringTable`]: id → text lookup, populated once from the
//!   STRING_TABLE section; a populated handle is required by every decoder
//!   that resolves names
//! - [`Permission`], [`AclEntry`], [`XAttr`]: packed-integer decoding into
//!   the human-readable renderings

pub mod codec;
pub mod error;
pub mod image;
pub mod perm;
pub mod strings;
pub mod xattr;

pub use codec::Codec;
pub use error::{ImageError, ImageResult};
pub use image::{Image, MAGIC};
pub use perm::{decode_acl_entries, AclEntry, AclScope, AclType, Permission};
pub use strings::StringTable;
pub use xattr::{decode_xattr, XAttr, XAttrNamespace, XAttrValue};
