//! Section-walking XML conversion.
//!
//! [`ImageXmlWriter`] drives one pass over an open image: sections are
//! visited in canonical kind order (unknown kinds skipped), each section's
//! records are decoded lazily and streamed straight to the XML emitter, and
//! every section stream must be exhausted exactly at its boundary. No
//! intermediate tree is materialized; the string table and the summary are
//! the only state held across sections.

mod cache;
pub mod error;
mod inode;
mod secret;
mod snapshot;
mod writer;

pub use error::{DumpError, DumpResult};
pub use writer::ImageXmlWriter;
