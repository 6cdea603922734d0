use nsimage_image::ImageError;
use nsimage_wire::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("unknown diff entry type {kind} for inode {inode_id}")]
    UnknownDiffEntryType { kind: u64, inode_id: u64 },

    #[error("section {section} has trailing bytes past its declared records")]
    TrailingData { section: &'static str },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DumpResult<T> = Result<T, DumpError>;
