use nsimage_wire::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid image magic: expected {expected}, got {actual}")]
    InvalidMagic { expected: String, actual: String },

    #[error("corrupt file summary: {0}")]
    CorruptSummary(String),

    #[error("unknown codec: {0}")]
    UnknownCodec(String),

    #[error("section {name} extends beyond the image")]
    SectionOutOfBounds { name: String },

    #[error("corrupt string table: {0}")]
    CorruptStringTable(String),

    #[error("string table dereferenced before the STRING_TABLE section was loaded")]
    StringTableNotLoaded,

    #[error("string table has no entry for id {id}")]
    UnknownStringId { id: u32 },

    #[error("unknown xattr namespace {0}")]
    UnknownXAttrNamespace(u32),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ImageResult<T> = Result<T, ImageError>;
