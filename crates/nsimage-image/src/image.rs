//! Container loading and section stream access.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use nsimage_records::{FileSummary, SectionDescriptor};
use nsimage_wire::{decode_required, exhausted};

use crate::codec::Codec;
use crate::error::{ImageError, ImageResult};

/// Format magic at the head of every image file.
pub const MAGIC: &[u8; 8] = b"NSIMG1.0";

/// Byte length of the trailing summary-length field.
const TAIL_LEN: u64 = 4;

/// An open checkpoint image: validated magic, loaded summary, and on-demand
/// bounded section streams.
///
/// The handle is held for the whole run and released when the `Image` drops,
/// on success and error paths alike.
#[derive(Debug)]
pub struct Image<R: Read + Seek> {
    file: R,
    file_len: u64,
    summary: FileSummary,
    codec: Codec,
}

impl Image<File> {
    /// Open an image file from disk.
    pub fn open(path: &Path) -> ImageResult<Self> {
        Self::load(File::open(path)?)
    }
}

impl<R: Read + Seek> Image<R> {
    /// Validate the magic and load the tail-positioned summary.
    pub fn load(mut file: R) -> ImageResult<Self> {
        let file_len = file.seek(SeekFrom::End(0))?;
        if file_len < MAGIC.len() as u64 + TAIL_LEN {
            return Err(ImageError::CorruptSummary(format!(
                "image is {file_len} bytes, too short to hold a magic and summary"
            )));
        }

        file.seek(SeekFrom::Start(0))?;
        let mut magic = [0u8; 8];
        file.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(ImageError::InvalidMagic {
                expected: String::from_utf8_lossy(MAGIC).into_owned(),
                actual: String::from_utf8_lossy(&magic).into_owned(),
            });
        }

        file.seek(SeekFrom::End(-(TAIL_LEN as i64)))?;
        let mut tail = [0u8; 4];
        file.read_exact(&mut tail)?;
        let summary_len = u64::from(u32::from_be_bytes(tail));

        let summary_start = file_len
            .checked_sub(TAIL_LEN + summary_len)
            .filter(|&s| s >= MAGIC.len() as u64)
            .ok_or_else(|| {
                ImageError::CorruptSummary(format!(
                    "declared summary length {summary_len} does not fit the image"
                ))
            })?;

        file.seek(SeekFrom::Start(summary_start))?;
        let mut region = (&mut file).take(summary_len);
        let summary: FileSummary = decode_required(&mut region)?;
        if !exhausted(&mut region)? {
            return Err(ImageError::CorruptSummary(
                "trailing bytes after the summary record".to_string(),
            ));
        }

        let codec = Codec::from_name(summary.codec.as_deref())?;
        debug!(
            layout_version = summary.layout_version,
            ondisk_version = summary.ondisk_version,
            ?codec,
            sections = summary.sections.len(),
            "loaded image summary"
        );

        Ok(Self {
            file,
            file_len,
            summary,
            codec,
        })
    }

    pub fn summary(&self) -> &FileSummary {
        &self.summary
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Open a bounded, codec-wrapped stream over one section body.
    pub fn open_section(&mut self, d: &SectionDescriptor) -> ImageResult<Box<dyn Read + '_>> {
        let in_bounds = d
            .offset
            .checked_add(d.length)
            .is_some_and(|end| end <= self.file_len);
        if !in_bounds {
            return Err(ImageError::SectionOutOfBounds {
                name: d.name.clone(),
            });
        }
        debug!(section = %d.name, offset = d.offset, length = d.length, "opening section");
        self.file.seek(SeekFrom::Start(d.offset))?;
        let limited = BufReader::new((&mut self.file).take(d.length));
        self.codec.wrap(Box::new(limited))
    }
}
