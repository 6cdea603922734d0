//! The conversion driver: version block, canonical section walk, dispatch.

use std::io::{Read, Seek, Write};

use tracing::debug;

use nsimage_image::{Image, ImageError, StringTable};
use nsimage_records::{
    canonical_order, DirEntry, FileUnderConstructionEntry, InodeReference, NameSystemInfo,
    SectionKind,
};
use nsimage_wire::{decode_delimited, decode_required, exhausted};
use nsimage_xml::XmlEmitter;

use crate::cache::dump_cache_manager_section;
use crate::error::{DumpError, DumpResult};
use crate::inode::dump_inode_section;
use crate::secret::dump_secret_manager_section;
use crate::snapshot::{dump_snapshot_diff_section, dump_snapshot_section};

/// Walks an image section by section and writes the XML document.
///
/// One pass, one section at a time, one record at a time; errors abort the
/// remaining conversion and the partial output must be discarded.
pub struct ImageXmlWriter<W: Write> {
    out: XmlEmitter<W>,
    strings: Option<StringTable>,
    revision: String,
}

impl<W: Write> ImageXmlWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: XmlEmitter::new(out),
            strings: None,
            revision: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the revision string recorded in the version block.
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    /// Convert the whole image.
    pub fn write_image<R: Read + Seek>(&mut self, image: &mut Image<R>) -> DumpResult<()> {
        self.out.declaration()?;
        self.out.open("fsimage")?;

        self.out.open("version")?;
        self.out.elem("layoutVersion", image.summary().layout_version)?;
        self.out.elem("onDiskVersion", image.summary().ondisk_version)?;
        self.out.elem("oivRevision", &self.revision)?;
        self.out.close_line("version")?;

        let sections = image.summary().sections.clone();
        for descriptor in canonical_order(&sections) {
            match descriptor.kind {
                Some(kind) => {
                    debug!(
                        section = %kind,
                        offset = descriptor.offset,
                        length = descriptor.length,
                        "decoding section"
                    );
                    let mut stream = image.open_section(descriptor)?;
                    self.dump_section(kind, &mut stream)?;
                    if !exhausted(&mut stream)? {
                        return Err(DumpError::TrailingData {
                            section: kind.name(),
                        });
                    }
                }
                None => debug!(section = %descriptor.name, "skipping unknown section"),
            }
        }

        self.out.close_line("fsimage")?;
        self.out.flush()?;
        Ok(())
    }

    fn dump_section(&mut self, kind: SectionKind, r: &mut impl Read) -> DumpResult<()> {
        match kind {
            SectionKind::NamespaceInfo => self.dump_name_section(r),
            SectionKind::StringTable => {
                self.strings = Some(StringTable::load(r)?);
                Ok(())
            }
            SectionKind::Inode => {
                let strings = require_strings(&self.strings)?;
                dump_inode_section(&mut self.out, strings, r)
            }
            SectionKind::InodeReference => self.dump_inode_reference_section(r),
            SectionKind::InodeDirectory => self.dump_inode_directory_section(r),
            SectionKind::FilesUnderConstruction => self.dump_file_under_construction_section(r),
            SectionKind::Snapshot => {
                let strings = require_strings(&self.strings)?;
                dump_snapshot_section(&mut self.out, strings, r)
            }
            SectionKind::SnapshotDiff => dump_snapshot_diff_section(&mut self.out, r),
            SectionKind::SecretManager => dump_secret_manager_section(&mut self.out, r),
            SectionKind::CacheManager => dump_cache_manager_section(&mut self.out, r),
        }
    }

    fn dump_name_section(&mut self, r: &mut impl Read) -> DumpResult<()> {
        let info: NameSystemInfo = decode_required(r)?;
        self.out.open("NameSection")?;
        self.out.elem("namespaceId", info.namespace_id)?;
        self.out.elem("genstampV1", info.genstamp_v1)?;
        self.out.elem("genstampV2", info.genstamp_v2)?;
        self.out.elem("genstampV1Limit", info.genstamp_v1_limit)?;
        self.out
            .elem("lastAllocatedBlockId", info.last_allocated_block_id)?;
        self.out.elem("txid", info.transaction_id)?;
        self.out.close_line("NameSection")?;
        Ok(())
    }

    fn dump_inode_reference_section(&mut self, r: &mut impl Read) -> DumpResult<()> {
        self.out.open("INodeReferenceSection")?;
        while let Some(reference) = decode_delimited::<InodeReference>(r)? {
            self.out.open("ref")?;
            self.out.elem("referredId", reference.referred_id)?;
            self.out
                .elem("name", String::from_utf8_lossy(&reference.name))?;
            self.out.elem("dstSnapshotId", reference.dst_snapshot_id)?;
            self.out.elem("lastSnapshotId", reference.last_snapshot_id)?;
            self.out.close_line("ref")?;
        }
        self.out.close("INodeReferenceSection")?;
        Ok(())
    }

    fn dump_inode_directory_section(&mut self, r: &mut impl Read) -> DumpResult<()> {
        self.out.open("INodeDirectorySection")?;
        while let Some(entry) = decode_delimited::<DirEntry>(r)? {
            self.out.open("directory")?;
            self.out.elem("parent", entry.parent)?;
            for id in &entry.children {
                self.out.elem("child", id)?;
            }
            for id in &entry.ref_children {
                self.out.elem("refChild", id)?;
            }
            self.out.close_line("directory")?;
        }
        self.out.close_line("INodeDirectorySection")?;
        Ok(())
    }

    fn dump_file_under_construction_section(&mut self, r: &mut impl Read) -> DumpResult<()> {
        self.out.open("FileUnderConstructionSection")?;
        while let Some(entry) = decode_delimited::<FileUnderConstructionEntry>(r)? {
            self.out.open("inode")?;
            self.out.elem("id", entry.inode_id)?;
            self.out.elem("path", &entry.full_path)?;
            self.out.close_line("inode")?;
        }
        self.out.close_line("FileUnderConstructionSection")?;
        Ok(())
    }
}

fn require_strings(strings: &Option<StringTable>) -> DumpResult<&StringTable> {
    strings
        .as_ref()
        .ok_or(DumpError::Image(ImageError::StringTableNotLoaded))
}
