//! Snapshot and snapshot-diff emission.
//!
//! Diff entries are a small state machine: one header declares the kind and
//! the group size, and the walker must consume exactly that many diff
//! records (plus, for directory diffs, exactly the declared created-list
//! entries) before the next header may be read.

use std::io::{Read, Write};

use nsimage_image::StringTable;
use nsimage_records::{
    CreatedListEntry, DiffEntry, DiffEntryKind, DirectoryDiff, FileDiff, Snapshot,
    SnapshotSectionHeader,
};
use nsimage_wire::{decode_delimited, decode_required, Counted};
use nsimage_xml::XmlEmitter;

use crate::error::{DumpError, DumpResult};
use crate::inode::dump_inode_fields;

pub(crate) fn dump_snapshot_section<W: Write>(
    out: &mut XmlEmitter<W>,
    strings: &StringTable,
    r: &mut impl Read,
) -> DumpResult<()> {
    out.open("SnapshotSection")?;
    let header: SnapshotSectionHeader = decode_required(r)?;
    out.elem("snapshotCounter", header.snapshot_counter)?;
    out.elem("numSnapshots", header.num_snapshots)?;
    if !header.snapshottable_dirs.is_empty() {
        out.open("snapshottableDir")?;
        for id in &header.snapshottable_dirs {
            out.elem("dir", id)?;
        }
        out.close_line("snapshottableDir")?;
    }
    let mut snapshots = Counted::<Snapshot>::new(u64::from(header.num_snapshots));
    while let Some(snapshot) = snapshots.next(r)? {
        out.open("snapshot")?;
        out.elem("id", snapshot.snapshot_id)?;
        if let Some(root) = &snapshot.root {
            out.open("root")?;
            dump_inode_fields(out, strings, root)?;
            out.close("root")?;
        }
        out.close("snapshot")?;
    }
    out.close_line("SnapshotSection")?;
    Ok(())
}

pub(crate) fn dump_snapshot_diff_section<W: Write>(
    out: &mut XmlEmitter<W>,
    r: &mut impl Read,
) -> DumpResult<()> {
    out.open("SnapshotDiffSection")?;
    while let Some(entry) = decode_delimited::<DiffEntry>(r)? {
        let kind =
            DiffEntryKind::from_u64(entry.kind).ok_or(DumpError::UnknownDiffEntryType {
                kind: entry.kind,
                inode_id: entry.inode_id,
            })?;
        let entry_tag = match kind {
            DiffEntryKind::FileDiff => "fileDiffEntry",
            DiffEntryKind::DirectoryDiff => "dirDiffEntry",
        };
        out.open(entry_tag)?;
        out.elem("inodeId", entry.inode_id)?;
        out.elem("count", entry.num_of_diff)?;
        match kind {
            DiffEntryKind::FileDiff => dump_file_diffs(out, r, entry.num_of_diff)?,
            DiffEntryKind::DirectoryDiff => dump_directory_diffs(out, r, entry.num_of_diff)?,
        }
        out.close(entry_tag)?;
    }
    out.close_line("SnapshotDiffSection")?;
    Ok(())
}

fn dump_file_diffs<W: Write>(
    out: &mut XmlEmitter<W>,
    r: &mut impl Read,
    count: u32,
) -> DumpResult<()> {
    let mut diffs = Counted::<FileDiff>::new(u64::from(count));
    while let Some(diff) = diffs.next(r)? {
        out.open("fileDiff")?;
        out.elem("snapshotId", diff.snapshot_id)?;
        out.elem("size", diff.file_size)?;
        out.elem("name", String::from_utf8_lossy(&diff.name))?;
        out.close_line("fileDiff")?;
    }
    Ok(())
}

fn dump_directory_diffs<W: Write>(
    out: &mut XmlEmitter<W>,
    r: &mut impl Read,
    count: u32,
) -> DumpResult<()> {
    let mut diffs = Counted::<DirectoryDiff>::new(u64::from(count));
    while let Some(diff) = diffs.next(r)? {
        out.open("dirDiff")?;
        out.elem("snapshotId", diff.snapshot_id)?;
        out.elem("childrenSize", diff.children_size)?;
        out.flag("isSnapshotRoot", diff.is_snapshot_root)?;
        out.elem("name", String::from_utf8_lossy(&diff.name))?;
        out.elem("createdListSize", diff.created_list_size)?;
        for id in &diff.deleted_inodes {
            out.elem("deletedInode", id)?;
        }
        for id in &diff.deleted_inode_refs {
            out.elem("deletedInoderef", id)?;
        }
        let mut created = Counted::<CreatedListEntry>::new(u64::from(diff.created_list_size));
        while let Some(entry) = created.next(r)? {
            out.open("created")?;
            out.elem("name", String::from_utf8_lossy(&entry.name))?;
            out.close_line("created")?;
        }
        out.close_line("dirDiff")?;
    }
    Ok(())
}
