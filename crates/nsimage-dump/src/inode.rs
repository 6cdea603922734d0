//! Inode emission: the INODE section and the shared per-inode field walk
//! (also used for snapshot roots).

use std::io::{Read, Write};

use nsimage_image::{decode_acl_entries, decode_xattr, Permission, StringTable, XAttrValue};
use nsimage_records::{
    AclFeature, DirectoryNode, FileNode, Inode, InodePayload, InodeSectionHeader, SymlinkNode,
    XAttrFeature,
};
use nsimage_wire::{decode_required, Counted};
use nsimage_xml::XmlEmitter;

use crate::error::DumpResult;

pub(crate) fn dump_inode_section<W: Write>(
    out: &mut XmlEmitter<W>,
    strings: &StringTable,
    r: &mut impl Read,
) -> DumpResult<()> {
    let header: InodeSectionHeader = decode_required(r)?;
    out.open("INodeSection")?;
    out.elem("lastInodeId", header.last_inode_id)?;
    out.elem("numInodes", header.num_inodes)?;
    let mut inodes = Counted::<Inode>::new(header.num_inodes);
    while let Some(inode) = inodes.next(r)? {
        out.open("inode")?;
        dump_inode_fields(out, strings, &inode)?;
        out.close_line("inode")?;
    }
    out.close_line("INodeSection")?;
    Ok(())
}

/// id, type, name, then the type-specific payload fields.
pub(crate) fn dump_inode_fields<W: Write>(
    out: &mut XmlEmitter<W>,
    strings: &StringTable,
    inode: &Inode,
) -> DumpResult<()> {
    out.elem("id", inode.id)?;
    out.elem("type", inode.kind)?;
    out.elem("name", String::from_utf8_lossy(&inode.name))?;
    match &inode.payload {
        Some(InodePayload::File(file)) => dump_file(out, strings, file),
        Some(InodePayload::Directory(dir)) => dump_directory(out, strings, dir),
        Some(InodePayload::Symlink(link)) => dump_symlink(out, strings, link),
        None => Ok(()),
    }
}

fn dump_file<W: Write>(
    out: &mut XmlEmitter<W>,
    strings: &StringTable,
    file: &FileNode,
) -> DumpResult<()> {
    out.elem("replication", file.replication)?;
    out.elem("mtime", file.modification_time)?;
    out.elem("atime", file.access_time)?;
    out.elem("preferredBlockSize", file.preferred_block_size)?;
    out.elem("permission", Permission::decode(file.permission, strings)?)?;
    if let Some(xattrs) = &file.xattrs {
        dump_xattrs(out, strings, xattrs)?;
    }
    dump_acls(out, strings, &file.acl)?;
    if !file.blocks.is_empty() {
        out.open("blocks")?;
        for block in &file.blocks {
            out.open("block")?;
            out.elem("id", block.id)?;
            out.elem("genstamp", block.genstamp)?;
            out.elem("numBytes", block.num_bytes)?;
            out.close_line("block")?;
        }
        out.close_line("blocks")?;
    }
    if let Some(policy) = file.storage_policy_id {
        out.elem("storagePolicyId", policy)?;
    }
    out.flag("isStriped", file.is_striped)?;
    if let Some(lease) = &file.file_uc {
        out.open("file-under-construction")?;
        out.elem("clientName", &lease.client_name)?;
        out.elem("clientMachine", &lease.client_machine)?;
        out.close_line("file-under-construction")?;
    }
    Ok(())
}

fn dump_directory<W: Write>(
    out: &mut XmlEmitter<W>,
    strings: &StringTable,
    dir: &DirectoryNode,
) -> DumpResult<()> {
    out.elem("mtime", dir.modification_time)?;
    out.elem("permission", Permission::decode(dir.permission, strings)?)?;
    if let Some(xattrs) = &dir.xattrs {
        dump_xattrs(out, strings, xattrs)?;
    }
    dump_acls(out, strings, &dir.acl)?;
    // both quotas or neither
    if let (Some(ns), Some(ds)) = (dir.ns_quota, dir.ds_quota) {
        out.elem("nsquota", ns)?;
        out.elem("dsquota", ds)?;
    }
    for quota in &dir.type_quotas {
        out.open("typeQuota")?;
        out.elem("type", quota.storage_type)?;
        out.elem("quota", quota.quota)?;
        out.close("typeQuota")?;
    }
    Ok(())
}

fn dump_symlink<W: Write>(
    out: &mut XmlEmitter<W>,
    strings: &StringTable,
    link: &SymlinkNode,
) -> DumpResult<()> {
    out.elem("permission", Permission::decode(link.permission, strings)?)?;
    out.elem("target", String::from_utf8_lossy(&link.target))?;
    out.elem("mtime", link.modification_time)?;
    out.elem("atime", link.access_time)?;
    Ok(())
}

fn dump_acls<W: Write>(
    out: &mut XmlEmitter<W>,
    strings: &StringTable,
    feature: &AclFeature,
) -> DumpResult<()> {
    let entries = decode_acl_entries(feature, strings)?;
    if !entries.is_empty() {
        out.open("acls")?;
        for entry in &entries {
            out.elem("acl", entry)?;
        }
        out.close("acls")?;
    }
    Ok(())
}

fn dump_xattrs<W: Write>(
    out: &mut XmlEmitter<W>,
    strings: &StringTable,
    feature: &XAttrFeature,
) -> DumpResult<()> {
    out.open("xattrs")?;
    for compact in &feature.xattrs {
        let attr = decode_xattr(compact, strings)?;
        out.open("xattr")?;
        out.elem("ns", attr.namespace)?;
        out.elem("name", &attr.name)?;
        match &attr.value {
            XAttrValue::Text(text) => out.elem("val", text)?,
            XAttrValue::Binary(bytes) => out.elem("valHex", hex::encode(bytes))?,
        }
        out.close("xattr")?;
    }
    out.close("xattrs")?;
    Ok(())
}
