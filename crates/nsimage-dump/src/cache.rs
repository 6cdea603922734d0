//! Cache-manager emission: pools, then directives.

use std::io::{Read, Write};

use nsimage_records::{CacheDirective, CacheManagerHeader, CachePool};
use nsimage_wire::{decode_required, Counted};
use nsimage_xml::XmlEmitter;

use crate::error::DumpResult;

pub(crate) fn dump_cache_manager_section<W: Write>(
    out: &mut XmlEmitter<W>,
    r: &mut impl Read,
) -> DumpResult<()> {
    out.open("CacheManagerSection")?;
    let header: CacheManagerHeader = decode_required(r)?;
    out.elem("nextDirectiveId", header.next_directive_id)?;
    out.elem("numDirectives", header.num_directives)?;
    out.elem("numPools", header.num_pools)?;

    let mut pools = Counted::<CachePool>::new(u64::from(header.num_pools));
    while let Some(pool) = pools.next(r)? {
        out.open("pool")?;
        out.elem("poolName", &pool.pool_name)?;
        out.elem("ownerName", &pool.owner_name)?;
        out.elem("groupName", &pool.group_name)?;
        out.elem("mode", pool.mode)?;
        out.elem("limit", pool.limit)?;
        out.elem("maxRelativeExpiry", pool.max_relative_expiry)?;
        out.close_line("pool")?;
    }

    let mut directives = Counted::<CacheDirective>::new(u64::from(header.num_directives));
    while let Some(directive) = directives.next(r)? {
        out.open("directive")?;
        out.elem("id", directive.id)?;
        out.elem("path", &directive.path)?;
        out.elem("replication", directive.replication)?;
        out.elem("pool", &directive.pool)?;
        if let Some(expiration) = directive.expiration {
            out.open("expiration")?;
            out.elem("millis", expiration.millis)?;
            out.flag("relative", expiration.is_relative)?;
            out.close_line("expiration")?;
        }
        out.close_line("directive")?;
    }
    out.close_line("CacheManagerSection")?;
    Ok(())
}
