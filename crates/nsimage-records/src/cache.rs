//! Cache pool and directive records.

use nsimage_wire::{FieldReader, WireRecord, WireResult};

/// Header of the CACHE_MANAGER section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheManagerHeader {
    pub next_directive_id: u64,
    pub num_pools: u32,
    pub num_directives: u32,
}

impl WireRecord for CacheManagerHeader {
    const RECORD: &'static str = "CacheManagerHeader";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.next_directive_id = f.u64()?,
                2 => rec.num_pools = f.u32()?,
                3 => rec.num_directives = f.u32()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// One cache pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CachePool {
    pub pool_name: String,
    pub owner_name: String,
    pub group_name: String,
    pub mode: u32,
    pub limit: u64,
    pub max_relative_expiry: u64,
}

impl WireRecord for CachePool {
    const RECORD: &'static str = "CachePool";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.pool_name = f.string()?,
                2 => rec.owner_name = f.string()?,
                3 => rec.group_name = f.string()?,
                4 => rec.mode = f.u32()?,
                5 => rec.limit = f.u64()?,
                6 => rec.max_relative_expiry = f.u64()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// Expiration attached to a directive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheExpiration {
    pub millis: u64,
    pub is_relative: bool,
}

impl CacheExpiration {
    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new("CacheExpiration", data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.millis = f.u64()?,
                2 => rec.is_relative = f.bool()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// One cache directive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheDirective {
    pub id: u64,
    pub path: String,
    pub replication: u32,
    pub pool: String,
    pub expiration: Option<CacheExpiration>,
}

impl WireRecord for CacheDirective {
    const RECORD: &'static str = "CacheDirective";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.id = f.u64()?,
                2 => rec.path = f.string()?,
                3 => rec.replication = f.u32()?,
                4 => rec.pool = f.string()?,
                5 => rec.expiration = Some(CacheExpiration::decode(f.bytes()?)?),
                _ => {}
            }
        }
        Ok(rec)
    }
}
