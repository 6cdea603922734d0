//! Record framing: varint length prefix followed by the payload bytes.

use std::io::{ErrorKind, Read};
use std::marker::PhantomData;

use crate::error::{WireError, WireResult};
use crate::varint;

/// Cap on a single record's payload, so a corrupt length prefix cannot
/// drive an absurd allocation.
const MAX_RECORD_LEN: u64 = 64 << 20;

/// A record type decodable from a length-delimited payload.
pub trait WireRecord: Sized {
    /// Record name used in error messages.
    const RECORD: &'static str;

    /// Decode one record from its payload bytes.
    fn decode(data: &[u8]) -> WireResult<Self>;
}

/// Decode the next record from `r`.
///
/// Returns `None` when the stream is exhausted exactly at a record boundary.
/// A stream ending mid-record is [`WireError::Truncated`].
pub fn decode_delimited<T: WireRecord>(r: &mut impl Read) -> WireResult<Option<T>> {
    let len = match varint::read(r, T::RECORD)? {
        Some(len) => len,
        None => return Ok(None),
    };
    if len > MAX_RECORD_LEN {
        return Err(WireError::malformed(
            T::RECORD,
            format!("record length {len} exceeds the {MAX_RECORD_LEN}-byte cap"),
        ));
    }
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            WireError::Truncated { record: T::RECORD }
        } else {
            WireError::Io(e)
        }
    })?;
    T::decode(&buf).map(Some)
}

/// Decode a record that must be present (a section header, for example).
pub fn decode_required<T: WireRecord>(r: &mut impl Read) -> WireResult<T> {
    decode_delimited(r)?.ok_or(WireError::Truncated { record: T::RECORD })
}

/// Frame `payload` as a length-delimited record. Fixture support for tests;
/// the converter itself never writes containers.
pub fn encode_delimited(out: &mut Vec<u8>, payload: &[u8]) {
    varint::encode(out, payload.len() as u64);
    out.extend_from_slice(payload);
}

/// `true` if `r` has no bytes left.
pub fn exhausted(r: &mut impl Read) -> WireResult<bool> {
    let mut probe = [0u8; 1];
    Ok(r.read(&mut probe)? == 0)
}

/// Lazy counted record sequence, bounded by a previously-read count.
///
/// Yields exactly `declared` records; a stream that dries up earlier is a
/// [`WireError::CountMismatch`]. The cursor takes the reader per call so
/// nested groups can interleave reads on the same stream.
#[derive(Debug)]
pub struct Counted<T> {
    declared: u64,
    yielded: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T: WireRecord> Counted<T> {
    pub fn new(declared: u64) -> Self {
        Self {
            declared,
            yielded: 0,
            _marker: PhantomData,
        }
    }

    /// The next record of the group, or `None` once the group is complete.
    pub fn next(&mut self, r: &mut impl Read) -> WireResult<Option<T>> {
        if self.yielded == self.declared {
            return Ok(None);
        }
        match decode_delimited(r)? {
            Some(record) => {
                self.yielded += 1;
                Ok(Some(record))
            }
            None => Err(WireError::CountMismatch {
                record: T::RECORD,
                declared: self.declared,
                actual: self.yielded,
            }),
        }
    }
}
