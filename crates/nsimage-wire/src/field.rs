//! Tagged-field layer over record payloads.
//!
//! A payload is a sequence of fields, each introduced by a varint tag of
//! `field_number << 3 | wire_type`. Wire types: `0` varint, `1` fixed64,
//! `2` length-delimited bytes, `5` fixed32. Unknown field numbers are
//! skipped by schema impls; unknown wire types are malformed.

use crate::error::{WireError, WireResult};
use crate::varint;

/// A single decoded field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireValue<'a> {
    Varint(u64),
    Fixed64(u64),
    Bytes(&'a [u8]),
    Fixed32(u32),
}

/// A field: number, value, and the record name for error reporting.
#[derive(Clone, Copy, Debug)]
pub struct Field<'a> {
    pub number: u32,
    pub value: WireValue<'a>,
    record: &'static str,
}

impl<'a> Field<'a> {
    fn wrong_type(&self, expected: &str) -> WireError {
        WireError::malformed(
            self.record,
            format!("field {} is not a {expected}", self.number),
        )
    }

    /// Varint value as `u64`.
    pub fn u64(&self) -> WireResult<u64> {
        match self.value {
            WireValue::Varint(v) => Ok(v),
            _ => Err(self.wrong_type("varint")),
        }
    }

    /// Varint value narrowed to `u32`.
    pub fn u32(&self) -> WireResult<u32> {
        let v = self.u64()?;
        u32::try_from(v).map_err(|_| {
            WireError::malformed(
                self.record,
                format!("field {} value {v} exceeds u32", self.number),
            )
        })
    }

    /// Varint value as a boolean (any non-zero value is true).
    pub fn bool(&self) -> WireResult<bool> {
        Ok(self.u64()? != 0)
    }

    /// Fixed 64-bit value.
    pub fn fixed64(&self) -> WireResult<u64> {
        match self.value {
            WireValue::Fixed64(v) => Ok(v),
            _ => Err(self.wrong_type("fixed64")),
        }
    }

    /// Fixed 32-bit value.
    pub fn fixed32(&self) -> WireResult<u32> {
        match self.value {
            WireValue::Fixed32(v) => Ok(v),
            _ => Err(self.wrong_type("fixed32")),
        }
    }

    /// Length-delimited payload (bytes, string, or nested record).
    pub fn bytes(&self) -> WireResult<&'a [u8]> {
        match self.value {
            WireValue::Bytes(b) => Ok(b),
            _ => Err(self.wrong_type("length-delimited field")),
        }
    }

    /// Length-delimited payload decoded as UTF-8 text.
    pub fn string(&self) -> WireResult<String> {
        String::from_utf8(self.bytes()?.to_vec()).map_err(|_| {
            WireError::malformed(
                self.record,
                format!("field {} is not valid UTF-8", self.number),
            )
        })
    }

    /// Repeated varint field: accepts one packed payload or one plain value.
    pub fn packed_u64s(&self, into: &mut Vec<u64>) -> WireResult<()> {
        match self.value {
            WireValue::Varint(v) => into.push(v),
            WireValue::Bytes(mut data) => {
                while !data.is_empty() {
                    let (v, consumed) = varint::decode(data, self.record)?;
                    into.push(v);
                    data = &data[consumed..];
                }
            }
            _ => return Err(self.wrong_type("packed varint field")),
        }
        Ok(())
    }

    /// Repeated varint field narrowed to `u32` elements.
    pub fn packed_u32s(&self, into: &mut Vec<u32>) -> WireResult<()> {
        let mut wide = Vec::new();
        self.packed_u64s(&mut wide)?;
        for v in wide {
            into.push(u32::try_from(v).map_err(|_| {
                WireError::malformed(
                    self.record,
                    format!("field {} element {v} exceeds u32", self.number),
                )
            })?);
        }
        Ok(())
    }

    /// Repeated fixed32 field: accepts one packed payload or one plain value.
    pub fn packed_fixed32s(&self, into: &mut Vec<u32>) -> WireResult<()> {
        match self.value {
            WireValue::Fixed32(v) => into.push(v),
            WireValue::Bytes(data) => {
                if data.len() % 4 != 0 {
                    return Err(WireError::malformed(
                        self.record,
                        format!("field {} packed fixed32 length not a multiple of 4", self.number),
                    ));
                }
                for chunk in data.chunks_exact(4) {
                    into.push(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
                }
            }
            _ => return Err(self.wrong_type("packed fixed32 field")),
        }
        Ok(())
    }
}

/// Sequential reader over one record payload.
pub struct FieldReader<'a> {
    record: &'static str,
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(record: &'static str, data: &'a [u8]) -> Self {
        Self {
            record,
            data,
            pos: 0,
        }
    }

    fn take(&mut self, n: usize) -> WireResult<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.data.len());
        match end {
            Some(end) => {
                let slice = &self.data[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(WireError::Truncated {
                record: self.record,
            }),
        }
    }

    fn read_varint(&mut self) -> WireResult<u64> {
        let (value, consumed) = varint::decode(&self.data[self.pos..], self.record)?;
        self.pos += consumed;
        Ok(value)
    }

    /// Decode the next field, or `None` at the end of the payload.
    pub fn next_field(&mut self) -> WireResult<Option<Field<'a>>> {
        if self.pos == self.data.len() {
            return Ok(None);
        }
        let tag = self.read_varint()?;
        let number = (tag >> 3) as u32;
        let value = match tag & 7 {
            0 => WireValue::Varint(self.read_varint()?),
            1 => {
                let b = self.take(8)?;
                WireValue::Fixed64(u64::from_le_bytes(b.try_into().unwrap()))
            }
            2 => {
                let len = self.read_varint()?;
                let len = usize::try_from(len).map_err(|_| {
                    WireError::malformed(self.record, "length-delimited field too long")
                })?;
                WireValue::Bytes(self.take(len)?)
            }
            5 => {
                let b = self.take(4)?;
                WireValue::Fixed32(u32::from_le_bytes(b.try_into().unwrap()))
            }
            t => {
                return Err(WireError::malformed(
                    self.record,
                    format!("unknown wire type {t} in field {number}"),
                ))
            }
        };
        Ok(Some(Field {
            number,
            value,
            record: self.record,
        }))
    }
}

/// Builds record payloads field by field.
///
/// The production decoder never writes containers; this writer exists so
/// tests can assemble fixture records and images.
#[derive(Debug, Default)]
pub struct FieldWriter {
    buf: Vec<u8>,
}

impl FieldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn tag(mut self, number: u32, wire_type: u64) -> Self {
        varint::encode(&mut self.buf, u64::from(number) << 3 | wire_type);
        self
    }

    pub fn varint(self, number: u32, value: u64) -> Self {
        let mut w = self.tag(number, 0);
        varint::encode(&mut w.buf, value);
        w
    }

    pub fn fixed64(self, number: u32, value: u64) -> Self {
        let mut w = self.tag(number, 1);
        w.buf.extend_from_slice(&value.to_le_bytes());
        w
    }

    pub fn fixed32(self, number: u32, value: u32) -> Self {
        let mut w = self.tag(number, 5);
        w.buf.extend_from_slice(&value.to_le_bytes());
        w
    }

    pub fn bytes(self, number: u32, value: &[u8]) -> Self {
        let mut w = self.tag(number, 2);
        varint::encode(&mut w.buf, value.len() as u64);
        w.buf.extend_from_slice(value);
        w
    }

    pub fn string(self, number: u32, value: &str) -> Self {
        self.bytes(number, value.as_bytes())
    }

    /// Nested record field.
    pub fn message(self, number: u32, inner: FieldWriter) -> Self {
        self.bytes(number, &inner.finish())
    }

    pub fn packed_varints(self, number: u32, values: &[u64]) -> Self {
        let mut payload = Vec::new();
        for &v in values {
            varint::encode(&mut payload, v);
        }
        self.bytes(number, &payload)
    }

    pub fn packed_fixed32s(self, number: u32, values: &[u32]) -> Self {
        let mut payload = Vec::new();
        for &v in values {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        self.bytes(number, &payload)
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
