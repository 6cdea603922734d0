//! Length-delimited record decoding for checkpoint images.
//!
//! A record on the wire is a varint byte length followed by that many payload
//! bytes. Payloads are sequences of tagged fields (varint, fixed32, fixed64,
//! or length-delimited bytes). This crate provides the framing and field
//! layers; the per-record schemas live in `nsimage-records`.
//!
//! # Consumption modes
//!
//! - [`decode_delimited`] — one record, or `None` exactly at a record boundary
//! - [`Counted`] — exactly `n` records, [`WireError::CountMismatch`] otherwise
//! - calling [`decode_delimited`] until `None` — "repeat until exhausted"
//!
//! [`exhausted`] reports whether a stream was consumed exactly to its
//! boundary, which the section walkers require after every section.

pub mod delimited;
pub mod error;
pub mod field;
pub mod varint;

pub use delimited::{
    decode_delimited, decode_required, encode_delimited, exhausted, Counted, WireRecord,
};
pub use error::{WireError, WireResult};
pub use field::{Field, FieldReader, FieldWriter, WireValue};
