//! Streaming XML field emission.
//!
//! No tree is built: callers open and close composite tags explicitly and
//! stream scalar elements between them. Booleans follow a presence
//! convention (`true` emits a self-closing tag, `false` emits nothing), and
//! millisecond timestamps render in UTC as `yyyy-MM-ddTHH:mm:ss.SSS`.

pub mod emitter;
pub mod escape;

pub use emitter::{format_date, XmlEmitter};
pub use escape::escape;
