//! The field emitter.

use std::fmt::Display;
use std::io::{self, Write};

use chrono::DateTime;

use crate::escape::escape;

/// Render a millisecond-epoch timestamp in UTC as `yyyy-MM-ddTHH:mm:ss.SSS`.
///
/// Values beyond the representable year range render as raw millis.
pub fn format_date(millis: u64) -> String {
    match i64::try_from(millis).ok().and_then(DateTime::from_timestamp_millis) {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        None => millis.to_string(),
    }
}

/// Streams XML elements to a sink.
#[derive(Debug)]
pub struct XmlEmitter<W: Write> {
    out: W,
}

impl<W: Write> XmlEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// `<?xml version="1.0"?>` followed by a newline.
    pub fn declaration(&mut self) -> io::Result<()> {
        self.out.write_all(b"<?xml version=\"1.0\"?>\n")
    }

    /// Opening tag of a composite element.
    pub fn open(&mut self, tag: &str) -> io::Result<()> {
        write!(self.out, "<{tag}>")
    }

    /// Closing tag of a composite element.
    pub fn close(&mut self, tag: &str) -> io::Result<()> {
        write!(self.out, "</{tag}>")
    }

    /// Closing tag followed by a newline.
    pub fn close_line(&mut self, tag: &str) -> io::Result<()> {
        write!(self.out, "</{tag}>\n")
    }

    /// Scalar element with escaped text content.
    pub fn elem<V: Display>(&mut self, tag: &str, value: V) -> io::Result<()> {
        write!(self.out, "<{tag}>{}</{tag}>", escape(&value.to_string()))
    }

    /// Boolean by presence: `true` emits `<tag/>`, `false` emits nothing.
    pub fn flag(&mut self, tag: &str, present: bool) -> io::Result<()> {
        if present {
            write!(self.out, "<{tag}/>")?;
        }
        Ok(())
    }

    /// Scalar element holding a formatted UTC date.
    pub fn date(&mut self, tag: &str, millis: u64) -> io::Result<()> {
        self.elem(tag, format_date(millis))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(f: impl FnOnce(&mut XmlEmitter<&mut Vec<u8>>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        let mut emitter = XmlEmitter::new(&mut buf);
        f(&mut emitter).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn scalar_element() {
        assert_eq!(emit(|e| e.elem("id", 16385)), "<id>16385</id>");
    }

    #[test]
    fn scalar_escapes_content() {
        assert_eq!(
            emit(|e| e.elem("name", "a<b>&c")),
            "<name>a&lt;b&gt;&amp;c</name>"
        );
    }

    #[test]
    fn flag_true_is_self_closing() {
        assert_eq!(emit(|e| e.flag("isStriped", true)), "<isStriped/>");
    }

    #[test]
    fn flag_false_emits_nothing() {
        assert_eq!(emit(|e| e.flag("isStriped", false)), "");
    }

    #[test]
    fn epoch_zero_date() {
        assert_eq!(format_date(0), "1970-01-01T00:00:00.000");
    }

    #[test]
    fn millisecond_precision() {
        assert_eq!(format_date(1_001), "1970-01-01T00:00:01.001");
    }

    #[test]
    fn date_element() {
        assert_eq!(
            emit(|e| e.date("expiry", 86_400_000)),
            "<expiry>1970-01-02T00:00:00.000</expiry>"
        );
    }

    #[test]
    fn out_of_range_date_falls_back_to_millis() {
        assert_eq!(format_date(u64::MAX), u64::MAX.to_string());
    }

    #[test]
    fn composite_nesting() {
        let xml = emit(|e| {
            e.open("directory")?;
            e.elem("parent", 5)?;
            e.elem("child", 10)?;
            e.close_line("directory")
        });
        assert_eq!(xml, "<directory><parent>5</parent><child>10</child></directory>\n");
    }

    #[test]
    fn declaration_line() {
        assert_eq!(emit(|e| e.declaration()), "<?xml version=\"1.0\"?>\n");
    }
}
