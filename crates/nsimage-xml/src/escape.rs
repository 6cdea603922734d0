//! Character-data escaping.
//!
//! `& < > " '` become entity references. Characters XML cannot carry at all
//! (controls below 0x20 other than TAB/LF/CR, U+FFFE/U+FFFF) are mangled to
//! `\hhhh;` rather than dropped; backslash itself is mangled so the form
//! stays decodable.

/// `true` for characters that must be `\hhhh;`-mangled.
fn must_mangle(c: char) -> bool {
    let cp = c as u32;
    if cp < 0x20 {
        cp != 0x9 && cp != 0xA && cp != 0xD
    } else {
        cp == 0xFFFE || cp == 0xFFFF || c == '\\'
    }
}

/// Escape `s` for use as XML character data.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if must_mangle(c) {
            out.push_str(&format!("\\{:04x};", c as u32));
        } else {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&apos;"),
                _ => out.push(c),
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(escape("plain-name_1.txt"), "plain-name_1.txt");
    }

    #[test]
    fn entity_references() {
        assert_eq!(escape("a<b&c>\"d'"), "a&lt;b&amp;c&gt;&quot;d&apos;");
    }

    #[test]
    fn control_characters_mangled_not_dropped() {
        assert_eq!(escape("a\u{0}b"), "a\\0000;b");
        assert_eq!(escape("\u{1b}"), "\\001b;");
    }

    #[test]
    fn whitespace_controls_pass_through() {
        assert_eq!(escape("a\tb\nc\rd"), "a\tb\nc\rd");
    }

    #[test]
    fn backslash_mangled() {
        assert_eq!(escape("a\\b"), "a\\005c;b");
    }

    #[test]
    fn noncharacters_mangled() {
        assert_eq!(escape("\u{fffd}"), "\u{fffd}");
        assert_eq!(escape("\u{fffe}"), "\\fffe;");
        assert_eq!(escape("\u{ffff}"), "\\ffff;");
    }
}
