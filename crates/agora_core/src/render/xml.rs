//! Minimal escaping XML writer.

use std::fmt::Write;

pub(crate) const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Escapes the five XML special characters and drops characters XML 1.0
/// cannot carry (C0 controls other than tab, line feed and carriage return,
/// plus U+FFFE and U+FFFF).
pub(crate) fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars().filter(|ch| is_xml_char(*ch)) {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Indented element writer over an in-memory buffer.
pub(crate) struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    pub(crate) fn new() -> Self {
        let mut out = String::from(XML_DECLARATION);
        out.push('\n');
        Self { out, depth: 0 }
    }

    pub(crate) fn open(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        self.push_attributes(attributes);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    pub(crate) fn close(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        let _ = writeln!(self.out, "</{name}>");
    }

    /// Writes `<name>text</name>` on one line.
    pub(crate) fn text_element(&mut self, name: &str, text: &str) {
        self.indent();
        let _ = writeln!(self.out, "<{name}>{}</{name}>", escape(text));
    }

    pub(crate) fn empty_element(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        self.push_attributes(attributes);
        self.out.push_str(" />\n");
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    fn push_attributes(&mut self, attributes: &[(&str, &str)]) {
        for (key, value) in attributes {
            let _ = write!(self.out, " {key}=\"{}\"", escape(value));
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{escape, XmlWriter};

    #[test]
    fn escape_replaces_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&apos;s&lt;/a&gt;"
        );
    }

    #[test]
    fn escape_drops_characters_xml_cannot_carry() {
        assert_eq!(escape("bell\u{8}x"), "bellx");
        assert_eq!(escape("esc\u{1b}[0m\u{0}"), "esc[0m");
        assert_eq!(escape("a\u{FFFE}b\u{FFFF}c"), "abc");
        assert_eq!(escape("tab\tline\ncr\r"), "tab\tline\ncr\r");
        assert_eq!(escape("caf\u{e9} \u{1F600}"), "caf\u{e9} \u{1F600}");
    }

    #[test]
    fn writer_nests_and_escapes() {
        let mut writer = XmlWriter::new();
        writer.open("root", &[("note", "a&b")]);
        writer.text_element("name", "x<y");
        writer.empty_element("leaf", &[]);
        writer.close("root");

        let xml = writer.finish();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<root note=\"a&amp;b\">\n"));
        assert!(xml.contains("  <name>x&lt;y</name>\n"));
        assert!(xml.contains("  <leaf />\n"));
        assert!(xml.ends_with("</root>\n"));
    }
}
