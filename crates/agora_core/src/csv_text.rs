//! Line-oriented CSV text helpers shared by imports, exports and the
//! language merge tool.
//!
//! # Invariants
//! - Decoding never fails; invalid sequences become U+FFFD.
//! - `\n`, `\r\n` and a lone `\r` all terminate a line. A trailing
//!   terminator does not produce an extra empty line.
//! - Language lines split on the first comma only; member lines split on
//!   every comma.

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Decodes uploaded bytes as text, honouring a leading byte-order mark.
pub fn decode_upload(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    String::from_utf8_lossy(bytes).into_owned()
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes
        .chunks(2)
        .map(|pair| match pair {
            [first, second] => to_unit([*first, *second]),
            // Odd trailing byte.
            _ => 0xFFFD,
        });
    char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Splits text into lines the way a line reader would.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits at the first comma; `None` when the line has no comma.
pub fn split_key_value(line: &str) -> Option<(&str, &str)> {
    line.split_once(',')
}

/// Key/value view of a language line.
///
/// An empty line yields `("", "")` and a line without a comma yields the
/// whole line as key with an empty value.
pub fn key_value(line: &str) -> (&str, &str) {
    split_key_value(line).unwrap_or((line, ""))
}

/// Splits a member line on every comma.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

/// Rebuilds a language file from `source` keys, preferring values already
/// present in `target`.
///
/// Output keeps the source key order; the first target line wins when a
/// key repeats there.
pub fn merge_language_lines(source: &[String], target: &[String]) -> Vec<String> {
    source
        .iter()
        .map(|line| {
            let (key, source_value) = key_value(line);
            let value = target
                .iter()
                .map(|target_line| key_value(target_line))
                .find(|(target_key, _)| *target_key == key)
                .map(|(_, target_value)| target_value)
                .unwrap_or(source_value);
            format!("{key},{value}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_upload, key_value, merge_language_lines, split_fields, split_lines};

    #[test]
    fn key_value_splits_on_first_comma_only() {
        assert_eq!(key_value("a,b,c"), ("a", "b,c"));
        assert_eq!(key_value("Greeting,"), ("Greeting", ""));
    }

    #[test]
    fn key_value_without_comma_keeps_whole_line_as_key() {
        assert_eq!(key_value("justakey"), ("justakey", ""));
        assert_eq!(key_value(""), ("", ""));
    }

    #[test]
    fn split_lines_accepts_mixed_terminators() {
        assert_eq!(
            split_lines("one\r\ntwo\nthree\rfour\n"),
            vec!["one", "two", "three", "four"]
        );
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn decode_strips_utf8_bom_and_reads_utf16() {
        assert_eq!(decode_upload(b"\xEF\xBB\xBFkey,value"), "key,value");
        assert_eq!(decode_upload(&[0xFF, 0xFE, b'h', 0, b'i', 0]), "hi");
        assert_eq!(decode_upload(&[0xFE, 0xFF, 0, b'h', 0, b'i']), "hi");
        assert_eq!(decode_upload(b"ok\xFF"), "ok\u{FFFD}");
    }

    #[test]
    fn split_fields_keeps_empty_columns() {
        assert_eq!(split_fields("ada,,x"), vec!["ada", "", "x"]);
    }

    #[test]
    fn merge_prefers_target_values_in_source_order() {
        let source = vec![
            "Title,Title".to_string(),
            "Body,Body text".to_string(),
            "Footer,Footer".to_string(),
        ];
        let target = vec!["Body,Corps".to_string(), "Title,Titre".to_string()];

        assert_eq!(
            merge_language_lines(&source, &target),
            vec!["Title,Titre", "Body,Corps", "Footer,Footer"]
        );
    }
}
