//! Character set detection for GEDCOM files.
//!
//! A byte order mark wins. Otherwise the `1 CHAR` line of the header names
//! the encoding. Files without a usable declaration are read as UTF-8 when
//! they are valid UTF-8 and as Windows-1252 when they are not.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use tracing::{debug, warn};

/// Decodes raw file bytes into text. Undecodable sequences become U+FFFD.
pub fn decode(bytes: &[u8], label: &str) -> String {
    let encoding = detect(bytes);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            "{} is not valid {}; unreadable characters were replaced",
            label,
            used.name()
        );
    }
    debug!("Decoded {} as {}", label, used.name());
    text.into_owned()
}

fn detect(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    // UTF-16 without a BOM still starts with "0 HEAD".
    match bytes {
        [b'0', 0, ..] => return UTF_16LE,
        [0, b'0', ..] => return UTF_16BE,
        _ => {}
    }

    match declared_charset(bytes) {
        Some(name) => from_declaration(&name).unwrap_or_else(|| {
            warn!("Unsupported GEDCOM character set {}; reading as ASCII", name);
            UTF_8
        }),
        None if std::str::from_utf8(bytes).is_ok() => UTF_8,
        None => WINDOWS_1252,
    }
}

/// Value of the `1 CHAR` line inside the level-0 HEAD record.
fn declared_charset(bytes: &[u8]) -> Option<String> {
    let mut in_header = false;
    for line in bytes.split(|&b| b == b'\n' || b == b'\r') {
        let line = String::from_utf8_lossy(line);
        let mut parts = line.split_whitespace();
        let (Some(level), Some(tag)) = (parts.next(), parts.next()) else {
            continue;
        };
        match (level, tag) {
            ("0", "HEAD") => in_header = true,
            ("0", _) if in_header => return None,
            ("1", "CHAR") if in_header => {
                return parts.next().map(|v| v.to_ascii_uppercase());
            }
            _ => {}
        }
    }
    None
}

fn from_declaration(name: &str) -> Option<&'static Encoding> {
    match name {
        "UTF-8" | "UTF8" | "ASCII" => Some(UTF_8),
        "ANSI" | "IBMPC" | "WINDOWS" => Some(WINDOWS_1252),
        "UNICODE" | "UTF-16" => Some(UTF_16LE),
        // ANSEL has no decoder here; its ASCII range reads the same as UTF-8.
        "ANSEL" => None,
        other => Encoding::for_label(other.as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_without_declaration() {
        let text = decode("0 HEAD\n1 NAME Zoë\n".as_bytes(), "mem");
        assert!(text.contains("Zoë"));
    }

    #[test]
    fn test_ansi_declaration() {
        let bytes = b"0 HEAD\n1 CHAR ANSI\n0 @I1@ INDI\n1 NAME Jos\xe9 /Garc\xeda/\n";
        let text = decode(bytes, "mem");
        assert!(text.contains("José /García/"));
    }

    #[test]
    fn test_latin1_label() {
        let bytes = b"0 HEAD\n1 CHAR ISO-8859-1\n0 @I1@ INDI\n1 NAME Ren\xe9e\n";
        assert!(decode(bytes, "mem").contains("Renée"));
    }

    #[test]
    fn test_undeclared_non_utf8_falls_back() {
        let bytes = b"0 @I1@ INDI\n1 NAME Fran\xe7ois\n";
        assert!(decode(bytes, "mem").contains("François"));
    }

    #[test]
    fn test_utf16_with_bom() {
        let mut bytes = vec![0xff, 0xfe];
        for unit in "0 HEAD\n1 NAME Åsa\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode(&bytes, "mem"), "0 HEAD\n1 NAME Åsa\n");
    }

    #[test]
    fn test_ansel_keeps_ascii() {
        let bytes = b"0 HEAD\n1 CHAR ANSEL\n0 @I1@ INDI\n1 NAME Ann /Lee/\n";
        let text = decode(bytes, "mem");
        assert!(text.contains("1 NAME Ann /Lee/"));
    }

    #[test]
    fn test_char_outside_header_is_ignored() {
        let bytes = b"0 HEAD\n0 @I1@ INDI\n1 CHAR ANSI\n";
        assert!(declared_charset(bytes).is_none());
    }
}
