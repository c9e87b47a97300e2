#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

//! A line-oriented INI parser.
//!
//! Every line is one of: a `[section]` header, a `key=value` row, or something that gets
//! ignored. Rows may be commented out with a leading `;` or `#` and are still kept. Repeating
//! `key[]=value` inside one section collects the values into an array row.
//!
//! ```
//! use iniparser::Parser;
//!
//! let ini = Parser::parse_str("[db]\nhost=localhost\nport=5432\n");
//!
//! assert_eq!(ini.get_value("db", "host").get(), "localhost");
//! assert_eq!(ini.get_value("db", "port").get_int(), 5432);
//! ```

mod error;
mod parser;
mod section;
mod util;
mod value;

use std::char;

pub use error::ParseError;
pub use parser::Parser;
pub use section::{Row, RowMut, Section};
pub use value::Value;

/// Rows that appear before the first header are collected under this name.
pub const DEFAULT_SECTION: &str = "__default__";

/// Byte Order Mark (BOM) is used to signal the endianness of an encoding. The order `0xFF 0xFE`
/// strongly suggests that the encoding is using little-endian byte order.
///
/// <https://en.wikipedia.org/wiki/Byte_order_mark>
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];

const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Files saved by Windows tools often carry a BOM; everything else is read as UTF-8.
fn decode_data(data: &[u8]) -> String {
    if let Some(rest) = data.strip_prefix(BOM_UTF16_LE) {
        let chunks = rest.chunks_exact(2);
        // A dangling odd byte can't be a full code unit.
        let dangling = !chunks.remainder().is_empty();
        let utf16 = chunks
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .collect::<Vec<u16>>();

        let mut text = char::decode_utf16(utf16)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect::<String>();
        if dangling {
            text.push(char::REPLACEMENT_CHARACTER);
        }
        text
    } else {
        let data = data.strip_prefix(BOM_UTF8).unwrap_or(data);
        String::from_utf8_lossy(data).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_utf8() {
        assert_eq!(decode_data(b"[s]\nk=v\n"), "[s]\nk=v\n");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let ini = Parser::from_reader(&mut &b"\xEF\xBB\xBF[s]\nk=v\n"[..])
            .expect("reading from a slice can't fail");

        assert!(ini.has_section("s"));
    }

    #[test]
    fn utf16_le_with_bom() {
        let mut buffer = BOM_UTF16_LE.to_vec();
        for unit in "[s]\r\nk=v\r\n".encode_utf16() {
            buffer.extend_from_slice(&unit.to_le_bytes());
        }

        let ini = Parser::from_reader(&mut buffer.as_slice())
            .expect("reading from a slice can't fail");

        assert_eq!(ini.get_value("s", "k"), "v");
    }

    #[test]
    fn utf16_le_odd_trailing_byte_is_replaced() {
        let mut buffer = BOM_UTF16_LE.to_vec();
        for unit in "[s]\nk=v".encode_utf16() {
            buffer.extend_from_slice(&unit.to_le_bytes());
        }
        buffer.push(0x41);

        assert_eq!(decode_data(&buffer), "[s]\nk=v\u{FFFD}");

        let ini = Parser::from_reader(&mut buffer.as_slice())
            .expect("reading from a slice can't fail");
        assert_eq!(ini.get_value("s", "k"), "v\u{FFFD}");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let text = decode_data(b"k=\xFF\n");
        assert_eq!(text, "k=\u{FFFD}\n");
    }
}
