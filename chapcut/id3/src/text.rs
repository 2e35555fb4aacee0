/*!
    Text information frames (`TIT2`, `TLEN`, ...).

    Frame body layout:
      [0]    encoding byte
      [1..]  one or more strings separated by the encoding's terminator
*/

use core::fmt;

use crate::error::{Id3Error, Id3Result};
use crate::header::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// ISO-8859-1, single NUL terminator.
    Latin1,
    /// UTF-16 with byte order mark, double NUL terminator.
    Utf16,
    /// UTF-16 big-endian without BOM (v2.4 only).
    Utf16Be,
    /// UTF-8 (v2.4 only).
    Utf8,
}

impl TextEncoding {
    pub const fn from_u8(u: u8) -> Option<Self> {
        match u {
            0 => Some(Self::Latin1),
            1 => Some(Self::Utf16),
            2 => Some(Self::Utf16Be),
            3 => Some(Self::Utf8),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Latin1 => 0,
            Self::Utf16 => 1,
            Self::Utf16Be => 2,
            Self::Utf8 => 3,
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Latin1 => "ISO-8859-1",
            Self::Utf16 => "UTF-16",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf8 => "UTF-8",
        }
    }

    const fn is_wide(self) -> bool {
        matches!(self, Self::Utf16 | Self::Utf16Be)
    }

    /**
        Narrowest encoding able to represent `values` in the given tag version.
    */
    pub fn fitting<S: AsRef<str>>(values: &[S], version: Version) -> Self {
        let latin1 = values
            .iter()
            .all(|v| v.as_ref().chars().all(|c| u32::from(c) <= 0xff));
        match (latin1, version) {
            (true, _) => Self::Latin1,
            (false, Version::V23) => Self::Utf16,
            (false, Version::V24) => Self::Utf8,
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

/**
    Decoded text information frame.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
    pub encoding: TextEncoding,
    pub values: Vec<String>,
}

impl TextFrame {
    /**
        Build a single-value frame using the narrowest suitable encoding.
    */
    pub fn new(value: impl Into<String>, version: Version) -> Self {
        let values = vec![value.into()];
        Self {
            encoding: TextEncoding::fitting(&values, version),
            values,
        }
    }

    /**
        First value of the frame, if any.
    */
    pub fn first(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    pub fn parse(body: &[u8]) -> Id3Result<Self> {
        let Some((&enc, payload)) = body.split_first() else {
            return Ok(Self {
                encoding: TextEncoding::Latin1,
                values: Vec::new(),
            });
        };
        let encoding = TextEncoding::from_u8(enc).ok_or(Id3Error::InvalidEncoding(enc))?;
        Ok(Self {
            encoding,
            values: decode_values(encoding, payload),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.encoding.to_u8()];
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                push_terminator(&mut out, self.encoding);
            }
            encode_value(&mut out, self.encoding, value);
        }
        out
    }
}

fn push_terminator(out: &mut Vec<u8>, encoding: TextEncoding) {
    if encoding.is_wide() {
        out.extend_from_slice(&[0, 0]);
    } else {
        out.push(0);
    }
}

fn encode_value(out: &mut Vec<u8>, encoding: TextEncoding, value: &str) {
    match encoding {
        TextEncoding::Latin1 => {
            out.extend(
                value
                    .chars()
                    .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')),
            );
        }
        TextEncoding::Utf8 => out.extend_from_slice(value.as_bytes()),
        TextEncoding::Utf16 => {
            out.extend_from_slice(&[0xff, 0xfe]);
            for unit in value.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
        }
        TextEncoding::Utf16Be => {
            for unit in value.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
        }
    }
}

fn decode_values(encoding: TextEncoding, payload: &[u8]) -> Vec<String> {
    if payload.is_empty() {
        return Vec::new();
    }

    let segments = if encoding.is_wide() {
        split_wide(payload)
    } else {
        split_narrow(payload)
    };

    // UTF-16 strings after the first may omit their BOM
    let mut big_endian = true;
    segments
        .into_iter()
        .map(|seg| match encoding {
            TextEncoding::Latin1 => seg.iter().map(|&b| char::from(b)).collect(),
            TextEncoding::Utf8 => String::from_utf8_lossy(seg).into_owned(),
            TextEncoding::Utf16 => {
                let seg = match seg {
                    [0xff, 0xfe, rest @ ..] => {
                        big_endian = false;
                        rest
                    }
                    [0xfe, 0xff, rest @ ..] => {
                        big_endian = true;
                        rest
                    }
                    _ => seg,
                };
                decode_utf16(seg, big_endian)
            }
            TextEncoding::Utf16Be => decode_utf16(seg, true),
        })
        .collect()
}

fn split_narrow(payload: &[u8]) -> Vec<&[u8]> {
    let payload = payload.strip_suffix(&[0u8]).unwrap_or(payload);
    payload.split(|&b| b == 0).collect()
}

fn split_wide(payload: &[u8]) -> Vec<&[u8]> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i + 1 < payload.len() {
        if payload[i] == 0 && payload[i + 1] == 0 {
            segments.push(&payload[start..i]);
            start = i + 2;
        }
        i += 2;
    }
    if start < payload.len() {
        segments.push(&payload[start..]);
    }
    if segments.is_empty() {
        segments.push(&payload[..0]);
    }
    segments
}

fn decode_utf16(seg: &[u8], big_endian: bool) -> String {
    let units = seg.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_single_value() {
        let frame = TextFrame::parse(b"\x00Chapter 1\x00").unwrap();
        assert_eq!(frame.encoding, TextEncoding::Latin1);
        assert_eq!(frame.values, vec!["Chapter 1"]);
    }

    #[test]
    fn latin1_high_bytes() {
        let frame = TextFrame::parse(&[0x00, b'C', 0xe9]).unwrap();
        assert_eq!(frame.first(), Some("Cé"));
    }

    #[test]
    fn utf16_le_with_bom() {
        let body = [0x01, 0xff, 0xfe, b'A', 0x00, b'd', 0x00, 0x00, 0x00];
        let frame = TextFrame::parse(&body).unwrap();
        assert_eq!(frame.values, vec!["Ad"]);
    }

    #[test]
    fn utf16_multiple_values_share_bom() {
        let body = [0x01, 0xfe, 0xff, 0x00, b'A', 0x00, 0x00, 0x00, b'B'];
        let frame = TextFrame::parse(&body).unwrap();
        assert_eq!(frame.values, vec!["A", "B"]);
    }

    #[test]
    fn utf8_multiple_values() {
        let frame = TextFrame::parse("\x03Ad\u{00e9}\x00Outro".as_bytes()).unwrap();
        assert_eq!(frame.values, vec!["Adé", "Outro"]);
    }

    #[test]
    fn unknown_encoding_byte() {
        assert_eq!(TextFrame::parse(&[0x07, b'x']), Err(Id3Error::InvalidEncoding(7)));
    }

    #[test]
    fn empty_body_has_no_values() {
        let frame = TextFrame::parse(&[]).unwrap();
        assert!(frame.values.is_empty());
        assert_eq!(frame.first(), None);
    }

    #[test]
    fn fitting_encoding_per_version() {
        assert_eq!(TextFrame::new("plain", Version::V23).encoding, TextEncoding::Latin1);
        assert_eq!(TextFrame::new("章", Version::V23).encoding, TextEncoding::Utf16);
        assert_eq!(TextFrame::new("章", Version::V24).encoding, TextEncoding::Utf8);
    }

    #[test]
    fn utf16_encode_then_parse() {
        let frame = TextFrame {
            encoding: TextEncoding::Utf16,
            values: vec!["Werbung".into(), "章".into()],
        };
        assert_eq!(TextFrame::parse(&frame.to_bytes()).unwrap(), frame);
    }
}
