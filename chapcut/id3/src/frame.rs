use core::fmt;

use crate::chapter::{ChapterFrame, TocFrame};
use crate::error::{Id3Error, Id3Result};
use crate::header::Version;
use crate::reader::Reader;
use crate::text::TextFrame;
use crate::{syncsafe, unsync};

const FRAME_HEADER_LEN: usize = 10;

// v2.3 format flags
const V23_COMPRESSION: u16 = 0x0080;
const V23_ENCRYPTION: u16 = 0x0040;
const V23_GROUPING: u16 = 0x0020;

// v2.4 format flags
const V24_GROUPING: u16 = 0x0040;
const V24_COMPRESSION: u16 = 0x0008;
const V24_ENCRYPTION: u16 = 0x0004;
const V24_UNSYNCHRONISATION: u16 = 0x0002;
const V24_DATA_LENGTH: u16 = 0x0001;

/**
    Four-character frame identifier, e.g. `TIT2` or `CHAP`.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub [u8; 4]);

impl FrameId {
    pub const CHAP: Self = Self(*b"CHAP");
    pub const CTOC: Self = Self(*b"CTOC");
    pub const TIT2: Self = Self(*b"TIT2");
    pub const TLEN: Self = Self(*b"TLEN");
    pub const TXXX: Self = Self(*b"TXXX");

    /**
        Frame ids consist of uppercase ASCII letters and digits.
    */
    pub fn is_valid(&self) -> bool {
        self.0
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    }

    /**
        Text information frames: every `T***` id except `TXXX`.
    */
    pub fn is_text(&self) -> bool {
        self.0[0] == b'T' && *self != Self::TXXX
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameId({})", self.as_str())
    }
}

/**
    Decoded frame payload.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameBody {
    Text(TextFrame),
    Chapter(ChapterFrame),
    TableOfContents(TocFrame),
    /**
        Uninterpreted payload, written back verbatim. Frames whose flags
        mark them compressed, encrypted or grouped always land here.
    */
    Raw(Vec<u8>),
}

impl FrameBody {
    fn to_bytes(&self, version: Version) -> Id3Result<Vec<u8>> {
        match self {
            Self::Text(text) => Ok(text.to_bytes()),
            Self::Chapter(chap) => chap.to_bytes(version),
            Self::TableOfContents(toc) => toc.to_bytes(version),
            Self::Raw(raw) => Ok(raw.clone()),
        }
    }
}

/**
    A single ID3v2 frame.

    `flags` holds the raw two flag bytes. Flags describing transformations
    this crate has already undone (v2.4 unsynchronisation and data length
    indicator) are cleared while parsing.

    A parsed text frame remembers the bytes it was read from and writes
    them back unchanged as long as its body still holds the decoded value.
*/
#[derive(Debug, Clone)]
pub struct Frame {
    pub id: FrameId,
    pub flags: u16,
    pub body: FrameBody,
    source: Option<(TextFrame, Vec<u8>)>,
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.flags == other.flags && self.body == other.body
    }
}

impl Eq for Frame {}

impl Frame {
    pub fn new(id: FrameId, body: FrameBody) -> Self {
        Self {
            id,
            flags: 0,
            body,
            source: None,
        }
    }

    pub fn as_text(&self) -> Option<&TextFrame> {
        match &self.body {
            FrameBody::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_chapter(&self) -> Option<&ChapterFrame> {
        match &self.body {
            FrameBody::Chapter(chap) => Some(chap),
            _ => None,
        }
    }

    pub fn as_toc(&self) -> Option<&TocFrame> {
        match &self.body {
            FrameBody::TableOfContents(toc) => Some(toc),
            _ => None,
        }
    }

    pub(crate) fn write(&self, version: Version, out: &mut Vec<u8>) -> Id3Result<()> {
        let body = match (&self.body, &self.source) {
            (FrameBody::Text(text), Some((read, raw))) if text == read => raw.clone(),
            (body, _) => body.to_bytes(version)?,
        };
        let len = u32::try_from(body.len()).map_err(|_| Id3Error::TooLarge("frame"))?;
        let size = match version {
            Version::V23 => len.to_be_bytes(),
            Version::V24 => syncsafe::encode(len)?,
        };

        out.reserve(FRAME_HEADER_LEN + body.len());
        out.extend_from_slice(&self.id.0);
        out.extend_from_slice(&size);
        out.extend_from_slice(&self.flags.to_be_bytes());
        out.extend_from_slice(&body);
        Ok(())
    }
}

/**
    Parse a sequence of frames filling `data`.

    Returns the frames and the number of trailing padding bytes. Parsing
    stops at the first zero byte or invalid frame id; everything from that
    point on is counted as padding.
*/
pub(crate) fn parse_frames(
    data: &[u8],
    version: Version,
    tag_unsync: bool,
) -> Id3Result<(Vec<Frame>, usize)> {
    let mut reader = Reader::new(data);
    let mut frames = Vec::new();

    while reader.remaining() >= FRAME_HEADER_LEN {
        let id = FrameId(*reader.rest().first_chunk::<4>().unwrap_or(&[0; 4]));
        if !id.is_valid() {
            break;
        }
        reader.bytes(4, "frame id")?;

        let size_bytes = reader.array4("frame size")?;
        let size = match version {
            Version::V23 => u32::from_be_bytes(size_bytes),
            // some writers store plain integers in v2.4 tags
            Version::V24 => syncsafe::decode(&size_bytes)
                .unwrap_or_else(|_| u32::from_be_bytes(size_bytes)),
        };
        let flags = reader.u16_be("frame flags")?;
        let raw = reader
            .bytes(size as usize, "frame body")
            .map_err(|_| Id3Error::MalformedFrame {
                frame: id,
                reason: format!("size {size} exceeds remaining {} bytes", reader.remaining()),
            })?;

        frames.push(decode_frame(id, flags, raw, version, tag_unsync)?);
    }

    Ok((frames, reader.remaining()))
}

fn decode_frame(
    id: FrameId,
    mut flags: u16,
    raw: &[u8],
    version: Version,
    tag_unsync: bool,
) -> Id3Result<Frame> {
    let mut body = raw.to_vec();

    let opaque_mask = match version {
        Version::V23 => V23_COMPRESSION | V23_ENCRYPTION | V23_GROUPING,
        Version::V24 => {
            if flags & V24_UNSYNCHRONISATION != 0 || tag_unsync {
                body = unsync::decode(&body);
                flags &= !V24_UNSYNCHRONISATION;
            }
            if flags & V24_DATA_LENGTH != 0 && flags & (V24_COMPRESSION | V24_ENCRYPTION) == 0 {
                if body.len() < 4 {
                    return Err(Id3Error::MalformedFrame {
                        frame: id,
                        reason: "missing data length indicator".into(),
                    });
                }
                body.drain(..4);
                flags &= !V24_DATA_LENGTH;
            }
            V24_GROUPING | V24_COMPRESSION | V24_ENCRYPTION | V24_DATA_LENGTH
        }
    };

    if flags & opaque_mask != 0 {
        return Ok(Frame {
            id,
            flags,
            body: FrameBody::Raw(body),
            source: None,
        });
    }

    let mut source = None;

    let body = if id == FrameId::CHAP {
        FrameBody::Chapter(ChapterFrame::parse(&body, version).map_err(|e| wrap(id, e))?)
    } else if id == FrameId::CTOC {
        FrameBody::TableOfContents(TocFrame::parse(&body, version).map_err(|e| wrap(id, e))?)
    } else if id.is_text() {
        // a broken text frame is not worth failing the whole tag over
        match TextFrame::parse(&body) {
            Ok(text) => {
                source = Some((text.clone(), body));
                FrameBody::Text(text)
            }
            Err(_) => FrameBody::Raw(body),
        }
    } else {
        FrameBody::Raw(body)
    };

    Ok(Frame {
        id,
        flags,
        body,
        source,
    })
}

fn wrap(frame: FrameId, err: Id3Error) -> Id3Error {
    match err {
        Id3Error::MalformedFrame { .. } => err,
        other => Id3Error::MalformedFrame {
            frame,
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextEncoding;

    fn raw_frame(id: &[u8; 4], size: [u8; 4], flags: u16, body: &[u8]) -> Vec<u8> {
        let mut out = id.to_vec();
        out.extend_from_slice(&size);
        out.extend_from_slice(&flags.to_be_bytes());
        out.extend_from_slice(body);
        out
    }

    #[test]
    fn parses_text_frame_and_padding() {
        let mut data = raw_frame(b"TIT2", 6u32.to_be_bytes(), 0, b"\x00Intro");
        data.extend_from_slice(&[0; 20]);

        let (frames, padding) = parse_frames(&data, Version::V23, false).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id, FrameId::TIT2);
        assert_eq!(frames[0].as_text().unwrap().first(), Some("Intro"));
        assert_eq!(padding, 20);
    }

    #[test]
    fn v24_frame_unsync_and_data_length() {
        // DLI (4 bytes) + "\x00A\xff\x00" unsynchronised
        let body = [0, 0, 0, 3, 0x00, b'A', 0xff, 0x00];
        let data = raw_frame(
            b"TPE1",
            syncsafe::encode(body.len() as u32).unwrap(),
            V24_UNSYNCHRONISATION | V24_DATA_LENGTH,
            &body,
        );

        let (frames, _) = parse_frames(&data, Version::V24, false).unwrap();
        assert_eq!(frames[0].flags, 0);
        let text = frames[0].as_text().unwrap();
        assert_eq!(text.encoding, TextEncoding::Latin1);
        assert_eq!(text.values, vec!["A\u{ff}"]);
    }

    #[test]
    fn v24_accepts_non_syncsafe_size() {
        let body = vec![0u8; 0x80];
        let data = raw_frame(b"PRIV", 0x80u32.to_be_bytes(), 0, &body);
        let (frames, padding) = parse_frames(&data, Version::V24, false).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(padding, 0);
    }

    #[test]
    fn compressed_frame_stays_raw() {
        let data = raw_frame(b"TIT2", 5u32.to_be_bytes(), V23_COMPRESSION, b"\x01\x02\x03\x04\x05");
        let (frames, _) = parse_frames(&data, Version::V23, false).unwrap();
        assert_eq!(frames[0].flags, V23_COMPRESSION);
        assert_eq!(frames[0].body, FrameBody::Raw(vec![1, 2, 3, 4, 5]));
    }

    #[test]
    fn oversized_frame_is_malformed() {
        let data = raw_frame(b"TIT2", 100u32.to_be_bytes(), 0, b"\x00abc");
        let err = parse_frames(&data, Version::V23, false).unwrap_err();
        assert!(matches!(err, Id3Error::MalformedFrame { frame, .. } if frame == FrameId::TIT2));
    }

    #[test]
    fn invalid_id_ends_frame_list() {
        let mut data = raw_frame(b"TIT2", 2u32.to_be_bytes(), 0, b"\x00A");
        data.extend_from_slice(b"junk data here");
        let (frames, padding) = parse_frames(&data, Version::V23, false).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(padding, 14);
    }

    #[test]
    fn unchanged_text_is_written_verbatim() {
        // UTF-16 with a big-endian BOM, then invalid UTF-8
        let mut data = raw_frame(b"TPE1", 7u32.to_be_bytes(), 0, b"\x01\xfe\xff\x00A\x00B");
        data.extend(raw_frame(b"TALB", 3u32.to_be_bytes(), 0, b"\x03\xc3\x28"));

        let (frames, _) = parse_frames(&data, Version::V24, false).unwrap();
        assert_eq!(frames[0].as_text().unwrap().values, vec!["AB"]);

        let mut out = Vec::new();
        for frame in &frames {
            frame.write(Version::V24, &mut out).unwrap();
        }
        assert_eq!(&out[10..17], b"\x01\xfe\xff\x00A\x00B");
        assert_eq!(&out[27..], b"\x03\xc3\x28");
    }

    #[test]
    fn changed_text_is_encoded_again() {
        let data = raw_frame(b"TLEN", 5u32.to_be_bytes(), 0, b"\x01\xfe\xff\x001");
        let (mut frames, _) = parse_frames(&data, Version::V23, false).unwrap();
        frames[0].body = FrameBody::Text(TextFrame::new("2", Version::V23));

        let mut out = Vec::new();
        frames[0].write(Version::V23, &mut out).unwrap();
        assert_eq!(&out[10..], b"\x002");
    }

    #[test]
    fn writes_v24_sizes_syncsafe() {
        let frame = Frame::new(FrameId(*b"PRIV"), FrameBody::Raw(vec![0xaa; 200]));
        let mut out = Vec::new();
        frame.write(Version::V24, &mut out).unwrap();
        assert_eq!(&out[4..8], &[0, 0, 0x01, 0x48]);
        assert_eq!(out.len(), 210);
    }
}
