/*!
    VBR metadata frames.

    Encoders put a silent frame at the start of the stream that describes
    the stream instead of carrying audio:

    - Xing / Info (Info is the CBR spelling), located right after the side
      information:
        "Xing"|"Info"  magic
        flags          u32 BE: 0x1 frames, 0x2 bytes, 0x4 TOC, 0x8 quality
        frames         u32 BE (optional)
        bytes          u32 BE (optional)
        toc            100 bytes (optional)
        quality        u32 BE (optional)
      optionally followed by a 36-byte LAME extension.

    - VBRI (Fraunhofer), always 32 bytes after the header.

    LAME extension offsets used here (relative to its start):
      [0..9]    encoder version string
      [21..24]  encoder delay (12 bits) and end padding (12 bits)
      [28..32]  music length, u32 BE
      [32..34]  music CRC-16
      [34..36]  info tag CRC-16 over every frame byte before this field
*/

use core::fmt;

use crate::crc::{Crc16, crc16};
use crate::header::{FrameHeader, Layer};
use crate::stream::AudioFrame;

const XING_FRAMES: u32 = 0x1;
const XING_BYTES: u32 = 0x2;
const XING_TOC: u32 = 0x4;
const XING_QUALITY: u32 = 0x8;

const TOC_LEN: usize = 100;
const LAME_LEN: usize = 36;
const LAME_DELAY: usize = 21;
const LAME_MUSIC_LENGTH: usize = 28;
const LAME_MUSIC_CRC: usize = 32;
const LAME_TAG_CRC: usize = 34;

const VBRI_OFFSET: usize = 4 + 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoKind {
    Xing,
    Info,
    Vbri,
}

impl fmt::Display for InfoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xing => "Xing",
            Self::Info => "Info",
            Self::Vbri => "VBRI",
        })
    }
}

/**
    LAME extension of a Xing / Info frame.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LameTag {
    /// Offset of the extension within the frame.
    pub offset: usize,
    pub encoder: String,
    /// Encoder delay in samples at the start of the stream.
    pub delay: u16,
    /// Padding in samples at the end of the stream.
    pub padding: u16,
}

/**
    What a splice changed about the edges of the stream.

    Encoder delay and padding describe the first and last frame of the
    original stream; they are reset once that frame is no longer at the
    corresponding edge.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoEdits {
    pub keep_delay: bool,
    pub keep_padding: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoFrame {
    pub kind: InfoKind,
    /// Offset of the frame within the scanned data.
    pub offset: usize,
    /// The complete frame, header included.
    pub bytes: Vec<u8>,
    pub frame_count: Option<u32>,
    pub byte_count: Option<u32>,
    pub lame: Option<LameTag>,
    frames_at: Option<usize>,
    bytes_at: Option<usize>,
    toc_at: Option<usize>,
}

impl InfoFrame {
    /**
        Recognize a metadata frame. `frame` is the complete first frame of
        the stream.
    */
    pub(crate) fn detect(header: &FrameHeader, frame: &[u8], offset: usize) -> Option<Self> {
        if header.layer != Layer::III {
            return None;
        }
        Self::detect_xing(header, frame, offset).or_else(|| Self::detect_vbri(frame, offset))
    }

    fn detect_xing(header: &FrameHeader, frame: &[u8], offset: usize) -> Option<Self> {
        let at = header.data_offset();
        let kind = match frame.get(at..at + 4)? {
            b"Xing" => InfoKind::Xing,
            b"Info" => InfoKind::Info,
            _ => return None,
        };

        let flags = read_u32(frame, at + 4)?;
        let mut cursor = at + 8;
        let mut field = |flag: u32, len: usize| -> Option<Option<usize>> {
            if flags & flag == 0 {
                return Some(None);
            }
            let pos = cursor;
            cursor += len;
            (cursor <= frame.len()).then_some(Some(pos))
        };

        let frames_at = field(XING_FRAMES, 4)?;
        let bytes_at = field(XING_BYTES, 4)?;
        let toc_at = field(XING_TOC, TOC_LEN)?;
        field(XING_QUALITY, 4)?;

        let lame = LameTag::parse(frame, cursor);

        Some(Self {
            kind,
            offset,
            bytes: frame.to_vec(),
            frame_count: frames_at.and_then(|p| read_u32(frame, p)),
            byte_count: bytes_at.and_then(|p| read_u32(frame, p)),
            lame,
            frames_at,
            bytes_at,
            toc_at,
        })
    }

    fn detect_vbri(frame: &[u8], offset: usize) -> Option<Self> {
        if frame.get(VBRI_OFFSET..VBRI_OFFSET + 4)? != b"VBRI" {
            return None;
        }
        Some(Self {
            kind: InfoKind::Vbri,
            offset,
            bytes: frame.to_vec(),
            byte_count: read_u32(frame, VBRI_OFFSET + 10),
            frame_count: read_u32(frame, VBRI_OFFSET + 14),
            lame: None,
            frames_at: None,
            bytes_at: None,
            toc_at: None,
        })
    }

    /**
        Rebuild this frame to describe a stream made of `frames`.

        `audio` is the data the frames were scanned from. Returns `None` for
        VBRI frames, whose seek table cannot be rebuilt; such a frame should
        be dropped from the output.
    */
    pub fn rewrite(&self, frames: &[&AudioFrame], audio: &[u8], edits: InfoEdits) -> Option<Vec<u8>> {
        if self.kind == InfoKind::Vbri {
            return None;
        }

        let mut out = self.bytes.clone();
        let audio_len: u64 = frames.iter().map(|f| f.len as u64).sum();
        let total_len = out.len() as u64 + audio_len;
        let total_len_u32 = u32::try_from(total_len).unwrap_or(u32::MAX);

        if let Some(at) = self.frames_at {
            let count = u32::try_from(frames.len()).unwrap_or(u32::MAX);
            write_u32(&mut out, at, count);
        }
        if let Some(at) = self.bytes_at {
            write_u32(&mut out, at, total_len_u32);
        }
        if let Some(at) = self.toc_at {
            let toc = seek_table(frames, out.len() as u64, total_len);
            out[at..at + TOC_LEN].copy_from_slice(&toc);
        }

        if let Some(lame) = &self.lame {
            let base = lame.offset;

            let delay = if edits.keep_delay { lame.delay } else { 0 };
            let padding = if edits.keep_padding { lame.padding } else { 0 };
            out[base + LAME_DELAY] = (delay >> 4) as u8;
            out[base + LAME_DELAY + 1] = (((delay & 0xf) << 4) | (padding >> 8)) as u8;
            out[base + LAME_DELAY + 2] = (padding & 0xff) as u8;

            write_u32(&mut out, base + LAME_MUSIC_LENGTH, total_len_u32);

            let mut music = Crc16::new();
            for frame in frames {
                music.update(&audio[frame.offset..frame.offset + frame.len]);
            }
            out[base + LAME_MUSIC_CRC..base + LAME_MUSIC_CRC + 2]
                .copy_from_slice(&music.finish().to_be_bytes());

            let tag_crc = crc16(&out[..base + LAME_TAG_CRC]);
            out[base + LAME_TAG_CRC..base + LAME_TAG_CRC + 2].copy_from_slice(&tag_crc.to_be_bytes());
        }

        Some(out)
    }
}

impl LameTag {
    fn parse(frame: &[u8], at: usize) -> Option<Self> {
        let tag = frame.get(at..at + LAME_LEN)?;
        let encoder = &tag[..9];
        if !encoder[..4].iter().all(u8::is_ascii_alphanumeric) {
            return None;
        }

        let d = &tag[LAME_DELAY..LAME_DELAY + 3];
        Some(Self {
            offset: at,
            encoder: String::from_utf8_lossy(encoder)
                .trim_end_matches(['\0', ' '])
                .to_owned(),
            delay: (u16::from(d[0]) << 4) | (u16::from(d[1]) >> 4),
            padding: (u16::from(d[1] & 0xf) << 8) | u16::from(d[2]),
        })
    }
}

/**
    Xing seek table: entry `i` is the byte position at `i` percent of the
    duration, scaled to 0..=255 of the total stream size.
*/
fn seek_table(frames: &[&AudioFrame], lead_in: u64, total_len: u64) -> [u8; TOC_LEN] {
    let mut toc = [0u8; TOC_LEN];
    let total_samples: u64 = frames.iter().map(|f| u64::from(f.samples)).sum();
    if total_samples == 0 || total_len == 0 {
        return toc;
    }

    let mut idx = 0;
    let mut samples = 0u64;
    let mut pos = lead_in;
    for (i, entry) in toc.iter_mut().enumerate() {
        let target = total_samples * i as u64 / TOC_LEN as u64;
        while idx < frames.len() && samples + u64::from(frames[idx].samples) <= target {
            samples += u64::from(frames[idx].samples);
            pos += frames[idx].len as u64;
            idx += 1;
        }
        *entry = (pos * 256 / total_len).min(255) as u8;
    }
    toc
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let b = data.get(at..at + 4)?;
    Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

fn write_u32(data: &mut [u8], at: usize, value: u32) {
    data[at..at + 4].copy_from_slice(&value.to_be_bytes());
}
