/*!
    ID3v2 Chapter Frame Addendum: `CHAP` and `CTOC` frames.

    CHAP body:
      element_id   NUL-terminated ISO-8859-1
      start_time   u32 BE, milliseconds
      end_time     u32 BE, milliseconds
      start_offset u32 BE, byte offset of the first audio frame (0xFFFFFFFF = unused)
      end_offset   u32 BE, byte offset past the last audio frame (0xFFFFFFFF = unused)
      sub-frames   optional embedded frames (usually TIT2)

    CTOC body:
      element_id   NUL-terminated ISO-8859-1
      flags        u8: 0x02 top-level, 0x01 ordered
      entry_count  u8
      child ids    entry_count NUL-terminated ISO-8859-1 strings
      sub-frames   optional embedded frames
*/

use crate::error::{Id3Error, Id3Result};
use crate::frame::{Frame, FrameId, parse_frames};
use crate::header::Version;
use crate::reader::{Reader, write_latin1_cstr};

/// Byte offset value meaning "use the times instead".
pub const OFFSET_UNUSED: u32 = u32::MAX;

const TOC_TOP_LEVEL: u8 = 0x02;
const TOC_ORDERED: u8 = 0x01;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterFrame {
    pub element_id: String,
    pub start_time: u32,
    pub end_time: u32,
    pub start_offset: u32,
    pub end_offset: u32,
    pub sub_frames: Vec<Frame>,
}

impl ChapterFrame {
    /**
        Title from the first embedded `TIT2` frame.
    */
    pub fn title(&self) -> Option<&str> {
        self.sub_frames
            .iter()
            .filter(|f| f.id == FrameId::TIT2)
            .find_map(|f| f.as_text())
            .and_then(|t| t.first())
    }

    pub(crate) fn parse(body: &[u8], version: Version) -> Id3Result<Self> {
        let mut r = Reader::new(body);
        let element_id = r.latin1_cstr("chapter element id")?;
        let start_time = r.u32_be("chapter start time")?;
        let end_time = r.u32_be("chapter end time")?;
        let start_offset = r.u32_be("chapter start offset")?;
        let end_offset = r.u32_be("chapter end offset")?;
        let (sub_frames, _) = parse_frames(r.rest(), version, false)?;

        Ok(Self {
            element_id,
            start_time,
            end_time,
            start_offset,
            end_offset,
            sub_frames,
        })
    }

    pub(crate) fn to_bytes(&self, version: Version) -> Id3Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.element_id.len() + 17);
        write_latin1_cstr(&mut out, &self.element_id);
        out.extend_from_slice(&self.start_time.to_be_bytes());
        out.extend_from_slice(&self.end_time.to_be_bytes());
        out.extend_from_slice(&self.start_offset.to_be_bytes());
        out.extend_from_slice(&self.end_offset.to_be_bytes());
        for frame in &self.sub_frames {
            frame.write(version, &mut out)?;
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocFrame {
    pub element_id: String,
    pub top_level: bool,
    pub ordered: bool,
    pub child_ids: Vec<String>,
    pub sub_frames: Vec<Frame>,
}

impl TocFrame {
    pub(crate) fn parse(body: &[u8], version: Version) -> Id3Result<Self> {
        let mut r = Reader::new(body);
        let element_id = r.latin1_cstr("toc element id")?;
        let flags = r.u8("toc flags")?;
        let count = r.u8("toc entry count")?;
        let child_ids = (0..count)
            .map(|_| r.latin1_cstr("toc child element id"))
            .collect::<Id3Result<Vec<_>>>()?;
        let (sub_frames, _) = parse_frames(r.rest(), version, false)?;

        Ok(Self {
            element_id,
            top_level: flags & TOC_TOP_LEVEL != 0,
            ordered: flags & TOC_ORDERED != 0,
            child_ids,
            sub_frames,
        })
    }

    pub(crate) fn to_bytes(&self, version: Version) -> Id3Result<Vec<u8>> {
        let count =
            u8::try_from(self.child_ids.len()).map_err(|_| Id3Error::TooLarge("CTOC entry count"))?;

        let mut flags = 0;
        if self.top_level {
            flags |= TOC_TOP_LEVEL;
        }
        if self.ordered {
            flags |= TOC_ORDERED;
        }

        let mut out = Vec::new();
        write_latin1_cstr(&mut out, &self.element_id);
        out.push(flags);
        out.push(count);
        for child in &self.child_ids {
            write_latin1_cstr(&mut out, child);
        }
        for frame in &self.sub_frames {
            frame.write(version, &mut out)?;
        }
        Ok(out)
    }
}
