use std::borrow::Cow;

use crate::chapter::{ChapterFrame, TocFrame};
use crate::error::{Id3Error, Id3Result};
use crate::frame::{Frame, FrameBody, FrameId, parse_frames};
use crate::header::{HEADER_LEN, TagFlags, TagHeader, Version};
use crate::text::TextFrame;
use crate::{syncsafe, unsync};

/**
    A parsed ID3v2 tag.

    Frames keep their original order. `padding` is the number of zero bytes
    written after the last frame.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub version: Version,
    pub revision: u8,
    pub frames: Vec<Frame>,
    pub padding: usize,
}

impl Tag {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            revision: 0,
            frames: Vec::new(),
            padding: 0,
        }
    }

    /**
        Parse the ID3v2 tag at the start of `data`.

        Returns `Ok(None)` when there is no tag, otherwise the tag together
        with the number of bytes it occupies (header, body and footer).
    */
    pub fn parse(data: &[u8]) -> Id3Result<Option<(Self, usize)>> {
        let Some(header) = TagHeader::parse(data)? else {
            return Ok(None);
        };

        let body_end = HEADER_LEN + header.size as usize;
        if data.len() < body_end {
            return Err(Id3Error::Truncated("tag body"));
        }

        let mut body = Cow::Borrowed(&data[HEADER_LEN..body_end]);
        if header.version == Version::V23 && header.flags.unsynchronisation() {
            body = Cow::Owned(unsync::decode(&body));
        }

        let frames_start = if header.flags.extended_header() {
            extended_header_len(&body, header.version)?
        } else {
            0
        };

        let tag_unsync = header.version == Version::V24 && header.flags.unsynchronisation();
        let (frames, padding) = parse_frames(&body[frames_start..], header.version, tag_unsync)?;

        let tag = Self {
            version: header.version,
            revision: header.revision,
            frames,
            padding,
        };
        Ok(Some((tag, header.total_len())))
    }

    /**
        Serialize the tag in its own version.

        The output never carries an extended header, unsynchronisation or a
        footer.
    */
    pub fn to_bytes(&self) -> Id3Result<Vec<u8>> {
        let mut body = Vec::new();
        for frame in &self.frames {
            frame.write(self.version, &mut body)?;
        }
        body.resize(body.len() + self.padding, 0);

        let size = u32::try_from(body.len())
            .ok()
            .filter(|&s| s <= syncsafe::MAX)
            .ok_or(Id3Error::TooLarge("tag"))?;
        let header = TagHeader {
            version: self.version,
            revision: self.revision,
            flags: TagFlags::default(),
            size,
        };

        let mut out = Vec::with_capacity(HEADER_LEN + body.len());
        out.extend_from_slice(&header.to_bytes()?);
        out.extend_from_slice(&body);
        Ok(out)
    }

    pub fn chapters(&self) -> impl Iterator<Item = &ChapterFrame> {
        self.frames.iter().filter_map(Frame::as_chapter)
    }

    pub fn chapters_mut(&mut self) -> impl Iterator<Item = &mut ChapterFrame> {
        self.frames.iter_mut().filter_map(|f| match &mut f.body {
            FrameBody::Chapter(chap) => Some(chap),
            _ => None,
        })
    }

    pub fn tables_of_contents(&self) -> impl Iterator<Item = &TocFrame> {
        self.frames.iter().filter_map(Frame::as_toc)
    }

    pub fn tables_of_contents_mut(&mut self) -> impl Iterator<Item = &mut TocFrame> {
        self.frames.iter_mut().filter_map(|f| match &mut f.body {
            FrameBody::TableOfContents(toc) => Some(toc),
            _ => None,
        })
    }

    /**
        First value of the first text frame with the given id.
    */
    pub fn text(&self, id: FrameId) -> Option<&str> {
        self.frames
            .iter()
            .filter(|f| f.id == id)
            .find_map(Frame::as_text)
            .and_then(TextFrame::first)
    }

    /**
        Replace the value of a text frame, appending the frame if missing.
    */
    pub fn set_text(&mut self, id: FrameId, value: impl Into<String>) {
        let text = TextFrame::new(value, self.version);
        match self.frames.iter_mut().find(|f| f.id == id) {
            Some(frame) => {
                frame.flags = 0;
                frame.body = FrameBody::Text(text);
            }
            None => self.frames.push(Frame::new(id, FrameBody::Text(text))),
        }
    }

    pub fn retain(&mut self, f: impl FnMut(&Frame) -> bool) {
        self.frames.retain(f);
    }
}

fn extended_header_len(body: &[u8], version: Version) -> Id3Result<usize> {
    let Some(size) = body.first_chunk::<4>() else {
        return Err(Id3Error::Truncated("extended header"));
    };
    let len = match version {
        // v2.3 size excludes the size field itself
        Version::V23 => u32::from_be_bytes(*size) as usize + 4,
        Version::V24 => syncsafe::decode(size)? as usize,
    };
    if len > body.len() {
        return Err(Id3Error::Truncated("extended header"));
    }
    Ok(len)
}
