#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chapcut_core::id3::{
    ChapterFrame, Frame, FrameBody, FrameId, OFFSET_UNUSED, Tag, TextFrame, TocFrame, Version,
};

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, stereo, no CRC, no padding.
pub const HEADER: [u8; 4] = [0xff, 0xfb, 0x90, 0x00];
pub const FRAME_LEN: usize = 417;
pub const SAMPLES: u64 = 1152;

pub struct Fixture {
    pub version: Version,
    pub chapters: Vec<(&'static str, u32, u32, &'static str)>,
    pub frames: usize,
    pub xing: bool,
    pub id3v1: bool,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            version: Version::V23,
            chapters: vec![
                ("ch0", 0, 1_000, "Intro"),
                ("ch1", 1_000, 2_000, "Sponsored Message"),
                ("ch2", 2_000, 2_700, "Outro"),
            ],
            frames: 100,
            xing: false,
            id3v1: false,
        }
    }
}

impl Fixture {
    pub fn tag(&self) -> Tag {
        let mut tag = Tag::new(self.version);
        tag.set_text(FrameId::TIT2, "Audiobook");
        if !self.chapters.is_empty() {
            tag.frames.push(Frame::new(
                FrameId::CTOC,
                FrameBody::TableOfContents(TocFrame {
                    element_id: "toc".into(),
                    top_level: true,
                    ordered: true,
                    child_ids: self.chapters.iter().map(|c| c.0.to_owned()).collect(),
                    sub_frames: Vec::new(),
                }),
            ));
        }
        for &(id, start, end, title) in &self.chapters {
            tag.frames.push(Frame::new(
                FrameId::CHAP,
                FrameBody::Chapter(ChapterFrame {
                    element_id: id.into(),
                    start_time: start,
                    end_time: end,
                    start_offset: OFFSET_UNUSED,
                    end_offset: OFFSET_UNUSED,
                    sub_frames: vec![Frame::new(
                        FrameId::TIT2,
                        FrameBody::Text(TextFrame::new(title, self.version)),
                    )],
                }),
            ));
        }
        tag.set_text(FrameId::TLEN, "2612");
        tag.padding = 256;
        tag
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = self.tag().to_bytes().expect("serialize tag");
        if self.xing {
            data.extend_from_slice(&xing_frame(self.frames));
        }
        for i in 0..self.frames {
            let start = data.len();
            data.extend_from_slice(&HEADER);
            // payload marks the frame index; never 0xff
            data.resize(start + FRAME_LEN, (i % 200) as u8);
            data[start + 4] = 0;
            data[start + 5] = 0;
        }
        if self.id3v1 {
            let mut v1 = vec![0u8; 128];
            v1[..3].copy_from_slice(b"TAG");
            v1[3..12].copy_from_slice(b"Audiobook");
            data.extend_from_slice(&v1);
        }
        data
    }

    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, self.build()).expect("write fixture");
        path
    }
}

/// Xing frame with every optional field and a LAME extension.
pub fn xing_frame(frames: usize) -> Vec<u8> {
    let mut frame = vec![0u8; FRAME_LEN];
    frame[..4].copy_from_slice(&HEADER);
    let at = 36;
    frame[at..at + 4].copy_from_slice(b"Xing");
    frame[at + 4..at + 8].copy_from_slice(&0xfu32.to_be_bytes());
    frame[at + 8..at + 12].copy_from_slice(&(frames as u32).to_be_bytes());
    frame[at + 12..at + 16].copy_from_slice(&(((frames + 1) * FRAME_LEN) as u32).to_be_bytes());
    let lame = at + 120;
    frame[lame..lame + 9].copy_from_slice(b"LAME3.100");
    frame[lame + 21..lame + 24].copy_from_slice(&[0x24, 0x03, 0xe8]);
    frame
}
