use core::fmt;

use chapcut_id3::{ChapterFrame, Tag};

/**
    A chapter as seen by the removal pipeline.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chapter {
    pub element_id: String,
    /// Title from the chapter's `TIT2` sub-frame, empty if it has none.
    pub title: String,
    pub start_ms: u32,
    pub end_ms: u32,
}

impl Chapter {
    pub fn from_frame(frame: &ChapterFrame) -> Self {
        Self {
            element_id: frame.element_id.clone(),
            title: frame.title().unwrap_or_default().to_owned(),
            start_ms: frame.start_time,
            end_ms: frame.end_time,
        }
    }

    pub fn duration_ms(&self) -> u32 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} - {}] '{}'",
            self.element_id,
            format_ms(u64::from(self.start_ms)),
            format_ms(u64::from(self.end_ms)),
            self.title
        )
    }
}

/**
    All chapters of a tag, ordered by start time.
*/
pub fn chapters(tag: &Tag) -> Vec<Chapter> {
    let mut chapters: Vec<_> = tag.chapters().map(Chapter::from_frame).collect();
    chapters.sort_by_key(|c| c.start_ms);
    chapters
}

/**
    Format milliseconds as `H:MM:SS.mmm`.
*/
pub fn format_ms(ms: u64) -> String {
    let (secs, millis) = (ms / 1000, ms % 1000);
    let (mins, secs) = (secs / 60, secs % 60);
    let (hours, mins) = (mins / 60, mins % 60);
    format!("{hours}:{mins:02}:{secs:02}.{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapcut_id3::{Frame, FrameBody, FrameId, OFFSET_UNUSED, TextFrame, Version};

    fn frame(id: &str, start: u32, end: u32, title: Option<&str>) -> Frame {
        let sub_frames = title
            .map(|t| {
                vec![Frame::new(
                    FrameId::TIT2,
                    FrameBody::Text(TextFrame::new(t, Version::V23)),
                )]
            })
            .unwrap_or_default();
        Frame::new(
            FrameId::CHAP,
            FrameBody::Chapter(ChapterFrame {
                element_id: id.into(),
                start_time: start,
                end_time: end,
                start_offset: OFFSET_UNUSED,
                end_offset: OFFSET_UNUSED,
                sub_frames,
            }),
        )
    }

    #[test]
    fn sorted_by_start_time() {
        let mut tag = Tag::new(Version::V23);
        tag.frames.push(frame("b", 5_000, 9_000, Some("Second")));
        tag.frames.push(frame("a", 0, 5_000, Some("First")));

        let chapters = chapters(&tag);
        let ids: Vec<_> = chapters.iter().map(|c| c.element_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(chapters[1].duration_ms(), 4_000);
    }

    #[test]
    fn missing_title_is_empty() {
        let mut tag = Tag::new(Version::V24);
        tag.frames.push(frame("a", 0, 10, None));
        assert_eq!(chapters(&tag)[0].title, "");
    }

    #[test]
    fn inverted_chapter_has_zero_duration() {
        let chapter = Chapter {
            element_id: "x".into(),
            title: String::new(),
            start_ms: 10,
            end_ms: 5,
        };
        assert_eq!(chapter.duration_ms(), 0);
    }

    #[test]
    fn formats_timestamps() {
        assert_eq!(format_ms(0), "0:00:00.000");
        assert_eq!(format_ms(3_723_004), "1:02:03.004");
    }

    #[test]
    fn display() {
        let chapter = Chapter {
            element_id: "ch1".into(),
            title: "Sponsor".into(),
            start_ms: 61_000,
            end_ms: 90_500,
        };
        assert_eq!(chapter.to_string(), "ch1 [0:01:01.000 - 0:01:30.500] 'Sponsor'");
    }
}
