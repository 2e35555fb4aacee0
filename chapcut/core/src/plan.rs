use std::ops::Range;

use tracing::{debug, info, warn};

use chapcut_id3::Tag;
use chapcut_mpeg::AudioStream;

use crate::chapter::{Chapter, chapters};
use crate::error::{ChapterError, ChapterResult};
use crate::filter::ChapterFilter;

/**
    Which audio survives the cut.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpliceMode {
    /// Only audio inside kept chapters is written.
    #[default]
    KeptChaptersOnly,
    /// Only audio inside removed chapters is dropped; audio outside every
    /// chapter is kept.
    CutRemovedOnly,
}

/**
    A chapter that survives, with its bounds on the new timeline.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeptChapter {
    pub original: Chapter,
    pub remapped: Chapter,
    /// Indices into the output frame sequence covered by this chapter.
    pub output_frames: Range<usize>,
}

/**
    Frame-level decision of what to keep, plus everything needed to
    describe the result.
*/
#[derive(Debug, Clone)]
pub struct RemovalPlan {
    pub mode: SpliceMode,
    pub removed: Vec<Chapter>,
    pub kept: Vec<KeptChapter>,
    /// One entry per audio frame of the input stream.
    pub keep: Vec<bool>,
    pub original_duration_ms: u64,
    pub new_duration_ms: u64,
    /// Kept frames that borrow bits from a dropped predecessor.
    pub reservoir_breaks: usize,
}

impl RemovalPlan {
    pub fn kept_frame_count(&self) -> usize {
        self.keep.iter().filter(|&&k| k).count()
    }

    /**
        The first frame of the original stream is still first.
    */
    pub fn keeps_stream_start(&self) -> bool {
        self.keep.first() == Some(&true)
    }

    /**
        The last frame of the original stream is still last.
    */
    pub fn keeps_stream_end(&self) -> bool {
        self.keep.last() == Some(&true)
    }
}

/**
    Decide which frames to keep and where the kept chapters land.

    A frame belongs to a chapter when its first sample lies in the chapter's
    `[start, end)` range. Every frame is written at most once, so
    overlapping chapters never duplicate audio.
*/
pub fn plan(
    tag: &Tag,
    stream: &AudioStream,
    filter: &ChapterFilter,
    mode: SpliceMode,
) -> ChapterResult<RemovalPlan> {
    let all = chapters(tag);
    if all.is_empty() {
        return Err(ChapterError::NoChapters);
    }

    let (removed, kept): (Vec<_>, Vec<_>) = all.into_iter().partition(|c| filter.matches(c));
    for chapter in &removed {
        info!(
            element_id = %chapter.element_id,
            title = %chapter.title,
            start_ms = chapter.start_ms,
            end_ms = chapter.end_ms,
            "removing chapter"
        );
    }

    let frame_count = stream.frames.len();
    let in_kept = coverage(stream, &kept);
    let in_removed = coverage(stream, &removed);

    let keep: Vec<bool> = (0..frame_count)
        .map(|i| match mode {
            SpliceMode::KeptChaptersOnly => in_kept[i],
            SpliceMode::CutRemovedOnly => in_kept[i] || !in_removed[i],
        })
        .collect();

    if !keep.iter().any(|&k| k) {
        return Err(if kept.is_empty() {
            ChapterError::EverythingRemoved
        } else {
            ChapterError::NoAudioKept
        });
    }

    // prefix sums over kept frames: samples and output frame index
    let mut prefix_samples = Vec::with_capacity(frame_count + 1);
    let mut prefix_frames = Vec::with_capacity(frame_count + 1);
    let (mut samples, mut frames) = (0u64, 0usize);
    prefix_samples.push(0);
    prefix_frames.push(0);
    for (frame, &k) in stream.frames.iter().zip(&keep) {
        if k {
            samples += u64::from(frame.samples);
            frames += 1;
        }
        prefix_samples.push(samples);
        prefix_frames.push(frames);
    }

    let kept = kept
        .into_iter()
        .map(|original| {
            let (start, end) = sample_range(stream, &original);
            let (lo, hi) = (frame_index(stream, start), frame_index(stream, end));
            let remapped = Chapter {
                start_ms: to_ms(stream, prefix_samples[lo]),
                end_ms: to_ms(stream, prefix_samples[hi]),
                ..original.clone()
            };
            debug!(
                element_id = %original.element_id,
                from_ms = original.start_ms,
                to_ms = remapped.start_ms,
                duration_ms = remapped.duration_ms(),
                "remapped chapter"
            );
            KeptChapter {
                original,
                remapped,
                output_frames: prefix_frames[lo]..prefix_frames[hi],
            }
        })
        .collect();

    let reservoir_breaks = stream
        .frames
        .iter()
        .enumerate()
        .skip(1)
        .filter(|&(i, f)| keep[i] && !keep[i - 1] && f.main_data_begin != 0)
        .count();

    Ok(RemovalPlan {
        mode,
        removed,
        kept,
        keep,
        original_duration_ms: stream.duration_ms(),
        new_duration_ms: stream.samples_to_ms(samples),
        reservoir_breaks,
    })
}

/**
    Mark every frame whose first sample falls inside one of `chapters`.
*/
fn coverage(stream: &AudioStream, chapters: &[Chapter]) -> Vec<bool> {
    let mut covered = vec![false; stream.frames.len()];
    for chapter in chapters {
        let (start, end) = sample_range(stream, chapter);
        let (lo, hi) = (frame_index(stream, start), frame_index(stream, end));
        covered[lo..hi].fill(true);
    }
    covered
}

fn sample_range(stream: &AudioStream, chapter: &Chapter) -> (u64, u64) {
    let start = stream.ms_to_samples(chapter.start_ms);
    let end = stream.ms_to_samples(chapter.end_ms);
    if end < start {
        warn!(
            element_id = %chapter.element_id,
            start_ms = chapter.start_ms,
            end_ms = chapter.end_ms,
            "chapter ends before it starts; treating it as empty"
        );
        return (start, start);
    }
    (start, end)
}

/**
    Index of the first frame starting at or after `sample`.
*/
fn frame_index(stream: &AudioStream, sample: u64) -> usize {
    stream.frames.partition_point(|f| f.start_sample < sample)
}

fn to_ms(stream: &AudioStream, samples: u64) -> u32 {
    u32::try_from(stream.samples_to_ms(samples)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapcut_id3::{ChapterFrame, Frame, FrameBody, FrameId, OFFSET_UNUSED, TextFrame, Version};
    use chapcut_mpeg::{AudioFrame, ChannelMode, Layer, MpegVersion};

    // 100 frames of 1152 samples at 44.1 kHz: ~2612 ms
    fn stream(main_data_begin: u16) -> AudioStream {
        let frames = (0..100)
            .map(|i| AudioFrame {
                offset: i * 417,
                len: 417,
                samples: 1152,
                start_sample: i as u64 * 1152,
                main_data_begin,
            })
            .collect();
        AudioStream {
            version: MpegVersion::V1,
            layer: Layer::III,
            sample_rate: 44_100,
            channel_mode: ChannelMode::Stereo,
            frames,
            info: None,
            skipped_bytes: 0,
        }
    }

    fn tag(chapters: &[(&str, u32, u32, &str)]) -> Tag {
        let mut tag = Tag::new(Version::V23);
        for &(id, start, end, title) in chapters {
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
                        FrameBody::Text(TextFrame::new(title, Version::V23)),
                    )],
                }),
            ));
        }
        tag
    }

    fn three_chapters() -> Tag {
        tag(&[
            ("ch0", 0, 1_000, "Intro"),
            ("ch1", 1_000, 2_000, "Advertisement"),
            ("ch2", 2_000, 2_700, "Outro"),
        ])
    }

    fn filter(pattern: &str) -> ChapterFilter {
        ChapterFilter::new([pattern], false).unwrap()
    }

    #[test]
    fn removes_middle_chapter() {
        let plan = plan(
            &three_chapters(),
            &stream(0),
            &filter("advert"),
            SpliceMode::KeptChaptersOnly,
        )
        .unwrap();

        assert_eq!(plan.removed.len(), 1);
        assert_eq!(plan.removed[0].element_id, "ch1");

        // frames 39..=76 start inside [44100, 88200)
        assert!(plan.keep[38]);
        assert!(!plan.keep[39]);
        assert!(!plan.keep[76]);
        assert!(plan.keep[77]);
        assert_eq!(plan.kept_frame_count(), 62);

        let ch0 = &plan.kept[0];
        assert_eq!((ch0.remapped.start_ms, ch0.remapped.end_ms), (0, 1_019));
        assert_eq!(ch0.output_frames, 0..39);

        let ch2 = &plan.kept[1];
        assert_eq!(ch2.remapped.start_ms, 1_019);
        assert_eq!(ch2.remapped.end_ms, 1_620);
        assert_eq!(ch2.output_frames, 39..62);

        assert_eq!(plan.original_duration_ms, 2_612);
        assert_eq!(plan.new_duration_ms, 1_620);
        assert!(plan.keeps_stream_start());
        assert!(plan.keeps_stream_end());
    }

    #[test]
    fn nothing_matches() {
        let plan = plan(
            &three_chapters(),
            &stream(0),
            &filter("credits"),
            SpliceMode::KeptChaptersOnly,
        )
        .unwrap();
        assert!(plan.removed.is_empty());
        assert_eq!(plan.kept_frame_count(), 100);
        assert_eq!(plan.new_duration_ms, plan.original_duration_ms);
    }

    #[test]
    fn uncovered_audio_depends_on_mode() {
        // chapters leave [1000, 1500) uncovered
        let tag = tag(&[
            ("ch0", 0, 1_000, "Intro"),
            ("ch1", 1_500, 2_000, "Sponsor"),
            ("ch2", 2_000, 2_700, "Outro"),
        ]);

        let strict = plan(&tag, &stream(0), &filter("sponsor"), SpliceMode::KeptChaptersOnly).unwrap();
        let loose = plan(&tag, &stream(0), &filter("sponsor"), SpliceMode::CutRemovedOnly).unwrap();

        // frame 50 starts at 57600 samples (~1306 ms), outside every chapter
        assert!(!strict.keep[50]);
        assert!(loose.keep[50]);
        assert!(loose.kept_frame_count() > strict.kept_frame_count());
    }

    #[test]
    fn overlapping_kept_chapters_do_not_duplicate() {
        let tag = tag(&[
            ("ch0", 0, 1_500, "Part 1"),
            ("ch1", 1_000, 2_700, "Part 2"),
        ]);
        let plan = plan(&tag, &stream(0), &filter("nothing"), SpliceMode::KeptChaptersOnly).unwrap();
        assert_eq!(plan.kept_frame_count(), 100);
        assert_eq!(plan.kept[1].remapped.start_ms, plan.kept[1].original.start_ms + 19);
    }

    #[test]
    fn first_chapter_removed_shifts_timeline() {
        let plan = plan(
            &three_chapters(),
            &stream(0),
            &filter("intro"),
            SpliceMode::KeptChaptersOnly,
        )
        .unwrap();
        assert!(!plan.keeps_stream_start());
        assert_eq!(plan.kept[0].remapped.start_ms, 0);
        assert_eq!(plan.kept[0].output_frames.start, 0);
    }

    #[test]
    fn counts_reservoir_breaks() {
        let plan = plan(
            &three_chapters(),
            &stream(100),
            &filter("advert"),
            SpliceMode::KeptChaptersOnly,
        )
        .unwrap();
        assert_eq!(plan.reservoir_breaks, 1);
    }

    #[test]
    fn refuses_to_remove_everything() {
        let err = plan(&three_chapters(), &stream(0), &filter("t"), SpliceMode::KeptChaptersOnly)
            .unwrap_err();
        assert!(matches!(err, ChapterError::EverythingRemoved));
    }

    #[test]
    fn chapters_past_end_of_stream() {
        let tag = tag(&[("ch0", 10_000, 20_000, "Late"), ("ch1", 20_000, 30_000, "Later")]);
        let err = plan(&tag, &stream(0), &filter("nothing"), SpliceMode::KeptChaptersOnly)
            .unwrap_err();
        assert!(matches!(err, ChapterError::NoAudioKept));
    }

    #[test]
    fn requires_chapters() {
        let err = plan(
            &Tag::new(Version::V23),
            &stream(0),
            &filter("x"),
            SpliceMode::KeptChaptersOnly,
        )
        .unwrap_err();
        assert!(matches!(err, ChapterError::NoChapters));
    }
}
