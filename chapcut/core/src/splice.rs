use std::collections::{HashMap, HashSet};

use tracing::debug;

use chapcut_id3::{FrameId, OFFSET_UNUSED, Tag};
use chapcut_mpeg::{AudioFrame, AudioStream, InfoEdits};

use crate::chapter::Chapter;
use crate::error::ChapterResult;
use crate::file::Mp3File;
use crate::plan::{KeptChapter, RemovalPlan};

/**
    Assemble the output file for `plan`.

    Layout: rewritten ID3v2 tag, rewritten Xing/Info frame (if the input had
    one), kept audio frames in their original order, then the original
    ID3v1 trailer.
*/
pub fn splice(file: &Mp3File, stream: &AudioStream, plan: &RemovalPlan) -> ChapterResult<Vec<u8>> {
    let audio = file.audio();
    let kept: Vec<&AudioFrame> = stream
        .frames
        .iter()
        .zip(&plan.keep)
        .filter_map(|(frame, &keep)| keep.then_some(frame))
        .collect();

    let edits = InfoEdits {
        keep_delay: plan.keeps_stream_start(),
        keep_padding: plan.keeps_stream_end(),
    };
    let info = match &stream.info {
        Some(info) => {
            let rewritten = info.rewrite(&kept, audio, edits);
            if rewritten.is_none() {
                debug!(kind = %info.kind, "dropping metadata frame that cannot be rebuilt");
            }
            rewritten.unwrap_or_default()
        }
        None => Vec::new(),
    };

    let mut tag = file.require_tag()?.clone();
    rewrite_chapters(&mut tag, plan);

    // chapter byte offsets depend on the tag length, which they never change
    let audio_start = tag.to_bytes()?.len() + info.len();
    let mut frame_offsets = Vec::with_capacity(kept.len() + 1);
    let mut pos = audio_start;
    frame_offsets.push(pos);
    for frame in &kept {
        pos += frame.len;
        frame_offsets.push(pos);
    }
    set_byte_offsets(&mut tag, &plan.kept, &frame_offsets);

    let tag_bytes = tag.to_bytes()?;
    let audio_len: usize = kept.iter().map(|f| f.len).sum();

    let mut out = Vec::with_capacity(tag_bytes.len() + info.len() + audio_len + file.trailer.len());
    out.extend_from_slice(&tag_bytes);
    out.extend_from_slice(&info);
    for frame in &kept {
        out.extend_from_slice(&audio[frame.offset..frame.offset + frame.len]);
    }
    out.extend_from_slice(file.trailer());
    Ok(out)
}

/**
    Drop removed chapters, prune them from every table of contents and
    move kept chapters onto the new timeline.

    Chapter frames are matched by their full contents, so two frames that
    share an element id are handled independently.
*/
fn rewrite_chapters(tag: &mut Tag, plan: &RemovalPlan) {
    let removed: HashSet<&Chapter> = plan.removed.iter().collect();
    tag.retain(|frame| {
        frame
            .as_chapter()
            .is_none_or(|chap| !removed.contains(&Chapter::from_frame(chap)))
    });

    // an id stays listed while any chapter frame still carries it
    let remaining: HashSet<String> = tag.chapters().map(|c| c.element_id.clone()).collect();
    let dropped: HashSet<&str> = plan
        .removed
        .iter()
        .map(|c| c.element_id.as_str())
        .filter(|id| !remaining.contains(*id))
        .collect();
    for toc in tag.tables_of_contents_mut() {
        toc.child_ids.retain(|id| !dropped.contains(id.as_str()));
    }

    let kept: HashMap<&Chapter, &KeptChapter> =
        plan.kept.iter().map(|k| (&k.original, k)).collect();
    for chap in tag.chapters_mut() {
        if let Some(k) = kept.get(&Chapter::from_frame(chap)) {
            chap.start_time = k.remapped.start_ms;
            chap.end_time = k.remapped.end_ms;
        }
    }

    if tag.text(FrameId::TLEN).is_some() {
        tag.set_text(FrameId::TLEN, plan.new_duration_ms.to_string());
    }
}

/**
    Point chapter byte offsets at the output frames. Runs after
    [`rewrite_chapters`], so frames are matched by their remapped bounds.
*/
fn set_byte_offsets(tag: &mut Tag, kept: &[KeptChapter], frame_offsets: &[usize]) {
    let ranges: HashMap<&Chapter, &KeptChapter> = kept.iter().map(|k| (&k.remapped, k)).collect();

    for chap in tag.chapters_mut() {
        let Some(k) = ranges.get(&Chapter::from_frame(chap)) else {
            continue;
        };
        let offset = |i: usize| u32::try_from(frame_offsets[i]).unwrap_or(OFFSET_UNUSED);
        if chap.start_offset != OFFSET_UNUSED {
            chap.start_offset = offset(k.output_frames.start);
        }
        if chap.end_offset != OFFSET_UNUSED {
            chap.end_offset = offset(k.output_frames.end);
        }
    }
}
