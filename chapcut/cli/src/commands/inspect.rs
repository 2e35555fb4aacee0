use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use chapcut_core::id3::{Frame, FrameBody};
use chapcut_core::{Mp3File, format_ms};

const PREVIEW_BYTES: usize = 16;

/**
    Show tag frames and audio stream details.
*/
#[derive(Args)]
pub struct InspectCommand {
    /// Path to the MP3 file.
    pub path: PathBuf,
}

impl InspectCommand {
    pub fn run(self) -> Result<()> {
        let file = Mp3File::read(&self.path).context("failed to read MP3 file")?;

        match &file.tag {
            Some(tag) => {
                println!("Tag:             {} ({} bytes)", tag.version, file.tag_len);
                println!("Padding:         {} bytes", tag.padding);
                println!();
                println!("Frames ({}):", tag.frames.len());
                for frame in &tag.frames {
                    print_frame(frame, 1);
                }
            }
            None => println!("Tag:             none"),
        }
        if !file.trailer.is_empty() {
            println!();
            println!("ID3v1 trailer:   {} bytes", file.trailer.len());
        }

        let stream = file.scan().context("failed to scan audio stream")?;
        println!();
        println!("Audio:           {} {}", stream.version, stream.layer);
        println!("Sample Rate:     {} Hz", stream.sample_rate);
        println!("Channels:        {}", stream.channel_mode);
        println!("Bitrate:         {} kbps (average)", stream.average_bitrate() / 1000);
        println!("Frames:          {}", stream.frames.len());
        println!("Duration:        {}", format_ms(stream.duration_ms()));
        if stream.skipped_bytes > 0 {
            println!("Skipped:         {} bytes", stream.skipped_bytes);
        }
        if let Some(info) = &stream.info {
            println!();
            println!("VBR Header:      {}", info.kind);
            if let Some(count) = info.frame_count {
                println!("  Frames:        {count}");
            }
            if let Some(bytes) = info.byte_count {
                println!("  Bytes:         {bytes}");
            }
            if let Some(lame) = &info.lame {
                println!("  Encoder:       {}", lame.encoder);
                println!("  Delay:         {} samples", lame.delay);
                println!("  Padding:       {} samples", lame.padding);
            }
        }

        Ok(())
    }
}

fn print_frame(frame: &Frame, depth: usize) {
    let indent = "  ".repeat(depth);
    match &frame.body {
        FrameBody::Text(text) => {
            println!("{indent}{}  [{}] {}", frame.id, text.encoding, text.values.join(" / "));
        }
        FrameBody::Chapter(chap) => {
            println!(
                "{indent}{}  {} {} - {}",
                frame.id,
                chap.element_id,
                format_ms(u64::from(chap.start_time)),
                format_ms(u64::from(chap.end_time))
            );
            for sub in &chap.sub_frames {
                print_frame(sub, depth + 1);
            }
        }
        FrameBody::TableOfContents(toc) => {
            let mut flags = Vec::new();
            if toc.top_level {
                flags.push("top-level");
            }
            if toc.ordered {
                flags.push("ordered");
            }
            println!(
                "{indent}{}  {} ({}) -> {}",
                frame.id,
                toc.element_id,
                flags.join(", "),
                toc.child_ids.join(", ")
            );
            for sub in &toc.sub_frames {
                print_frame(sub, depth + 1);
            }
        }
        FrameBody::Raw(raw) => {
            let preview = &raw[..raw.len().min(PREVIEW_BYTES)];
            let ellipsis = if raw.len() > PREVIEW_BYTES { "..." } else { "" };
            println!(
                "{indent}{}  {} bytes  {}{ellipsis}",
                frame.id,
                raw.len(),
                hex::encode(preview)
            );
        }
    }
}
