use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use chapcut_core::{Mp3File, chapters, format_ms};

/**
    List the chapters of an MP3 file.
*/
#[derive(Args)]
pub struct ListCommand {
    /// Path to the MP3 file.
    pub path: PathBuf,
}

impl ListCommand {
    pub fn run(self) -> Result<()> {
        let file = Mp3File::read(&self.path).context("failed to read MP3 file")?;
        let tag = file.require_tag()?;
        let chapters = chapters(tag);

        if chapters.is_empty() {
            println!("No chapters.");
            return Ok(());
        }

        println!("Chapters ({}):", chapters.len());
        for (i, chapter) in chapters.iter().enumerate() {
            println!(
                "  [{i:>3}] {:<10} {} - {}  ({})  {}",
                chapter.element_id,
                format_ms(u64::from(chapter.start_ms)),
                format_ms(u64::from(chapter.end_ms)),
                format_ms(u64::from(chapter.duration_ms())),
                chapter.title
            );
        }

        Ok(())
    }
}
