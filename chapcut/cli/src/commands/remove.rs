use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use chapcut_core::{ChapterFilter, RemoveOptions, SpliceMode, remove_chapters};

/**
    Remove chapters whose title contains a filter string.
*/
#[derive(Args)]
pub struct RemoveCommand {
    /// Path to the input MP3 file.
    #[arg(short, long, alias = "input_file", env = "CHAPCUT_INPUT_FILE")]
    pub input_file: PathBuf,

    /// Path to the output MP3 file. May be the input file.
    #[arg(short, long, alias = "output_file", env = "CHAPCUT_OUTPUT_FILE")]
    pub output_file: PathBuf,

    /// String to filter chapters to be removed. Can be repeated.
    #[arg(
        short,
        long,
        alias = "filter_string",
        env = "CHAPCUT_FILTER_STRING",
        required = true
    )]
    pub filter_string: Vec<String>,

    /// Match chapter titles case-sensitively.
    #[arg(long)]
    pub case_sensitive: bool,

    /// Keep audio that lies outside every chapter.
    #[arg(long)]
    pub keep_uncovered: bool,

    /// Report what would be removed without writing anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl RemoveCommand {
    pub fn run(self) -> Result<()> {
        let filter = ChapterFilter::new(self.filter_string.iter().cloned(), self.case_sensitive)
            .context("invalid filter string")?;

        let options = RemoveOptions {
            mode: if self.keep_uncovered {
                SpliceMode::CutRemovedOnly
            } else {
                SpliceMode::KeptChaptersOnly
            },
            dry_run: self.dry_run,
        };

        let report = remove_chapters(&self.input_file, &self.output_file, &filter, &options)
            .with_context(|| {
                format!("failed to remove chapters from {}", self.input_file.display())
            })?;

        println!("{report}");
        if !self.dry_run {
            println!();
            println!(
                "Successfully created {} with chapters containing '{}' removed.",
                self.output_file.display(),
                self.filter_string.join("', '")
            );
        }

        Ok(())
    }
}
