use core::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::chapter::{Chapter, format_ms};
use crate::error::{ChapterError, ChapterResult};
use crate::file::Mp3File;
use crate::filter::ChapterFilter;
use crate::plan::{KeptChapter, SpliceMode, plan};
use crate::splice::splice;

/**
    Options for [`remove_chapters`].
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    pub mode: SpliceMode,
    /// Plan the cut and report it without writing the output file.
    pub dry_run: bool,
}

/**
    Outcome of [`remove_chapters`].
*/
#[derive(Debug, Clone)]
pub struct RemovalReport {
    pub output: PathBuf,
    pub removed: Vec<Chapter>,
    pub kept: Vec<KeptChapter>,
    pub original_duration_ms: u64,
    pub new_duration_ms: u64,
    pub frames_total: usize,
    pub frames_kept: usize,
    pub reservoir_breaks: usize,
    /// `None` for dry runs.
    pub bytes_written: Option<usize>,
}

impl fmt::Display for RemovalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Removed chapters ({}):", self.removed.len())?;
        for chapter in &self.removed {
            writeln!(f, "  {chapter}")?;
        }
        writeln!(f, "Kept chapters ({}):", self.kept.len())?;
        for kept in &self.kept {
            writeln!(f, "  {}", kept.remapped)?;
        }
        writeln!(
            f,
            "Duration: {} -> {}",
            format_ms(self.original_duration_ms),
            format_ms(self.new_duration_ms)
        )?;
        write!(f, "Frames:   {} of {} kept", self.frames_kept, self.frames_total)?;
        if let Some(bytes) = self.bytes_written {
            write!(f, "\nWritten:  {bytes} bytes to {}", self.output.display())?;
        }
        Ok(())
    }
}

/**
    Remove every chapter matching `filter` from `input` and write the result
    to `output`.

    The output is written to a temporary file next to `output` and renamed
    into place, so `input` and `output` may be the same path.
*/
pub fn remove_chapters(
    input: &Path,
    output: &Path,
    filter: &ChapterFilter,
    options: &RemoveOptions,
) -> ChapterResult<RemovalReport> {
    let file = Mp3File::read(input)?;
    let tag = file.require_tag()?;
    let stream = file.scan()?;

    info!(
        path = %input.display(),
        tag = %tag.version,
        frames = stream.frames.len(),
        duration = %format_ms(stream.duration_ms()),
        "loaded input"
    );
    if stream.skipped_bytes > 0 {
        warn!(bytes = stream.skipped_bytes, "skipped data outside audio frames");
    }

    let plan = plan(tag, &stream, filter, options.mode)?;
    if plan.removed.is_empty() {
        info!(patterns = ?filter.patterns(), "no chapter title matched");
    }
    if plan.reservoir_breaks > 0 {
        warn!(
            cuts = plan.reservoir_breaks,
            "cut points split the bit reservoir; expect a short glitch at each"
        );
    }

    let bytes_written = if options.dry_run {
        None
    } else {
        let bytes = splice(&file, &stream, &plan)?;
        write_atomic(output, input, &bytes)?;
        Some(bytes.len())
    };

    info!(
        duration = %format_ms(plan.new_duration_ms),
        removed = plan.removed.len(),
        kept = plan.kept.len(),
        dry_run = options.dry_run,
        "new audio duration"
    );

    Ok(RemovalReport {
        output: output.to_path_buf(),
        frames_total: plan.keep.len(),
        frames_kept: plan.kept_frame_count(),
        removed: plan.removed,
        kept: plan.kept,
        original_duration_ms: plan.original_duration_ms,
        new_duration_ms: plan.new_duration_ms,
        reservoir_breaks: plan.reservoir_breaks,
        bytes_written,
    })
}

/**
    Replace `path` with `bytes`. The new file takes the permissions of the
    file it replaces, or of `template` when `path` does not exist yet.
*/
fn write_atomic(path: &Path, template: &Path, bytes: &[u8]) -> ChapterResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let permissions = match fs::metadata(path) {
        Ok(meta) => meta.permissions(),
        Err(_) => fs::metadata(template)
            .map_err(|e| ChapterError::io(template, e))?
            .permissions(),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ChapterError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| ChapterError::io(tmp.path(), e))?;
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(|e| ChapterError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| ChapterError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| ChapterError::io(path, e.error))?;
    Ok(())
}
