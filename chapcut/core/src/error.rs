use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use chapcut_id3::Id3Error;
use chapcut_mpeg::MpegError;

/**
    Errors from the chapter removal pipeline.
*/
#[derive(Debug, Error)]
pub enum ChapterError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Id3(#[from] Id3Error),

    #[error(transparent)]
    Mpeg(#[from] MpegError),

    #[error("file has no ID3v2 tag")]
    NoTag,

    #[error("file has no chapters")]
    NoChapters,

    #[error("filter patterns must not be empty")]
    EmptyPattern,

    #[error("every chapter matches the filter; nothing would be left")]
    EverythingRemoved,

    #[error("the kept chapters contain no audio frames")]
    NoAudioKept,
}

impl ChapterError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/**
    Type alias for results that may return a [`ChapterError`].
*/
pub type ChapterResult<T> = std::result::Result<T, ChapterError>;
