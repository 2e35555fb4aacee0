use thiserror::Error;

/**
    Errors from MPEG audio stream scanning.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MpegError {
    #[error("no MPEG audio frames found in {0} bytes")]
    NoAudioFrames(usize),
}

/**
    Type alias for results that may return an [`MpegError`].
*/
pub type MpegResult<T> = std::result::Result<T, MpegError>;
