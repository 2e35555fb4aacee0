use thiserror::Error;

use crate::frame::FrameId;

/**
    Errors from ID3v2 tag parsing and serialization.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Id3Error {
    #[error("unsupported ID3v2 version 2.{0}")]
    UnsupportedVersion(u8),

    #[error("ID3 tag is truncated: {0}")]
    Truncated(&'static str),

    #[error("invalid syncsafe integer")]
    InvalidSyncsafe,

    #[error("malformed {frame} frame: {reason}")]
    MalformedFrame { frame: FrameId, reason: String },

    #[error("invalid text encoding byte {0:#04x}")]
    InvalidEncoding(u8),

    #[error("{0} too large to encode")]
    TooLarge(&'static str),
}

/**
    Type alias for results that may return an [`Id3Error`].
*/
pub type Id3Result<T> = std::result::Result<T, Id3Error>;
