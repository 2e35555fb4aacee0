/*!
    ID3v2.3 / ID3v2.4 tag codec with first-class chapter support.

    Frames this crate does not interpret are carried as raw bytes and written
    back unchanged, so a parse / serialize cycle only normalizes the tag
    container (no extended header, no unsynchronisation, no footer).
*/

mod chapter;
mod error;
mod frame;
mod header;
mod reader;
mod tag;
mod text;

pub mod id3v1;
pub mod syncsafe;
pub mod unsync;

pub use self::chapter::{ChapterFrame, OFFSET_UNUSED, TocFrame};
pub use self::error::{Id3Error, Id3Result};
pub use self::frame::{Frame, FrameBody, FrameId};
pub use self::header::{TagFlags, TagHeader, Version};
pub use self::tag::Tag;
pub use self::text::{TextEncoding, TextFrame};
