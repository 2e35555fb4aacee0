/*!
    MPEG-1/2/2.5 audio (Layer I, II, III) frame scanning.

    The scanner never decodes audio. It locates frame boundaries, tracks
    each frame's position on the sample timeline and recognizes the
    Xing / Info / VBRI metadata frame encoders place at the start of the
    stream, which is enough to cut a stream at frame granularity.
*/

mod crc;
mod error;
mod header;
mod info;
mod stream;

pub use self::crc::{Crc16, crc16};
pub use self::error::{MpegError, MpegResult};
pub use self::header::{ChannelMode, FrameHeader, Layer, MpegVersion};
pub use self::info::{InfoEdits, InfoFrame, InfoKind, LameTag};
pub use self::stream::{AudioFrame, AudioStream, scan};
