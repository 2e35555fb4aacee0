use std::ops::Range;
use std::path::Path;

use chapcut_id3::{Tag, id3v1};
use chapcut_mpeg::AudioStream;

use crate::error::{ChapterError, ChapterResult};

/**
    An MP3 file split into its three regions:

      [ ID3v2 tag ][ MPEG audio ][ ID3v1 trailer ]

    Either tag may be absent.
*/
#[derive(Debug, Clone)]
pub struct Mp3File {
    pub data: Vec<u8>,
    pub tag: Option<Tag>,
    pub tag_len: usize,
    pub audio: Range<usize>,
    pub trailer: Range<usize>,
}

impl Mp3File {
    pub fn read(path: &Path) -> ChapterResult<Self> {
        let data = std::fs::read(path).map_err(|e| ChapterError::io(path, e))?;
        Self::from_bytes(data)
    }

    pub fn from_bytes(data: Vec<u8>) -> ChapterResult<Self> {
        let (tag, tag_len) = match Tag::parse(&data)? {
            Some((tag, len)) => (Some(tag), len.min(data.len())),
            None => (None, 0),
        };

        let trailer_len = id3v1::trailer_len(&data[tag_len..]);
        let audio_end = data.len() - trailer_len;

        Ok(Self {
            tag,
            tag_len,
            audio: tag_len..audio_end,
            trailer: audio_end..data.len(),
            data,
        })
    }

    pub fn audio(&self) -> &[u8] {
        &self.data[self.audio.clone()]
    }

    pub fn trailer(&self) -> &[u8] {
        &self.data[self.trailer.clone()]
    }

    pub fn require_tag(&self) -> ChapterResult<&Tag> {
        self.tag.as_ref().ok_or(ChapterError::NoTag)
    }

    /**
        Locate the audio frames. Frame offsets are relative to [`Self::audio`].
    */
    pub fn scan(&self) -> ChapterResult<AudioStream> {
        Ok(chapcut_mpeg::scan(self.audio())?)
    }
}
