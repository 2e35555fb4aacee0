use crate::error::{MpegError, MpegResult};
use crate::header::{ChannelMode, FrameHeader, Layer, MpegVersion};
use crate::info::InfoFrame;

/**
    One audio frame located by [`scan`].
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFrame {
    /// Offset within the scanned data.
    pub offset: usize,
    /// Length in bytes, header included.
    pub len: usize,
    /// Decoded samples per channel.
    pub samples: u32,
    /// Position of the first sample on the stream timeline.
    pub start_sample: u64,
    /// Bytes of this frame's audio data stored in earlier frames.
    pub main_data_begin: u16,
}

/**
    Frame layout of an MPEG audio elementary stream.
*/
#[derive(Debug, Clone)]
pub struct AudioStream {
    pub version: MpegVersion,
    pub layer: Layer,
    pub sample_rate: u32,
    pub channel_mode: ChannelMode,
    /// Audio frames in stream order, excluding the metadata frame.
    pub frames: Vec<AudioFrame>,
    pub info: Option<InfoFrame>,
    /// Bytes that were not part of any frame.
    pub skipped_bytes: usize,
}

impl AudioStream {
    pub fn total_samples(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.samples)).sum()
    }

    pub fn duration_ms(&self) -> u64 {
        self.samples_to_ms(self.total_samples())
    }

    pub fn frame_start_sample(&self, index: usize) -> Option<u64> {
        self.frames.get(index).map(|f| f.start_sample)
    }

    /**
        Convert a sample count to milliseconds, rounding to nearest.
    */
    pub fn samples_to_ms(&self, samples: u64) -> u64 {
        let rate = u64::from(self.sample_rate);
        (samples * 1000 + rate / 2) / rate
    }

    pub fn ms_to_samples(&self, ms: u32) -> u64 {
        u64::from(ms) * u64::from(self.sample_rate) / 1000
    }

    /**
        Average bitrate of the audio frames in bits per second.
    */
    pub fn average_bitrate(&self) -> u64 {
        let samples = self.total_samples();
        if samples == 0 {
            return 0;
        }
        let bytes: u64 = self.frames.iter().map(|f| f.len as u64).sum();
        bytes * 8 * u64::from(self.sample_rate) / samples
    }
}

/**
    Locate every audio frame in `data`.

    Every frame must be followed by another header of the same stream, or
    end exactly at the end of the data. The first accepted frame locks the
    stream parameters. Bytes that cannot be attributed to a frame are
    skipped and counted.
*/
pub fn scan(data: &[u8]) -> MpegResult<AudioStream> {
    let mut located: Vec<(usize, FrameHeader)> = Vec::new();
    let mut reference: Option<FrameHeader> = None;
    let mut skipped = 0;
    let mut pos = 0;

    while pos + 4 <= data.len() {
        match candidate(data, pos, reference.as_ref()) {
            Some(header) => {
                reference.get_or_insert(header);
                located.push((pos, header));
                pos += header.frame_len();
            }
            None => {
                pos += 1;
                skipped += 1;
            }
        }
    }
    skipped += data.len().saturating_sub(pos);

    let Some(first) = reference else {
        return Err(MpegError::NoAudioFrames(data.len()));
    };

    let mut located = located.into_iter().peekable();
    let info = located.peek().and_then(|&(offset, header)| {
        InfoFrame::detect(&header, &data[offset..offset + header.frame_len()], offset)
    });
    if info.is_some() {
        located.next();
    }

    let mut frames = Vec::new();
    let mut start_sample = 0u64;
    for (offset, header) in located {
        let len = header.frame_len();
        let samples = header.samples_per_frame();
        frames.push(AudioFrame {
            offset,
            len,
            samples,
            start_sample,
            main_data_begin: header.main_data_begin(&data[offset..offset + len]),
        });
        start_sample += u64::from(samples);
    }

    Ok(AudioStream {
        version: first.version,
        layer: first.layer,
        sample_rate: first.sample_rate,
        channel_mode: first.channel_mode,
        frames,
        info,
        skipped_bytes: skipped,
    })
}

/**
    A header at `pos` counts only when the next frame header follows it, or
    when its frame ends exactly at the end of the data. Once locked, both
    headers must also match the locked stream.
*/
fn candidate(data: &[u8], pos: usize, reference: Option<&FrameHeader>) -> Option<FrameHeader> {
    let header = FrameHeader::parse(*data[pos..].first_chunk::<4>()?)?;
    let reference = reference.unwrap_or(&header);
    if !reference.is_compatible(&header) {
        return None;
    }

    let end = pos + header.frame_len();
    if end > data.len() {
        return None;
    }
    if end == data.len() {
        return Some(header);
    }

    let next = FrameHeader::parse(*data[end..].first_chunk::<4>()?)?;
    reference.is_compatible(&next).then_some(header)
}
