/*!
    MPEG audio frame header.

    32-bit layout:
      AAAAAAAA AAABBCCD EEEEFFGH IIJJKLMM
      A  sync (11 bits, all set)
      B  version: 00 = 2.5, 01 = reserved, 10 = 2, 11 = 1
      C  layer: 01 = III, 10 = II, 11 = I
      D  protection bit (0 = CRC follows the header)
      E  bitrate index
      F  sample rate index
      G  padding
      H  private
      I  channel mode
      J  mode extension
      K  copyright
      L  original
      M  emphasis
*/

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MpegVersion {
    V1,
    V2,
    V25,
}

impl MpegVersion {
    pub const fn to_name(self) -> &'static str {
        match self {
            Self::V1 => "MPEG-1",
            Self::V2 => "MPEG-2",
            Self::V25 => "MPEG-2.5",
        }
    }
}

impl fmt::Display for MpegVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    I,
    II,
    III,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::I => "Layer I",
            Self::II => "Layer II",
            Self::III => "Layer III",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualChannel,
    Mono,
}

impl ChannelMode {
    pub const fn channels(self) -> u16 {
        match self {
            Self::Mono => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stereo => "stereo",
            Self::JointStereo => "joint stereo",
            Self::DualChannel => "dual channel",
            Self::Mono => "mono",
        })
    }
}

// kbps, indices 1..=14
const BITRATES_V1_L1: [u32; 14] = [32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448];
const BITRATES_V1_L2: [u32; 14] = [32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384];
const BITRATES_V1_L3: [u32; 14] = [32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320];
const BITRATES_V2_L1: [u32; 14] = [32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256];
const BITRATES_V2_L23: [u32; 14] = [8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160];

const SAMPLE_RATES_V1: [u32; 3] = [44100, 48000, 32000];
const SAMPLE_RATES_V2: [u32; 3] = [22050, 24000, 16000];
const SAMPLE_RATES_V25: [u32; 3] = [11025, 12000, 8000];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: MpegVersion,
    pub layer: Layer,
    pub crc_protected: bool,
    /// Bits per second.
    pub bitrate: u32,
    /// Hz.
    pub sample_rate: u32,
    pub padding: bool,
    pub channel_mode: ChannelMode,
}

impl FrameHeader {
    /**
        Decode a frame header.

        Returns `None` for anything that is not a usable header, including
        the free-format bitrate and reserved field values.
    */
    pub fn parse(bytes: [u8; 4]) -> Option<Self> {
        let h = u32::from_be_bytes(bytes);
        if h >> 21 != 0x7ff {
            return None;
        }

        let version = match (h >> 19) & 0b11 {
            0b00 => MpegVersion::V25,
            0b10 => MpegVersion::V2,
            0b11 => MpegVersion::V1,
            _ => return None,
        };
        let layer = match (h >> 17) & 0b11 {
            0b01 => Layer::III,
            0b10 => Layer::II,
            0b11 => Layer::I,
            _ => return None,
        };

        let bitrate_index = ((h >> 12) & 0xf) as usize;
        if bitrate_index == 0 || bitrate_index == 0xf {
            return None;
        }
        let table = match (version, layer) {
            (MpegVersion::V1, Layer::I) => &BITRATES_V1_L1,
            (MpegVersion::V1, Layer::II) => &BITRATES_V1_L2,
            (MpegVersion::V1, Layer::III) => &BITRATES_V1_L3,
            (_, Layer::I) => &BITRATES_V2_L1,
            (_, _) => &BITRATES_V2_L23,
        };

        let sample_rate_index = ((h >> 10) & 0b11) as usize;
        if sample_rate_index == 0b11 {
            return None;
        }
        let sample_rate = match version {
            MpegVersion::V1 => SAMPLE_RATES_V1[sample_rate_index],
            MpegVersion::V2 => SAMPLE_RATES_V2[sample_rate_index],
            MpegVersion::V25 => SAMPLE_RATES_V25[sample_rate_index],
        };

        if h & 0b11 == 0b10 {
            return None;
        }

        let channel_mode = match (h >> 6) & 0b11 {
            0b00 => ChannelMode::Stereo,
            0b01 => ChannelMode::JointStereo,
            0b10 => ChannelMode::DualChannel,
            _ => ChannelMode::Mono,
        };

        Some(Self {
            version,
            layer,
            crc_protected: (h >> 16) & 1 == 0,
            bitrate: table[bitrate_index - 1] * 1000,
            sample_rate,
            padding: (h >> 9) & 1 == 1,
            channel_mode,
        })
    }

    pub const fn samples_per_frame(&self) -> u32 {
        match (self.layer, self.version) {
            (Layer::I, _) => 384,
            (Layer::II, _) | (Layer::III, MpegVersion::V1) => 1152,
            (Layer::III, _) => 576,
        }
    }

    /**
        Total frame length in bytes, header included.
    */
    pub const fn frame_len(&self) -> usize {
        let pad = self.padding as u32;
        let len = match self.layer {
            Layer::I => (12 * self.bitrate / self.sample_rate + pad) * 4,
            _ => self.samples_per_frame() / 8 * self.bitrate / self.sample_rate + pad,
        };
        len as usize
    }

    /**
        Length of the Layer III side information that follows the header
        (and CRC). Zero for Layers I and II.
    */
    pub const fn side_info_len(&self) -> usize {
        match (self.layer, self.version, self.channel_mode) {
            (Layer::III, MpegVersion::V1, ChannelMode::Mono) => 17,
            (Layer::III, MpegVersion::V1, _) => 32,
            (Layer::III, _, ChannelMode::Mono) => 9,
            (Layer::III, _, _) => 17,
            _ => 0,
        }
    }

    /**
        Offset of the first byte after header, CRC and side information.
    */
    pub const fn data_offset(&self) -> usize {
        4 + if self.crc_protected { 2 } else { 0 } + self.side_info_len()
    }

    /**
        Two headers belong to the same elementary stream.
    */
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.version == other.version
            && self.layer == other.layer
            && self.sample_rate == other.sample_rate
    }

    /**
        Layer III `main_data_begin`: how many bytes of this frame's audio
        data live in previous frames (the bit reservoir).
    */
    pub fn main_data_begin(&self, frame: &[u8]) -> u16 {
        if self.layer != Layer::III {
            return 0;
        }
        let at = 4 + if self.crc_protected { 2 } else { 0 };
        match (self.version, frame.get(at), frame.get(at + 1)) {
            (MpegVersion::V1, Some(&a), Some(&b)) => (u16::from(a) << 1) | u16::from(b >> 7),
            (MpegVersion::V2 | MpegVersion::V25, Some(&a), _) => u16::from(a),
            _ => 0,
        }
    }
}
