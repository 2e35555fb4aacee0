use core::fmt;

use crate::error::{Id3Error, Id3Result};
use crate::syncsafe;

/// Length of the fixed ID3v2 header (and of the v2.4 footer).
pub const HEADER_LEN: usize = 10;

/**
    ID3v2 major version. Only the two versions that define `CHAP` and
    `CTOC` frames are supported.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    V23,
    V24,
}

impl Version {
    pub const fn from_major(major: u8) -> Option<Self> {
        match major {
            3 => Some(Self::V23),
            4 => Some(Self::V24),
            _ => None,
        }
    }

    pub const fn major(self) -> u8 {
        match self {
            Self::V23 => 3,
            Self::V24 => 4,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID3v2.{}", self.major())
    }
}

/**
    Tag-level header flags.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagFlags(pub u8);

impl TagFlags {
    pub const UNSYNCHRONISATION: u8 = 0x80;
    pub const EXTENDED_HEADER: u8 = 0x40;
    pub const EXPERIMENTAL: u8 = 0x20;
    pub const FOOTER: u8 = 0x10;

    pub const fn unsynchronisation(self) -> bool {
        self.0 & Self::UNSYNCHRONISATION != 0
    }

    pub const fn extended_header(self) -> bool {
        self.0 & Self::EXTENDED_HEADER != 0
    }

    pub const fn footer(self) -> bool {
        self.0 & Self::FOOTER != 0
    }
}

/**
    Fixed 10-byte ID3v2 tag header.

    Layout:
      [0..3]   "ID3"
      [3]      major version
      [4]      revision
      [5]      flags
      [6..10]  tag size, syncsafe (excludes header and footer)
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub version: Version,
    pub revision: u8,
    pub flags: TagFlags,
    pub size: u32,
}

impl TagHeader {
    /**
        Parse the header at the start of `data`.

        Returns `Ok(None)` if the data does not begin with an ID3v2 tag.
    */
    pub fn parse(data: &[u8]) -> Id3Result<Option<Self>> {
        if !data.starts_with(b"ID3") {
            return Ok(None);
        }
        if data.len() < HEADER_LEN {
            return Err(Id3Error::Truncated("tag header"));
        }

        let version =
            Version::from_major(data[3]).ok_or(Id3Error::UnsupportedVersion(data[3]))?;
        let size = syncsafe::decode(&[data[6], data[7], data[8], data[9]])?;

        Ok(Some(Self {
            version,
            revision: data[4],
            flags: TagFlags(data[5]),
            size,
        }))
    }

    /**
        Number of bytes the whole tag occupies in the file.
    */
    pub fn total_len(&self) -> usize {
        // only v2.4 defines a footer
        let footer = if self.version == Version::V24 && self.flags.footer() {
            HEADER_LEN
        } else {
            0
        };
        HEADER_LEN + self.size as usize + footer
    }

    pub fn to_bytes(&self) -> Id3Result<[u8; HEADER_LEN]> {
        let size = syncsafe::encode(self.size)?;
        Ok([
            b'I',
            b'D',
            b'3',
            self.version.major(),
            self.revision,
            self.flags.0,
            size[0],
            size[1],
            size[2],
            size[3],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_v24_header_with_footer() {
        let data = [b'I', b'D', b'3', 4, 0, 0x10, 0, 0, 0x01, 0x00];
        let header = TagHeader::parse(&data).unwrap().unwrap();
        assert_eq!(header.version, Version::V24);
        assert_eq!(header.size, 128);
        assert!(header.flags.footer());
        assert_eq!(header.total_len(), 148);
    }

    #[test]
    fn v23_has_no_footer() {
        let data = [b'I', b'D', b'3', 3, 0, 0x10, 0, 0, 0x01, 0x00];
        let header = TagHeader::parse(&data).unwrap().unwrap();
        assert_eq!(header.total_len(), 138);
    }

    #[test]
    fn not_a_tag() {
        assert_eq!(TagHeader::parse(&[0xff, 0xfb, 0x90, 0x00]).unwrap(), None);
    }

    #[test]
    fn rejects_v22() {
        let data = [b'I', b'D', b'3', 2, 0, 0, 0, 0, 0, 0];
        assert_eq!(TagHeader::parse(&data), Err(Id3Error::UnsupportedVersion(2)));
    }

    #[test]
    fn header_round_trips() {
        let header = TagHeader {
            version: Version::V23,
            revision: 0,
            flags: TagFlags::default(),
            size: 1000,
        };
        let bytes = header.to_bytes().unwrap();
        assert_eq!(TagHeader::parse(&bytes).unwrap(), Some(header));
    }
}
