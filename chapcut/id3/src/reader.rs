use crate::error::{Id3Error, Id3Result};

/**
    Forward-only cursor over a byte slice.

    Every read names the field it is reading so a short buffer reports
    which field ran out of bytes.
*/
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn bytes(&mut self, len: usize, what: &'static str) -> Id3Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(Id3Error::Truncated(what));
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub fn u8(&mut self, what: &'static str) -> Id3Result<u8> {
        Ok(self.bytes(1, what)?[0])
    }

    pub fn u16_be(&mut self, what: &'static str) -> Id3Result<u16> {
        let b = self.bytes(2, what)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn u32_be(&mut self, what: &'static str) -> Id3Result<u32> {
        let b = self.bytes(4, what)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn array4(&mut self, what: &'static str) -> Id3Result<[u8; 4]> {
        let b = self.bytes(4, what)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    /**
        Read a NUL-terminated ISO-8859-1 string, consuming the terminator.
    */
    pub fn latin1_cstr(&mut self, what: &'static str) -> Id3Result<String> {
        let rest = self.rest();
        let Some(nul) = rest.iter().position(|&b| b == 0) else {
            return Err(Id3Error::Truncated(what));
        };
        self.pos += nul + 1;
        Ok(rest[..nul].iter().map(|&b| char::from(b)).collect())
    }
}

/**
    Append `s` as a NUL-terminated ISO-8859-1 string.

    Characters outside Latin-1 are written as `?`.
*/
pub(crate) fn write_latin1_cstr(out: &mut Vec<u8>, s: &str) {
    out.extend(s.chars().map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')));
    out.push(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fields_in_order() {
        let data = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x03, b'a', b'b', 0, 0xff];
        let mut r = Reader::new(&data);
        assert_eq!(r.u8("a").unwrap(), 1);
        assert_eq!(r.u16_be("b").unwrap(), 2);
        assert_eq!(r.u32_be("c").unwrap(), 3);
        assert_eq!(r.latin1_cstr("d").unwrap(), "ab");
        assert_eq!(r.rest(), &[0xff]);
    }

    #[test]
    fn short_read_names_the_field() {
        let mut r = Reader::new(&[0x00, 0x01]);
        assert_eq!(r.u32_be("start time"), Err(Id3Error::Truncated("start time")));
    }

    #[test]
    fn unterminated_string_is_truncated() {
        let mut r = Reader::new(b"chp0");
        assert_eq!(r.latin1_cstr("element id"), Err(Id3Error::Truncated("element id")));
    }

    #[test]
    fn latin1_writer_replaces_wide_chars() {
        let mut out = Vec::new();
        write_latin1_cstr(&mut out, "é→");
        assert_eq!(out, vec![0xe9, b'?', 0]);
    }
}
