/**
    CRC-16/ARC (polynomial 0x8005, reflected, initial value 0), the checksum
    LAME uses for its music and info tag CRC fields.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc16(u16);

impl Crc16 {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn update(&mut self, data: &[u8]) {
        let mut crc = self.0;
        for &b in data {
            crc ^= u16::from(b);
            for _ in 0..8 {
                crc = if crc & 1 != 0 {
                    (crc >> 1) ^ 0xa001
                } else {
                    crc >> 1
                };
            }
        }
        self.0 = crc;
    }

    pub const fn finish(self) -> u16 {
        self.0
    }
}

/**
    One-shot CRC-16/ARC of `data`.
*/
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(data);
    crc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value() {
        assert_eq!(crc16(b"123456789"), 0xbb3d);
    }

    #[test]
    fn incremental_matches_one_shot() {
        let mut crc = Crc16::new();
        crc.update(b"1234");
        crc.update(b"56789");
        assert_eq!(crc.finish(), crc16(b"123456789"));
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(crc16(&[]), 0);
    }
}
