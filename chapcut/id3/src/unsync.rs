/*!
    ID3v2 unsynchronisation scheme.

    Writers insert a `0x00` after every `0xFF` so tag bytes never look like
    an MPEG frame sync. This crate only ever reverses the scheme; tags are
    always written without it.
*/

/**
    Undo unsynchronisation: drop every `0x00` that directly follows `0xFF`.
*/
pub fn decode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut prev_ff = false;
    for &b in data {
        if prev_ff && b == 0x00 {
            prev_ff = false;
            continue;
        }
        out.push(b);
        prev_ff = b == 0xff;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_inserted_zero() {
        assert_eq!(decode(&[0xff, 0x00, 0xe0]), vec![0xff, 0xe0]);
    }

    #[test]
    fn keeps_zero_not_after_ff() {
        assert_eq!(decode(&[0x00, 0x12, 0x00]), vec![0x00, 0x12, 0x00]);
    }

    #[test]
    fn ff_ff_zero_zero() {
        // each 0xFF was escaped independently
        assert_eq!(decode(&[0xff, 0x00, 0xff, 0x00]), vec![0xff, 0xff]);
    }
}
